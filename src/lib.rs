//! dirseek - persistent folder index for resolving spoken folder names
//!
//! A voice assistant hands over a loosely phrased folder name ("downloads",
//! "my reports folder" after extraction, a misheard "downlods"). dirseek
//! maps it to a real directory:
//!
//! ```text
//! roots ──▶ IndexBuilder ──▶ IndexStore (folder_index.json)
//!                                 │
//! query ──▶ Resolver ◀────────────┘
//!             │  exact key, else closest key
//!             ▼
//!           PathScorer ──▶ one path | nothing | ask the Disambiguator
//! ```

pub mod builder;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod index;
pub mod intent;
pub mod prompt;
pub mod resolve;
pub mod score;
pub mod similarity;
pub mod store;

pub use builder::{BuildReport, IndexBuilder, WalkDiagnostic};
pub use classify::SkipList;
pub use config::Config;
pub use context::FolderContext;
pub use error::{Error, Result};
pub use index::FolderIndex;
pub use intent::{Intent, ResolvedIntent};
pub use prompt::TerminalPrompt;
pub use resolve::{Disambiguator, Lookup, Resolution, Resolver};
pub use score::{PathScorer, ScoredPath};
pub use similarity::Similarity;
pub use store::{IndexChoice, IndexStore, Initialized, Origin, RefreshPolicy};
