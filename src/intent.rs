//! File-operation intents handed over by the upstream extractor.

use serde::{Deserialize, Serialize};

/// Structured request extracted from a spoken command. Every field is
/// optional; the extractor sends `null` for anything it did not hear.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Intent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// Folder name the operation reads from
    #[serde(default)]
    pub source: Option<String>,
    /// Folder name the operation writes to
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub new_filename: Option<String>,
    #[serde(default)]
    pub size_mb: Option<f64>,
    #[serde(default)]
    pub size_operator: Option<String>,
}

impl Intent {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An intent with its folder names mapped to paths.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResolvedIntent {
    #[serde(flatten)]
    pub intent: Intent,
    pub resolved_source_path: Option<String>,
    pub resolved_destination_path: Option<String>,
}
