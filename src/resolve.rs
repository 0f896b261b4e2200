//! Folder-name resolution: exact lookup, fuzzy fallback, ranking and
//! disambiguation.

use crate::config::{Config, DEFAULT_AMBIGUITY_THRESHOLD, DEFAULT_FUZZY_CUTOFF};
use crate::error::Result;
use crate::index::FolderIndex;
use crate::score::{PathScorer, ScoredPath};
use crate::similarity::{closest_match, Similarity};
use crate::classify::SkipList;
use tracing::debug;

/// Picks one of several closely ranked candidates.
///
/// The answer is the raw reply of whoever was asked: a 1-based position
/// in `ranked`. Anything else makes the resolution fail without an error.
pub trait Disambiguator {
    fn choose(&mut self, ranked: &[ScoredPath]) -> Result<String>;
}

impl<F> Disambiguator for F
where
    F: FnMut(&[ScoredPath]) -> Result<String>,
{
    fn choose(&mut self, ranked: &[ScoredPath]) -> Result<String> {
        self(ranked)
    }
}

/// How a query's candidate list was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// Index key whose paths were ranked
    pub key: String,
    pub fuzzy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Empty query, or no exact or fuzzy key.
    NotFound,
    /// The key had exactly one path.
    Single { lookup: Lookup, path: String },
    /// The best candidate led the runner-up by more than the threshold.
    AutoSelected { lookup: Lookup, ranked: Vec<ScoredPath> },
    /// The disambiguator picked a valid entry.
    Selected { lookup: Lookup, ranked: Vec<ScoredPath>, choice: usize },
    /// The disambiguator's reply was not a position in the list.
    InvalidSelection { lookup: Lookup, ranked: Vec<ScoredPath>, input: String },
}

impl Resolution {
    /// The resolved path, if resolution succeeded.
    pub fn path(&self) -> Option<&str> {
        match self {
            Resolution::Single { path, .. } => Some(path),
            Resolution::AutoSelected { ranked, .. } => ranked.first().map(|s| s.path.as_str()),
            Resolution::Selected { ranked, choice, .. } => Some(ranked[*choice].path.as_str()),
            Resolution::NotFound | Resolution::InvalidSelection { .. } => None,
        }
    }

    pub fn lookup(&self) -> Option<&Lookup> {
        match self {
            Resolution::NotFound => None,
            Resolution::Single { lookup, .. }
            | Resolution::AutoSelected { lookup, .. }
            | Resolution::Selected { lookup, .. }
            | Resolution::InvalidSelection { lookup, .. } => Some(lookup),
        }
    }

    pub fn into_path(self) -> Option<String> {
        match self {
            Resolution::Single { path, .. } => Some(path),
            Resolution::AutoSelected { ranked, .. } => ranked.into_iter().next().map(|s| s.path),
            Resolution::Selected { mut ranked, choice, .. } => Some(ranked.swap_remove(choice).path),
            Resolution::NotFound | Resolution::InvalidSelection { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolver {
    scorer: PathScorer,
    ambiguity_threshold: i32,
    fuzzy_cutoff: f64,
    similarity: Similarity,
}

impl Resolver {
    pub fn new(scorer: PathScorer) -> Self {
        Self {
            scorer,
            ambiguity_threshold: DEFAULT_AMBIGUITY_THRESHOLD,
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            similarity: Similarity::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let skip = SkipList::new(&config.skip_keywords);
        Self::new(PathScorer::for_current_user(skip))
            .with_ambiguity_threshold(config.ambiguity_threshold)
            .with_fuzzy_cutoff(config.fuzzy_cutoff)
            .with_similarity(config.similarity)
    }

    pub fn with_ambiguity_threshold(mut self, threshold: i32) -> Self {
        self.ambiguity_threshold = threshold;
        self
    }

    pub fn with_fuzzy_cutoff(mut self, cutoff: f64) -> Self {
        self.fuzzy_cutoff = cutoff;
        self
    }

    pub fn with_similarity(mut self, similarity: Similarity) -> Self {
        self.similarity = similarity;
        self
    }

    /// Find the index key and paths for `query`: exact key first, then,
    /// only if there is none and `allow_fuzzy` is set, the closest key.
    pub fn lookup<'a>(
        &self,
        query: &str,
        index: &'a FolderIndex,
        allow_fuzzy: bool,
    ) -> Option<(Lookup, &'a [String])> {
        let key = query.to_lowercase();

        if let Some(paths) = index.get(&key).filter(|p| !p.is_empty()) {
            return Some((Lookup { key, fuzzy: false }, paths));
        }

        if !allow_fuzzy {
            return None;
        }

        let close = closest_match(&key, index.keys(), self.fuzzy_cutoff, self.similarity)?;
        debug!(query = %key, matched = close, "Fuzzy folder match");
        let paths = index.get(close).filter(|p| !p.is_empty())?;
        Some((
            Lookup {
                key: close.to_string(),
                fuzzy: true,
            },
            paths,
        ))
    }

    pub fn resolve(
        &self,
        query: Option<&str>,
        index: &FolderIndex,
        allow_fuzzy: bool,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Resolution> {
        let query = match query {
            Some(q) if !q.is_empty() => q,
            _ => return Ok(Resolution::NotFound),
        };

        let Some((lookup, paths)) = self.lookup(query, index, allow_fuzzy) else {
            debug!(query, "No folder matches");
            return Ok(Resolution::NotFound);
        };

        let ranked = self.scorer.rank(paths);
        self.pick(lookup, ranked, disambiguator)
    }

    /// Choose among candidates already ranked best first.
    pub fn pick(
        &self,
        lookup: Lookup,
        mut ranked: Vec<ScoredPath>,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Resolution> {
        if ranked.is_empty() {
            return Ok(Resolution::NotFound);
        }

        if ranked.len() == 1 {
            let path = ranked.remove(0).path;
            return Ok(Resolution::Single { lookup, path });
        }

        let gap = ranked[0].score - ranked[1].score;
        if gap > self.ambiguity_threshold {
            debug!(gap, path = %ranked[0].path, "Auto-selected top candidate");
            return Ok(Resolution::AutoSelected { lookup, ranked });
        }

        let input = disambiguator.choose(&ranked)?;
        match parse_selection(&input, ranked.len()) {
            Some(choice) => Ok(Resolution::Selected {
                lookup,
                ranked,
                choice,
            }),
            None => Ok(Resolution::InvalidSelection {
                lookup,
                ranked,
                input,
            }),
        }
    }
}

/// Parse a 1-based selection into a 0-based position below `len`.
fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}
