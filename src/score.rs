//! Relevance heuristic for candidate folder paths.
//!
//! Paths under the user's home directory and under a `users` segment are
//! favoured; each skip keyword in the path costs a flat penalty. Penalties
//! stack and are not capped, so a path with several noisy segments can
//! rank below an otherwise unrelated one.

use crate::classify::SkipList;
use serde::Serialize;

pub const HOME_BONUS: i32 = 10;
pub const USERS_BONUS: i32 = 5;
pub const SKIP_PENALTY: i32 = 10;

const USERS_MARKERS: [&str; 2] = ["\\users\\", "/users/"];

/// A candidate path with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredPath {
    pub score: i32,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct PathScorer {
    home: Option<String>,
    skip: SkipList,
}

impl PathScorer {
    pub fn new(home: Option<&str>, skip: SkipList) -> Self {
        let home = home.map(str::to_lowercase).filter(|h| !h.is_empty());
        Self { home, skip }
    }

    /// Scorer for the current user's home directory.
    pub fn for_current_user(skip: SkipList) -> Self {
        let home = dirs::home_dir().map(|h| h.to_string_lossy().into_owned());
        Self::new(home.as_deref(), skip)
    }

    pub fn score(&self, path: &str) -> i32 {
        let lower = path.to_lowercase();
        let mut score = 0;

        if let Some(home) = &self.home {
            if lower.contains(home.as_str()) {
                score += HOME_BONUS;
            }
        }

        if USERS_MARKERS.iter().any(|m| lower.contains(m)) {
            score += USERS_BONUS;
        }

        score -= SKIP_PENALTY * self.skip.hits(path) as i32;
        score
    }

    /// Score every path and order best first. Equal scores order by path,
    /// greatest first.
    pub fn rank<S: AsRef<str>>(&self, paths: &[S]) -> Vec<ScoredPath> {
        let mut ranked: Vec<ScoredPath> = paths
            .iter()
            .map(|p| ScoredPath {
                score: self.score(p.as_ref()),
                path: p.as_ref().to_string(),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| b.path.cmp(&a.path)));
        ranked
    }
}
