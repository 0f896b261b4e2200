use crate::config::DEFAULT_SKIP_KEYWORDS;

/// Lowercase substrings that mark a path as noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    keywords: Vec<String>,
}

impl SkipList {
    /// Keywords are lowercased; empty ones are dropped since they would
    /// match every path.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if the lowercased path contains any keyword.
    pub fn should_skip(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Number of keywords found in the lowercased path.
    pub fn hits(&self, path: &str) -> usize {
        let lower = path.to_lowercase();
        self.keywords.iter().filter(|k| lower.contains(k.as_str())).count()
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_KEYWORDS)
    }
}
