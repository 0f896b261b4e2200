//! Tunables for indexing and resolution, loaded from a TOML file.

use crate::error::{Error, Result};
use crate::similarity::Similarity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Substrings that mark a path as OS or package-manager noise.
pub const DEFAULT_SKIP_KEYWORDS: &[&str] = &[
    "appdata",
    "programdata",
    "site-packages",
    "venv",
    "cache",
    "bin",
    "tests",
    "windows defender",
    "system volume information",
    "$recycle.bin",
];

pub const DEFAULT_AMBIGUITY_THRESHOLD: i32 = 3;
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.6;
pub const DEFAULT_INDEX_FILE: &str = "folder_index.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the index is persisted
    pub index_path: PathBuf,

    /// Roots scanned by a normal build
    pub roots: Vec<PathBuf>,

    /// Roots scanned by a full scan
    pub drives: Vec<PathBuf>,

    pub skip_keywords: Vec<String>,

    /// Minimum score lead the top candidate needs over the runner-up
    /// to be picked without asking
    pub ambiguity_threshold: i32,

    /// Minimum similarity for a fuzzy key match (0.0 to 1.0)
    pub fuzzy_cutoff: f64,

    pub similarity: Similarity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(DEFAULT_INDEX_FILE),
            roots: default_roots(),
            drives: default_drives(),
            skip_keywords: DEFAULT_SKIP_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            ambiguity_threshold: DEFAULT_AMBIGUITY_THRESHOLD,
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            similarity: Similarity::default(),
        }
    }
}

fn default_roots() -> Vec<PathBuf> {
    dirs::home_dir().into_iter().collect()
}

#[cfg(windows)]
fn default_drives() -> Vec<PathBuf> {
    ["C:\\", "D:\\", "E:\\", "F:\\"].iter().map(PathBuf::from).collect()
}

#[cfg(not(windows))]
fn default_drives() -> Vec<PathBuf> {
    vec![PathBuf::from("/")]
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_cutoff) {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: format!("fuzzy_cutoff must be within 0.0..=1.0, got {}", self.fuzzy_cutoff),
            });
        }
        if self.ambiguity_threshold < 0 {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "ambiguity_threshold must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.index_path, PathBuf::from("folder_index.json"));
        assert_eq!(config.ambiguity_threshold, 3);
        assert_eq!(config.fuzzy_cutoff, 0.6);
        assert_eq!(config.similarity, Similarity::Ratio);
        assert!(config.skip_keywords.contains(&"venv".to_string()));
        assert_eq!(config.skip_keywords.len(), 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dirseek.toml");
        fs::write(
            &path,
            "ambiguity_threshold = 5\nroots = [\"/srv/data\"]\nsimilarity = \"jaro-winkler\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.ambiguity_threshold, 5);
        assert_eq!(config.roots, vec![PathBuf::from("/srv/data")]);
        assert_eq!(config.similarity, Similarity::JaroWinkler);
        assert_eq!(config.fuzzy_cutoff, DEFAULT_FUZZY_CUTOFF);
        assert_eq!(config.skip_keywords.len(), DEFAULT_SKIP_KEYWORDS.len());
    }

    #[test]
    fn test_rejects_out_of_range_cutoff() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dirseek.toml");
        fs::write(&path, "fuzzy_cutoff = 1.5\n").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dirseek.toml");
        fs::write(&path, "treshold = 2\n").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
