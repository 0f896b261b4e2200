//! On-disk persistence of the folder index.

use crate::builder::{BuildReport, IndexBuilder};
use crate::error::{Error, Result};
use crate::index::FolderIndex;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// What to do with an index that is already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexChoice {
    Reuse,
    Refresh,
}

/// Decides whether a stored index is reused or rebuilt.
pub trait RefreshPolicy {
    fn decide(&mut self, existing: &FolderIndex) -> Result<IndexChoice>;
}

impl<F> RefreshPolicy for F
where
    F: FnMut(&FolderIndex) -> Result<IndexChoice>,
{
    fn decide(&mut self, existing: &FolderIndex) -> Result<IndexChoice> {
        self(existing)
    }
}

impl RefreshPolicy for IndexChoice {
    fn decide(&mut self, _existing: &FolderIndex) -> Result<IndexChoice> {
        Ok(*self)
    }
}

/// How [`IndexStore::get_or_initialize`] obtained its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Reused,
    Refreshed,
    Built,
}

#[derive(Debug)]
pub struct Initialized {
    pub index: FolderIndex,
    pub origin: Origin,
    /// Set when a walk happened
    pub report: Option<BuildReport>,
}

#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the index through a temporary sibling file and rename it over
    /// the target, so readers never see a half-written file.
    pub fn save(&self, index: &FolderIndex) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let json = serde_json::to_string_pretty(index).map_err(|e| Error::Format {
            path: self.path.clone(),
            source: e,
        })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| Error::io(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::io(&self.path, e.error))?;

        info!(path = %self.path.display(), names = index.len(), "Index saved");
        Ok(())
    }

    /// `Ok(None)` when there is no index file yet.
    pub fn load(&self) -> Result<Option<FolderIndex>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let index: FolderIndex = serde_json::from_str(&content).map_err(|e| Error::Format {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(index.normalized()))
    }

    /// Load the stored index, letting `policy` choose between reusing and
    /// rebuilding it. Without a stored index (or with an empty one) a fresh
    /// index is always built and saved. A stored file that cannot be read
    /// or parsed is an error; it is never silently rebuilt over.
    pub fn get_or_initialize(
        &self,
        builder: &IndexBuilder,
        roots: &[PathBuf],
        policy: &mut dyn RefreshPolicy,
    ) -> Result<Initialized> {
        match self.load()? {
            Some(existing) if !existing.is_empty() => match policy.decide(&existing)? {
                IndexChoice::Reuse => {
                    info!(names = existing.len(), "Using existing index");
                    Ok(Initialized {
                        index: existing,
                        origin: Origin::Reused,
                        report: None,
                    })
                }
                IndexChoice::Refresh => {
                    info!("Refreshing index");
                    self.rebuild(builder, roots, Origin::Refreshed)
                }
            },
            _ => {
                info!(path = %self.path.display(), "No existing index, building");
                self.rebuild(builder, roots, Origin::Built)
            }
        }
    }

    fn rebuild(&self, builder: &IndexBuilder, roots: &[PathBuf], origin: Origin) -> Result<Initialized> {
        let mut report = builder.build(roots);
        let index = std::mem::take(&mut report.index);
        self.save(&index)?;
        Ok(Initialized {
            index,
            origin,
            report: Some(report),
        })
    }
}
