//! Filesystem walk that produces a [`FolderIndex`].

use crate::classify::SkipList;
use crate::index::FolderIndex;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// A subtree the walk could not read. The rest of the walk carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkDiagnostic {
    pub path: Option<PathBuf>,
    pub message: String,
}

impl From<walkdir::Error> for WalkDiagnostic {
    fn from(err: walkdir::Error) -> Self {
        let message = match err.io_error() {
            Some(io) => io.to_string(),
            None => err.to_string(),
        };
        Self {
            path: err.path().map(Path::to_path_buf),
            message,
        }
    }
}

impl fmt::Display for WalkDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub index: FolderIndex,
    pub diagnostics: Vec<WalkDiagnostic>,
    /// Roots that did not exist and were not scanned
    pub missing_roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    skip: SkipList,
}

impl IndexBuilder {
    pub fn new(skip: SkipList) -> Self {
        Self { skip }
    }

    /// Index every folder below `roots`.
    pub fn build(&self, roots: &[PathBuf]) -> BuildReport {
        self.build_with_progress(roots, |_| {})
    }

    /// Index every folder below the given drive roots.
    pub fn build_full_scan(&self, drives: &[PathBuf]) -> BuildReport {
        info!(drives = drives.len(), "Starting full drive scan");
        self.build(drives)
    }

    /// Like [`build`](Self::build), calling `on_root` as each existing
    /// root starts scanning.
    pub fn build_with_progress<F>(&self, roots: &[PathBuf], mut on_root: F) -> BuildReport
    where
        F: FnMut(&Path),
    {
        let mut report = BuildReport::default();

        for root in roots {
            if !root.exists() {
                warn!(root = %root.display(), "Root does not exist, skipping");
                report.missing_roots.push(root.clone());
                continue;
            }

            info!(root = %root.display(), "Scanning");
            on_root(root);
            self.scan_root(root, &mut report);
        }

        info!(
            names = report.index.len(),
            paths = report.index.total_paths(),
            errors = report.diagnostics.len(),
            "Index built"
        );
        report
    }

    fn scan_root(&self, root: &Path, report: &mut BuildReport) {
        if self.skip.should_skip(&root.to_string_lossy()) {
            debug!(root = %root.display(), "Root matches skip list, nothing indexed");
            return;
        }

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.skip.should_skip(&e.path().to_string_lossy()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let diagnostic = WalkDiagnostic::from(err);
                    debug!(%diagnostic, "Skipping unreadable subtree");
                    report.diagnostics.push(diagnostic);
                    continue;
                }
            };

            if entry.depth() == 0 || !is_folder(&entry) {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            report
                .index
                .insert(&name, entry.path().to_string_lossy().into_owned());
        }
    }
}

/// Directories, plus symlinks to directories (recorded but not followed).
fn is_folder(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(dirs: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for d in dirs {
            fs::create_dir_all(tmp.path().join(d)).unwrap();
        }
        tmp
    }

    fn sorted(index: &FolderIndex) -> Vec<(String, Vec<String>)> {
        index
            .iter()
            .map(|(k, v)| {
                let mut v = v.to_vec();
                v.sort();
                (k.to_string(), v)
            })
            .collect()
    }

    #[test]
    fn test_indexes_every_folder_by_lowercase_name() {
        let tmp = tree(&["Documents/Reports", "Projects/reports", "Music"]);
        fs::write(tmp.path().join("Music/song.mp3"), b"x").unwrap();

        let report = IndexBuilder::default().build(&[tmp.path().to_path_buf()]);
        let index = &report.index;

        for name in ["documents", "projects", "music", "reports"] {
            assert!(index.contains(name), "missing {}", name);
        }
        assert!(!index.contains("song.mp3"));

        let mut reports = index.get("reports").unwrap().to_vec();
        reports.sort();
        assert_eq!(
            reports,
            vec![
                tmp.path().join("Documents/Reports").to_string_lossy().to_string(),
                tmp.path().join("Projects/reports").to_string_lossy().to_string(),
            ]
        );
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_root_itself_is_not_indexed() {
        let tmp = tree(&["inner"]);
        let root_name = tmp
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_lowercase();

        let report = IndexBuilder::default().build(&[tmp.path().to_path_buf()]);
        assert!(!report.index.contains(&root_name));
        assert!(report.index.contains("inner"));
    }

    #[test]
    fn test_skip_listed_folders_are_pruned() {
        let tmp = tree(&["project/venv/lib/python", "project/src/venv", "project/src/app"]);

        let index = IndexBuilder::default().build(&[tmp.path().to_path_buf()]).index;

        assert!(!index.contains("venv"));
        assert!(!index.contains("lib"));
        assert!(!index.contains("python"));
        for (_, paths) in index.iter() {
            assert!(paths.iter().all(|p| !p.to_lowercase().contains("venv")));
        }
        assert!(index.contains("app"));
        assert!(index.contains("src"));
    }

    #[test]
    fn test_custom_skip_list() {
        let tmp = tree(&["work/node_modules/left-pad", "work/bin"]);

        let builder = IndexBuilder::new(SkipList::new(["node_modules"]));
        let index = builder.build(&[tmp.path().to_path_buf()]).index;

        assert!(!index.contains("node_modules"));
        assert!(!index.contains("left-pad"));
        assert!(index.contains("bin"));
    }

    #[test]
    fn test_missing_roots_are_reported() {
        let tmp = tree(&["a"]);
        let missing = tmp.path().join("does-not-exist");

        let mut seen = Vec::new();
        let report = IndexBuilder::default()
            .build_with_progress(&[missing.clone(), tmp.path().to_path_buf()], |root| {
                seen.push(root.to_path_buf())
            });

        assert_eq!(report.missing_roots, vec![missing]);
        assert_eq!(seen, vec![tmp.path().to_path_buf()]);
        assert!(report.index.contains("a"));
    }

    #[test]
    fn test_multiple_roots_accumulate() {
        let first = tree(&["shared", "one"]);
        let second = tree(&["shared", "two"]);

        let index = IndexBuilder::default()
            .build(&[first.path().to_path_buf(), second.path().to_path_buf()])
            .index;

        assert_eq!(index.get("shared").unwrap().len(), 2);
        assert!(index.contains("one"));
        assert!(index.contains("two"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let tmp = tree(&["a/b/c", "a/d", "e/b"]);
        let builder = IndexBuilder::default();
        let roots = [tmp.path().to_path_buf()];

        let first = builder.build(&roots).index;
        let second = builder.build(&roots).index;
        assert_eq!(sorted(&first), sorted(&second));
    }

    #[test]
    fn test_full_scan_uses_same_rules() {
        let tmp = tree(&["Data/cache/blobs", "Data/photos"]);

        let index = IndexBuilder::default()
            .build_full_scan(&[tmp.path().to_path_buf()])
            .index;

        assert!(index.contains("photos"));
        assert!(!index.contains("cache"));
        assert!(!index.contains("blobs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_folder_recorded_not_followed() {
        let tmp = tree(&["real/inside", "links"]);
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("links/alias")).unwrap();

        let index = IndexBuilder::default().build(&[tmp.path().to_path_buf()]).index;

        assert_eq!(
            index.get("alias").unwrap(),
            &[tmp.path().join("links/alias").to_string_lossy().to_string()]
        );
        assert_eq!(index.get("inside").unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_is_a_diagnostic() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tree(&["open/child", "locked/hidden"]);
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users can read it anyway
        let readable = fs::read_dir(&locked).is_ok();
        let report = IndexBuilder::default().build(&[tmp.path().to_path_buf()]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(report.index.contains("locked"));
        assert!(report.index.contains("child"));
        if !readable {
            assert_eq!(report.diagnostics.len(), 1);
            assert_eq!(report.diagnostics[0].path.as_deref(), Some(locked.as_path()));
            assert!(!report.index.contains("hidden"));
        }
    }
}
