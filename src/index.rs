use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowercased folder name → every path seen with that name, in walk order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FolderIndex {
    folders: BTreeMap<String, Vec<String>>,
}

impl FolderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under the lowercased `name`. Empty names are ignored.
    pub fn insert(&mut self, name: &str, path: String) {
        let key = name.to_lowercase();
        if key.is_empty() {
            return;
        }
        self.folders.entry(key).or_default().push(path);
    }

    /// Paths for an exact (already lowercased) key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.folders.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.folders.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.folders.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct folder names.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Number of folder paths across all names.
    pub fn total_paths(&self) -> usize {
        self.folders.values().map(Vec::len).sum()
    }

    /// Names shared by the most folders, most duplicated first.
    pub fn most_duplicated(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .folders
            .iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts.truncate(limit);
        counts
    }

    /// Drop entries that break the key/value invariants, which can only
    /// come from a hand-edited or foreign file.
    pub(crate) fn normalized(self) -> Self {
        let mut index = FolderIndex::new();
        for (name, paths) in self.folders {
            for path in paths {
                index.insert(&name, path);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lowercases_and_appends() {
        let mut index = FolderIndex::new();
        index.insert("Downloads", "/home/ana/Downloads".to_string());
        index.insert("downloads", "/mnt/backup/downloads".to_string());
        index.insert("", "/nowhere".to_string());

        assert_eq!(index.len(), 1);
        assert_eq!(index.total_paths(), 2);
        assert_eq!(
            index.get("downloads").unwrap(),
            &["/home/ana/Downloads".to_string(), "/mnt/backup/downloads".to_string()]
        );
        assert!(index.get("Downloads").is_none());
    }

    #[test]
    fn test_json_shape_is_plain_object() {
        let mut index = FolderIndex::new();
        index.insert("music", "/home/ana/Music".to_string());

        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"{"music":["/home/ana/Music"]}"#);
    }

    #[test]
    fn test_normalized_fixes_foreign_keys() {
        let index: FolderIndex =
            serde_json::from_str(r#"{"Music":["/a/Music"],"music":["/b/music"],"":["/c"],"empty":[]}"#)
                .unwrap();
        let index = index.normalized();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("music").unwrap().len(), 2);
    }

    #[test]
    fn test_most_duplicated() {
        let mut index = FolderIndex::new();
        for p in ["/a/src", "/b/src", "/c/src"] {
            index.insert("src", p.to_string());
        }
        for p in ["/a/docs", "/b/docs"] {
            index.insert("docs", p.to_string());
        }
        index.insert("music", "/a/music".to_string());

        assert_eq!(index.most_duplicated(5), vec![("src", 3), ("docs", 2)]);
        assert_eq!(index.most_duplicated(1), vec![("src", 3)]);
    }
}
