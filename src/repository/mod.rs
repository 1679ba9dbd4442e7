//! Repository layer: JSON-file backed record stores

pub mod books;
pub mod members;

use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{AppError, AppResult};

pub use books::CatalogStore;
pub use members::MembershipStore;

/// A record kept in a [`JsonStore`], identified by a string key
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Singular noun used in messages ("book", "member")
    const KIND: &'static str;
    /// Name of the identity key in messages ("ISBN", "ID")
    const KEY_LABEL: &'static str;

    fn key(&self) -> &str;
}

/// In-memory collection mirrored to a JSON array on disk.
///
/// Every mutation rewrites the whole file through a temp file and a rename,
/// so the backing file is either the previous version or the new one.
#[derive(Debug)]
pub struct JsonStore<R: Record> {
    path: PathBuf,
    records: Vec<R>,
}

impl<R: Record> JsonStore<R> {
    /// Open a store backed by `path`, loading whatever it holds
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            records: Vec::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload from the backing file.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// logged and also treated as empty.
    pub fn load(&mut self) {
        if !self.path.exists() {
            self.records = Vec::new();
            return;
        }

        match read_records(&self.path) {
            Ok(records) => {
                tracing::debug!(
                    "Loaded {} {} record(s) from {}",
                    records.len(),
                    R::KIND,
                    self.path.display()
                );
                self.records = records;
            }
            Err(e) => {
                tracing::warn!("Couldn't load {}: {}. Starting with empty list.", self.path.display(), e);
                self.records = Vec::new();
            }
        }
    }

    /// Write the full collection to the backing file atomically
    pub fn save(&self) -> AppResult<()> {
        let data = serde_json::to_vec_pretty(&self.records)?;
        let tmp = tmp_path(&self.path);

        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!("Saved {} {} record(s) to {}", self.records.len(), R::KIND, self.path.display());
        Ok(())
    }

    /// Append a record and persist; the key must not already be present
    pub fn add(&mut self, record: R) -> AppResult<()> {
        if self.records.iter().any(|r| r.key() == record.key()) {
            return Err(AppError::DuplicateKey {
                kind: R::KIND,
                key_label: R::KEY_LABEL,
                key: record.key().to_string(),
            });
        }

        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove the record with `key` and persist
    pub fn remove(&mut self, key: &str) -> AppResult<R> {
        let position = self
            .records
            .iter()
            .position(|r| r.key() == key)
            .ok_or_else(|| AppError::NotFound {
                kind: R::KIND,
                key_label: R::KEY_LABEL,
                key: key.to_string(),
            })?;

        let removed = self.records.remove(position);
        if let Err(e) = self.save() {
            self.records.insert(position, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Look up a record; surrounding whitespace in `key` is ignored
    pub fn find(&self, key: &str) -> Option<&R> {
        let key = key.trim();
        self.records.iter().find(|r| r.key() == key)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut R> {
        let key = key.trim();
        self.records.iter_mut().find(|r| r.key() == key)
    }

    /// Snapshot of all records in insertion order
    pub fn list(&self) -> Vec<R> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_records<R: Record>(path: &Path) -> AppResult<Vec<R>> {
    let malformed = |reason: String| AppError::MalformedStoreFile {
        path: path.display().to_string(),
        reason,
    };

    let text = fs::read_to_string(path)?;
    let raw: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
    if !raw.is_array() {
        return Err(malformed(format!("expected a list of {} records", R::KIND)));
    }
    serde_json::from_value(raw).map_err(|e| malformed(e.to_string()))
}

/// `library.json` -> `library.json.tmp`
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// The two stores a process works against
#[derive(Debug)]
pub struct Stores {
    pub catalog: CatalogStore,
    pub membership: MembershipStore,
}

impl Stores {
    pub fn open(books_file: impl Into<PathBuf>, members_file: impl Into<PathBuf>) -> Self {
        Self {
            catalog: CatalogStore::open(books_file),
            membership: MembershipStore::open(members_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, Member};
    use tempfile::TempDir;

    fn catalog_in(dir: &TempDir) -> CatalogStore {
        CatalogStore::open(dir.path().join("library.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = catalog_in(&dir);
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_add_persists_without_leaving_tmp() {
        let dir = TempDir::new().unwrap();
        let mut store = catalog_in(&dir);
        store.add(Book::plain("1984", "George Orwell", "978-0451524935")).unwrap();

        assert!(store.path().exists());
        assert!(!dir.path().join("library.json.tmp").exists());
        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk[0]["isbn"], "978-0451524935");
        assert_eq!(on_disk[0]["_cls"], "Book");
    }

    #[test]
    fn test_duplicate_add_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = catalog_in(&dir);
        store.add(Book::plain("First", "A", "111")).unwrap();
        let before = store.list();

        let err = store.add(Book::electronic("Second", "B", "111", "EPUB")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey { ref key, .. } if key == "111"));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = catalog_in(&dir);
        store.add(Book::plain("First", "A", "111")).unwrap();
        store.add(Book::plain("Second", "B", "222")).unwrap();

        assert!(matches!(store.remove("999"), Err(AppError::NotFound { .. })));
        assert_eq!(store.len(), 2);

        let removed = store.remove("111").unwrap();
        assert_eq!(removed.title, "First");
        assert_eq!(store.len(), 1);
        assert!(store.find("111").is_none());
    }

    #[test]
    fn test_find_trims_lookup_key_only() {
        let dir = TempDir::new().unwrap();
        let mut store = MembershipStore::open(dir.path().join("members.json"));
        store.add(Member::new("Ada", "M001", "ada@example.com")).unwrap();
        store.add(Member::new("Padded", " M002 ", "p@example.com")).unwrap();

        assert!(store.find("  M001\n").is_some());
        // stored keys are compared verbatim
        assert!(store.find(" M002 ").is_none());
        assert!(store.find("M002").is_none());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = catalog_in(&dir);
        store.add(Book::plain("First", "A", "111")).unwrap();

        let mut snapshot = store.list();
        snapshot.clear();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_malformed_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(CatalogStore::open(&path).is_empty());

        fs::write(&path, r#"{"title": "1984"}"#).unwrap();
        assert!(CatalogStore::open(&path).is_empty());

        fs::write(&path, r#"[{"title": "no author or isbn"}]"#).unwrap();
        assert!(CatalogStore::open(&path).is_empty());
    }

    #[test]
    fn test_failed_save_undoes_add() {
        let dir = TempDir::new().unwrap();
        let mut store = catalog_in(&dir);
        store.add(Book::plain("First", "A", "111")).unwrap();
        let before = store.list();
        fs::create_dir(dir.path().join("library.json.tmp")).unwrap();

        let err = store.add(Book::plain("Second", "B", "222")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_failed_save_undoes_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = catalog_in(&dir);
        store.add(Book::plain("First", "A", "111")).unwrap();
        store.add(Book::plain("Second", "B", "222")).unwrap();
        store.add(Book::plain("Third", "C", "333")).unwrap();
        let before = store.list();
        fs::create_dir(dir.path().join("library.json.tmp")).unwrap();

        let err = store.remove("222").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_tmp_path() {
        assert_eq!(
            tmp_path(Path::new("/data/library.json")),
            PathBuf::from("/data/library.json.tmp")
        );
    }
}
