use super::{check_key, Library};
use crate::error::{Result, ScholarError};
use crate::model::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory storage for testing and development.
/// Does NOT persist data.
pub struct InMemoryStore {
    root: PathBuf,
    entries: BTreeMap<String, Entry>,
    attachments: BTreeMap<PathBuf, Vec<u8>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/memory"),
            entries: BTreeMap::new(),
            attachments: BTreeMap::new(),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachment(&self, path: &Path) -> Option<&[u8]> {
        self.attachments.get(path).map(Vec::as_slice)
    }
}

impl Library for InMemoryStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn save_entry(&mut self, entry: &Entry) -> Result<()> {
        check_key(&entry.key)?;
        self.entries.insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    fn get_entry(&self, key: &str) -> Result<Entry> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| ScholarError::EntryNotFound(key.to_string()))
    }

    fn list_entries(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.values().cloned().collect())
    }

    fn delete_entry(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_none() {
            return Err(ScholarError::EntryNotFound(key.to_string()));
        }
        let dir = self.entry_dir(key);
        self.attachments.retain(|path, _| !path.starts_with(&dir));
        Ok(())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn store_attachment(&mut self, key: &str, filename: &str, source: &Path) -> Result<PathBuf> {
        check_key(key)?;
        let bytes = fs::read(source)?;
        let dest = self.entry_dir(key).join(filename);
        self.attachments.insert(dest.clone(), bytes);
        Ok(dest)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::catalog::TypeCatalog;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub catalog: TypeCatalog,
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                catalog: TypeCatalog::builtin().unwrap(),
            }
        }

        pub fn with_article(mut self, key: &str, author: &str, date: &str, title: &str) -> Self {
            let mut entry = Entry::new(&self.catalog, "article").unwrap();
            entry.set_field("author", author);
            entry.set_field("date", date);
            entry.set_field("title", title);
            entry.set_field("journaltitle", "Journal of Tests");
            entry.key = key.to_string();
            self.store.save_entry(&entry).unwrap();
            self
        }
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }
}
