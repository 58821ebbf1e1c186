use super::{check_key, Library, ENTRY_FILENAME};
use crate::error::{Result, ScholarError};
use crate::model::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    fn read_entry(&self, path: &Path) -> Result<Entry> {
        let content = fs::read_to_string(path)?;
        let entry: Entry = serde_yaml::from_str(&content)?;
        Ok(entry)
    }
}

impl Library for FileStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn save_entry(&mut self, entry: &Entry) -> Result<()> {
        check_key(&entry.key)?;
        let dir = self.entry_dir(&entry.key);
        self.ensure_dir(&dir)?;

        let content = serde_yaml::to_string(entry)?;

        // Atomic write: tmp file then rename
        let tmp_file = dir.join(format!(".entry-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content)?;
        fs::rename(&tmp_file, dir.join(ENTRY_FILENAME))?;

        tracing::debug!(key = %entry.key, dir = %dir.display(), "saved entry");
        Ok(())
    }

    fn get_entry(&self, key: &str) -> Result<Entry> {
        check_key(key)?;
        let path = self.entry_path(key);
        if !path.exists() {
            return Err(ScholarError::EntryNotFound(key.to_string()));
        }

        let mut entry = self.read_entry(&path)?;
        if entry.key != key {
            tracing::debug!(stored = %entry.key, dir = key, "entry key differs from its directory");
            entry.key = key.to_string();
        }
        Ok(entry)
    }

    fn list_entries(&self) -> Result<Vec<Entry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.root)? {
            let path = dir_entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(key) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };

            match self.read_entry(&path.join(ENTRY_FILENAME)) {
                Ok(mut entry) => {
                    entry.key = key;
                    entries.push(entry);
                }
                Err(e) => {
                    tracing::warn!(dir = %path.display(), error = %e, "skipping unreadable entry");
                }
            }
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn delete_entry(&mut self, key: &str) -> Result<()> {
        check_key(key)?;
        let dir = self.entry_dir(key);
        if !dir.exists() {
            return Err(ScholarError::EntryNotFound(key.to_string()));
        }
        fs::remove_dir_all(&dir)?;
        tracing::debug!(key, "deleted entry");
        Ok(())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entry_dir(key).exists()
    }

    fn store_attachment(&mut self, key: &str, filename: &str, source: &Path) -> Result<PathBuf> {
        check_key(key)?;
        let dir = self.entry_dir(key);
        self.ensure_dir(&dir)?;

        let dest = dir.join(filename);
        let bytes = fs::copy(source, &dest)?;
        tracing::debug!(bytes, dest = %dest.display(), "copied attachment");
        Ok(dest)
    }
}
