//! # Storage Layer
//!
//! This module defines the storage abstraction for scholar. The [`Library`] trait
//! allows the application to work with different storage backends.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production directory-per-entry storage
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <library>/
//! ├── smith2020quantum/
//! │   ├── entry.yaml                      # type, key, required, optional, file
//! │   └── smith2020quantum_Quantum_Foo.pdf
//! └── doe2019things/
//!     └── entry.yaml
//! ```
//!
//! The directory name is the citation key, so a key is taken as soon as its
//! directory exists.

use crate::error::{Result, ScholarError};
use crate::key::next_candidate_key;
use crate::model::Entry;
use std::path::{Path, PathBuf};

pub mod fs;
pub mod memory;

pub const ENTRY_FILENAME: &str = "entry.yaml";

/// Upper bound on suffixed keys tried before giving up (`base`, `basea` … `basezz`).
pub const MAX_KEY_ATTEMPTS: usize = 703;

/// Abstract interface for entry storage.
pub trait Library {
    /// The library directory
    fn root(&self) -> &Path;

    /// Save an entry (create or update) under its key
    fn save_entry(&mut self, entry: &Entry) -> Result<()>;

    /// Get an entry by key
    fn get_entry(&self, key: &str) -> Result<Entry>;

    /// List all entries, sorted by key
    fn list_entries(&self) -> Result<Vec<Entry>>;

    /// Delete an entry and everything stored with it
    fn delete_entry(&mut self, key: &str) -> Result<()>;

    /// Whether the key is already taken
    fn contains_key(&self, key: &str) -> bool;

    /// Copy a file into the entry's directory, returning the stored path
    fn store_attachment(&mut self, key: &str, filename: &str, source: &Path) -> Result<PathBuf>;

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root().join(key)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.entry_dir(key).join(ENTRY_FILENAME)
    }

    /// First key derived from `base` that is not taken yet.
    fn free_key(&self, base: &str) -> Result<String> {
        (0..MAX_KEY_ATTEMPTS)
            .map(|attempt| next_candidate_key(base, attempt))
            .find(|candidate| !self.contains_key(candidate))
            .ok_or_else(|| {
                ScholarError::Store(format!(
                    "No free key left for '{}' after {} attempts",
                    base, MAX_KEY_ATTEMPTS
                ))
            })
    }
}

/// Rejects keys that cannot be used as a directory name.
pub fn check_key(key: &str) -> Result<()> {
    let invalid = key.trim().is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\'])
        || key.chars().any(char::is_control);
    if invalid {
        return Err(ScholarError::Store(format!("Invalid entry key: '{}'", key)));
    }
    Ok(())
}

/// Makes a cite key from an outside source usable as a directory name.
/// Path separators become `_` and control characters are dropped. A key with
/// nothing usable left comes back empty, so one gets generated instead.
pub fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if cleaned == "." || cleaned == ".." {
        return String::new();
    }
    cleaned
}
