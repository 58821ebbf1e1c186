//! # Entry Type Catalog
//!
//! The catalog is the schema table every [`Entry`](crate::model::Entry) is built
//! against. Each [`EntryType`] names the fields an entry of that kind must carry
//! (`required`) and the fields it commonly carries (`optional`).
//!
//! The catalog is loaded once, from YAML, and is read-only afterwards. It is an
//! ordinary value: the API facade owns one and lends it to whatever needs it, so
//! tests can build small catalogs of their own without touching global state.
//!
//! ## Source Format
//!
//! ```yaml
//! - type: article
//!   description: An article in a journal
//!   required: [author, date, title, journaltitle]
//!   optional: [volume, doi]
//! ```
//!
//! The declaration order of `required` is the order fields are rendered in.

use crate::error::{Result, ScholarError};
use crate::model::RESERVED_FIELDS;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

const BUILTIN_TYPES: &str = include_str!("types.yaml");

/// Schema for one kind of entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryType {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl EntryType {
    fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ScholarError::SchemaLoad(
                "entry type with an empty name".to_string(),
            ));
        }

        let required: HashSet<&str> = self.required.iter().map(String::as_str).collect();
        if let Some(both) = self.optional.iter().find(|f| required.contains(f.as_str())) {
            return Err(ScholarError::SchemaLoad(format!(
                "field '{}' of type '{}' is both required and optional",
                both, self.name
            )));
        }

        if let Some(reserved) = self
            .required
            .iter()
            .chain(self.optional.iter())
            .find(|f| RESERVED_FIELDS.contains(&f.as_str()))
        {
            return Err(ScholarError::SchemaLoad(format!(
                "type '{}' declares reserved field '{}'",
                self.name, reserved
            )));
        }

        Ok(())
    }
}

/// The set of known entry types, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: BTreeMap<String, EntryType>,
}

impl TypeCatalog {
    /// Parses a YAML catalog. Every call builds a new catalog from scratch.
    pub fn load(source: &str) -> Result<Self> {
        let records: Vec<EntryType> =
            serde_yaml::from_str(source).map_err(|e| ScholarError::SchemaLoad(e.to_string()))?;

        let mut types = BTreeMap::new();
        for record in records {
            record.check()?;
            if types.contains_key(&record.name) {
                return Err(ScholarError::DuplicateType(record.name));
            }
            types.insert(record.name.clone(), record);
        }

        tracing::debug!(count = types.len(), "loaded entry type catalog");
        Ok(Self { types })
    }

    /// Reads and loads a catalog file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            ScholarError::SchemaLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::load(&source)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::load(BUILTIN_TYPES)
    }

    pub fn lookup(&self, name: &str) -> Result<&EntryType> {
        self.types
            .get(name)
            .ok_or_else(|| ScholarError::TypeNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All types, sorted by name.
    pub fn list(&self) -> Vec<&EntryType> {
        self.types.values().collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
