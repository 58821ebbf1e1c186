use crate::catalog::{EntryType, TypeCatalog};
use crate::error::{Result, ScholarError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw field names that address the entry itself rather than a bibliographic field.
pub const RESERVED_FIELDS: [&str; 3] = ["type", "key", "file"];

/// An unvalidated field map, as produced by the bibtex parser, the DOI client or
/// the command line. Insertion order is preserved.
pub type RawFields = IndexMap<String, String>;

/// One bibliographic record.
///
/// The `required` map is scaffolded from the schema when the entry is built and
/// its key set never changes afterwards; only its values do. Anything else lands
/// in `optional`, which is free-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    required: IndexMap<String, String>,
    #[serde(default)]
    pub optional: IndexMap<String, String>,
    #[serde(default)]
    pub file: String,
}

impl Entry {
    /// Builds an empty entry of the given type. An unknown type is returned as
    /// [`ScholarError::TypeNotFound`]; picking a fallback is up to the caller.
    pub fn new(catalog: &TypeCatalog, type_name: &str) -> Result<Self> {
        let schema = catalog.lookup(type_name)?;
        Ok(Self::from_schema(schema))
    }

    /// Builds an entry of `type_name`, or of `fallback` when `type_name` is unknown.
    pub fn new_or_fallback(catalog: &TypeCatalog, type_name: &str, fallback: &str) -> Result<Self> {
        match Self::new(catalog, type_name) {
            Err(ScholarError::TypeNotFound(_)) => {
                tracing::warn!(
                    requested = type_name,
                    fallback,
                    "unknown entry type, using fallback"
                );
                Self::new(catalog, fallback)
            }
            other => other,
        }
    }

    fn from_schema(schema: &EntryType) -> Self {
        Self {
            entry_type: schema.name.clone(),
            key: String::new(),
            required: schema
                .required
                .iter()
                .map(|f| (f.clone(), String::new()))
                .collect(),
            optional: IndexMap::new(),
            file: String::new(),
        }
    }

    pub fn required(&self) -> &IndexMap<String, String> {
        &self.required
    }

    /// Copies raw fields into the entry.
    ///
    /// `type`, `key` and `file` are consumed first and set the matching entry
    /// attributes. Every other field goes to `required` when the schema declares
    /// it there, and to `optional` otherwise. Nothing is dropped.
    pub fn populate_from(&mut self, mut raw: RawFields) {
        for name in RESERVED_FIELDS {
            if let Some(value) = raw.shift_remove(name) {
                self.set_reserved(name, value);
            }
        }
        for (name, value) in raw {
            self.route(name, value);
        }
    }

    /// Sets a single field, routed the same way as [`Entry::populate_from`].
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if RESERVED_FIELDS.contains(&name) {
            self.set_reserved(name, value);
        } else {
            self.route(name.to_string(), value);
        }
    }

    fn set_reserved(&mut self, name: &str, value: String) {
        let value = value.trim().to_string();
        if value.is_empty() {
            return;
        }
        match name {
            "type" => self.entry_type = value,
            "key" => self.key = value,
            "file" => self.file = value,
            _ => {}
        }
    }

    fn route(&mut self, name: String, value: String) {
        if let Some(slot) = self.required.get_mut(&name) {
            *slot = value;
        } else {
            tracing::trace!(field = %name, "routing field to optional");
            self.optional.insert(name, value);
        }
    }

    /// Looks a field up in `required`, then in `optional`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.required
            .get(name)
            .or_else(|| self.optional.get(name))
            .map(String::as_str)
    }

    /// True when every required field holds non-blank text.
    pub fn is_complete(&self) -> bool {
        self.required.values().all(|v| !v.trim().is_empty())
    }

    /// Optional fields the schema does not know about.
    pub fn unknown_fields<'a>(&'a self, schema: &EntryType) -> Vec<&'a str> {
        self.optional
            .keys()
            .filter(|name| !schema.optional.contains(*name))
            .map(String::as_str)
            .collect()
    }

    /// Re-scaffolds `required` against the catalog after the entry was read from
    /// an outside source (e.g. a hand-edited file). Missing required fields are
    /// added empty; fields the schema does not require move to `optional`.
    pub fn conform(&mut self, catalog: &TypeCatalog) -> Result<()> {
        let schema = catalog.lookup(&self.entry_type)?;
        let mut current = std::mem::take(&mut self.required);
        self.required = schema
            .required
            .iter()
            .map(|f| {
                let value = current
                    .shift_remove(f)
                    .or_else(|| self.optional.shift_remove(f))
                    .unwrap_or_default();
                (f.clone(), value)
            })
            .collect();
        for (name, value) in current {
            self.optional.insert(name, value);
        }
        Ok(())
    }
}
