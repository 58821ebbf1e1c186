use crate::catalog::TypeCatalog;
use crate::error::{Result, ScholarError};
use crate::model::Entry;

/// Checks that every required field holds non-blank text.
///
/// All missing fields are reported together, in schema order. Optional fields
/// are never checked.
pub fn validate(entry: &Entry) -> Result<()> {
    let missing: Vec<String> = entry
        .required()
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScholarError::Validation {
            key: entry.key.clone(),
            missing,
        })
    }
}

/// Checks that the entry's type is known to the catalog.
pub fn check_type(catalog: &TypeCatalog, entry: &Entry) -> Result<()> {
    catalog.lookup(&entry.entry_type).map(|_| ())
}
