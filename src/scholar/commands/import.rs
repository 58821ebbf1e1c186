use crate::bibtex;
use crate::catalog::TypeCatalog;
use crate::commands::attach::attach_file;
use crate::commands::helpers::{build_entry, commit, entry_label};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Entry;
use crate::store::Library;
use crate::validate::validate;
use std::path::Path;

/// Imports every entry of a bibtex text.
///
/// Nothing is written until all entries are parsed and validated. Invalid
/// entries are skipped with a warning, or abort the whole import when `strict`
/// is set. A `file` field naming an existing file is attached after commit.
pub fn run<S: Library>(
    store: &mut S,
    catalog: &TypeCatalog,
    text: &str,
    fallback: &str,
    strict: bool,
) -> Result<CmdResult> {
    let raw_entries = bibtex::parse(text)?;
    let mut result = CmdResult::default();

    let mut valid: Vec<Entry> = Vec::with_capacity(raw_entries.len());
    for (position, raw) in raw_entries.into_iter().enumerate() {
        let entry = build_entry(catalog, raw, fallback)?;
        match validate(&entry) {
            Ok(()) => {
                let schema = catalog.lookup(&entry.entry_type)?;
                let unknown = entry.unknown_fields(schema);
                if !unknown.is_empty() {
                    result.add_message(CmdMessage::info(format!(
                        "{}: kept fields outside the {} schema: {}",
                        entry_label(&entry, position),
                        entry.entry_type,
                        unknown.join(", ")
                    )));
                }
                valid.push(entry);
            }
            Err(e) if strict => return Err(e),
            Err(e) => {
                tracing::warn!(entry = %entry_label(&entry, position), error = %e, "skipping invalid entry");
                result.add_message(CmdMessage::warning(format!(
                    "Skipped {}: {}",
                    entry_label(&entry, position),
                    e
                )));
            }
        }
    }

    let mut imported = Vec::with_capacity(valid.len());
    for entry in valid {
        let mut entry = commit(store, catalog, entry)?;
        if !entry.file.is_empty() {
            let source = Path::new(&entry.file).to_path_buf();
            if source.is_file() {
                if let Err(e) = attach_file(store, &mut entry, &source) {
                    result.add_message(CmdMessage::warning(format!(
                        "Could not attach {} to {}: {}",
                        source.display(),
                        entry.key,
                        e
                    )));
                }
            }
        }
        imported.push(entry);
    }

    tracing::info!(count = imported.len(), "imported entries");
    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        imported.len()
    )));
    Ok(result.with_affected_entries(imported))
}
