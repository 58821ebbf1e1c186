use crate::commands::helpers::attachment_stem;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ScholarError};
use crate::model::Entry;
use crate::store::Library;
use std::io;
use std::path::{Path, PathBuf};

pub fn run<S: Library>(store: &mut S, key: &str, source: &Path) -> Result<CmdResult> {
    let mut entry = store.get_entry(key)?;
    let stored = attach_file(store, &mut entry, source)?;

    let mut result = CmdResult::default().with_entry_paths(vec![stored.clone()]);
    result.add_message(CmdMessage::success(format!(
        "Attached {} to {}",
        stored.display(),
        entry.key
    )));
    Ok(result.with_affected_entries(vec![entry]))
}

/// Copies `source` next to a committed entry and points `entry.file` at the copy.
pub fn attach_file<S: Library>(store: &mut S, entry: &mut Entry, source: &Path) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(ScholarError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("No such file: {}", source.display()),
        )));
    }

    let title = entry.field("title").unwrap_or_default();
    let mut filename = attachment_stem(&entry.key, title);
    if let Some(ext) = source.extension() {
        filename.push('.');
        filename.push_str(&ext.to_string_lossy());
    }

    let stored = store.store_attachment(&entry.key, &filename, source)?;
    entry.file = stored.display().to_string();
    store.save_entry(entry)?;
    tracing::info!(key = %entry.key, file = %entry.file, "attached file");
    Ok(stored)
}
