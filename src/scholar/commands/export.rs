use crate::bibtex;
use crate::commands::helpers::entries_by_keys;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::Library;
use std::fs;
use std::path::Path;

/// Renders the selected entries (all of them when `keys` is empty) as bibtex,
/// either into `output` or into the result for printing.
pub fn run<S: Library>(store: &S, keys: &[String], output: Option<&Path>) -> Result<CmdResult> {
    let entries = entries_by_keys(store, keys)?;
    let text = bibtex::render_all(&entries);
    let mut result = CmdResult::default();

    match output {
        Some(path) => {
            fs::write(path, &text)?;
            result.add_message(CmdMessage::success(format!(
                "Exported {} entries to {}",
                entries.len(),
                path.display()
            )));
        }
        None => {
            if entries.is_empty() {
                result.add_message(CmdMessage::info("No entries to export."));
            }
            result = result.with_rendered(text);
        }
    }

    Ok(result.with_affected_entries(entries))
}
