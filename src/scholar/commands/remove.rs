use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::Library;

/// Deletes entries with everything stored alongside them. All keys are checked
/// before anything is deleted.
pub fn run<S: Library>(store: &mut S, keys: &[String]) -> Result<CmdResult> {
    let entries = keys
        .iter()
        .map(|key| store.get_entry(key))
        .collect::<Result<Vec<_>>>()?;

    let mut result = CmdResult::default();
    for entry in &entries {
        store.delete_entry(&entry.key)?;
        tracing::info!(key = %entry.key, "removed entry");
        result.add_message(CmdMessage::success(format!("Removed {}", entry.key)));
    }
    Ok(result.with_affected_entries(entries))
}
