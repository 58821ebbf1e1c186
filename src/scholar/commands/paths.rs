use crate::commands::CmdResult;
use crate::error::{Result, ScholarError};
use crate::store::Library;
use std::path::PathBuf;

/// Path of the file attached to an entry.
pub fn attachment<S: Library>(store: &S, key: &str) -> Result<CmdResult> {
    let entry = store.get_entry(key)?;
    if entry.file.trim().is_empty() {
        return Err(ScholarError::Api(format!("No file attached to {}", key)));
    }
    Ok(CmdResult::default().with_entry_paths(vec![PathBuf::from(&entry.file)]))
}

/// Directory holding an entry and its attachments.
pub fn entry_dir<S: Library>(store: &S, key: &str) -> Result<CmdResult> {
    if !store.contains_key(key) {
        return Err(ScholarError::EntryNotFound(key.to_string()));
    }
    Ok(CmdResult::default().with_entry_paths(vec![store.entry_dir(key)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_attachment_path() {
        let mut fx = StoreFixture::new().with_article("k", "A", "2000", "T");
        assert!(matches!(attachment(&fx.store, "k"), Err(ScholarError::Api(_))));

        let mut entry = fx.store.get_entry("k").unwrap();
        entry.file = "/papers/k.pdf".to_string();
        fx.store.save_entry(&entry).unwrap();

        let result = attachment(&fx.store, "k").unwrap();
        assert_eq!(result.entry_paths, vec![PathBuf::from("/papers/k.pdf")]);
    }

    #[test]
    fn test_entry_dir() {
        let fx = StoreFixture::new().with_article("k", "A", "2000", "T");
        let result = entry_dir(&fx.store, "k").unwrap();
        assert_eq!(result.entry_paths, vec![PathBuf::from("/memory/k")]);
        assert!(matches!(
            entry_dir(&fx.store, "nope"),
            Err(ScholarError::EntryNotFound(_))
        ));
    }
}
