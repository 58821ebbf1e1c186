use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::Library;

pub fn run<S: Library>(store: &S) -> Result<CmdResult> {
    let entries = store.list_entries()?;
    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No entries in this library."));
    }
    Ok(result.with_listed_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_list_sorted_by_key() {
        let fx = StoreFixture::new()
            .with_article("zed2001a", "Zed, A", "2001", "A")
            .with_article("abe1999b", "Abe, B", "1999", "B");

        let result = run(&fx.store).unwrap();
        let keys: Vec<&str> = result.listed_entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["abe1999b", "zed2001a"]);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_list_empty() {
        let fx = StoreFixture::new();
        let result = run(&fx.store).unwrap();
        assert!(result.listed_entries.is_empty());
        assert_eq!(result.messages.len(), 1);
    }
}
