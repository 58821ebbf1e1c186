use crate::catalog::TypeCatalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Entry;
use crate::store::Library;
use crate::validate::validate;

/// The YAML text an entry is edited as.
pub fn buffer<S: Library>(store: &S, key: &str) -> Result<String> {
    let entry = store.get_entry(key)?;
    Ok(serde_yaml::to_string(&entry)?)
}

/// Replaces an entry with its edited YAML. The edit is checked against the
/// catalog and validated first; on any error the stored entry is left as it was.
/// The key cannot be changed by editing.
pub fn run<S: Library>(
    store: &mut S,
    catalog: &TypeCatalog,
    key: &str,
    edited: &str,
) -> Result<CmdResult> {
    let original = store.get_entry(key)?;
    let mut entry: Entry = serde_yaml::from_str(edited)?;
    let mut result = CmdResult::default();

    if !entry.key.is_empty() && entry.key != original.key {
        result.add_message(CmdMessage::warning(format!(
            "Keys cannot be edited, keeping {}",
            original.key
        )));
    }
    entry.key = original.key.clone();
    entry.conform(catalog)?;
    validate(&entry)?;

    if entry == original {
        result.add_message(CmdMessage::info(format!("No changes to {}", key)));
        return Ok(result.with_affected_entries(vec![entry]));
    }

    store.save_entry(&entry)?;
    tracing::info!(key = %entry.key, "updated entry");
    result.add_message(CmdMessage::success(format!("Updated {}", entry.key)));
    Ok(result.with_affected_entries(vec![entry]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScholarError;
    use crate::store::memory::fixtures::StoreFixture;

    fn fixture() -> StoreFixture {
        StoreFixture::new().with_article("smith2020quantum", "Smith, John", "2020", "Quantum Foo")
    }

    #[test]
    fn test_unchanged_buffer() {
        let mut fx = fixture();
        let text = buffer(&fx.store, "smith2020quantum").unwrap();
        let result = run(&mut fx.store, &fx.catalog, "smith2020quantum", &text).unwrap();
        assert!(result.messages[0].content.starts_with("No changes"));
    }

    #[test]
    fn test_edit_updates_fields() {
        let mut fx = fixture();
        let text = buffer(&fx.store, "smith2020quantum")
            .unwrap()
            .replace("Quantum Foo", "Quantum Bar");

        run(&mut fx.store, &fx.catalog, "smith2020quantum", &text).unwrap();
        let saved = fx.store.get_entry("smith2020quantum").unwrap();
        assert_eq!(saved.field("title"), Some("Quantum Bar"));
    }

    #[test]
    fn test_invalid_edit_keeps_original() {
        let mut fx = fixture();
        let mut edited = fx.store.get_entry("smith2020quantum").unwrap();
        edited.set_field("author", "");
        let text = serde_yaml::to_string(&edited).unwrap();

        let err = run(&mut fx.store, &fx.catalog, "smith2020quantum", &text).unwrap_err();
        assert!(matches!(err, ScholarError::Validation { ref missing, .. } if missing == &vec!["author".to_string()]));

        let saved = fx.store.get_entry("smith2020quantum").unwrap();
        assert_eq!(saved.field("author"), Some("Smith, John"));
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let mut fx = fixture();
        assert!(matches!(
            run(&mut fx.store, &fx.catalog, "smith2020quantum", "type: [unclosed"),
            Err(ScholarError::Yaml(_))
        ));
    }

    #[test]
    fn test_edit_cannot_change_key() {
        let mut fx = fixture();
        let text = buffer(&fx.store, "smith2020quantum")
            .unwrap()
            .replace("key: smith2020quantum", "key: other")
            .replace("Quantum Foo", "New Title");

        let result = run(&mut fx.store, &fx.catalog, "smith2020quantum", &text).unwrap();
        assert_eq!(result.affected_entries[0].key, "smith2020quantum");
        assert!(!fx.store.contains_key("other"));
    }

    #[test]
    fn test_edit_changing_type_rescaffolds() {
        let mut fx = fixture();
        let text = buffer(&fx.store, "smith2020quantum")
            .unwrap()
            .replace("type: article", "type: misc");

        run(&mut fx.store, &fx.catalog, "smith2020quantum", &text).unwrap();
        let saved = fx.store.get_entry("smith2020quantum").unwrap();
        assert_eq!(saved.entry_type, "misc");
        assert_eq!(saved.optional.get("journaltitle").map(String::as_str), Some("Journal of Tests"));
    }
}
