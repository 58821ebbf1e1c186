use crate::catalog::TypeCatalog;
use crate::error::Result;
use crate::key::generate_key;
use crate::model::{Entry, RawFields};
use crate::store::{sanitize_key, Library};
use crate::validate::{check_type, validate};

/// Longest title fragment used in attachment file names.
const ATTACHMENT_TITLE_CHARS: usize = 40;

/// Builds an entry from raw fields. The `type` field picks the schema, falling
/// back to `fallback` when the catalog does not know it.
pub fn build_entry(catalog: &TypeCatalog, mut raw: RawFields, fallback: &str) -> Result<Entry> {
    let type_name = raw.shift_remove("type").unwrap_or_default();
    let mut entry = Entry::new_or_fallback(catalog, type_name.trim(), fallback)?;
    entry.populate_from(raw);

    let key = sanitize_key(&entry.key);
    if key != entry.key {
        tracing::warn!(original = %entry.key, key = %key, "rewriting cite key that is not a valid directory name");
        entry.key = key;
    }
    Ok(entry)
}

/// Checks, keys and saves an entry. The key (given or generated) is suffixed
/// until it is free, so an existing entry is never overwritten.
pub fn commit<S: Library>(store: &mut S, catalog: &TypeCatalog, mut entry: Entry) -> Result<Entry> {
    check_type(catalog, &entry)?;
    // a reserved `type` field may have switched the schema after construction
    entry.conform(catalog)?;
    validate(&entry)?;

    let given = sanitize_key(&entry.key);
    let base = if given.is_empty() {
        generate_key(&entry)
    } else {
        given
    };
    entry.key = store.free_key(&base)?;
    if entry.key != base {
        tracing::debug!(base = %base, key = %entry.key, "key taken, using suffixed key");
    }

    store.save_entry(&entry)?;
    tracing::info!(key = %entry.key, entry_type = %entry.entry_type, "committed entry");
    Ok(entry)
}

/// `{key}_{title}` with the title reduced to alphanumerics and underscores.
pub fn attachment_stem(key: &str, title: &str) -> String {
    let mut cleaned = String::new();
    for c in title.trim().chars() {
        if cleaned.chars().count() >= ATTACHMENT_TITLE_CHARS {
            break;
        }
        if c.is_alphanumeric() {
            cleaned.push(c);
        } else if c.is_whitespace() && !cleaned.ends_with('_') {
            cleaned.push('_');
        }
    }
    let cleaned = cleaned.trim_end_matches('_');

    if cleaned.is_empty() {
        key.to_string()
    } else {
        format!("{}_{}", key, cleaned)
    }
}

/// Label for messages about an entry that may not have a key yet.
pub fn entry_label(entry: &Entry, position: usize) -> String {
    if entry.key.is_empty() {
        format!("entry #{}", position + 1)
    } else {
        entry.key.clone()
    }
}

pub fn entries_by_keys<S: Library>(store: &S, keys: &[String]) -> Result<Vec<Entry>> {
    if keys.is_empty() {
        return store.list_entries();
    }
    keys.iter().map(|key| store.get_entry(key)).collect()
}
