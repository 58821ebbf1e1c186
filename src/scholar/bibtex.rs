//! # BibTeX / BibLaTeX text
//!
//! [`render`] turns an [`Entry`] into an `@type{key, field = {value}, …}` block.
//! [`parse`] reads any number of such blocks back into [`RawFields`] maps, with
//! the `@` tag stored under `type` and the cite key under `key`.
//!
//! Parsing goes through the `biblatex` crate and is all-or-nothing: one
//! malformed entry fails the whole text with a [`ScholarError::Parse`] pointing
//! at the offending `line:column`, so an import never half-succeeds on a
//! corrupt file. `@string` abbreviations are expanded and `#` concatenations
//! joined; brace groups and `$…$` math are written back with their delimiters.
//!
//! Braces inside rendered values are escaped as `\{` / `\}` (and backslashes as
//! `\\`); [`parse`] undoes whatever of that escaping the parser leaves behind.

use crate::error::{Result, ScholarError};
use crate::model::{Entry, RawFields};
use biblatex::{Bibliography, Chunk, Spanned};

const INDENT: &str = "  ";

/// Renders one entry. Empty fields are omitted; required fields come first in
/// schema order, then optional fields in insertion order.
pub fn render(entry: &Entry) -> String {
    let fields: Vec<String> = entry
        .required()
        .iter()
        .chain(entry.optional.iter())
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}{} = {{{}}}", INDENT, name, escape(value)))
        .collect();

    let mut out = format!("@{}{{{},\n", entry.entry_type, entry.key);
    if !fields.is_empty() {
        out.push_str(&fields.join(",\n"));
        out.push('\n');
    }
    out.push('}');
    out
}

/// Renders several entries separated by a blank line.
pub fn render_all<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a Entry>,
{
    let blocks: Vec<String> = entries.into_iter().map(render).collect();
    let mut out = blocks.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Fields `biblatex` reads as one verbatim chunk instead of TeX text.
const VERBATIM_FIELDS: [&str; 10] = [
    "doi", "eprint", "file", "pdf", "uri", "url", "urlraw", "verba", "verbb", "verbc",
];

/// Parses every entry in `text`.
pub fn parse(text: &str) -> Result<Vec<RawFields>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let bibliography = Bibliography::parse(text).map_err(|e| ScholarError::Parse {
        position: location(text, e.span.start),
        reason: e.kind.to_string(),
    })?;

    let entries: Vec<RawFields> = bibliography.into_iter().map(entry_fields).collect();
    tracing::debug!(count = entries.len(), "parsed bibtex entries");
    Ok(entries)
}

fn entry_fields(entry: biblatex::Entry) -> RawFields {
    let mut fields = RawFields::new();
    fields.insert("type".to_string(), entry.entry_type.to_string().to_lowercase());
    fields.insert("key".to_string(), entry.key.trim().to_string());

    // the field map is sorted by name; source order comes from the spans
    let mut declared: Vec<(String, Vec<Spanned<Chunk>>)> = entry.fields.into_iter().collect();
    declared.sort_by_key(|(_, chunks)| chunks.first().map_or(usize::MAX, |c| c.span.start));

    for (name, chunks) in declared {
        let name = name.to_lowercase();
        let value = chunks_to_text(&name, &chunks);
        insert_field(&mut fields, name, value);
    }
    fields
}

/// Joins parsed chunks back into field text. Brace groups and math keep their
/// delimiters so the value reads as it was written.
fn chunks_to_text(name: &str, chunks: &[Spanned<Chunk>]) -> String {
    let verbatim_field = VERBATIM_FIELDS.contains(&name);
    let mut out = String::new();
    for chunk in chunks {
        match &chunk.v {
            Chunk::Normal(s) => out.push_str(s),
            Chunk::Verbatim(s) if verbatim_field => out.push_str(s),
            Chunk::Verbatim(s) => {
                out.push('{');
                out.push_str(s);
                out.push('}');
            }
            Chunk::Math(s) => {
                out.push('$');
                out.push_str(s);
                out.push('$');
            }
        }
    }
    unescape(out.trim())
}

/// Undoes [`escape`] for escapes the parser leaves in the text.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next @ ('{' | '}' | '\\'))) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// 1-based `line:column` of a byte offset.
fn location(text: &str, offset: usize) -> String {
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().unwrap_or("").chars().count() + 1;
    format!("{}:{}", line, column)
}

/// Declared fields that clash with the `type`/`key` slots are kept under a
/// `bib` prefix instead of overwriting them.
fn insert_field(fields: &mut RawFields, name: String, value: String) {
    let name = match name.as_str() {
        "type" | "key" => {
            tracing::warn!(field = %name, "renaming clashing bibtex field to bib{}", name);
            format!("bib{}", name)
        }
        _ => name,
    };
    fields.insert(name, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::article_catalog;

    fn scenario_entry() -> Entry {
        let catalog = article_catalog();
        let mut entry = Entry::new(&catalog, "article").unwrap();
        entry.populate_from(
            [
                ("author", "Smith, John"),
                ("date", "2020-05"),
                ("title", "Quantum Foo"),
                ("journaltitle", "J. Bar"),
                ("volume", "3"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        );
        entry.key = "smith2020quantum".to_string();
        entry
    }

    #[test]
    fn test_render_scenario() {
        let text = render(&scenario_entry());
        assert_eq!(
            text,
            "@article{smith2020quantum,\n  author = {Smith, John},\n  date = {2020-05},\n  title = {Quantum Foo},\n  journaltitle = {J. Bar},\n  volume = {3}\n}"
        );
    }

    #[test]
    fn test_render_skips_empty_fields() {
        let mut entry = scenario_entry();
        entry.set_field("journaltitle", "");
        entry.set_field("doi", "");
        let text = render(&entry);
        assert!(!text.contains("journaltitle"));
        assert!(!text.contains("doi"));
    }

    #[test]
    fn test_render_optional_in_insertion_order() {
        let mut entry = scenario_entry();
        entry.set_field("doi", "10.1/x");
        entry.set_field("isbn", "123");
        let text = render(&entry);
        let volume = text.find("volume").unwrap();
        let doi = text.find("doi").unwrap();
        let isbn = text.find("isbn").unwrap();
        assert!(volume < doi && doi < isbn);
    }

    #[test]
    fn test_render_escapes_braces() {
        let mut entry = scenario_entry();
        entry.set_field("title", "A {weird} title}");
        let text = render(&entry);
        assert!(text.contains(r"title = {A \{weird\} title\}}"));
    }

    #[test]
    fn test_round_trip() {
        let mut entry = scenario_entry();
        entry.set_field("note", "Plain note, with a comma");
        entry.set_field("doi", "10.1000/xyz123");

        let parsed = parse(&render(&entry)).unwrap();
        assert_eq!(parsed.len(), 1);
        let raw = &parsed[0];

        assert_eq!(raw["type"], "article");
        assert_eq!(raw["key"], "smith2020quantum");
        for (name, value) in entry.required().iter().chain(entry.optional.iter()) {
            assert_eq!(&raw[name.as_str()], value, "field {}", name);
        }
    }

    #[test]
    fn test_round_trip_rebuilds_entry() {
        let entry = scenario_entry();
        let raw = parse(&render(&entry)).unwrap().remove(0);

        let catalog = article_catalog();
        let mut rebuilt = Entry::new(&catalog, &raw["type"]).unwrap();
        rebuilt.populate_from(raw);
        assert_eq!(rebuilt, entry);
    }

    #[test]
    fn test_parse_multiple_entries_and_value_forms() {
        let text = r#"
This line is free text between entries.

@Article{doe2019,
  Author = "Doe, Jane and {Smith}, John",
  title  = {The {DNA} of Things},
  year   = 2019,
  note   = "alpha" # {beta},
}

@comment{ anything {nested} here }

@book{knuth1984,
  author = {Knuth, Donald},
  title = {Computers and Typesetting}
}
"#;
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 2);

        let a = &entries[0];
        assert_eq!(a["type"], "article");
        assert_eq!(a["key"], "doe2019");
        assert_eq!(a["author"], "Doe, Jane and {Smith}, John");
        assert_eq!(a["title"], "The {DNA} of Things");
        assert_eq!(a["year"], "2019");
        assert_eq!(a["note"], "alphabeta");

        let b = &entries[1];
        assert_eq!(b["type"], "book");
        assert_eq!(b["key"], "knuth1984");
        assert_eq!(b["title"], "Computers and Typesetting");
    }

    #[test]
    fn test_parse_expands_string_abbreviations() {
        let text = "@string{pub = {Addison-Wesley}}\n@book{k, title = {T}, publisher = pub}";
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["publisher"], "Addison-Wesley");
    }

    #[test]
    fn test_parse_keeps_field_order() {
        let entries = parse("@misc{k, zeta = {1}, alpha = {2}, mid = {3}}").unwrap();
        let names: Vec<&str> = entries[0].keys().map(String::as_str).collect();
        assert_eq!(names, vec!["type", "key", "zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_verbatim_fields_stay_bare() {
        let entries = parse("@misc{k, url = {https://example.com/a_b}, file = {/tmp/paper.pdf}}").unwrap();
        assert_eq!(entries[0]["url"], "https://example.com/a_b");
        assert_eq!(entries[0]["file"], "/tmp/paper.pdf");
    }

    #[test]
    fn test_parse_path_like_cite_key() {
        let entries = parse("@inproceedings{DBLP:conf/nips/VaswaniSPUJGKP17, title = {Attention}}").unwrap();
        assert_eq!(entries[0]["key"], "DBLP:conf/nips/VaswaniSPUJGKP17");
        assert_eq!(entries[0]["type"], "inproceedings");
    }

    #[test]
    fn test_parse_leading_byte_order_mark() {
        let entries = parse("\u{feff}@misc{a, title = {A}}").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["key"], "a");
    }

    #[test]
    fn test_parse_back_to_back_entries() {
        let entries = parse("@misc{a, title = {A}}@misc{b, title = {B}}").unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e["key"].as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_clashing_field_names() {
        let entries = parse("@thesis{k, type = {phdthesis}, title = {T}}").unwrap();
        assert_eq!(entries[0]["type"], "thesis");
        assert_eq!(entries[0]["bibtype"], "phdthesis");
    }

    #[test]
    fn test_parse_missing_closing_brace_fails_whole_file() {
        let text = "@misc{good, title = {Fine}}\n\n@article{bad,\n  title = {Never closed\n";
        match parse(text) {
            Err(ScholarError::Parse { position, .. }) => {
                let line: usize = position.split(':').next().unwrap().parse().unwrap();
                assert!(line >= 3, "error reported at {}", position);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unbalanced_nesting() {
        assert!(matches!(
            parse("@misc{k, title = {a {b}"),
            Err(ScholarError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_error_positions() {
        match parse("@misc{k,\n  title {T}\n}") {
            Err(ScholarError::Parse { position, .. }) => assert!(position.starts_with("2:")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_location() {
        assert_eq!(location("abc", 0), "1:1");
        assert_eq!(location("ab\ncd", 4), "2:2");
        assert_eq!(location("日本\nx", 7), "2:1");
        assert_eq!(location("short", 99), "1:6");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"A \{weird\} title\}"), "A {weird} title}");
        assert_eq!(unescape(r"back\\slash"), r"back\slash");
        assert_eq!(unescape(r"\TeX"), r"\TeX");
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("no entries here").unwrap().is_empty());
    }

    #[test]
    fn test_render_all() {
        let a = scenario_entry();
        let mut b = scenario_entry();
        b.key = "other".to_string();
        let text = render_all([&a, &b]);
        assert_eq!(parse(&text).unwrap().len(), 2);
        assert!(text.contains("}\n\n@article{other,"));
        assert!(render_all(Vec::<&Entry>::new()).is_empty());
    }
}
