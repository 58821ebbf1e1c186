//! Citation key generation.
//!
//! A key is `{family name}{year}{first significant title word}`, all lower-case
//! and alphanumeric, e.g. `smith2020quantum`. Generation is a pure function of
//! the author, date and title fields; making the key unique inside a library is
//! the store's job (see [`next_candidate_key`]).

use crate::model::Entry;

/// Stands in for any segment whose source field is empty.
pub const PLACEHOLDER: &str = "unknown";

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "on", "in", "at", "to", "for", "and", "or", "with", "from", "by",
    "is", "are", "as",
];

pub fn generate_key(entry: &Entry) -> String {
    let author = first_non_empty(entry, &["author", "editor"]);
    let date = first_non_empty(entry, &["date", "year"]);
    let title = first_non_empty(entry, &["title"]);

    let mut key = String::new();
    key.push_str(&author_segment(author).unwrap_or_else(|| PLACEHOLDER.to_string()));
    key.push_str(&year_segment(date).unwrap_or_else(|| PLACEHOLDER.to_string()));
    key.push_str(&title_segment(title).unwrap_or_else(|| PLACEHOLDER.to_string()));
    key
}

/// The first four-digit run of `date`, falling back to `year`.
pub fn entry_year(entry: &Entry) -> Option<String> {
    year_segment(first_non_empty(entry, &["date", "year"]))
}

/// The `attempt`-th key to try for `base`: `base`, `basea` … `basez`, `baseaa` …
pub fn next_candidate_key(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        return base.to_string();
    }

    // bijective base-26: 1 -> a, 26 -> z, 27 -> aa
    let mut n = attempt;
    let mut suffix = Vec::new();
    while n > 0 {
        n -= 1;
        suffix.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    suffix.reverse();

    format!("{}{}", base, String::from_utf8_lossy(&suffix))
}

fn first_non_empty<'a>(entry: &'a Entry, names: &[&str]) -> &'a str {
    names
        .iter()
        .filter_map(|name| entry.field(name))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

fn clean(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Splits a name list on the `and` separator, in any case. An `and` inside
/// braces (`{Barnes and Noble}`) belongs to the name.
pub fn split_names(names: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut depth = 0i32;
    for word in names.split_whitespace() {
        if depth == 0 && word.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        for c in word.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth = (depth - 1).max(0),
                _ => {}
            }
        }
        current.push(word);
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

fn author_segment(author: &str) -> Option<String> {
    let names = split_names(author);
    let first = names.first().map(String::as_str).unwrap_or("");
    let family = match first.split_once(',') {
        Some((family, _)) => family,
        None => first.split_whitespace().last().unwrap_or(""),
    };
    Some(clean(family)).filter(|s| !s.is_empty())
}

fn year_segment(date: &str) -> Option<String> {
    let chars: Vec<char> = date.chars().collect();
    chars
        .windows(4)
        .find(|w| w.iter().all(char::is_ascii_digit))
        .map(|w| w.iter().collect())
}

fn title_segment(title: &str) -> Option<String> {
    title
        .split_whitespace()
        .map(clean)
        .find(|word| !word.is_empty() && !STOP_WORDS.contains(&word.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::article_catalog;

    fn article(author: &str, date: &str, title: &str) -> Entry {
        let catalog = article_catalog();
        let mut entry = Entry::new(&catalog, "article").unwrap();
        entry.set_field("author", author);
        entry.set_field("date", date);
        entry.set_field("title", title);
        entry
    }

    #[test]
    fn test_entry_year() {
        assert_eq!(entry_year(&article("A", "c. 1850s", "T")).as_deref(), Some("1850"));
        assert_eq!(entry_year(&article("A", "", "T")), None);
    }

    #[test]
    fn test_basic_key() {
        let entry = article("Smith, John", "2020-05", "Quantum Foo");
        assert_eq!(generate_key(&entry), "smith2020quantum");
    }

    #[test]
    fn test_generation_is_pure() {
        let entry = article("Smith, John", "2020-05", "Quantum Foo");
        let first = generate_key(&entry);
        for _ in 0..5 {
            assert_eq!(generate_key(&entry), first);
        }
        assert_eq!(
            generate_key(&article("Smith, John", "2020-05", "Quantum Foo")),
            first
        );
    }

    #[test]
    fn test_first_author_only() {
        let entry = article("Smith, John and Doe, Jane", "2020", "Foo");
        assert_eq!(generate_key(&entry), "smith2020foo");
    }

    #[test]
    fn test_uppercase_and_separates_authors() {
        let entry = article("Smith, John AND Doe, Jane", "2020", "Foo");
        assert_eq!(generate_key(&entry), "smith2020foo");

        let entry = article("John Smith\n  And Jane Doe", "2020", "Foo");
        assert_eq!(generate_key(&entry), "smith2020foo");
    }

    #[test]
    fn test_split_names() {
        assert_eq!(
            split_names("Smith, John AND Doe, Jane and\nRoe, R."),
            vec!["Smith, John", "Doe, Jane", "Roe, R."]
        );
        assert_eq!(split_names("{Barnes and Noble} and Doe, J"), vec!["{Barnes and Noble}", "Doe, J"]);
        assert_eq!(split_names("Sandy Anderson"), vec!["Sandy Anderson"]);
        assert!(split_names("  ").is_empty());
    }

    #[test]
    fn test_given_family_order() {
        let entry = article("John Smith and Jane Doe", "2020", "Foo");
        assert_eq!(generate_key(&entry), "smith2020foo");
    }

    #[test]
    fn test_family_name_is_cleaned() {
        let entry = article("{O'Brien-Kelly}, Pat", "1999", "Bar");
        assert_eq!(generate_key(&entry), "obrienkelly1999bar");
    }

    #[test]
    fn test_stop_words_skipped() {
        let entry = article("Smith, J", "2020", "The Theory of Everything");
        assert_eq!(generate_key(&entry), "smith2020theory");

        let entry = article("Smith, J", "2020", "On a Method");
        assert_eq!(generate_key(&entry), "smith2020method");
    }

    #[test]
    fn test_leading_punctuation_skipped() {
        let entry = article("Smith, J", "2020", "-- \"{Deep}\" learning");
        assert_eq!(generate_key(&entry), "smith2020deep");
    }

    #[test]
    fn test_year_found_anywhere() {
        let entry = article("Smith, J", "May 12, 2018", "Foo");
        assert_eq!(generate_key(&entry), "smith2018foo");
    }

    #[test]
    fn test_empty_fields_use_placeholder() {
        let entry = article("", "", "");
        assert_eq!(generate_key(&entry), "unknownunknownunknown");

        let entry = article("Smith, J", "n.d.", "The");
        assert_eq!(generate_key(&entry), "smithunknownunknown");
    }

    #[test]
    fn test_year_and_editor_fallbacks() {
        let catalog = article_catalog();
        let mut entry = Entry::new(&catalog, "misc").unwrap();
        entry.set_field("title", "Collected Works");
        entry.set_field("year", "1901");
        entry.set_field("editor", "Doe, Jane");
        assert_eq!(generate_key(&entry), "doe1901collected");
    }

    #[test]
    fn test_candidate_keys() {
        assert_eq!(next_candidate_key("smith2020foo", 0), "smith2020foo");
        assert_eq!(next_candidate_key("smith2020foo", 1), "smith2020fooa");
        assert_eq!(next_candidate_key("smith2020foo", 2), "smith2020foob");
        assert_eq!(next_candidate_key("smith2020foo", 26), "smith2020fooz");
        assert_eq!(next_candidate_key("smith2020foo", 27), "smith2020fooaa");
        assert_eq!(next_candidate_key("smith2020foo", 28), "smith2020fooab");
        assert_eq!(next_candidate_key("k", 702), "kzz");
        assert_eq!(next_candidate_key("k", 703), "kaaa");
    }
}
