use colored::Colorize;
use scholar::api::{CmdMessage, MessageLevel};
use scholar::catalog::EntryType;
use scholar::config::ScholarConfig;
use scholar::key::{entry_year, split_names};
use scholar::model::Entry;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const MAX_KEY_WIDTH: usize = 28;
const AUTHOR_WIDTH: usize = 18;
const YEAR_WIDTH: usize = 4;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

/// One line per entry: key, year, first author, title.
pub(super) fn render_entry_list(entries: &[Entry]) -> String {
    let key_width = entries
        .iter()
        .map(|e| e.key.width())
        .max()
        .unwrap_or(0)
        .min(MAX_KEY_WIDTH);
    let title_width = LINE_WIDTH.saturating_sub(key_width + YEAR_WIDTH + AUTHOR_WIDTH + 6);

    let mut out = String::new();
    for entry in entries {
        let key = pad_to_width(&truncate_to_width(&entry.key, key_width), key_width);
        let year = pad_to_width(&entry_year(entry).unwrap_or_default(), YEAR_WIDTH);
        let author = pad_to_width(
            &truncate_to_width(&first_author(entry), AUTHOR_WIDTH),
            AUTHOR_WIDTH,
        );
        let title = truncate_to_width(entry.field("title").unwrap_or_default(), title_width);

        out.push_str(&format!(
            "{}  {}  {}  {}\n",
            key.yellow(),
            year.dimmed(),
            author,
            title
        ));
    }
    out
}

pub(super) fn render_types(types: &[EntryType], fields: bool) -> String {
    let name_width = types.iter().map(|t| t.name.width()).max().unwrap_or(0);
    let mut out = String::new();
    for schema in types {
        out.push_str(&format!(
            "{}  {}\n",
            pad_to_width(&schema.name, name_width).bold(),
            schema.description.dimmed()
        ));
        if fields {
            out.push_str(&format!("    required: {}\n", schema.required.join(", ")));
            if !schema.optional.is_empty() {
                out.push_str(&format!("    optional: {}\n", schema.optional.join(", ")));
            }
        }
    }
    out
}

pub(super) fn render_config(config: &ScholarConfig) -> String {
    config
        .entries()
        .into_iter()
        .map(|(key, value)| format!("{} = {}\n", key, value))
        .collect()
}

/// Family name of the first author (or editor).
fn first_author(entry: &Entry) -> String {
    let names = entry
        .field("author")
        .filter(|v| !v.trim().is_empty())
        .or_else(|| entry.field("editor"))
        .unwrap_or_default();
    let names = split_names(names);
    let first = names.first().map(String::as_str).unwrap_or_default();
    let family = match first.split_once(',') {
        Some((family, _)) => family.trim(),
        None => first.split_whitespace().last().unwrap_or_default(),
    };
    let others = names.len() > 1;
    if others && !family.is_empty() {
        format!("{} et al.", family)
    } else {
        family.to_string()
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
