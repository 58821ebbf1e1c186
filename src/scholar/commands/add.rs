use crate::catalog::TypeCatalog;
use crate::commands::attach::attach_file;
use crate::commands::helpers::{build_entry, commit};
use crate::commands::{CmdMessage, CmdResult};
use crate::doi::{work_to_fields, Work, WorkSource};
use crate::error::{Result, ScholarError};
use crate::key::split_names;
use crate::model::Entry;
use crate::store::Library;
use std::path::{Path, PathBuf};

/// What `add` was asked to create.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
    /// Explicit type. Unlike fetched types it never falls back.
    pub entry_type: Option<String>,
    pub doi: Option<String>,
    /// Free-text Crossref search, used when no DOI is given. A query naming an
    /// existing file is taken as the attachment.
    pub query: Option<String>,
    /// `name=value` pairs from the command line, applied last
    pub fields: Vec<(String, String)>,
    pub attach: Option<PathBuf>,
}

/// How metadata for a new entry is found.
#[derive(Debug, PartialEq)]
enum Lookup {
    Doi(String),
    Search(String),
    Manual,
}

fn plan_lookup(request: &AddRequest) -> Lookup {
    if let Some(doi) = request.doi.as_deref().filter(|d| !d.trim().is_empty()) {
        return Lookup::Doi(doi.trim().to_string());
    }
    if let Some(text) = request.query.as_deref().filter(|q| !q.trim().is_empty()) {
        return Lookup::Search(text.trim().to_string());
    }
    // a bare attachment is looked up by its file name
    match (&request.attach, &request.entry_type) {
        (Some(path), None) => file_query(path).map_or(Lookup::Manual, Lookup::Search),
        _ => Lookup::Manual,
    }
}

fn file_query(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let words: Vec<&str> = stem
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

pub fn run<S: Library, W: WorkSource>(
    store: &mut S,
    catalog: &TypeCatalog,
    source: &W,
    mut request: AddRequest,
    fallback: &str,
) -> Result<CmdResult> {
    if request.attach.is_none() {
        if let Some(path) = request.query.as_deref().map(|q| PathBuf::from(q.trim())) {
            if path.is_file() {
                request.attach = Some(path);
                request.query = None;
            }
        }
    }

    let fetched = match plan_lookup(&request) {
        Lookup::Doi(doi) => Some(work_to_fields(&source.fetch(&doi)?)),
        Lookup::Search(text) => {
            let mut works = source.query(&text)?;
            match works.len() {
                0 if request.entry_type.is_none() => {
                    return Err(ScholarError::Api(format!(
                        "Nothing found on Crossref for '{}' (use --doi or --type)",
                        text
                    )))
                }
                0 => None,
                1 => {
                    let work = works.remove(0);
                    // search hits are abridged, the DOI record is complete
                    let work = if work.doi.trim().is_empty() {
                        work
                    } else {
                        source.fetch(&work.doi)?
                    };
                    Some(work_to_fields(&work))
                }
                _ => return Ok(candidates(&text, &works)),
            }
        }
        Lookup::Manual => None,
    };

    let mut entry = match (&request.entry_type, fetched) {
        (Some(type_name), fetched) => {
            let mut entry = Entry::new(catalog, type_name)?;
            if let Some(mut fetched) = fetched {
                fetched.shift_remove("type");
                entry.populate_from(fetched);
            }
            entry
        }
        (None, Some(fetched)) => build_entry(catalog, fetched, fallback)?,
        (None, None) => {
            return Err(ScholarError::Api(
                "An entry type is required (use --type, --doi or a search)".to_string(),
            ))
        }
    };

    for (name, value) in request.fields {
        entry.set_field(name.trim(), value);
    }
    // a `type=` field may have switched the schema
    entry.conform(catalog)?;

    let mut entry = commit(store, catalog, entry)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Added {}", entry.key)));

    if let Some(source) = &request.attach {
        let stored = attach_file(store, &mut entry, source)?;
        result.add_message(CmdMessage::info(format!("Attached {}", stored.display())));
    }

    Ok(result.with_affected_entries(vec![entry]))
}

/// Lists the works a search matched without adding anything.
fn candidates(text: &str, works: &[Work]) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(format!(
        "{} works match '{}', re-run with --doi:",
        works.len(),
        text
    )));
    for work in works {
        result.add_message(CmdMessage::info(candidate_line(work)));
    }
    result
}

fn candidate_line(work: &Work) -> String {
    let fields = work_to_fields(work);
    let get = |name: &str| fields.get(name).map(String::as_str).unwrap_or_default();
    let year = get("date").get(..4).unwrap_or_default();
    let author = split_names(get("author")).into_iter().next().unwrap_or_default();
    format!("{}  {}  {}  {}", work.doi.trim(), year, author, get("title"))
}

/// Splits a `name=value` argument.
pub fn parse_field_arg(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_lowercase(), value.to_string()))
        }
        _ => Err(ScholarError::Api(format!(
            "Invalid field '{}', expected name=value",
            arg
        ))),
    }
}
