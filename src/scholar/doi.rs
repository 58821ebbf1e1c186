//! DOI lookup and search through the Crossref REST API.
//!
//! [`WorkSource::fetch`] returns the raw Crossref [`Work`] for a DOI and
//! [`WorkSource::query`] searches works by free text. [`work_to_fields`] maps a
//! work onto biblatex field names so it can be fed to
//! [`Entry::populate_from`](crate::model::Entry::populate_from) like any other
//! raw field map.

use crate::error::{Result, ScholarError};
use crate::model::RawFields;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const CROSSREF_API: &str = "https://api.crossref.org/works";
const TIMEOUT: Duration = Duration::from_secs(20);
/// Works returned by one search.
const QUERY_ROWS: usize = 10;

const DOI_PREFIXES: [&str; 6] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "doi:",
];

/// Strips resolver URLs, the `doi:` scheme and surrounding whitespace.
pub fn normalize_doi(input: &str) -> String {
    let mut doi = input.trim();
    for prefix in DOI_PREFIXES {
        let matches = doi
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches {
            doi = doi[prefix.len()..].trim_start();
            break;
        }
    }
    doi.to_string()
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: Work,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    message: SearchMessage,
}

#[derive(Debug, Deserialize)]
struct SearchMessage {
    #[serde(default)]
    items: Vec<Work>,
}

/// The subset of a Crossref work record scholar uses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Work {
    #[serde(rename = "type", default)]
    pub work_type: String,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub author: Vec<Contributor>,
    #[serde(default)]
    pub issued: Option<PartialDate>,
    #[serde(default)]
    pub container_title: Vec<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub page: Option<String>,
    pub publisher: Option<String>,
    #[serde(rename = "DOI", default)]
    pub doi: String,
    #[serde(rename = "URL")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contributor {
    pub given: Option<String>,
    pub family: Option<String>,
    /// Organisations carry a single name instead of given/family
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialDate {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<Option<i64>>>,
}

pub struct CrossrefClient {
    client: Client,
    base_url: String,
}

impl CrossrefClient {
    /// `mailto` is sent in the user agent, which puts requests in Crossref's
    /// polite pool.
    pub fn new(mailto: &str) -> Result<Self> {
        let user_agent = if mailto.trim().is_empty() {
            format!("scholar/{}", env!("CARGO_PKG_VERSION"))
        } else {
            format!("scholar/{} (mailto:{})", env!("CARGO_PKG_VERSION"), mailto.trim())
        };

        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScholarError::Doi(format!("could not create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: CROSSREF_API.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get(&self, url: &str, what: &str) -> Result<reqwest::blocking::Response> {
        tracing::debug!(%url, "crossref request");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScholarError::Doi(format!("request for {} failed: {}", what, e)))?;

        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::NOT_FOUND => Err(ScholarError::Doi(format!("{} not found", what))),
            status => Err(ScholarError::Doi(format!(
                "crossref answered {} for {}",
                status, what
            ))),
        }
    }
}

/// Where bibliographic metadata comes from. [`CrossrefClient`] talks to the
/// Crossref API.
pub trait WorkSource {
    /// The work registered under `doi`.
    fn fetch(&self, doi: &str) -> Result<Work>;

    /// Works matching a free-text bibliographic search, best match first.
    fn query(&self, text: &str) -> Result<Vec<Work>>;
}

impl WorkSource for CrossrefClient {
    fn fetch(&self, doi: &str) -> Result<Work> {
        let doi = normalize_doi(doi);
        if doi.is_empty() {
            return Err(ScholarError::Doi("empty DOI".to_string()));
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), doi);
        let body: CrossrefResponse = self
            .get(&url, &doi)?
            .json()
            .map_err(|e| ScholarError::Doi(format!("unexpected response for {}: {}", doi, e)))?;
        tracing::info!(%doi, work_type = %body.message.work_type, "fetched work");
        Ok(body.message)
    }

    fn query(&self, text: &str) -> Result<Vec<Work>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ScholarError::Doi("empty search".to_string()));
        }

        let url = reqwest::Url::parse_with_params(
            self.base_url.trim_end_matches('/'),
            &[
                ("query.bibliographic", text),
                ("rows", &QUERY_ROWS.to_string()),
            ],
        )
        .map_err(|e| ScholarError::Doi(format!("invalid crossref url: {}", e)))?;

        let what = format!("'{}'", text);
        let body: SearchResponse = self
            .get(url.as_str(), &what)?
            .json()
            .map_err(|e| ScholarError::Doi(format!("unexpected response for {}: {}", what, e)))?;
        tracing::info!(query = text, hits = body.message.items.len(), "searched crossref");
        Ok(body.message.items)
    }
}

fn entry_type_for(work_type: &str) -> &'static str {
    match work_type {
        "journal-article" => "article",
        "proceedings-article" => "inproceedings",
        "book" | "monograph" | "edited-book" | "reference-book" => "book",
        "book-chapter" | "book-section" | "book-part" => "incollection",
        "report" => "report",
        "dissertation" => "thesis",
        _ => "misc",
    }
}

/// Maps a Crossref work onto biblatex fields, including `type`.
pub fn work_to_fields(work: &Work) -> RawFields {
    let entry_type = entry_type_for(&work.work_type);
    let mut fields = RawFields::new();
    fields.insert("type".to_string(), entry_type.to_string());

    let authors: Vec<String> = work.author.iter().filter_map(contributor_name).collect();
    if !authors.is_empty() {
        fields.insert("author".to_string(), authors.join(" and "));
    }

    if let Some(date) = work.issued.as_ref().and_then(format_date) {
        fields.insert("date".to_string(), date);
    }

    if let Some(title) = first_non_empty(&work.title) {
        fields.insert("title".to_string(), title);
    }

    if let Some(container) = first_non_empty(&work.container_title) {
        let name = match entry_type {
            "inproceedings" | "incollection" => "booktitle",
            _ => "journaltitle",
        };
        fields.insert(name.to_string(), container);
    }

    let optional = [
        ("volume", &work.volume),
        ("number", &work.issue),
        ("pages", &work.page),
        ("publisher", &work.publisher),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            fields.insert(name.to_string(), value.to_string());
        }
    }

    if !work.doi.trim().is_empty() {
        fields.insert("doi".to_string(), work.doi.trim().to_string());
    }
    if let Some(url) = work.url.as_deref().filter(|u| !u.trim().is_empty()) {
        fields.insert("url".to_string(), url.trim().to_string());
    }

    fields
}

fn contributor_name(person: &Contributor) -> Option<String> {
    let family = person.family.as_deref().map(str::trim).unwrap_or_default();
    let given = person.given.as_deref().map(str::trim).unwrap_or_default();
    match (family.is_empty(), given.is_empty()) {
        (false, false) => Some(format!("{}, {}", family, given)),
        (false, true) => Some(family.to_string()),
        (true, false) => Some(given.to_string()),
        (true, true) => person
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    }
}

fn format_date(date: &PartialDate) -> Option<String> {
    let parts: Vec<i64> = date.date_parts.first()?.iter().map_while(|p| *p).collect();
    match parts.as_slice() {
        [] => None,
        [year] => Some(format!("{:04}", year)),
        [year, month] => Some(format!("{:04}-{:02}", year, month)),
        [year, month, day, ..] => Some(format!("{:04}-{:02}-{:02}", year, month, day)),
    }
}

fn first_non_empty(values: &[String]) -> Option<String> {
    values
        .iter()
        .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOURNAL_ARTICLE: &str = r#"{
        "status": "ok",
        "message": {
            "type": "journal-article",
            "title": ["Quantum Foo in\n   Practice"],
            "author": [
                {"given": "John", "family": "Smith", "sequence": "first"},
                {"given": "Jane", "family": "Doe"},
                {"name": "The Foo Collaboration"}
            ],
            "issued": {"date-parts": [[2020, 3]]},
            "container-title": ["Journal of Physics"],
            "volume": "12",
            "issue": "4",
            "page": "100-110",
            "publisher": "IOP",
            "DOI": "10.1000/xyz123",
            "URL": "https://doi.org/10.1000/xyz123"
        }
    }"#;

    fn article() -> Work {
        serde_json::from_str::<CrossrefResponse>(JOURNAL_ARTICLE)
            .unwrap()
            .message
    }

    #[test]
    fn test_normalize_doi() {
        assert_eq!(normalize_doi("10.1000/xyz"), "10.1000/xyz");
        assert_eq!(normalize_doi("  https://doi.org/10.1000/xyz "), "10.1000/xyz");
        assert_eq!(normalize_doi("http://dx.doi.org/10.1000/xyz"), "10.1000/xyz");
        assert_eq!(normalize_doi("doi:10.1000/xyz"), "10.1000/xyz");
        assert_eq!(normalize_doi("DOI: 10.1000/xyz"), "10.1000/xyz");
        assert_eq!(normalize_doi(""), "");
    }

    #[test]
    fn test_work_to_fields_journal_article() {
        let fields = work_to_fields(&article());
        let get = |k: &str| fields.get(k).map(String::as_str);

        assert_eq!(get("type"), Some("article"));
        assert_eq!(
            get("author"),
            Some("Smith, John and Doe, Jane and The Foo Collaboration")
        );
        assert_eq!(get("date"), Some("2020-03"));
        assert_eq!(get("title"), Some("Quantum Foo in Practice"));
        assert_eq!(get("journaltitle"), Some("Journal of Physics"));
        assert_eq!(get("booktitle"), None);
        assert_eq!(get("volume"), Some("12"));
        assert_eq!(get("number"), Some("4"));
        assert_eq!(get("pages"), Some("100-110"));
        assert_eq!(get("publisher"), Some("IOP"));
        assert_eq!(get("doi"), Some("10.1000/xyz123"));
        assert_eq!(get("url"), Some("https://doi.org/10.1000/xyz123"));
    }

    #[test]
    fn test_proceedings_use_booktitle() {
        let mut work = article();
        work.work_type = "proceedings-article".to_string();
        let fields = work_to_fields(&work);

        assert_eq!(fields.get("type").map(String::as_str), Some("inproceedings"));
        assert_eq!(fields.get("booktitle").map(String::as_str), Some("Journal of Physics"));
        assert!(fields.get("journaltitle").is_none());
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(entry_type_for("journal-article"), "article");
        assert_eq!(entry_type_for("monograph"), "book");
        assert_eq!(entry_type_for("book-chapter"), "incollection");
        assert_eq!(entry_type_for("dissertation"), "thesis");
        assert_eq!(entry_type_for("posted-content"), "misc");
    }

    #[test]
    fn test_sparse_work() {
        let work: Work = serde_json::from_str(r#"{"type": "dataset", "issued": {"date-parts": [[null]]}}"#).unwrap();
        let fields = work_to_fields(&work);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("type").map(String::as_str), Some("misc"));
    }

    #[test]
    fn test_format_date() {
        let date = |parts: Vec<Option<i64>>| PartialDate {
            date_parts: vec![parts],
        };
        assert_eq!(format_date(&date(vec![Some(1999)])).as_deref(), Some("1999"));
        assert_eq!(
            format_date(&date(vec![Some(2021), Some(7), Some(4)])).as_deref(),
            Some("2021-07-04")
        );
        assert_eq!(format_date(&PartialDate::default()), None);
    }

    fn client_for(server: &mockito::Server) -> CrossrefClient {
        CrossrefClient::new("me@example.com")
            .unwrap()
            .with_base_url(format!("{}/works", server.url()))
    }

    #[test]
    fn test_fetch_returns_work() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/works/10.1000/xyz123")
            .match_header("user-agent", mockito::Matcher::Regex("mailto:me@example.com".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(JOURNAL_ARTICLE)
            .create();

        let work = client_for(&server).fetch("https://doi.org/10.1000/xyz123").unwrap();

        mock.assert();
        assert_eq!(work.doi, "10.1000/xyz123");
        assert_eq!(work.work_type, "journal-article");
        assert_eq!(work.author.len(), 3);
    }

    #[test]
    fn test_fetch_unknown_doi() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/works/10.1000/missing")
            .with_status(404)
            .with_body("Resource not found.")
            .create();

        match client_for(&server).fetch("10.1000/missing") {
            Err(ScholarError::Doi(msg)) => assert_eq!(msg, "10.1000/missing not found"),
            other => panic!("unexpected result: {:?}", other.map(|w| w.doi)),
        }
    }

    #[test]
    fn test_fetch_server_error() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/works/10.1000/xyz").with_status(503).create();

        match client_for(&server).fetch("10.1000/xyz") {
            Err(ScholarError::Doi(msg)) => assert!(msg.contains("503")),
            other => panic!("unexpected result: {:?}", other.map(|w| w.doi)),
        }
    }

    #[test]
    fn test_fetch_malformed_body() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/works/10.1000/xyz")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "ok", "message": "#)
            .create();

        match client_for(&server).fetch("10.1000/xyz") {
            Err(ScholarError::Doi(msg)) => assert!(msg.starts_with("unexpected response")),
            other => panic!("unexpected result: {:?}", other.map(|w| w.doi)),
        }
    }

    #[test]
    fn test_fetch_empty_doi_skips_request() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", mockito::Matcher::Any).expect(0).create();

        assert!(client_for(&server).fetch(" doi: ").is_err());
        mock.assert();
    }

    #[test]
    fn test_query_lists_items() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/works")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "query.bibliographic".to_string(),
                    "quantum foo".to_string(),
                ),
                mockito::Matcher::UrlEncoded("rows".to_string(), QUERY_ROWS.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status": "ok", "message": {"total-results": 2, "items": [
                    {"type": "journal-article", "DOI": "10.1/a", "title": ["Quantum Foo"]},
                    {"type": "book", "DOI": "10.1/b", "title": ["Foo for Everyone"]}
                ]}}"#,
            )
            .create();

        let works = client_for(&server).query("  quantum foo ").unwrap();

        mock.assert();
        let dois: Vec<&str> = works.iter().map(|w| w.doi.as_str()).collect();
        assert_eq!(dois, vec!["10.1/a", "10.1/b"]);
    }

    #[test]
    fn test_query_without_items() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/works")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status": "ok", "message": {"total-results": 0}}"#)
            .create();

        assert!(client_for(&server).query("zzz").unwrap().is_empty());
        assert!(client_for(&server).query("  ").is_err());
    }

    #[test]
    fn test_client_builds_without_mailto() {
        assert!(CrossrefClient::new("").is_ok());
        assert!(CrossrefClient::new("me@example.com").is_ok());
    }
}
