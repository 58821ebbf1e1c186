use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScholarError {
    #[error("Could not load entry types: {0}")]
    SchemaLoad(String),

    #[error("Entry type defined more than once: {0}")]
    DuplicateType(String),

    #[error("Entry type not found: {0}")]
    TypeNotFound(String),

    #[error("Entry '{key}' is missing required fields: {}", missing.join(", "))]
    Validation { key: String, missing: Vec<String> },

    #[error("Parse error at {position}: {reason}")]
    Parse { position: String, reason: String },

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("DOI lookup failed: {0}")]
    Doi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ScholarError>;
