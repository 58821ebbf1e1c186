use crate::catalog::EntryType;
use crate::config::ScholarConfig;
use crate::model::Entry;
use std::path::PathBuf;

pub mod add;
pub mod attach;
pub mod config;
pub mod edit;
pub mod export;
pub mod helpers;
pub mod import;
pub mod init;
pub mod list;
pub mod paths;
pub mod remove;
pub mod show;
pub mod types;

/// Where scholar keeps its config and, unless configured otherwise, its libraries.
#[derive(Debug, Clone)]
pub struct ScholarPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_entries: Vec<Entry>,
    pub listed_entries: Vec<Entry>,
    pub entry_paths: Vec<PathBuf>,
    pub types: Vec<EntryType>,
    /// Bibtex text to print, when the command produced some
    pub rendered: Option<String>,
    pub config: Option<ScholarConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_entries(mut self, entries: Vec<Entry>) -> Self {
        self.affected_entries = entries;
        self
    }

    pub fn with_listed_entries(mut self, entries: Vec<Entry>) -> Self {
        self.listed_entries = entries;
        self
    }

    pub fn with_entry_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.entry_paths = paths;
        self
    }

    pub fn with_types(mut self, types: Vec<EntryType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_rendered(mut self, text: String) -> Self {
        self.rendered = Some(text);
        self
    }

    pub fn with_config(mut self, config: ScholarConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
