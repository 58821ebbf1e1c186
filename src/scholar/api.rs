//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all scholar operations, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (`name=value` arguments, DOI lookups)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and no formatting; that is the CLI's job.
//!
//! ## Generic Over Library
//!
//! `ScholarApi<S: Library>` is generic over the storage backend:
//! - Production: `ScholarApi<FileStore>`
//! - Testing: `ScholarApi<InMemoryStore>`
//!
//! The catalog and config are owned values handed in at construction, so tests
//! can run the whole API against a hand-made catalog.

use crate::catalog::TypeCatalog;
use crate::commands;
use crate::config::ScholarConfig;
use crate::doi::CrossrefClient;
use crate::error::Result;
use crate::store::Library;
use std::path::{Path, PathBuf};

/// Options of `scholar add`, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub entry_type: Option<String>,
    pub doi: Option<String>,
    /// Search words, joined into one Crossref query
    pub query: Vec<String>,
    /// Raw `name=value` arguments
    pub fields: Vec<String>,
    pub attach: Option<PathBuf>,
}

/// The main API facade for scholar operations.
pub struct ScholarApi<S: Library> {
    store: S,
    catalog: TypeCatalog,
    config: ScholarConfig,
    paths: commands::ScholarPaths,
}

impl<S: Library> ScholarApi<S> {
    pub fn new(
        store: S,
        catalog: TypeCatalog,
        config: ScholarConfig,
        paths: commands::ScholarPaths,
    ) -> Self {
        Self {
            store,
            catalog,
            config,
            paths,
        }
    }

    pub fn add_entry(&mut self, options: AddOptions) -> Result<commands::CmdResult> {
        let fields = options
            .fields
            .iter()
            .map(|arg| commands::add::parse_field_arg(arg))
            .collect::<Result<Vec<_>>>()?;

        let query = options.query.join(" ");
        let request = commands::add::AddRequest {
            entry_type: options.entry_type,
            doi: options.doi,
            query: (!query.trim().is_empty()).then_some(query),
            fields,
            attach: options.attach,
        };
        let crossref = CrossrefClient::new(&self.config.mailto)?;
        commands::add::run(
            &mut self.store,
            &self.catalog,
            &crossref,
            request,
            &self.config.fallback_type,
        )
    }

    pub fn import_bibtex(&mut self, text: &str, strict: bool) -> Result<commands::CmdResult> {
        commands::import::run(
            &mut self.store,
            &self.catalog,
            text,
            &self.config.fallback_type,
            strict,
        )
    }

    pub fn export_entries<I: AsRef<str>>(
        &self,
        keys: &[I],
        output: Option<&Path>,
    ) -> Result<commands::CmdResult> {
        let keys = normalize_keys(keys);
        commands::export::run(&self.store, &keys, output)
    }

    pub fn list_entries(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn show_entry(&self, key: &str) -> Result<commands::CmdResult> {
        commands::show::run(&self.store, key.trim())
    }

    pub fn remove_entries<I: AsRef<str>>(&mut self, keys: &[I]) -> Result<commands::CmdResult> {
        let keys = normalize_keys(keys);
        commands::remove::run(&mut self.store, &keys)
    }

    pub fn attach_file(&mut self, key: &str, source: &Path) -> Result<commands::CmdResult> {
        commands::attach::run(&mut self.store, key.trim(), source)
    }

    /// YAML text to hand to an editor for [`ScholarApi::update_entry`].
    pub fn edit_buffer(&self, key: &str) -> Result<String> {
        commands::edit::buffer(&self.store, key.trim())
    }

    pub fn update_entry(&mut self, key: &str, edited: &str) -> Result<commands::CmdResult> {
        commands::edit::run(&mut self.store, &self.catalog, key.trim(), edited)
    }

    pub fn attachment_path(&self, key: &str) -> Result<commands::CmdResult> {
        commands::paths::attachment(&self.store, key.trim())
    }

    pub fn entry_dir(&self, key: &str) -> Result<commands::CmdResult> {
        commands::paths::entry_dir(&self.store, key.trim())
    }

    pub fn types(&self) -> Result<commands::CmdResult> {
        commands::types::run(&self.catalog)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self, library: Option<&str>) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths, library)
    }

    pub fn library_root(&self) -> &Path {
        self.store.root()
    }

    pub fn paths(&self) -> &commands::ScholarPaths {
        &self.paths
    }
}

fn normalize_keys<I: AsRef<str>>(keys: &[I]) -> Vec<String> {
    keys.iter()
        .map(|k| k.as_ref().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

pub use crate::commands::add::AddRequest;
pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, ScholarPaths};
