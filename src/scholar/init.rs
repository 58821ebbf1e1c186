use crate::api::{ScholarApi, ScholarPaths};
use crate::catalog::TypeCatalog;
use crate::config::ScholarConfig;
use crate::error::{Result, ScholarError};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;

/// Overrides both the config and the data directory.
pub const HOME_ENV: &str = "SCHOLAR_HOME";

pub struct ScholarContext {
    pub api: ScholarApi<FileStore>,
    pub config: ScholarConfig,
}

/// Config and data directories: `$SCHOLAR_HOME` when set, the platform's
/// project directories otherwise.
pub fn default_paths() -> Result<ScholarPaths> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        let home = PathBuf::from(home);
        return Ok(ScholarPaths {
            config_dir: home.clone(),
            data_dir: home,
        });
    }

    let proj_dirs = ProjectDirs::from("org", "scholar", "scholar")
        .ok_or_else(|| ScholarError::Store("Could not determine config dir".to_string()))?;
    Ok(ScholarPaths {
        config_dir: proj_dirs.config_dir().to_path_buf(),
        data_dir: proj_dirs.data_dir().to_path_buf(),
    })
}

/// Loads config and catalog and opens the selected library.
pub fn initialize(paths: ScholarPaths, library: Option<&str>) -> Result<ScholarContext> {
    let config = ScholarConfig::load(&paths.config_dir)?;

    let catalog = match &config.types_file {
        Some(path) => TypeCatalog::from_path(path)?,
        None => TypeCatalog::builtin()?,
    };

    let root = config.library_path(library, &paths.data_dir)?;
    tracing::debug!(library = %root.display(), types = catalog.len(), "initialized context");

    let store = FileStore::new(root);
    let api = ScholarApi::new(store, catalog, config.clone(), paths);
    Ok(ScholarContext { api, config })
}
