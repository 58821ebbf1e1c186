use crate::error::{Result, ScholarError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LIBRARY: &str = "default";
const DEFAULT_FALLBACK_TYPE: &str = "misc";

/// Configuration for scholar, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScholarConfig {
    /// Library used when `--library` is not given
    #[serde(default = "default_library")]
    pub default_library: String,

    /// Named libraries (name -> directory)
    #[serde(default)]
    pub libraries: BTreeMap<String, PathBuf>,

    /// Contact address sent to Crossref with DOI lookups
    #[serde(default)]
    pub mailto: String,

    /// Entry type used when an imported or fetched type is unknown
    #[serde(default = "default_fallback_type")]
    pub fallback_type: String,

    /// Replaces the built-in entry type catalog when set
    #[serde(default)]
    pub types_file: Option<PathBuf>,
}

fn default_library() -> String {
    DEFAULT_LIBRARY.to_string()
}

fn default_fallback_type() -> String {
    DEFAULT_FALLBACK_TYPE.to_string()
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            default_library: default_library(),
            libraries: BTreeMap::new(),
            mailto: String::new(),
            fallback_type: default_fallback_type(),
            types_file: None,
        }
    }
}

impl ScholarConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ScholarConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Directory of a library. `None` selects the default library; an
    /// unconfigured default lives under `data_dir`.
    pub fn library_path(&self, name: Option<&str>, data_dir: &Path) -> Result<PathBuf> {
        let name = name.unwrap_or(&self.default_library);
        match self.libraries.get(name) {
            Some(path) => Ok(path.clone()),
            None if name == self.default_library => Ok(data_dir.join(name)),
            None => Err(ScholarError::Store(format!("Unknown library: {}", name))),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-library" => Some(self.default_library.clone()),
            "mailto" => Some(self.mailto.clone()),
            "fallback-type" => Some(self.fallback_type.clone()),
            "types-file" => Some(
                self.types_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => key
                .strip_prefix("library.")
                .and_then(|name| self.libraries.get(name))
                .map(|p| p.display().to_string()),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "default-library" => self.default_library = value.to_string(),
            "mailto" => self.mailto = value.to_string(),
            "fallback-type" => {
                if value.trim().is_empty() {
                    return Err("fallback-type cannot be empty".to_string());
                }
                self.fallback_type = value.to_string();
            }
            "types-file" => {
                self.types_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => match key.strip_prefix("library.") {
                Some(name) if !name.is_empty() => {
                    if value.is_empty() {
                        self.libraries.remove(name);
                    } else {
                        self.libraries
                            .insert(name.to_string(), PathBuf::from(value));
                    }
                }
                _ => return Err(format!("Unknown config key: {}", key)),
            },
        }
        Ok(())
    }

    /// Every key with its current value, for display.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = ["default-library", "mailto", "fallback-type", "types-file"]
            .iter()
            .map(|k| (k.to_string(), self.get(k).unwrap_or_default()))
            .collect();
        for (name, path) in &self.libraries {
            out.push((format!("library.{}", name), path.display().to_string()));
        }
        out
    }
}
