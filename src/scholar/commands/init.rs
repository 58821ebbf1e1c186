use crate::commands::{CmdMessage, CmdResult, ScholarPaths};
use crate::config::ScholarConfig;
use crate::error::Result;
use std::fs;

/// Creates the library directory and, on first use, the config file.
pub fn run(paths: &ScholarPaths, library: Option<&str>) -> Result<CmdResult> {
    let config = ScholarConfig::load(&paths.config_dir)?;
    let dir = config.library_path(library, &paths.data_dir)?;
    fs::create_dir_all(&dir)?;

    let mut result = CmdResult::default();
    if !paths.config_dir.join("config.json").exists() {
        config.save(&paths.config_dir)?;
        result.add_message(CmdMessage::info(format!(
            "Wrote default config to {}",
            paths.config_dir.display()
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Initialized scholar library at {}",
        dir.display()
    )));
    Ok(result.with_entry_paths(vec![dir]))
}
