use crate::error::{Result, ScholarError};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(ScholarError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in `editor` and waits for it to close.
/// Returns the contents of the file after editing.
fn open_with(editor: &str, path: &Path) -> Result<String> {
    // $EDITOR may carry arguments, e.g. "code --wait"
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vi");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| ScholarError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(ScholarError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    Ok(fs::read_to_string(path)?)
}

/// Edits `initial` in a temporary file and returns the result.
pub fn edit_text(initial: &str, file_extension: &str) -> Result<String> {
    edit_text_with(&get_editor()?, initial, file_extension)
}

/// [`edit_text`] with a given editor command instead of `$EDITOR`.
pub fn edit_text_with(editor: &str, initial: &str, file_extension: &str) -> Result<String> {
    let temp_file = env::temp_dir().join(format!("scholar-{}{}", Uuid::new_v4(), file_extension));
    fs::write(&temp_file, initial)?;

    let edited = open_with(editor, &temp_file);
    let _ = fs::remove_file(&temp_file);
    edited
}

/// Opens a file with the platform's default application.
/// - macOS: `open`
/// - Linux: `xdg-open`
/// - Windows: `cmd /C start`
pub fn open_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ScholarError::Api(format!(
            "File does not exist: {}",
            path.display()
        )));
    }

    let mut command = opener_command()?;
    tracing::debug!(file = %path.display(), "opening file");
    command
        .arg(path)
        .spawn()
        .map_err(|e| ScholarError::Api(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok(())
}

fn opener_command() -> Result<Command> {
    #[cfg(target_os = "macos")]
    {
        Ok(Command::new("open"))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(Command::new("xdg-open"))
    }

    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        Ok(command)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Err(ScholarError::Api(
            "Opening files is not supported on this platform".to_string(),
        ))
    }
}
