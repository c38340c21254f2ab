//! Settings file loading for the CLI
//!
//! This module finds and loads the TOML settings file from an explicit path,
//! the working directory, or the platform configuration directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use ligature_guard::CursorMode;

/// Settings-related errors for CLI
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse TOML settings: {0}")]
    Parse(String),

    #[error("Missing settings file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// CLI settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Caret behavior when `--caret` is given without `--cursor-mode`.
    pub cursor_mode: CursorMode,
    pub debug: bool,
    /// Inline JSON5 ligature configuration.
    pub ligatures: Option<String>,
    /// Path to a JSON5 ligature configuration; wins over `ligatures`.
    pub ligatures_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cursor_mode: CursorMode::Cursor,
            debug: false,
            ligatures: None,
            ligatures_file: None,
        }
    }
}

/// Find and load settings from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local directory (ligature-guard/config.toml)
/// 3. Platform-specific config directory
/// 4. Default settings if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Settings file exists but cannot be parsed
pub fn load_settings(explicit_path: Option<impl AsRef<Path>>) -> Result<Settings, SettingsError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading settings from explicit path");
        return load_settings_file(path);
    }

    let local_settings = Path::new("ligature-guard/config.toml");
    if local_settings.exists() {
        info!(path = local_settings.display().to_string(); "Loading settings from local path");
        return load_settings_file(local_settings);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "ligature-guard", "ligature-guard") {
        let system_settings = proj_dirs.config_dir().join("config.toml");

        if system_settings.exists() {
            info!(path = system_settings.display().to_string(); "Loading settings from system path");
            return load_settings_file(system_settings);
        }

        debug!(path = system_settings.display().to_string(); "System settings file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No settings file found, using default settings");
    Ok(Settings::default())
}

fn load_settings_file(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SettingsError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&content)
}

fn parse_settings(content: &str) -> Result<Settings, SettingsError> {
    toml::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))
}
