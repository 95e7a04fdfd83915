//! Settings file for the review CLI.
//!
//! Settings live in the platform-specific config folder unless `--config`
//! names a file:
//! - macOS: ~/Library/Application Support/com.stmt-review.Statement Review/
//! - Windows: %APPDATA%/stmt-review/config/
//! - Linux: ~/.config/stmt-review/
//!
//! ```toml
//! output = "table"
//!
//! [review]
//! auto_approve_threshold = 0.9
//!
//! [review.confidence_thresholds]
//! high = 0.9
//! medium = 0.7
//! low = 0.5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use stmt_map::ReviewConfig;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "stmt-review";
const APP_NAME: &str = "Statement Review";
const CONFIG_FILENAME: &str = "settings.toml";

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// User settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output format when `--format` is not given.
    pub output: OutputFormat,
    /// Auto-approval policy and confidence bands.
    pub review: ReviewConfig,
}

/// Get the path to the default settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings.
///
/// An explicit path must exist and parse. The default location falls back
/// to built-in defaults when the file is missing or unreadable.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return read_settings(path);
    }

    let Some(path) = settings_path() else {
        tracing::warn!("Could not determine settings path, using defaults");
        return Ok(Settings::default());
    };

    match fs::read_to_string(&path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file: {e:#}, using defaults");
                Ok(Settings::default())
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file found at {:?}, using defaults", path);
            Ok(Settings::default())
        }
        Err(e) => {
            tracing::warn!("Failed to read settings file: {e}, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Read and validate a settings file.
pub fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let settings =
        parse_settings(&content).with_context(|| format!("settings file {}", path.display()))?;
    tracing::info!("Loaded settings from {:?}", path);
    Ok(settings)
}

/// Write settings as TOML, creating the parent directory if needed.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }
    fs::write(path, render_settings(settings)?)
        .with_context(|| format!("write settings file {}", path.display()))?;
    Ok(())
}

/// Serialize settings to TOML.
pub fn render_settings(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("serialize settings")
}

fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).context("parse TOML")?;
    settings.review.validate()?;
    Ok(settings)
}
