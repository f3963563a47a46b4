//! Export options
//!
//! Options come from built-in defaults, an optional `config.toml` in the user
//! config directory, and finally command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

/// Time zone used when rendering added/modified timestamps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    /// The machine's local time zone
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExportOptions {
    /// Zone for the `Created:`/`Modified:` note lines
    pub timezone: TimestampZone,
    /// Also export references sitting in the EndNote trash
    pub include_trashed: bool,
    /// Spaces per indentation level in the output XML
    pub indent: usize,
    /// Attachment folder inside `<name>.Data`
    pub attachments_folder: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timezone: TimestampZone::Local,
            include_trashed: false,
            indent: 2,
            attachments_folder: "PDF".to_string(),
        }
    }
}

impl ExportOptions {
    /// Default location of the config file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("endnote-exporter").join("config.toml"))
    }

    /// Load options from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let options = Self::from_toml(&content)?;
        log::info!("Loaded export options from {:?}", path);
        Ok(options)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let options: ExportOptions = toml::from_str(content)?;
        if options.attachments_folder.trim().is_empty() {
            return Err(ExportError::Config(
                "attachments_folder must not be empty".to_string(),
            ));
        }
        Ok(options)
    }
}
