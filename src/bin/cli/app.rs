use std::path::Path;

use anyhow::{Context, Result, bail};

use endnote_exporter_lib::{
    export_references_to_xml, preview_library, ExportOptions, ExportSummary, LibraryPreview,
    TimestampZone,
};

/// Command-line flags that override the config file
#[derive(Debug, Default)]
pub struct OptionOverrides {
    pub utc: bool,
    pub include_trashed: bool,
    pub indent: Option<usize>,
}

/// Shared application state for CLI commands
pub struct App {
    pub options: ExportOptions,
}

impl App {
    /// Load options from the config file, then apply command-line overrides
    pub fn new(config_path: Option<&Path>, overrides: &OptionOverrides) -> Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .or_else(ExportOptions::default_config_path);

        let mut options = match &config_path {
            Some(path) => ExportOptions::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ExportOptions::default(),
        };

        if overrides.utc {
            options.timezone = TimestampZone::Utc;
        }
        if overrides.include_trashed {
            options.include_trashed = true;
        }
        if let Some(indent) = overrides.indent {
            options.indent = indent;
        }

        Ok(Self { options })
    }

    /// Export a library, validating the input path first
    pub fn export(&self, library: &Path, output: Option<&Path>) -> Result<ExportSummary> {
        check_library_path(library)?;
        export_references_to_xml(library, output, &self.options)
            .with_context(|| format!("Failed to export {}", library.display()))
    }

    /// Preview a library
    pub fn preview(&self, library: &Path) -> Result<LibraryPreview> {
        check_library_path(library)?;
        preview_library(library, &self.options)
            .with_context(|| format!("Failed to read {}", library.display()))
    }
}

fn check_library_path(library: &Path) -> Result<()> {
    if !library.exists() {
        bail!("Library file '{}' not found", library.display());
    }
    if library.extension().and_then(|e| e.to_str()) != Some("enl") {
        log::warn!(
            "{} does not have an .enl extension; looking for its .Data folder anyway",
            library.display()
        );
    }
    Ok(())
}
