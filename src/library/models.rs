//! EndNote library data models
//!
//! An EndNote library is a `<name>.enl` file next to a `<name>.Data` folder.
//! The references themselves live in the SQLite database `sdb/sdb.eni`.

use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};

/// Resolved on-disk layout of an EndNote library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPaths {
    /// The `.enl` file the user picked
    pub enl_path: PathBuf,

    /// Folder holding the `.enl` file and its `.Data` folder
    pub base_dir: PathBuf,

    /// Library name (the `.enl` file stem)
    pub name: String,

    /// `<base_dir>/<name>.Data`
    pub data_dir: PathBuf,

    /// `<data_dir>/sdb/sdb.eni`
    pub database_path: PathBuf,
}

impl LibraryPaths {
    /// Derive the library layout from the path of an `.enl` file
    pub fn from_enl(enl_path: &Path) -> Result<Self> {
        let name = enl_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ExportError::InvalidLibraryPath(format!(
                    "'{}' has no file name",
                    enl_path.display()
                ))
            })?;

        let base_dir = enl_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let data_dir = base_dir.join(format!("{}.Data", name));
        let database_path = data_dir.join("sdb").join("sdb.eni");

        Ok(Self {
            enl_path: enl_path.to_path_buf(),
            base_dir,
            name,
            data_dir,
            database_path,
        })
    }

    /// `<base_dir>/<name>_zotero_export.xml`
    pub fn default_output_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}_zotero_export.xml", self.name))
    }

    /// Folder that attachment paths in `file_res` are relative to
    pub fn attachments_dir(&self, folder: &str) -> PathBuf {
        self.data_dir.join(folder)
    }
}

/// One live row of the `refs` table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reference {
    pub id: Option<i64>,
    pub reference_type: i64,

    /// Unix seconds; 0 or missing means unknown
    pub added_to_library: Option<i64>,
    pub record_last_updated: Option<i64>,

    pub year: Option<String>,
    pub date: Option<String>,

    pub title: Option<String>,
    pub secondary_title: Option<String>,
    pub tertiary_title: Option<String>,
    pub alternate_title: Option<String>,
    pub short_title: Option<String>,

    /// Author names, one per `\r` or `\n` separated line
    pub author: Option<String>,

    pub pages: Option<String>,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub abstract_text: Option<String>,
    pub isbn: Option<String>,

    /// Whitespace-separated web links
    pub url: Option<String>,
    pub notes: Option<String>,

    /// Keywords, one per `\r` or `\n` separated line
    pub keywords: Option<String>,
    pub publisher: Option<String>,
    pub place_published: Option<String>,
    pub edition: Option<String>,
    pub electronic_resource_number: Option<String>,
    pub language: Option<String>,
}

impl Reference {
    /// Label used in log messages
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("record ID {}", id),
            None => "record without ID".to_string(),
        }
    }
}
