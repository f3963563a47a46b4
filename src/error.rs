use std::path::PathBuf;

/// Error type for library reading, conversion and XML output
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Database file not found at '{}'. Make sure the .Data folder exists.", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error("Invalid library path: {0}")]
    InvalidLibraryPath(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Failed to write XML to '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
