//! Convert EndNote libraries into XML that Zotero can import.

pub mod config;
pub mod error;
pub mod export;
pub mod library;
pub mod zotero;

pub use config::{ExportOptions, TimestampZone};
pub use error::{ExportError, Result};
pub use export::{export_references_to_xml, preview_library, ExportSummary, LibraryPreview};
