//! EndNote → Zotero export pipeline
//!
//! Reads the library database, converts every live reference and writes the
//! XML file in one pass. A reference that cannot be converted is logged and
//! skipped; it never aborts the export.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ExportOptions;
use crate::error::Result;
use crate::library::EndnoteLibrary;
use crate::zotero::{split_authors, ConversionContext, ZoteroRecord, ZoteroXmlWriter};

/// Number of sample references shown by a preview
const PREVIEW_SAMPLE_SIZE: usize = 10;

/// Outcome of an export run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    /// References read from the library (including skipped ones)
    pub total: usize,
    /// Records written to the XML file
    pub exported: usize,
    /// References that could not be converted
    pub skipped: usize,
    /// Attachments linked with absolute paths
    pub attachments_linked: usize,
    /// Attachments listed in the library but missing on disk
    pub attachments_missing: usize,
    pub output_path: PathBuf,
}

/// Preview metadata for an export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPreview {
    pub library_name: String,
    pub reference_count: usize,
    pub attachment_count: usize,
    pub include_trashed: bool,
    /// First references, in database order
    pub references: Vec<ReferencePreview>,
    pub suggested_output: PathBuf,
    pub warnings: Vec<String>,
}

/// Preview info for a single reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePreview {
    pub id: Option<i64>,
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<String>,
    pub attachments: usize,
}

/// Export the library behind `enl_path` to Zotero XML.
///
/// Without `output` the file lands next to the library as
/// `<name>_zotero_export.xml`.
pub fn export_references_to_xml(
    enl_path: &Path,
    output: Option<&Path>,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let library = EndnoteLibrary::open(enl_path, options.include_trashed)?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| library.paths.default_output_path());

    let ctx = ConversionContext {
        attachments_dir: library.paths.attachments_dir(&options.attachments_folder),
        timezone: options.timezone,
    };

    let mut records = Vec::with_capacity(library.references.len());
    let mut skipped = 0;
    for reference in &library.references {
        let attachments = reference
            .id
            .map(|id| library.attachments_for(id))
            .unwrap_or_default();

        match ZoteroRecord::from_reference(reference, attachments, &ctx) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Error processing {}, skipping: {}", reference.label(), e);
                skipped += 1;
            }
        }
    }

    ZoteroXmlWriter::new(options.indent).write_to_file(&records, &output_path)?;

    let summary = ExportSummary {
        total: library.references.len(),
        exported: records.len(),
        skipped,
        attachments_linked: records.iter().map(|r| r.pdf_urls.len()).sum(),
        attachments_missing: records.iter().map(|r| r.missing_attachments).sum(),
        output_path,
    };

    log::info!(
        "Exported {} of {} references from '{}' ({} skipped)",
        summary.exported,
        summary.total,
        library.paths.name,
        summary.skipped
    );

    Ok(summary)
}

/// Inspect a library without writing anything
pub fn preview_library(enl_path: &Path, options: &ExportOptions) -> Result<LibraryPreview> {
    let library = EndnoteLibrary::open(enl_path, options.include_trashed)?;
    let mut warnings = Vec::new();

    if library.references.is_empty() {
        warnings.push("No references found in library".to_string());
    }

    let without_id = library.references.iter().filter(|r| r.id.is_none()).count();
    if without_id > 0 {
        warnings.push(format!("{} references have no ID and will be skipped", without_id));
    }

    let attachments_dir = library.paths.attachments_dir(&options.attachments_folder);
    if library.attachment_count() > 0 && !attachments_dir.is_dir() {
        warnings.push(format!(
            "Attachment folder {:?} does not exist; PDF links will be dropped",
            attachments_dir
        ));
    }

    let references = library
        .references
        .iter()
        .take(PREVIEW_SAMPLE_SIZE)
        .map(|r| ReferencePreview {
            id: r.id,
            title: r
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            authors: r.author.as_deref().map(split_authors).unwrap_or_default(),
            year: r.year.clone(),
            attachments: r.id.map(|id| library.attachments_for(id).len()).unwrap_or(0),
        })
        .collect();

    Ok(LibraryPreview {
        library_name: library.paths.name.clone(),
        reference_count: library.references.len(),
        attachment_count: library.attachment_count(),
        include_trashed: options.include_trashed,
        references,
        suggested_output: library.paths.default_output_path(),
        warnings,
    })
}
