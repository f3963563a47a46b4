//! Conversion of EndNote references into Zotero import records

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::config::TimestampZone;
use crate::error::{ExportError, Result};
use crate::library::Reference;

/// Zotero reads the type from the `name` attribute
pub const DEFAULT_REF_TYPE_NAME: &str = "Journal Article";

const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// Settings shared by every record of one export
#[derive(Debug, Clone)]
pub struct ConversionContext {
    /// Folder the `file_res` paths are relative to
    pub attachments_dir: PathBuf,
    pub timezone: TimestampZone,
}

/// A reference in the shape of a Zotero `<record>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoteroRecord {
    pub rec_number: i64,
    pub ref_type: i64,
    pub ref_type_name: String,

    pub year: Option<String>,
    pub pub_date: Option<String>,

    pub title: Option<String>,
    pub secondary_title: Option<String>,
    pub alt_title: Option<String>,
    pub short_title: Option<String>,
    pub tertiary_title: Option<String>,

    pub authors: Vec<String>,

    pub pages: Option<String>,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub abstract_text: Option<String>,
    pub isbn: Option<String>,

    pub keywords: Vec<String>,
    pub publisher: Option<String>,
    pub pub_location: Option<String>,
    pub edition: Option<String>,
    pub electronic_resource_num: Option<String>,
    pub language: Option<String>,

    pub web_urls: Vec<String>,
    /// Absolute paths of attachments that exist on disk
    pub pdf_urls: Vec<PathBuf>,
    /// Attachments listed in the library but missing from disk
    pub missing_attachments: usize,

    /// Original notes followed by the `Created:`/`Modified:` block
    pub notes: String,
}

impl ZoteroRecord {
    /// Convert one reference; `attachments` are its raw `file_res` paths
    pub fn from_reference(
        reference: &Reference,
        attachments: &[String],
        ctx: &ConversionContext,
    ) -> Result<Self> {
        let rec_number = reference.id.ok_or_else(|| {
            ExportError::InvalidRecord("reference has no id column value".to_string())
        })?;

        let added = reference
            .added_to_library
            .and_then(|ts| format_timestamp(ts, ctx.timezone));
        let modified = reference
            .record_last_updated
            .and_then(|ts| format_timestamp(ts, ctx.timezone));

        let (pdf_urls, missing_attachments) =
            resolve_attachments(rec_number, attachments, &ctx.attachments_dir);

        Ok(Self {
            rec_number,
            ref_type: reference.reference_type,
            ref_type_name: DEFAULT_REF_TYPE_NAME.to_string(),
            year: reference.year.clone(),
            pub_date: non_blank(&reference.date),
            title: reference.title.clone(),
            secondary_title: reference.secondary_title.clone(),
            alt_title: non_blank(&reference.alternate_title),
            short_title: non_blank(&reference.short_title),
            tertiary_title: non_blank(&reference.tertiary_title),
            authors: reference.author.as_deref().map(split_authors).unwrap_or_default(),
            pages: reference.pages.clone(),
            volume: reference.volume.clone(),
            number: reference.number.clone(),
            abstract_text: reference.abstract_text.clone(),
            isbn: reference.isbn.clone(),
            keywords: reference.keywords.as_deref().map(split_keywords).unwrap_or_default(),
            publisher: non_blank(&reference.publisher),
            pub_location: non_blank(&reference.place_published),
            edition: non_blank(&reference.edition),
            electronic_resource_num: non_blank(&reference.electronic_resource_number),
            language: non_blank(&reference.language),
            web_urls: reference.url.as_deref().map(split_urls).unwrap_or_default(),
            pdf_urls,
            missing_attachments,
            notes: build_notes(reference.notes.as_deref(), added.as_deref(), modified.as_deref()),
        })
    }

    /// Whether the record needs a `<urls>` element
    pub fn has_urls(&self) -> bool {
        !self.web_urls.is_empty() || !self.pdf_urls.is_empty()
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Render a Unix timestamp as `YYYY-MM-DDTHH:MM:SS`; 0 means "not recorded"
pub fn format_timestamp(ts: i64, zone: TimestampZone) -> Option<String> {
    if ts == 0 {
        return None;
    }

    match zone {
        TimestampZone::Utc => {
            DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.format(ISO_SECONDS).to_string())
        }
        TimestampZone::Local => Local
            .timestamp_opt(ts, 0)
            .earliest()
            .map(|dt| dt.format(ISO_SECONDS).to_string()),
    }
}

/// Fold the added/modified dates into the notes text
pub fn build_notes(original: Option<&str>, added: Option<&str>, modified: Option<&str>) -> String {
    let mut date_lines = Vec::new();
    if let Some(added) = added {
        date_lines.push(format!("Created: {}", added));
    }
    if let Some(modified) = modified {
        date_lines.push(format!("Modified: {}", modified));
    }
    let dates = date_lines.join("\n");

    let original = original.map(str::trim).unwrap_or_default();
    match (original.is_empty(), dates.is_empty()) {
        (true, _) => dates,
        (false, true) => original.to_string(),
        (false, false) => format!("{}\n\n{}", original, dates),
    }
}

/// One author per line; EndNote separates values with `\r`
pub fn split_authors(text: &str) -> Vec<String> {
    text.trim()
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_keywords(text: &str) -> Vec<String> {
    split_authors(text)
}

/// Web links are separated by any whitespace
pub fn split_urls(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Join attachment paths onto the attachments folder and keep the existing files.
///
/// Returns the canonical absolute paths and the number of missing files.
pub fn resolve_attachments(
    rec_number: i64,
    attachments: &[String],
    attachments_dir: &Path,
) -> (Vec<PathBuf>, usize) {
    let mut found = Vec::new();
    let mut missing = 0;

    for relative in attachments {
        let candidate = attachments_dir.join(relative.trim());
        match candidate.canonicalize() {
            Ok(absolute) if absolute.is_file() => found.push(absolute),
            _ => {
                log::warn!(
                    "Attachment for record ID {} not found: {:?}",
                    rec_number,
                    candidate
                );
                missing += 1;
            }
        }
    }

    (found, missing)
}
