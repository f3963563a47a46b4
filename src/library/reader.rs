//! Read-only access to an EndNote library database

use std::collections::HashMap;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::models::{LibraryPaths, Reference};
use crate::error::{ExportError, Result};

/// A loaded EndNote library: live references plus their attachment paths
#[derive(Debug, Clone)]
pub struct EndnoteLibrary {
    pub paths: LibraryPaths,
    pub references: Vec<Reference>,
    /// Reference id -> attachment paths relative to the attachments folder
    pub attachments: HashMap<i64, Vec<String>>,
}

/// Owned copy of a single SQLite cell
#[derive(Debug, Clone, PartialEq)]
enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ColumnValue {
    fn from_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => ColumnValue::Null,
            ValueRef::Integer(i) => ColumnValue::Integer(i),
            ValueRef::Real(f) => ColumnValue::Real(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                ColumnValue::Text(String::from_utf8_lossy(bytes).to_string())
            }
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Integer(i) => Some(*i),
            ColumnValue::Real(f) if f.is_finite() => Some(*f as i64),
            ColumnValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            ColumnValue::Null => None,
            ColumnValue::Integer(i) => Some(i.to_string()),
            ColumnValue::Real(f) => Some(f.to_string()),
            ColumnValue::Text(s) => Some(s.clone()),
        }
    }
}

type Row = HashMap<String, ColumnValue>;

fn int_column(row: &Row, name: &str) -> Option<i64> {
    row.get(name).and_then(ColumnValue::as_i64)
}

fn text_column(row: &Row, name: &str) -> Option<String> {
    row.get(name).and_then(ColumnValue::as_text)
}

fn reference_from_row(row: &Row) -> Reference {
    Reference {
        id: int_column(row, "id"),
        reference_type: int_column(row, "reference_type").unwrap_or(0),
        added_to_library: int_column(row, "added_to_library"),
        record_last_updated: int_column(row, "record_last_updated"),
        year: text_column(row, "year"),
        date: text_column(row, "date"),
        title: text_column(row, "title"),
        secondary_title: text_column(row, "secondary_title"),
        tertiary_title: text_column(row, "tertiary_title"),
        alternate_title: text_column(row, "alternate_title"),
        short_title: text_column(row, "short_title"),
        author: text_column(row, "author"),
        pages: text_column(row, "pages"),
        volume: text_column(row, "volume"),
        number: text_column(row, "number"),
        abstract_text: text_column(row, "abstract"),
        isbn: text_column(row, "isbn"),
        url: text_column(row, "url"),
        notes: text_column(row, "notes"),
        keywords: text_column(row, "keywords"),
        publisher: text_column(row, "publisher"),
        place_published: text_column(row, "place_published"),
        edition: text_column(row, "edition"),
        electronic_resource_number: text_column(row, "electronic_resource_number"),
        language: text_column(row, "language"),
    }
}

/// Run a query and return every row keyed by column name
fn fetch_rows(conn: &Connection, sql: &str) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let rows = stmt
        .query_map([], |row| {
            let mut values = Row::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                values.insert(name.clone(), ColumnValue::from_ref(row.get_ref(i)?));
            }
            Ok(values)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

impl EndnoteLibrary {
    /// Open the library belonging to `enl_path` and load its references
    pub fn open(enl_path: &Path, include_trashed: bool) -> Result<Self> {
        let paths = LibraryPaths::from_enl(enl_path)?;

        if !paths.database_path.exists() {
            return Err(ExportError::DatabaseNotFound(paths.database_path));
        }

        let conn = Connection::open_with_flags(&paths.database_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        let refs_query = if include_trashed {
            "SELECT * FROM refs"
        } else {
            "SELECT * FROM refs WHERE trash_state = 0"
        };
        let references: Vec<Reference> = fetch_rows(&conn, refs_query)?
            .iter()
            .map(reference_from_row)
            .collect();

        let mut attachments: HashMap<i64, Vec<String>> = HashMap::new();
        let mut stmt = conn.prepare("SELECT refs_id, file_path FROM file_res")?;
        let files = stmt
            .query_map([], |row| {
                Ok((
                    ColumnValue::from_ref(row.get_ref(0)?),
                    ColumnValue::from_ref(row.get_ref(1)?),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for (ref_id, file_path) in files {
            match (ref_id.as_i64(), file_path.as_text()) {
                (Some(id), Some(path)) if !path.trim().is_empty() => {
                    attachments.entry(id).or_default().push(path);
                }
                _ => log::warn!("Ignoring malformed file_res row: {:?}, {:?}", ref_id, file_path),
            }
        }

        log::info!(
            "Loaded {} references and {} attachment entries from {:?}",
            references.len(),
            attachments.values().map(Vec::len).sum::<usize>(),
            paths.database_path
        );

        Ok(Self {
            paths,
            references,
            attachments,
        })
    }

    /// Attachment paths recorded for a reference, in database order
    pub fn attachments_for(&self, id: i64) -> &[String] {
        self.attachments.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.values().map(Vec::len).sum()
    }
}
