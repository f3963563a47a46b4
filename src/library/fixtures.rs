//! Throwaway EndNote libraries for tests

use std::fs;
use std::path::PathBuf;

use rusqlite::{params, Connection};
use tempfile::TempDir;

/// Builder for one `refs` row
#[derive(Debug, Clone, Default)]
pub struct FixtureRef {
    pub id: i64,
    pub trash_state: i64,
    pub reference_type: i64,
    pub added: Option<i64>,
    pub updated: Option<i64>,
    pub year: Option<String>,
    pub title: Option<String>,
    pub secondary_title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub keywords: Option<String>,
}

impl FixtureRef {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn trashed(mut self) -> Self {
        self.trash_state = 1;
        self
    }

    pub fn reference_type(mut self, value: i64) -> Self {
        self.reference_type = value;
        self
    }

    pub fn added(mut self, ts: i64) -> Self {
        self.added = Some(ts);
        self
    }

    pub fn updated(mut self, ts: i64) -> Self {
        self.updated = Some(ts);
        self
    }

    pub fn year(mut self, value: &str) -> Self {
        self.year = Some(value.to_string());
        self
    }

    pub fn title(mut self, value: &str) -> Self {
        self.title = Some(value.to_string());
        self
    }

    pub fn secondary_title(mut self, value: &str) -> Self {
        self.secondary_title = Some(value.to_string());
        self
    }

    pub fn author(mut self, value: &str) -> Self {
        self.author = Some(value.to_string());
        self
    }

    pub fn url(mut self, value: &str) -> Self {
        self.url = Some(value.to_string());
        self
    }

    pub fn notes(mut self, value: &str) -> Self {
        self.notes = Some(value.to_string());
        self
    }

    pub fn keywords(mut self, value: &str) -> Self {
        self.keywords = Some(value.to_string());
        self
    }
}

/// `<tmp>/<name>.enl` with a `<name>.Data/sdb/sdb.eni` database and a `PDF` folder
pub struct FixtureLibrary {
    conn: Connection,
    pub enl_path: PathBuf,
    pub pdf_dir: PathBuf,
    pub dir: TempDir,
}

impl FixtureLibrary {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let enl_path = dir.path().join(format!("{}.enl", name));
        fs::write(&enl_path, b"").unwrap();

        let data_dir = dir.path().join(format!("{}.Data", name));
        let sdb_dir = data_dir.join("sdb");
        let pdf_dir = data_dir.join("PDF");
        fs::create_dir_all(&sdb_dir).unwrap();
        fs::create_dir_all(&pdf_dir).unwrap();

        let conn = Connection::open(sdb_dir.join("sdb.eni")).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE refs (
                id INTEGER PRIMARY KEY,
                trash_state INTEGER NOT NULL DEFAULT 0,
                reference_type INTEGER NOT NULL DEFAULT 0,
                added_to_library INTEGER,
                record_last_updated INTEGER,
                year TEXT,
                title TEXT,
                secondary_title TEXT,
                author TEXT,
                pages TEXT,
                volume TEXT,
                number TEXT,
                abstract TEXT,
                isbn TEXT,
                url TEXT,
                notes TEXT,
                keywords TEXT
            );
            CREATE TABLE file_res (
                refs_id INTEGER NOT NULL,
                file_path TEXT NOT NULL
            );
            "#,
        )
        .unwrap();

        Self {
            conn,
            enl_path,
            pdf_dir,
            dir,
        }
    }

    pub fn insert_ref(&self, r: &FixtureRef) {
        self.conn
            .execute(
                "INSERT INTO refs (id, trash_state, reference_type, added_to_library,
                    record_last_updated, year, title, secondary_title, author, url, notes, keywords)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    r.id,
                    r.trash_state,
                    r.reference_type,
                    r.added,
                    r.updated,
                    r.year,
                    r.title,
                    r.secondary_title,
                    r.author,
                    r.url,
                    r.notes,
                    r.keywords,
                ],
            )
            .unwrap();
    }

    /// Run raw SQL against the library database
    pub fn execute(&self, sql: &str) {
        self.conn.execute_batch(sql).unwrap();
    }

    /// Record an attachment row without creating the file
    pub fn insert_file(&self, refs_id: i64, file_path: &str) {
        self.conn
            .execute(
                "INSERT INTO file_res (refs_id, file_path) VALUES (?1, ?2)",
                params![refs_id, file_path],
            )
            .unwrap();
    }

    /// Record an attachment row and create the file under `PDF/`
    pub fn add_pdf(&self, refs_id: i64, file_path: &str) -> PathBuf {
        let full = self.pdf_dir.join(file_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, b"%PDF-1.4").unwrap();
        self.insert_file(refs_id, file_path);
        full
    }
}
