//! Storage layer for the medication log.
//!
//! Provides persistence for medication entries using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! This means a `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization. The HTTP backend wraps it in a
//! `Mutex`.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT exactly as submitted, normally ISO 8601 local
//! wall-clock time with minute precision (e.g., `2024-03-15T09:00`). For values
//! in that layout lexicographic ordering matches chronological ordering, which
//! is what `list_entries` relies on. Timestamps are not validated on write;
//! readers classify them and decide how to show unreadable ones.
//!
//! ## Sources
//!
//! medlog writes `manual`, `scanner` or `nfc` to the `source` column. The
//! column is nullable, and databases seeded by other tools may hold `''` or
//! other values. Such rows load with the stored value unchanged so that one
//! odd row never hides the rest of the history.

use std::path::Path;

use medlog_core::{HistoryGateway, MedicationEntry, NewEntry, SubmissionGateway};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A row as read from the `medications` table.
struct EntryRow {
    id: i64,
    medication: String,
    timestamp: String,
    source: Option<String>,
    notes: Option<String>,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            medication: row.get(1)?,
            timestamp: row.get(2)?,
            source: row.get(3)?,
            notes: row.get(4)?,
        })
    }

}

impl From<EntryRow> for MedicationEntry {
    fn from(row: EntryRow) -> Self {
        let entry = Self {
            id: row.id,
            medication: row.medication,
            timestamp: row.timestamp,
            source: row.source,
            notes: row.notes.unwrap_or_default(),
        };
        if entry.entry_source().is_none() {
            tracing::debug!(entry_id = entry.id, source = ?entry.source, "entry has an unrecognized source");
        }
        entry
    }
}

const SELECT_ENTRIES: &str = "SELECT id, medication, timestamp, source, notes FROM medications";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- timestamp: as submitted, normally 'YYYY-MM-DDTHH:MM' local time
            -- source: 'manual' | 'scanner' | 'nfc'
            CREATE TABLE IF NOT EXISTS medications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                medication TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                source TEXT,
                notes TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_medications_timestamp ON medications(timestamp);
            ",
        )?;
        Ok(())
    }

    /// Inserts one entry and returns its assigned ID.
    pub fn insert_entry(&mut self, entry: &NewEntry) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO medications (medication, timestamp, source, notes) VALUES (?, ?, ?, ?)",
            params![
                entry.medication.as_str(),
                entry.timestamp,
                entry.source.as_str(),
                entry.notes,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, medication = %entry.medication, "inserted entry");
        Ok(id)
    }

    /// Lists all entries, most recent timestamp first.
    ///
    /// Entries sharing a timestamp are ordered by descending ID.
    pub fn list_entries(&self) -> Result<Vec<MedicationEntry>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_ENTRIES} ORDER BY timestamp DESC, id DESC"))?;
        let rows = stmt.query_map([], EntryRow::from_row)?;
        let entries = rows
            .map(|row| row.map(MedicationEntry::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Returns the most recent entry, if any.
    pub fn latest_entry(&self) -> Result<Option<MedicationEntry>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_ENTRIES} ORDER BY timestamp DESC, id DESC LIMIT 1"),
                [],
                EntryRow::from_row,
            )
            .optional()?;
        Ok(row.map(MedicationEntry::from))
    }

    /// Counts stored entries.
    pub fn entry_count(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM medications", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl SubmissionGateway for Database {
    type Error = DbError;

    fn submit(&mut self, entry: &NewEntry) -> Result<(), DbError> {
        self.insert_entry(entry).map(|_| ())
    }
}

impl HistoryGateway for Database {
    type Error = DbError;

    fn fetch_all(&self) -> Result<Vec<MedicationEntry>, DbError> {
        self.list_entries()
    }
}
