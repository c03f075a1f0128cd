//! Seams between the front end and wherever entries are kept.
//!
//! Implemented by the local SQLite store and by the HTTP client.

use crate::types::{MedicationEntry, NewEntry};

/// Accepts new entries for persistence.
pub trait SubmissionGateway {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persists one entry.
    fn submit(&mut self, entry: &NewEntry) -> Result<(), Self::Error>;
}

/// Returns stored entries.
pub trait HistoryGateway {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns all entries, most recent first.
    fn fetch_all(&self) -> Result<Vec<MedicationEntry>, Self::Error>;
}
