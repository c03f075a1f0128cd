//! Request and response bodies shared by the backend and the client.

use medlog_core::{EntrySource, MedicationEntry, NewEntry, ValidationError};
use serde::{Deserialize, Serialize};

/// Body text of `GET /`.
pub const WELCOME: &str = "Welcome to the Medication Tracker API!";

/// Message returned by a successful `POST /log`.
pub const LOGGED_MESSAGE: &str = "Medication logged successfully!";

/// Error returned when `POST /log` lacks a medication or timestamp.
pub const REQUIRED_FIELDS_ERROR: &str = "Medication and timestamp are required!";

/// Source assumed when a `POST /log` body omits it.
pub const DEFAULT_SOURCE: EntrySource = EntrySource::Nfc;

/// Body of `POST /log`.
///
/// Every field is optional on the wire so that missing fields produce a
/// readable 400 instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&NewEntry> for LogRequest {
    fn from(entry: &NewEntry) -> Self {
        Self {
            medication: Some(entry.medication.to_string()),
            timestamp: Some(entry.timestamp.clone()),
            source: Some(entry.source.to_string()),
            notes: Some(entry.notes.clone()),
        }
    }
}

impl TryFrom<LogRequest> for NewEntry {
    type Error = ValidationError;

    fn try_from(request: LogRequest) -> Result<Self, Self::Error> {
        // Required fields are checked before the source.
        let mut entry = Self::new(
            request.medication.unwrap_or_default(),
            request.timestamp.unwrap_or_default(),
            DEFAULT_SOURCE,
            request.notes,
        )?;
        if let Some(value) = request.source.as_deref() {
            entry.source = value.parse()?;
        }
        Ok(entry)
    }
}

/// Body of a successful `POST /log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One element of `GET /medications`: `[id, medication, timestamp, source, notes]`.
///
/// `source` is carried as stored, so `""` and `null` pass through unchanged.
pub type EntryRow = (i64, String, String, Option<String>, Option<String>);

pub fn encode_row(entry: &MedicationEntry) -> EntryRow {
    (
        entry.id,
        entry.medication.clone(),
        entry.timestamp.clone(),
        entry.source.clone(),
        Some(entry.notes.clone()),
    )
}

pub fn decode_row(row: EntryRow) -> MedicationEntry {
    let (id, medication, timestamp, source, notes) = row;
    MedicationEntry {
        id,
        medication,
        timestamp,
        source,
        notes: notes.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_request_defaults_source_to_nfc() {
        let request: LogRequest =
            serde_json::from_str(r#"{"medication":"Aspirin","timestamp":"2024-03-15T09:00"}"#)
                .unwrap();
        let entry = NewEntry::try_from(request).unwrap();
        assert_eq!(entry.source, EntrySource::Nfc);
        assert_eq!(entry.notes, "");
    }

    #[test]
    fn log_request_rejects_unknown_source() {
        let request = LogRequest {
            medication: Some("Aspirin".to_string()),
            timestamp: Some("2024-03-15T09:00".to_string()),
            source: Some("fax".to_string()),
            notes: None,
        };
        assert!(matches!(
            NewEntry::try_from(request),
            Err(ValidationError::InvalidSource { .. })
        ));
    }

    #[test]
    fn log_request_from_entry_carries_every_field() {
        let entry = NewEntry::new(
            "Aspirin",
            "2024-03-15T09:00",
            EntrySource::Scanner,
            Some("after lunch".to_string()),
        )
        .unwrap();
        let json = serde_json::to_value(LogRequest::from(&entry)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "medication": "Aspirin",
                "timestamp": "2024-03-15T09:00",
                "source": "scanner",
                "notes": "after lunch",
            })
        );
    }

    #[test]
    fn rows_encode_as_positional_arrays() {
        let entry = MedicationEntry {
            id: 7,
            medication: "Aspirin".to_string(),
            timestamp: "2024-03-15T09:00".to_string(),
            source: Some("manual".to_string()),
            notes: String::new(),
        };
        let json = serde_json::to_string(&encode_row(&entry)).unwrap();
        assert_eq!(json, r#"[7,"Aspirin","2024-03-15T09:00","manual",""]"#);
    }

    #[test]
    fn decode_row_tolerates_null_notes() {
        let row: EntryRow =
            serde_json::from_str(r#"[1,"Aspirin","2024-03-15T09:00","nfc",null]"#).unwrap();
        let entry = decode_row(row);
        assert_eq!(entry.entry_source(), Some(EntrySource::Nfc));
        assert_eq!(entry.notes, "");
    }

    #[test]
    fn seeded_rows_with_blank_source_pass_through() {
        let body = r#"[[2,"Adderall","2024-03-10 07:45:00","",""],[1,"Zinc","2024-03-09 08:00:00",null,""]]"#;
        let rows: Vec<EntryRow> = serde_json::from_str(body).unwrap();
        let entries: Vec<MedicationEntry> = rows.into_iter().map(decode_row).collect();

        assert_eq!(entries[0].source.as_deref(), Some(""));
        assert_eq!(entries[1].source, None);
        assert!(entries.iter().all(|e| e.entry_source().is_none()));

        let encoded: Vec<EntryRow> = entries.iter().map(encode_row).collect();
        assert_eq!(
            serde_json::to_value(&encoded).unwrap(),
            serde_json::from_str::<serde_json::Value>(body).unwrap()
        );
    }
}
