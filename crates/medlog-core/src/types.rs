//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Invalid entry source value.
    #[error("invalid source: {value}")]
    InvalidSource { value: String },
}

/// How a medication intake was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    /// Typed in by hand.
    Manual,
    /// Captured from a barcode scanner.
    Scanner,
    /// Captured from an NFC tag.
    Nfc,
}

impl EntrySource {
    /// All sources, in the order they are offered to users.
    pub const ALL: [Self; 3] = [Self::Manual, Self::Scanner, Self::Nfc];

    /// String representation for database storage and the wire format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scanner => "scanner",
            Self::Nfc => "nfc",
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntrySource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "scanner" => Ok(Self::Scanner),
            "nfc" => Ok(Self::Nfc),
            _ => Err(ValidationError::InvalidSource {
                value: s.to_string(),
            }),
        }
    }
}

/// A validated medication display name.
///
/// Names are trimmed and must not be empty afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MedicationName(String);

impl MedicationName {
    /// Creates a new name after validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "medication",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MedicationName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MedicationName> for String {
    fn from(name: MedicationName) -> Self {
        name.0
    }
}

impl fmt::Display for MedicationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MedicationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A medication intake that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub medication: MedicationName,
    /// When the medication was taken, as submitted (ISO 8601, minute precision).
    pub timestamp: String,
    pub source: EntrySource,
    #[serde(default)]
    pub notes: String,
}

impl NewEntry {
    /// Builds an entry, rejecting a blank medication or timestamp.
    pub fn new(
        medication: impl Into<String>,
        timestamp: impl Into<String>,
        source: EntrySource,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        let medication = MedicationName::new(medication)?;
        let timestamp = timestamp.into().trim().to_string();
        if timestamp.is_empty() {
            return Err(ValidationError::Empty { field: "timestamp" });
        }
        Ok(Self {
            medication,
            timestamp,
            source,
            notes: notes.unwrap_or_default(),
        })
    }
}

/// A stored medication intake.
///
/// The `id` is assigned by whichever backend persisted the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub id: i64,
    pub medication: String,
    pub timestamp: String,
    /// Source exactly as stored. Rows written by other tools may hold `None`,
    /// an empty string or an unrecognized value.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl MedicationEntry {
    /// Returns the stored source, or `None` when it is missing or blank.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|source| !source.is_empty())
    }

    /// Returns the stored source when it is one of the known values.
    pub fn entry_source(&self) -> Option<EntrySource> {
        self.source()?.parse().ok()
    }

    /// Returns `None` when the entry has no notes.
    pub fn notes(&self) -> Option<&str> {
        Some(self.notes.as_str()).filter(|notes| !notes.is_empty())
    }
}
