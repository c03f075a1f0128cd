//! Core domain logic for the medication log.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: validated medication intake records
//! - Labels: turning intake timestamps into relative display labels
//! - Icons: picking an icon for a label category
//! - Gateways: the submit/fetch seams implemented by storage backends

pub mod gateway;
pub mod icon;
pub mod label;
pub mod types;

pub use gateway::{HistoryGateway, SubmissionGateway};
pub use icon::{ColorTag, Icon, IconSpec, icon_for, icon_for_tag};
pub use label::{
    Category, ClockStyle, DisplayLabel, LabelError, LabeledEntry, Locale, PartOfDay, classify,
    classify_instant, label_entries, parse_timestamp,
};
pub use types::{EntrySource, MedicationEntry, MedicationName, NewEntry, ValidationError};
