//! Relative display labels for intake timestamps.
//!
//! A timestamp is classified against an explicit evaluation instant (`now`)
//! in the time zone carried by `now`:
//!
//! - same calendar day: `"This morning"`, `"This evening"`, ...
//! - previous calendar day: `"Yesterday"`
//! - less than seven whole days ago: the weekday name (`"Tuesday"`)
//! - anything else, including future timestamps: `"Mar 4, 2024"`
//!
//! Every call is pure. The same inputs always produce the same label.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MedicationEntry;

const MS_PER_DAY: i64 = 86_400_000;

/// Days-ago window (exclusive) in which the weekday name is used.
const WEEKDAY_WINDOW_DAYS: i64 = 7;

/// Naive wall-clock layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Classification errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The input could not be read as a point in time.
    #[error("invalid timestamp: {input:?}")]
    InvalidTimestamp { input: String },
}

/// Coarse time of day derived from the local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfDay {
    /// 00:00 to 04:59.
    Overnight,
    /// 05:00 to 11:59.
    Morning,
    /// 12:00 to 16:59.
    Afternoon,
    /// 17:00 to 20:59.
    Evening,
    /// 21:00 to 23:59.
    Night,
}

impl PartOfDay {
    /// Buckets a local hour (0-23) into a part of day.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        if hour < 5 {
            Self::Overnight
        } else if hour < 12 {
            Self::Morning
        } else if hour < 17 {
            Self::Afternoon
        } else if hour < 21 {
            Self::Evening
        } else {
            Self::Night
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overnight => "overnight",
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for PartOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag used to pick an icon for a label.
///
/// This is produced alongside the label text so that icon selection never
/// depends on the wording of the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Today, morning or afternoon.
    Daytime,
    /// Today, evening.
    Evening,
    /// Today, night or overnight.
    Night,
    /// The previous calendar day.
    Yesterday,
    /// Within the last week, shown as a weekday name.
    Weekday,
    /// Absolute date.
    Fallback,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Daytime,
        Self::Evening,
        Self::Night,
        Self::Yesterday,
        Self::Weekday,
        Self::Fallback,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daytime => "daytime",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::Yesterday => "yesterday",
            Self::Weekday => "weekday",
            Self::Fallback => "fallback",
        }
    }
}

impl From<PartOfDay> for Category {
    fn from(part: PartOfDay) -> Self {
        match part {
            PartOfDay::Morning | PartOfDay::Afternoon => Self::Daytime,
            PartOfDay::Evening => Self::Evening,
            PartOfDay::Night | PartOfDay::Overnight => Self::Night,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for unknown category tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// How hour:minute is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockStyle {
    /// `09:00`, `22:00`.
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    /// `09:00 AM`, `10:00 PM`.
    #[serde(rename = "12h")]
    TwelveHour,
}

impl ClockStyle {
    const fn time_format(self) -> &'static str {
        match self {
            Self::TwentyFourHour => "%H:%M",
            Self::TwelveHour => "%I:%M %p",
        }
    }
}

/// Formatting conventions for labels.
///
/// Weekday and month names are English.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    #[serde(default)]
    pub clock: ClockStyle,
}

/// The rendered description of one timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLabel {
    /// Relative description, e.g. `"This morning"` or `"Mar 1, 2024"`.
    pub label: String,
    /// Local hour and minute, e.g. `"09:00"`.
    pub fine: String,
    pub category: Category,
}

/// Parses a stored timestamp into the given time zone.
///
/// RFC 3339 values with an explicit offset are converted. Values without an
/// offset (`2024-03-15T09:00`, `2024-03-15 09:00:00`) are read as wall-clock
/// time in `tz`.
pub fn parse_timestamp<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Tz>, LabelError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(tz));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .and_then(|naive| resolve_local(tz, naive))
        .ok_or_else(|| LabelError::InvalidTimestamp {
            input: input.to_string(),
        })
}

/// Maps a wall-clock time onto an instant.
/// DST fall-back picks the earlier instant; a spring-forward gap moves one hour ahead.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}

/// Classifies a timestamp string relative to `now`.
pub fn classify<Tz>(
    timestamp: &str,
    now: &DateTime<Tz>,
    locale: &Locale,
) -> Result<DisplayLabel, LabelError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let parsed = parse_timestamp(timestamp, &now.timezone())?;
    Ok(classify_instant(&parsed, now, locale))
}

/// Classifies an already-parsed instant relative to `now`.
///
/// The instant is judged in the time zone of `now`.
pub fn classify_instant<Tz, Tz2>(
    timestamp: &DateTime<Tz2>,
    now: &DateTime<Tz>,
    locale: &Locale,
) -> DisplayLabel
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    Tz2: TimeZone,
{
    let timestamp = timestamp.with_timezone(&now.timezone());
    let date = timestamp.date_naive();
    let today = now.date_naive();

    let fine = timestamp.format(locale.clock.time_format()).to_string();
    let part = PartOfDay::from_hour(timestamp.hour());

    if date == today {
        return DisplayLabel {
            label: format!("This {part}"),
            fine,
            category: part.into(),
        };
    }

    if today.pred_opt() == Some(date) {
        return DisplayLabel {
            label: "Yesterday".to_string(),
            fine,
            category: Category::Yesterday,
        };
    }

    let days_ago = (now.timestamp_millis() - timestamp.timestamp_millis()).div_euclid(MS_PER_DAY);
    if (1..WEEKDAY_WINDOW_DAYS).contains(&days_ago) {
        DisplayLabel {
            label: timestamp.format("%A").to_string(),
            fine,
            category: Category::Weekday,
        }
    } else {
        DisplayLabel {
            label: timestamp.format("%b %-d, %Y").to_string(),
            fine,
            category: Category::Fallback,
        }
    }
}

/// An entry paired with its label, or the reason it could not be labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledEntry {
    pub entry: MedicationEntry,
    pub display: Result<DisplayLabel, LabelError>,
}

/// Labels every entry independently, preserving order.
pub fn label_entries<Tz>(
    entries: Vec<MedicationEntry>,
    now: &DateTime<Tz>,
    locale: &Locale,
) -> Vec<LabeledEntry>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    entries
        .into_iter()
        .map(|entry| {
            let display = classify(&entry.timestamp, now, locale);
            if let Err(err) = &display {
                tracing::debug!(entry_id = entry.id, %err, "entry has an unreadable timestamp");
            }
            LabeledEntry { entry, display }
        })
        .collect()
}
