//! Log command for recording a medication intake.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use clap::Args;
use medlog_api::wire::LOGGED_MESSAGE;
use medlog_core::{EntrySource, NewEntry, SubmissionGateway, parse_timestamp};

/// Layout timestamps are stored in: local wall-clock time, minute precision.
pub const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Medication name.
    pub medication: String,

    /// When it was taken (e.g. 2024-03-15T09:00). Defaults to now.
    #[arg(long)]
    pub at: Option<String>,

    /// How the intake was recorded: manual, scanner or nfc.
    #[arg(long, default_value = "manual")]
    pub source: EntrySource,

    /// Free-text notes.
    #[arg(long)]
    pub notes: Option<String>,
}

pub fn run<W, G, Tz>(writer: &mut W, gateway: &mut G, args: &LogArgs, now: &DateTime<Tz>) -> Result<()>
where
    W: Write,
    G: SubmissionGateway,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let timestamp = resolve_timestamp(args.at.as_deref(), now)?;
    let entry = NewEntry::new(&args.medication, timestamp, args.source, args.notes.clone())?;

    gateway
        .submit(&entry)
        .context("failed to log medication")?;
    tracing::info!(medication = %entry.medication, timestamp = %entry.timestamp, "logged medication");

    writeln!(writer, "{LOGGED_MESSAGE}")?;
    Ok(())
}

/// Normalizes `--at` into the stored layout, defaulting to `now`.
///
/// Values with an offset are converted into the evaluation time zone so that
/// stored timestamps sort chronologically.
fn resolve_timestamp<Tz>(at: Option<&str>, now: &DateTime<Tz>) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let when = match at.map(str::trim) {
        None | Some("now") => now.clone(),
        Some(value) => parse_timestamp(value, &now.timezone())?,
    };
    Ok(when.format(STORED_TIMESTAMP_FORMAT).to_string())
}
