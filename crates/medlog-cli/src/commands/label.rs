//! Label command for previewing how a timestamp is displayed.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone};
use clap::Args;
use serde_json::json;

use medlog_core::{Locale, classify, icon_for, parse_timestamp};

#[derive(Debug, Args)]
pub struct LabelArgs {
    /// Timestamp to label (e.g. 2024-03-15T09:00).
    pub timestamp: String,

    /// Evaluate relative to this time instead of the current time.
    #[arg(long)]
    pub now: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W, Tz>(writer: &mut W, args: &LabelArgs, now: &DateTime<Tz>, locale: &Locale) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let now = match args.now.as_deref() {
        Some(value) => parse_timestamp(value, &now.timezone())?,
        None => now.clone(),
    };

    let display = classify(&args.timestamp, &now, locale)?;
    let icon = icon_for(display.category);

    if args.json {
        let value = json!({
            "timestamp": args.timestamp,
            "label": display.label,
            "fine": display.fine,
            "category": display.category,
            "icon": icon,
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(writer, "{} {} ({})", display.label, display.fine, icon.icon)?;
    }
    Ok(())
}
