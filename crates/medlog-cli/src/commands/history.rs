//! History command for listing logged medications with relative labels.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use clap::Args;
use serde::Serialize;

use medlog_core::{
    DisplayLabel, HistoryGateway, Icon, IconSpec, LabeledEntry, Locale, MedicationEntry, icon_for,
    label_entries,
};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct HistoryItem<'a> {
    #[serde(flatten)]
    entry: &'a MedicationEntry,
    display: Option<&'a DisplayLabel>,
    icon: Option<IconSpec>,
    error: Option<String>,
}

impl<'a> From<&'a LabeledEntry> for HistoryItem<'a> {
    fn from(labeled: &'a LabeledEntry) -> Self {
        match &labeled.display {
            Ok(display) => Self {
                entry: &labeled.entry,
                display: Some(display),
                icon: Some(icon_for(display.category)),
                error: None,
            },
            Err(err) => Self {
                entry: &labeled.entry,
                display: None,
                icon: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub fn run<W, G, Tz>(
    writer: &mut W,
    gateway: &G,
    args: &HistoryArgs,
    now: &DateTime<Tz>,
    locale: &Locale,
) -> Result<()>
where
    W: Write,
    G: HistoryGateway,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let entries = gateway
        .fetch_all()
        .context("failed to fetch medication history")?;
    let labeled = label_entries(entries, now, locale);

    let invalid = labeled.iter().filter(|l| l.display.is_err()).count();
    if invalid > 0 {
        tracing::warn!(invalid, "some entries have unreadable timestamps");
    }

    if args.json {
        let items: Vec<HistoryItem<'_>> = labeled.iter().map(HistoryItem::from).collect();
        serde_json::to_writer_pretty(&mut *writer, &items)?;
        writeln!(writer)?;
        return Ok(());
    }

    if labeled.is_empty() {
        writeln!(writer, "No medication logs yet.")?;
        return Ok(());
    }

    for item in &labeled {
        write_line(writer, item)?;
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, item: &LabeledEntry) -> Result<()> {
    let entry = &item.entry;
    let (glyph, label, fine) = match &item.display {
        Ok(display) => (
            glyph(icon_for(display.category).icon),
            display.label.as_str(),
            display.fine.as_str(),
        ),
        Err(_) => (glyph(Icon::Clock), "(invalid timestamp)", "--:--"),
    };

    write!(
        writer,
        "{glyph} {label:<14} {fine:>8}  {} [{}]",
        entry.medication,
        entry.source().unwrap_or("unknown")
    )?;
    if let Some(notes) = entry.notes() {
        write!(writer, " - {notes}")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Terminal glyph for an icon.
const fn glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Sun => "☀",
        Icon::Moon => "☾",
        Icon::NightSky => "✦",
        Icon::Today => "↺",
        Icon::Calendar => "▦",
        Icon::Clock => "◷",
    }
}
