//! Status command for showing what the local database holds.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::DateTime;
use chrono_tz::Tz;

use medlog_core::{Locale, classify};
use medlog_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    db_path: &Path,
    now: &DateTime<Tz>,
    locale: &Locale,
) -> Result<()> {
    writeln!(writer, "Medication log status")?;
    writeln!(writer, "Database: {}", db_path.display())?;
    writeln!(writer, "Time zone: {}", now.timezone())?;
    writeln!(writer, "Entries: {}", db.entry_count()?)?;

    let Some(latest) = db.latest_entry()? else {
        return Ok(());
    };
    let when = match classify(&latest.timestamp, now, locale) {
        Ok(display) => format!("{} {}", display.label, display.fine),
        Err(_) => latest.timestamp.clone(),
    };
    writeln!(writer, "Latest: {} ({when})", latest.medication)?;

    Ok(())
}
