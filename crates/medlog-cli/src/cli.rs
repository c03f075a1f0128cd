//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::history::HistoryArgs;
use crate::commands::label::LabelArgs;
use crate::commands::log::LogArgs;
use crate::commands::serve::ServeArgs;

/// Medication intake log.
///
/// Records when medications were taken and shows the history with
/// relative labels such as "This morning" or "Yesterday".
#[derive(Debug, Parser)]
#[command(name = "medlog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record that a medication was taken.
    Log(LogArgs),

    /// Show logged medications, most recent first.
    History(HistoryArgs),

    /// Show the display label for a single timestamp.
    Label(LabelArgs),

    /// Run the HTTP backend on the local database.
    Serve(ServeArgs),

    /// Show database status.
    Status,
}
