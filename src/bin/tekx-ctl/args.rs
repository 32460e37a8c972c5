use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tekx_monitor::{config::Config, tekx::Bit};

/// One-shot access to the simulated TekX device.
#[derive(Debug, Parser)]
pub struct Args {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the latest reading.
    Status,

    /// Set inputs A and B and log the generated reading.
    Configure {
        #[arg(short)]
        a: Bit,

        #[arg(short)]
        b: Bit,
    },

    /// Per-day trend of the last seven days.
    Weekly,

    /// Per-day trend between two dates, inclusive.
    Range { start: String, end: String },

    /// Every reading of one date.
    Date { date: String },

    /// Write the spreadsheet report.
    Export,

    /// Summarise an exported report file.
    Inspect {
        /// Defaults to the configured report path.
        file: Option<PathBuf>,
    },
}
