use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Args;

/// Settings shared by every front end.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// SQLite file holding the readings table.
    #[arg(long, env = "TEKX_DATABASE", default_value = "tekx_readings.db")]
    pub database: PathBuf,

    /// Spreadsheet (CSV) written by the report export.
    #[arg(long, env = "TEKX_REPORT", default_value = "tekx_readings.csv")]
    pub report: PathBuf,

    /// Timezone used to derive the calendar date of each reading.
    #[arg(long, env = "TZ")]
    pub timezone: Tz,
}
