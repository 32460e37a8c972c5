use std::io::Write;

use anyhow::{Context as _, Result};
use tekx_monitor::{
    error::ValidationError,
    manager::DeviceManager,
    render::{render_date_trend, render_status, render_trend},
    report::read_report,
    tekx::Inputs,
    trend::{DateRange, parse_date},
};

use crate::args::Command;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 2;

pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ValidationError>().is_some() {
        return EXIT_INVALID_INPUT;
    }

    EXIT_FAILURE
}

/// Runs one command against `manager`. Dates are validated before any query.
pub async fn execute<W: Write>(
    manager: &mut DeviceManager,
    command: Command,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Range { start, end } => {
            let range = DateRange::parse(&start, &end)?;
            let trend = manager.range_trend(range).await?;
            if trend.is_empty() {
                writeln!(out, "No data available for the selected date range.")?;
            } else {
                write!(out, "{}", render_trend(&trend))?;
            }
        }
        Command::Date { date } => {
            let date = parse_date(&date)?;
            let points = manager.date_trend(date).await?;
            if points.is_empty() {
                writeln!(out, "No data available for the selected date.")?;
            } else {
                write!(out, "{}", render_date_trend(&points, &manager.timezone())?)?;
            }
        }
        Command::Status => {
            write!(out, "{}", render_status(&manager.status().await?))?;
        }
        Command::Configure { a, b } => {
            let reading = manager.configure(Inputs { a, b }).await?;
            let measured_at = reading.measured_at(&manager.timezone())?;
            writeln!(
                out,
                "#{} {} A={} B={} DO1={} DO2={} Tx={:.2}",
                reading.serial_number,
                measured_at.format("%Y-%m-%d %H:%M:%S"),
                reading.inputs.a,
                reading.inputs.b,
                reading.outputs.do1,
                reading.outputs.do2,
                reading.outputs.tx
            )?;
        }
        Command::Weekly => {
            let (range, trend) = manager.weekly_trend().await?;
            writeln!(out, "{} .. {}", range.start_str(), range.end_str())?;
            if trend.is_empty() {
                writeln!(out, "No data available for the last week.")?;
            } else {
                write!(out, "{}", render_trend(&trend))?;
            }
        }
        Command::Export => {
            let rows = manager.export().await?;
            writeln!(out, "Wrote {rows} readings to {:?}", manager.report_path())?;
        }
        Command::Inspect { file } => {
            let path = file.unwrap_or_else(|| manager.report_path().to_path_buf());
            let rows = read_report(&path)?;
            writeln!(out, "{} readings in {:?}", rows.len(), path)?;
            if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
                writeln!(out, "{} .. {}", first.date, last.date)?;
            }
        }
    }

    out.flush().context("failed to flush output")
}
