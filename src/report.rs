use std::fs::File;
use std::path::Path;

use anyhow::{Context as _, Result};
use csv::{Reader, Writer};
use sqlx::SqlitePool;
use tokio_stream::StreamExt as _;
use tracing::info;

use crate::db::stream_readings;
use crate::tekx::{Bit, Inputs, Outputs};

pub const HEADER: [&str; 7] = ["Timestamp", "Date", "A", "B", "DO1", "DO2", "Tx"];

const TIMESTAMP_INDEX: usize = 0;
const DATE_INDEX: usize = 1;
const A_INDEX: usize = 2;
const B_INDEX: usize = 3;
const DO1_INDEX: usize = 4;
const DO2_INDEX: usize = 5;
const TX_INDEX: usize = 6;

/// One data row of an exported report. Serial numbers are not exported.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub timestamp: f64,

    pub date: String,

    pub inputs: Inputs,

    pub outputs: Outputs,
}

/// Writes every stored reading to `path`, oldest first, replacing whatever
/// was there. Returns the number of data rows written.
pub async fn export_report(pool: &SqlitePool, path: &Path) -> Result<usize> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("failed to create report: {path:?}"))?;

    writer
        .write_record(HEADER)
        .context("failed to write report header")?;

    let mut readings = stream_readings(pool);
    let mut total = 0;
    while let Some(reading) = readings.next().await {
        let reading = reading.context("failed to read reading for report")?;
        writer
            .write_record([
                reading.timestamp.to_string(),
                reading.date,
                reading.inputs.a.to_string(),
                reading.inputs.b.to_string(),
                reading.outputs.do1.to_string(),
                reading.outputs.do2.to_string(),
                reading.outputs.tx.to_string(),
            ])
            .with_context(|| format!("failed to write reading {}", reading.serial_number))?;
        total += 1;
    }

    writer.flush().context("failed to flush report")?;

    info!(rows = total, path = %path.display(), "exported report");

    Ok(total)
}

pub fn read_report(path: &Path) -> Result<Vec<ReportRow>> {
    let file = File::open(path).with_context(|| format!("failed to open report: {path:?}"))?;
    let mut reader = Reader::from_reader(file);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = record.with_context(|| format!("failed to read report row {}", i + 1))?;

        let timestamp = row[TIMESTAMP_INDEX]
            .parse()
            .with_context(|| format!("failed to parse timestamp: {}", &row[TIMESTAMP_INDEX]))?;
        let inputs = Inputs {
            a: parse_bit(&row[A_INDEX]).context("failed to parse A")?,
            b: parse_bit(&row[B_INDEX]).context("failed to parse B")?,
        };
        let outputs = Outputs {
            do1: parse_bit(&row[DO1_INDEX]).context("failed to parse DO1")?,
            do2: parse_bit(&row[DO2_INDEX]).context("failed to parse DO2")?,
            tx: row[TX_INDEX]
                .parse()
                .with_context(|| format!("failed to parse Tx: {}", &row[TX_INDEX]))?,
        };

        rows.push(ReportRow {
            timestamp,
            date: row[DATE_INDEX].to_string(),
            inputs,
            outputs,
        });
    }

    Ok(rows)
}

fn parse_bit(s: &str) -> Result<Bit> {
    Ok(s.parse::<Bit>()?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono_tz::Tz;
    use tempfile::tempdir;

    use super::*;
    use crate::db::{
        insert_reading,
        tests::{at, memory_pool, outputs},
    };

    #[tokio::test]
    async fn exports_header_and_rows_in_timestamp_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let pool = memory_pool().await;
        let inputs = Inputs {
            a: Bit::One,
            b: Bit::Zero,
        };
        insert_reading(&pool, &at(Tz::UTC, 2024, 5, 2, 9), inputs, outputs(1, 0, 23.45))
            .await
            .unwrap();
        insert_reading(&pool, &at(Tz::UTC, 2024, 5, 1, 9), inputs, outputs(0, 1, 20.1))
            .await
            .unwrap();

        assert_eq!(export_report(&pool, &path).await.unwrap(), 2);

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Timestamp,Date,A,B,DO1,DO2,Tx"));
        assert_eq!(lines.next(), Some("1714554000,2024-05-01,1,0,0,1,20.1"));
        assert_eq!(lines.next(), Some("1714640400,2024-05-02,1,0,1,0,23.45"));
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn reread_matches_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let pool = memory_pool().await;
        let logged_at = at(Tz::UTC, 2024, 5, 1, 9) + chrono::TimeDelta::microseconds(123_456);
        let reading = insert_reading(&pool, &logged_at, Inputs::default(), outputs(1, 1, 29.99))
            .await
            .unwrap();

        export_report(&pool, &path).await.unwrap();
        let rows = read_report(&path).unwrap();

        assert_eq!(
            rows,
            vec![ReportRow {
                timestamp: reading.timestamp,
                date: reading.date,
                inputs: reading.inputs,
                outputs: reading.outputs,
            }]
        );
    }

    #[tokio::test]
    async fn export_overwrites_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        fs::write(&path, "stale\ncontent\nthat is much longer than the new report\n").unwrap();
        let pool = memory_pool().await;

        assert_eq!(export_report(&pool, &path).await.unwrap(), 0);

        assert_eq!(fs::read_to_string(&path).unwrap(), "Timestamp,Date,A,B,DO1,DO2,Tx\n");
        assert!(read_report(&path).unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_exports_do_not_accumulate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let pool = memory_pool().await;
        insert_reading(&pool, &at(Tz::UTC, 2024, 5, 1, 9), Inputs::default(), outputs(0, 0, 25.0))
            .await
            .unwrap();

        export_report(&pool, &path).await.unwrap();
        export_report(&pool, &path).await.unwrap();

        assert_eq!(read_report(&path).unwrap().len(), 1);
    }
}
