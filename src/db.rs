use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::{DateTime, TimeZone};
use sqlx::{
    FromRow, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio_stream::{Stream, StreamExt as _};
use tracing::{debug, info};

use crate::{
    tekx::{Bit, Inputs, Outputs, Reading, to_date, to_timestamp},
    trend::{DateGroups, DatePoint},
};

#[derive(Debug, FromRow)]
struct ReadingRow {
    serial_number: i64,
    timestamp: f64,
    date: String,
    #[sqlx(rename = "A")]
    a: i64,
    #[sqlx(rename = "B")]
    b: i64,
    #[sqlx(rename = "DO1")]
    do1: i64,
    #[sqlx(rename = "DO2")]
    do2: i64,
    #[sqlx(rename = "Tx")]
    tx: f64,
}

impl TryFrom<ReadingRow> for Reading {
    type Error = anyhow::Error;

    fn try_from(row: ReadingRow) -> Result<Self> {
        let inputs = Inputs {
            a: Bit::try_from(row.a).context("invalid A column")?,
            b: Bit::try_from(row.b).context("invalid B column")?,
        };
        let outputs = Outputs {
            do1: Bit::try_from(row.do1).context("invalid DO1 column")?,
            do2: Bit::try_from(row.do2).context("invalid DO2 column")?,
            tx: row.tx,
        };

        Ok(Reading {
            serial_number: row.serial_number,
            timestamp: row.timestamp,
            date: row.date,
            inputs,
            outputs,
        })
    }
}

/// Opens (creating if missing) the SQLite file at `path`.
pub async fn open(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    new_pool(options)
        .await
        .with_context(|| format!("failed to open database: {path:?}"))
}

/// Connects with a single connection and makes sure the `readings` table
/// exists. One connection also keeps `sqlite::memory:` databases coherent.
pub async fn new_pool(options: SqliteConnectOptions) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    create_readings_table(&pool)
        .await
        .context("failed to create readings table")?;

    Ok(pool)
}

pub async fn create_readings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            serial_number INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp REAL,
            date TEXT,
            A INTEGER,
            B INTEGER,
            DO1 INTEGER,
            DO2 INTEGER,
            Tx REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Appends one reading taken at `at`. The `date` column is the calendar date
/// of `at` in its own timezone.
pub async fn insert_reading<Tz: TimeZone>(
    pool: &SqlitePool,
    at: &DateTime<Tz>,
    inputs: Inputs,
    outputs: Outputs,
) -> Result<Reading>
where
    Tz::Offset: std::fmt::Display,
{
    let timestamp = to_timestamp(at);
    let date = to_date(at);

    let result = sqlx::query(
        r#"
        INSERT INTO readings (timestamp, date, A, B, DO1, DO2, Tx)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(timestamp)
    .bind(&date)
    .bind(inputs.a.as_i64())
    .bind(inputs.b.as_i64())
    .bind(outputs.do1.as_i64())
    .bind(outputs.do2.as_i64())
    .bind(outputs.tx)
    .execute(pool)
    .await
    .context("failed to execute insert query")?;

    let serial_number = result.last_insert_rowid();
    info!(serial_number, %date, "logged reading");

    Ok(Reading {
        serial_number,
        timestamp,
        date,
        inputs,
        outputs,
    })
}

pub async fn get_latest_reading(pool: &SqlitePool) -> Result<Option<Reading>> {
    let row: Option<ReadingRow> = sqlx::query_as(
        r#"
        SELECT serial_number, timestamp, date, A, B, DO1, DO2, Tx
        FROM readings
        WHERE serial_number = (SELECT MAX(serial_number) FROM readings)
        "#,
    )
    .fetch_optional(pool)
    .await
    .context("failed to query latest reading")?;

    row.map(Reading::try_from).transpose()
}

/// Readings logged on `date` (compared verbatim), oldest first.
pub async fn get_readings_by_date(pool: &SqlitePool, date: &str) -> Result<Vec<DatePoint>> {
    let rows: Vec<(f64, i64, i64, f64)> = sqlx::query_as(
        r#"
        SELECT timestamp, DO1, DO2, Tx
        FROM readings
        WHERE date = ?
        ORDER BY timestamp
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to query readings for {date}"))?;

    debug!(date, count = rows.len(), "queried readings by date");

    rows.into_iter()
        .map(|(timestamp, do1, do2, tx)| -> Result<DatePoint> {
            Ok(DatePoint {
                timestamp,
                outputs: Outputs {
                    do1: Bit::try_from(do1).context("invalid DO1 column")?,
                    do2: Bit::try_from(do2).context("invalid DO2 column")?,
                    tx,
                },
            })
        })
        .collect()
}

/// Groups the outputs of every reading whose date lies in `[start, end]`
/// (string comparison) by date. Keys come out in date order; values keep the
/// order in which they were logged.
pub async fn get_readings_by_date_range(
    pool: &SqlitePool,
    start: &str,
    end: &str,
) -> Result<DateGroups> {
    let rows: Vec<(String, i64, i64, f64)> = sqlx::query_as(
        r#"
        SELECT date, DO1, DO2, Tx
        FROM readings
        WHERE date >= ? AND date <= ?
        ORDER BY date, timestamp
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to query readings from {start} to {end}"))?;

    debug!(start, end, count = rows.len(), "queried readings by date range");

    let mut groups = DateGroups::new();
    for (date, do1, do2, tx) in rows {
        let do1 = Bit::try_from(do1).context("invalid DO1 column")?;
        let do2 = Bit::try_from(do2).context("invalid DO2 column")?;
        groups.push(date, do1, do2, tx);
    }

    Ok(groups)
}

/// Streams every reading, oldest first.
pub fn stream_readings(pool: &SqlitePool) -> impl Stream<Item = Result<Reading>> + '_ {
    sqlx::query_as::<_, ReadingRow>(
        r#"
        SELECT serial_number, timestamp, date, A, B, DO1, DO2, Tx
        FROM readings
        ORDER BY timestamp
        "#,
    )
    .fetch(pool)
    .map(|row| -> Result<Reading> {
        Reading::try_from(row.context("failed to fetch reading")?)
    })
}
