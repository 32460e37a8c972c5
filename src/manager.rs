use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rand::{SeedableRng, rngs::StdRng};
use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    config::Config,
    db::{self, get_latest_reading, get_readings_by_date, get_readings_by_date_range, insert_reading},
    report::export_report,
    tekx::{DATE_FORMAT, DeviceState, Inputs, Reading, Simulator},
    trend::{DatePoint, DateRange, Trend, aggregate},
};

/// Current device status as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Most recent stored reading.
    Logged(Reading),

    /// Nothing stored yet; in-memory state of the simulator.
    Unlogged(DeviceState),
}

/// Owns one simulator session plus its store, and exposes every operation the
/// front ends offer.
#[derive(Debug)]
pub struct DeviceManager {
    pool: SqlitePool,
    simulator: Simulator,
    rng: StdRng,
    timezone: Tz,
    report_path: PathBuf,
}

impl DeviceManager {
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::open(&config.database).await?;

        Ok(Self::new(
            pool,
            config.timezone,
            config.report.clone(),
            StdRng::from_entropy(),
        ))
    }

    pub fn new(pool: SqlitePool, timezone: Tz, report_path: PathBuf, rng: StdRng) -> Self {
        Self {
            pool,
            simulator: Simulator::new(),
            rng,
            timezone,
            report_path,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Applies new inputs, logs the generated reading and refreshes the
    /// report file.
    pub async fn configure(&mut self, inputs: Inputs) -> Result<Reading> {
        let outputs = self.simulator.configure(&mut self.rng, inputs);
        let now = self.now();

        let reading = insert_reading(&self.pool, &now, inputs, outputs)
            .await
            .context("failed to log reading")?;

        self.export()
            .await
            .context("failed to refresh report after logging")?;

        Ok(reading)
    }

    pub async fn status(&self) -> Result<Status> {
        let latest = get_latest_reading(&self.pool)
            .await
            .context("failed to get latest reading")?;

        Ok(match latest {
            Some(reading) => Status::Logged(reading),
            None => Status::Unlogged(self.simulator.state()),
        })
    }

    pub async fn date_trend(&self, date: NaiveDate) -> Result<Vec<DatePoint>> {
        let date = date.format(DATE_FORMAT).to_string();
        get_readings_by_date(&self.pool, &date)
            .await
            .with_context(|| format!("failed to get trend for {date}"))
    }

    pub async fn range_trend(&self, range: DateRange) -> Result<Trend> {
        let groups = get_readings_by_date_range(&self.pool, &range.start_str(), &range.end_str())
            .await
            .context("failed to get date range trend")?;

        debug!(dates = groups.len(), "aggregating date range");

        Ok(aggregate(&groups))
    }

    pub async fn weekly_trend(&self) -> Result<(DateRange, Trend)> {
        let range = DateRange::last_week(self.today());
        let trend = self.range_trend(range).await?;

        Ok((range, trend))
    }

    pub async fn export(&self) -> Result<usize> {
        export_report(&self.pool, &self.report_path)
            .await
            .context("failed to export report")
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{db::tests::memory_pool, report::read_report, tekx::Bit};

    async fn manager(report_path: PathBuf) -> DeviceManager {
        DeviceManager::new(
            memory_pool().await,
            Tz::UTC,
            report_path,
            StdRng::seed_from_u64(3),
        )
    }

    #[tokio::test]
    async fn status_falls_back_to_zeroed_state() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path().join("r.csv")).await;

        assert_eq!(
            manager.status().await.unwrap(),
            Status::Unlogged(DeviceState::default())
        );
    }

    #[tokio::test]
    async fn configure_logs_inputs_and_refreshes_report() {
        let dir = tempdir().unwrap();
        let mut manager = manager(dir.path().join("r.csv")).await;
        let inputs = Inputs {
            a: Bit::One,
            b: Bit::Zero,
        };

        let reading = manager.configure(inputs).await.unwrap();

        assert_eq!(reading.inputs, inputs);
        assert!((20.0..=30.0).contains(&reading.outputs.tx));
        assert_eq!(manager.status().await.unwrap(), Status::Logged(reading.clone()));
        assert_eq!(read_report(manager.report_path()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn todays_readings_show_up_in_trends() {
        let dir = tempdir().unwrap();
        let mut manager = manager(dir.path().join("r.csv")).await;
        let first = manager.configure(Inputs::default()).await.unwrap();
        let second = manager.configure(Inputs::default()).await.unwrap();
        let today = NaiveDate::parse_from_str(&second.date, DATE_FORMAT).unwrap();

        let points = manager.date_trend(today).await.unwrap();
        assert_eq!(points.len(), if first.date == second.date { 2 } else { 1 });

        let (range, weekly) = manager.weekly_trend().await.unwrap();
        assert_eq!(range.end, manager.today());
        assert_eq!(weekly.dates.last(), Some(&second.date));
    }
}
