use anyhow::{Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};

use crate::tekx::{Inputs, Outputs};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub serial_number: i64,

    /// Seconds since the Unix epoch.
    pub timestamp: f64,

    /// Calendar date of `timestamp` in the timezone used at log time.
    pub date: String,

    pub inputs: Inputs,

    pub outputs: Outputs,
}

impl Reading {
    pub fn measured_at<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Tz>> {
        from_timestamp(self.timestamp, tz)
    }
}

pub fn from_timestamp<Tz: TimeZone>(timestamp: f64, tz: &Tz) -> Result<DateTime<Tz>> {
    let micros = (timestamp * 1_000_000f64).round() as i64;
    DateTime::<Utc>::from_timestamp_micros(micros)
        .map(|dt| dt.with_timezone(tz))
        .ok_or_else(|| anyhow!("timestamp out of range: {timestamp}"))
}

pub fn to_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000f64
}

pub fn to_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono_tz::Asia::Tokyo;

    use super::*;

    #[test]
    fn date_follows_timezone() {
        // 2024-03-01T20:30:00Z is already the next day in Tokyo
        let at = Tokyo.with_ymd_and_hms(2024, 3, 2, 5, 30, 0).unwrap();
        assert_eq!(to_date(&at), "2024-03-02");
        assert_eq!(to_date(&at.with_timezone(&Utc)), "2024-03-01");
    }

    #[test]
    fn timestamp_round_trips_through_measured_at() {
        let at = Tokyo.with_ymd_and_hms(2024, 3, 2, 5, 30, 15).unwrap()
            + chrono::TimeDelta::microseconds(250);
        let reading = Reading {
            serial_number: 1,
            timestamp: to_timestamp(&at),
            date: to_date(&at),
            inputs: Inputs::default(),
            outputs: Outputs::default(),
        };

        assert_eq!(reading.measured_at(&Tokyo).unwrap(), at);
    }
}
