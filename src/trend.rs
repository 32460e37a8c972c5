//! Date-bucketed trend computation over stored readings.
//!
//! Range queries produce [`DateGroups`]: for each date, the DO1, DO2 and Tx
//! values observed that day. [`aggregate`] folds each group into one point of
//! a [`Trend`]: the mode of each binary output and the mean temperature.

use std::hash::Hash;

use chrono::{NaiveDate, TimeDelta};
use indexmap::IndexMap;

use crate::{
    error::ValidationError,
    tekx::{Bit, DATE_FORMAT, Outputs},
};

/// One reading of a single-date trend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatePoint {
    pub timestamp: f64,

    pub outputs: Outputs,
}

/// Values observed on one date, in the order they were logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyValues {
    pub do1: Vec<Bit>,

    pub do2: Vec<Bit>,

    pub tx: Vec<f64>,
}

/// Per-date value lists. Iteration follows insertion order of the dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateGroups(IndexMap<String, DailyValues>);

impl DateGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: String, do1: Bit, do2: Bit, tx: f64) {
        let values = self.0.entry(date).or_default();
        values.do1.push(do1);
        values.do2.push(do2);
        values.tx.push(tx);
    }

    pub fn get(&self, date: &str) -> Option<&DailyValues> {
        self.0.get(date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DailyValues)> {
        self.0.iter().map(|(date, values)| (date.as_str(), values))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Aggregated trend: four parallel sequences, one entry per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trend {
    pub dates: Vec<String>,

    pub do1_modes: Vec<Option<Bit>>,

    pub do2_modes: Vec<Option<Bit>>,

    pub tx_averages: Vec<f64>,
}

impl Trend {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Most frequent value. Ties go to the value seen first; `None` when empty.
pub fn mode<T: Copy + Eq + Hash>(values: &[T]) -> Option<T> {
    let mut counts: IndexMap<T, usize> = IndexMap::new();
    for v in values {
        *counts.entry(*v).or_default() += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (v, count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((v, count)),
        }
    }

    best.map(|(v, _)| v)
}

/// Arithmetic mean, `0.0` for an empty list.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0f64;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Folds every date group into one trend point, keeping the input order.
pub fn aggregate(groups: &DateGroups) -> Trend {
    let mut trend = Trend::default();
    for (date, values) in groups.iter() {
        trend.dates.push(date.to_string());
        trend.do1_modes.push(mode(&values.do1));
        trend.do2_modes.push(mode(&values.do2));
        trend.tx_averages.push(average(&values.tx));
    }

    trend
}

/// An inclusive, validated range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,

    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }

        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Seven calendar days ending with `today`.
    pub fn last_week(today: NaiveDate) -> Self {
        Self {
            start: today - TimeDelta::days(6),
            end: today,
        }
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    let well_formed = s.len() == 10
        && s.bytes()
            .enumerate()
            .all(|(i, c)| if i == 4 || i == 7 { c == b'-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(ValidationError::InvalidDate(s.to_string()));
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}
