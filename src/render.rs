//! Plain-text tables and bar charts for the terminal front ends.

use anyhow::Result;
use chrono_tz::Tz;

use crate::{
    manager::Status,
    tekx::{Bit, TX_MAX, TX_MIN, from_timestamp},
    trend::{DatePoint, Trend},
};

const BAR_WIDTH: usize = 20;

pub fn render_status(status: &Status) -> String {
    let (notice, outputs) = match status {
        Status::Logged(reading) => ("", reading.outputs),
        Status::Unlogged(state) => (
            "No data available. Showing last known device state.\n",
            state.outputs,
        ),
    };

    format!(
        "{notice}DO1: {}\nDO2: {}\nTx: {:.2}\n",
        outputs.do1, outputs.do2, outputs.tx
    )
}

/// One row per date: modes of DO1/DO2 and a bar of the mean temperature.
/// Rows stop at the shortest of the four sequences.
pub fn render_trend(trend: &Trend) -> String {
    let header = format!("{:<10}  {:>3}  {:>3}  {:>6}", "Date", "DO1", "DO2", "Tx");
    let rows = trend
        .dates
        .iter()
        .zip(&trend.do1_modes)
        .zip(&trend.do2_modes)
        .zip(&trend.tx_averages)
        .map(|(((date, do1), do2), tx)| {
            format!(
                "{:<10}  {:>3}  {:>3}  {:>6.2}  |{}|",
                date,
                mode_label(*do1),
                mode_label(*do2),
                tx,
                tx_bar(*tx),
            )
        });

    join_lines(std::iter::once(header).chain(rows))
}

/// One row per reading, labelled with its local time of day.
pub fn render_date_trend(points: &[DatePoint], tz: &Tz) -> Result<String> {
    let header = format!("{:<8}  {:>3}  {:>3}  {:>6}", "Time", "DO1", "DO2", "Tx");
    let rows = points
        .iter()
        .map(|point| -> Result<String> {
            let at = from_timestamp(point.timestamp, tz)?;
            Ok(format!(
                "{:<8}  {:>3}  {:>3}  {:>6.2}  |{}|",
                at.format("%H:%M:%S"),
                point.outputs.do1,
                point.outputs.do2,
                point.outputs.tx,
                tx_bar(point.outputs.tx),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(join_lines(std::iter::once(header).chain(rows)))
}

fn join_lines(lines: impl Iterator<Item = String>) -> String {
    lines.map(|line| line + "\n").collect()
}

fn mode_label(mode: Option<Bit>) -> String {
    mode.map_or_else(|| "-".to_string(), |b| b.to_string())
}

fn tx_bar(tx: f64) -> String {
    let ratio = ((tx - TX_MIN) / (TX_MAX - TX_MIN)).clamp(0f64, 1f64);
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tekx::{DeviceState, Outputs};

    #[test]
    fn bar_scales_over_tx_range() {
        assert_eq!(tx_bar(20.0), " ".repeat(BAR_WIDTH));
        assert_eq!(tx_bar(25.0), format!("{}{}", "#".repeat(10), " ".repeat(10)));
        assert_eq!(tx_bar(30.0), "#".repeat(BAR_WIDTH));
        // the empty-group average of 0.0 stays in bounds
        assert_eq!(tx_bar(0.0), " ".repeat(BAR_WIDTH));
    }

    #[test]
    fn trend_table_has_one_line_per_date() {
        let trend = Trend {
            dates: vec!["2024-05-01".to_string(), "2024-05-02".to_string()],
            do1_modes: vec![Some(Bit::One), None],
            do2_modes: vec![Some(Bit::Zero), None],
            tx_averages: vec![25.0, 0.0],
        };

        let out = render_trend(&trend);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2024-05-01    1    0   25.00  |##########"));
        assert!(lines[2].starts_with("2024-05-02    -    -    0.00  |"));
    }

    #[test]
    fn trend_table_stops_at_shortest_sequence() {
        let trend = Trend {
            dates: vec!["2024-05-01".to_string(), "2024-05-02".to_string()],
            do1_modes: vec![Some(Bit::One)],
            do2_modes: vec![Some(Bit::One), Some(Bit::Zero)],
            tx_averages: vec![21.0, 22.0, 23.0],
        };

        let out = render_trend(&trend);

        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("2024-05-01"));
        assert!(!out.contains("2024-05-02"));
    }

    #[test]
    fn empty_trend_is_header_only() {
        assert_eq!(render_trend(&Trend::default()).lines().count(), 1);
    }

    #[test]
    fn date_trend_uses_local_time() {
        let points = [DatePoint {
            timestamp: 1714554000.0,
            outputs: Outputs {
                do1: Bit::One,
                do2: Bit::One,
                tx: 30.0,
            },
        }];

        let out = render_date_trend(&points, &chrono_tz::Asia::Tokyo).unwrap();

        assert!(out.lines().nth(1).unwrap().starts_with("18:00:00    1    1   30.00"));
    }

    #[test]
    fn status_of_logged_reading_has_no_notice() {
        let reading = crate::tekx::Reading {
            serial_number: 4,
            timestamp: 1714554000.0,
            date: "2024-05-01".to_string(),
            inputs: crate::tekx::Inputs::default(),
            outputs: Outputs {
                do1: Bit::One,
                do2: Bit::Zero,
                tx: 27.5,
            },
        };

        assert_eq!(
            render_status(&Status::Logged(reading)),
            "DO1: 1\nDO2: 0\nTx: 27.50\n"
        );
    }

    #[test]
    fn status_notes_missing_data() {
        let out = render_status(&Status::Unlogged(DeviceState::default()));
        assert_eq!(
            out,
            "No data available. Showing last known device state.\nDO1: 0\nDO2: 0\nTx: 0.00\n"
        );
    }
}
