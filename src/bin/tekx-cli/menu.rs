use std::io::{self, BufRead, Write as _};
use std::str::FromStr;

use anyhow::{Context as _, Error, Result, bail};
use tekx_monitor::tekx::{Bit, Inputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Status,
    Configure,
    WeeklyTrend,
    RangeTrend,
    DateTrend,
    Export,
    Exit,
}

impl Choice {
    pub const ALL: [Choice; 7] = [
        Choice::Status,
        Choice::Configure,
        Choice::WeeklyTrend,
        Choice::RangeTrend,
        Choice::DateTrend,
        Choice::Export,
        Choice::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Choice::Status => "Get Current Status",
            Choice::Configure => "Configure Inputs (A and B)",
            Choice::WeeklyTrend => "Get Weekly Trends",
            Choice::RangeTrend => "Get Trends for Specific Range",
            Choice::DateTrend => "Get Trends for Specific Date",
            Choice::Export => "Download Spreadsheet Report",
            Choice::Exit => "Exit",
        }
    }
}

impl FromStr for Choice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Choice::Status),
            "2" => Ok(Choice::Configure),
            "3" => Ok(Choice::WeeklyTrend),
            "4" => Ok(Choice::RangeTrend),
            "5" => Ok(Choice::DateTrend),
            "6" => Ok(Choice::Export),
            "7" => Ok(Choice::Exit),
            other => bail!("unknown menu choice: {other}"),
        }
    }
}

pub fn print_options() {
    println!();
    println!("Options:");
    for (i, choice) in Choice::ALL.iter().enumerate() {
        println!("{}. {}", i + 1, choice.label());
    }
}

/// Prints `message` and reads one line. `None` once input is exhausted.
pub fn prompt<R: BufRead>(input: &mut R, message: &str) -> Result<Option<String>> {
    print!("{message}");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

/// Asks for A then B until both are 0 or 1.
pub fn prompt_inputs<R: BufRead>(input: &mut R) -> Result<Option<Inputs>> {
    loop {
        let Some(a) = prompt(input, "Enter value for A (0 or 1): ")? else {
            return Ok(None);
        };
        let a = match a.parse::<Bit>() {
            Ok(a) => a,
            Err(e) => {
                println!("Invalid input: {e}");
                continue;
            }
        };

        let Some(b) = prompt(input, "Enter value for B (0 or 1): ")? else {
            return Ok(None);
        };
        let b = match b.parse::<Bit>() {
            Ok(b) => b,
            Err(e) => {
                println!("Invalid input: {e}");
                continue;
            }
        };

        return Ok(Some(Inputs { a, b }));
    }
}
