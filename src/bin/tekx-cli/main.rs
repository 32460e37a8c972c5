mod args;
mod menu;

use std::{io, process::ExitCode};

use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use tekx_monitor::{
    logging,
    manager::DeviceManager,
    render::{render_date_trend, render_status, render_trend},
    trend::{DateRange, parse_date},
};

use crate::menu::{Choice, print_options, prompt, prompt_inputs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let mut manager = DeviceManager::open(&args.config)
        .await
        .context("failed to open device manager")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print_options();

        let Some(line) = prompt(&mut input, "Enter your choice: ")? else {
            return Ok(());
        };

        let Ok(choice) = line.parse::<Choice>() else {
            println!("Invalid choice. Please try again.");
            continue;
        };

        match choice {
            Choice::Status => {
                println!("Current Status:");
                print!("{}", render_status(&manager.status().await?));
            }
            Choice::Configure => {
                let Some(inputs) = prompt_inputs(&mut input)? else {
                    return Ok(());
                };
                manager.configure(inputs).await?;
                println!("Inputs A and B configured successfully.");
            }
            Choice::WeeklyTrend => {
                let (range, trend) = manager.weekly_trend().await?;
                println!("Trends from {} to {}", range.start_str(), range.end_str());
                if trend.is_empty() {
                    println!("No data available for the last week.");
                } else {
                    print!("{}", render_trend(&trend));
                }
            }
            Choice::RangeTrend => {
                let Some(start) = prompt(&mut input, "Enter the start date in 'YYYY-MM-DD' format: ")?
                else {
                    return Ok(());
                };
                let Some(end) = prompt(&mut input, "Enter the end date in 'YYYY-MM-DD' format: ")?
                else {
                    return Ok(());
                };

                let range = match DateRange::parse(&start, &end) {
                    Ok(range) => range,
                    Err(e) => {
                        println!("Invalid input: {e}");
                        continue;
                    }
                };

                let trend = manager.range_trend(range).await?;
                if trend.is_empty() {
                    println!("No data available for the selected range.");
                } else {
                    print!("{}", render_trend(&trend));
                }
            }
            Choice::DateTrend => {
                let Some(date) = prompt(&mut input, "Enter the date (YYYY-MM-DD): ")? else {
                    return Ok(());
                };

                let date = match parse_date(&date) {
                    Ok(date) => date,
                    Err(e) => {
                        println!("Invalid input: {e}");
                        continue;
                    }
                };

                let points = manager.date_trend(date).await?;
                if points.is_empty() {
                    println!("No data available for the selected date.");
                } else {
                    print!("{}", render_date_trend(&points, &manager.timezone())?);
                }
            }
            Choice::Export => {
                let rows = manager.export().await?;
                println!(
                    "Spreadsheet report with {rows} readings written to {}",
                    manager.report_path().display()
                );
            }
            Choice::Exit => {
                println!("Exiting...");
                return Ok(());
            }
        }
    }
}
