mod args;
mod command;

use std::{io, process::ExitCode};

use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use tekx_monitor::{logging, manager::DeviceManager};

use crate::command::{execute, exit_code};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(exit_code(&e));
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let mut manager = DeviceManager::open(&args.config)
        .await
        .context("failed to open device manager")?;

    execute(&mut manager, args.command, &mut io::stdout().lock()).await
}
