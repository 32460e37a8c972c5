use clap::Parser;
use tekx_monitor::config::Config;

/// Interactive menu for the simulated TekX device.
#[derive(Debug, Parser)]
pub struct Args {
    #[command(flatten)]
    pub config: Config,
}
