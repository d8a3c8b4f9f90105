use std::io;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, prelude::*};

use self::{simulate::SimulateArg, weights::WeightsArg};

mod simulate;
mod weights;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a headless game and print the final state as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print AI weights as JSON
    Weights(#[clap(flatten)] WeightsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Weights(arg) => weights::run(&arg)?,
    }
    Ok(())
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}
