//! Simulated training run for CI smoke tests
//!
//! Mimics the epoch/batch logging of a training job without training
//! anything. Run with `--smoke-test` for a fast reduced-iteration pass.

mod output;
mod run;

use anyhow::Result;
use clap::Parser;
use output::OutputFormat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use run::{RunConfig, SimulatedTrainer};
use std::io::{self, Write};

/// Sample training script for CI smoke test
#[derive(Parser)]
#[command(name = "iris-train")]
#[command(author, version, about = "Sample training script for CI smoke test", long_about = None)]
pub struct Cli {
    /// Number of epochs to run
    #[arg(long, default_value_t = 2)]
    pub epochs: u32,

    /// Run a fast smoke test version
    #[arg(long)]
    pub smoke_test: bool,

    /// Seed for the simulated loss values (random when omitted)
    #[arg(long, env = "IRIS_TRAIN_SEED")]
    pub seed: Option<u64>,

    /// Output format for the run summary
    #[arg(long, short, default_value = "table")]
    pub format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let config = RunConfig {
        epochs: cli.epochs,
        smoke_test: cli.smoke_test,
    };

    // Keep stdout clean for the JSON report
    let mut progress: Box<dyn Write> = match cli.format {
        OutputFormat::Table => Box::new(io::stdout().lock()),
        OutputFormat::Json => Box::new(io::stderr().lock()),
    };

    let report = SimulatedTrainer::new(config, rng).run(&mut progress)?;
    drop(progress);

    output::print_report(&report, cli.format)?;
    Ok(())
}
