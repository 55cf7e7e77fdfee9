//! Simulated epoch/batch training loop
//!
//! Nothing is learned here: each batch sleeps for a fixed delay and reports a
//! uniformly random loss, mimicking the logging cadence of a real training job.

use colored::Colorize;
use rand::Rng;
use serde::Serialize;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use tabled::Tabled;

/// Batches per epoch in smoke-test mode
pub const SMOKE_TEST_BATCHES: u32 = 3;

/// Batches per epoch in full mode
pub const FULL_BATCHES: u32 = 100;

pub const SMOKE_TEST_BATCH_DELAY: Duration = Duration::from_millis(100);
pub const FULL_BATCH_DELAY: Duration = Duration::from_millis(500);

/// Run shape chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub epochs: u32,
    pub smoke_test: bool,
}

impl RunConfig {
    pub fn batches_per_epoch(&self) -> u32 {
        if self.smoke_test {
            SMOKE_TEST_BATCHES
        } else {
            FULL_BATCHES
        }
    }

    pub fn batch_delay(&self) -> Duration {
        if self.smoke_test {
            SMOKE_TEST_BATCH_DELAY
        } else {
            FULL_BATCH_DELAY
        }
    }

    pub fn mode_label(&self) -> &'static str {
        if self.smoke_test {
            "Smoke test"
        } else {
            "Full training"
        }
    }
}

/// Per-epoch row of the run summary
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct EpochSummary {
    #[tabled(rename = "Epoch")]
    pub epoch: u32,
    #[tabled(rename = "Batches")]
    pub batches: u32,
    #[tabled(rename = "Last Loss", display_with = "format_loss")]
    pub last_loss: f64,
}

/// Outcome of a full run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub mode: String,
    pub epochs: Vec<EpochSummary>,
    pub elapsed_secs: f64,
}

pub fn format_loss(loss: &f64) -> String {
    format!("{:.4}", loss)
}

pub struct SimulatedTrainer<R: Rng> {
    config: RunConfig,
    batch_delay: Duration,
    rng: R,
}

impl<R: Rng> SimulatedTrainer<R> {
    pub fn new(config: RunConfig, rng: R) -> Self {
        Self {
            batch_delay: config.batch_delay(),
            config,
            rng,
        }
    }

    /// Override the per-batch sleep
    #[cfg(test)]
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Run one epoch, returning the last batch loss. `epoch` is zero-based.
    pub fn train_one_epoch<W: Write>(&mut self, epoch: u32, out: &mut W) -> io::Result<f64> {
        let num_batches = self.config.batches_per_epoch();
        let mut loss = 0.0;

        for batch in 0..num_batches {
            thread::sleep(self.batch_delay);
            loss = self.rng.gen::<f64>();
            writeln!(
                out,
                "[Epoch {}] Batch {}/{} - Loss: {}",
                epoch + 1,
                batch + 1,
                num_batches,
                format_loss(&loss)
            )?;
        }

        Ok(loss)
    }

    pub fn run<W: Write>(&mut self, out: &mut W) -> io::Result<TrainingReport> {
        let start = Instant::now();

        writeln!(out, "{}", "🚀 Starting training...".bold())?;
        writeln!(out, "Mode: {}", self.config.mode_label())?;
        writeln!(out, "Epochs: {}", self.config.epochs)?;

        let mut epochs = Vec::with_capacity(self.config.epochs as usize);
        for epoch in 0..self.config.epochs {
            let loss = self.train_one_epoch(epoch, out)?;
            writeln!(
                out,
                "{}",
                format!(
                    "✅ Epoch {} complete. Last batch loss: {}",
                    epoch + 1,
                    format_loss(&loss)
                )
                .green()
            )?;
            epochs.push(EpochSummary {
                epoch: epoch + 1,
                batches: self.config.batches_per_epoch(),
                last_loss: loss,
            });
        }

        writeln!(out, "{}", "🎉 Training completed successfully!".green().bold())?;
        out.flush()?;

        Ok(TrainingReport {
            mode: self.config.mode_label().to_string(),
            epochs,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}
