//! Output formatting utilities

use crate::run::TrainingReport;
use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table};

/// Output format for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Progress lines followed by an epoch table (default)
    #[default]
    Table,
    /// Progress on stderr, JSON report on stdout
    Json,
}

/// Print the summary of a finished run
pub fn print_report(report: &TrainingReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            if report.epochs.is_empty() {
                println!("{}", "No epochs were run".yellow());
            } else {
                let table = Table::new(&report.epochs).with(Style::rounded()).to_string();
                println!("{}", table);
            }
            println!(
                "{} {} in {:.2}s",
                "ℹ".blue().bold(),
                report.mode,
                report.elapsed_secs
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}
