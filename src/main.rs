//! tlcompare - numeric comparison engine for transmission-loss and other
//! tabular acoustic-simulator outputs.
//!
//! Validates a candidate run against a reference run: `tlcompare
//! compare file1 file2 [user_threshold] [critical_threshold]
//! [print_threshold] [--debug LEVEL]`. Exit code `0` means pass, `1`
//! means fail (structural, critical, over-threshold, or I/O error).

mod cli;
mod comparator;
mod difference;
mod error;
mod format_tracker;
mod pattern;
mod report;
mod structure;
mod token;
mod types;
mod verdict;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::types::{PatternConstants, Thresholds, UserThreshold};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Commands::Compare {
        file1,
        file2,
        user_threshold,
        critical_threshold,
        print_threshold,
        debug,
    } = cli.command;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(debug.filter())).init();

    let thresholds = Thresholds {
        user: UserThreshold::from_raw(user_threshold),
        critical: critical_threshold,
        print: print_threshold,
    };

    let report = comparator::compare_files(&file1, &file2, &thresholds, &PatternConstants::default())?;

    report::print_summary(&report);

    std::process::exit(report.exit_code());
}
