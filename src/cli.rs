//! CLI surface (SPEC_FULL.md §10.1), mirroring the teacher's
//! `Cli`/`Commands` derive structure with a single `compare` command.
//!
//! `user_threshold`/`critical_threshold`/`print_threshold` are positional
//! optional arguments, matching spec.md §6's literal surface (`file1
//! file2 [user_threshold] [critical_threshold] [print_threshold]
//! [debug_level]`). `debug_level` is the one deliberate deviation: it's
//! a named `--debug` flag over the structured [`DebugLevel`] enum
//! rather than a positional integer, per spec.md §9's redesign note
//! replacing the legacy debug-level knob.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::DebugLevel;

#[derive(Parser)]
#[command(name = "tlcompare")]
#[command(author, version, about = "Numeric comparison engine for transmission-loss tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two whitespace-delimited numeric files
    Compare {
        /// First file (the candidate run)
        file1: PathBuf,

        /// Second file (the reference run)
        file2: PathBuf,

        /// Significance threshold; negative selects percent mode (|value|/100)
        #[arg(default_value_t = 0.05, allow_hyphen_values = true)]
        user_threshold: f64,

        /// Critical-difference threshold (absolute)
        #[arg(default_value_t = 10.0, allow_hyphen_values = true)]
        critical_threshold: f64,

        /// Presentation-only threshold controlling which rows would print
        #[arg(default_value_t = 1.0, allow_hyphen_values = true)]
        print_threshold: f64,

        /// Structured logging verbosity (replaces the legacy integer
        /// debug_level positional; spec.md §9 redesign note)
        #[arg(long, value_enum, default_value = "info")]
        debug: DebugLevel,
    },
}
