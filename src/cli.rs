//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::filters::RangeMode;
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Perfdash - project and task performance dashboard
///
/// Computes KPIs, project health, delivery risk, work mix and throughput
/// trends for a set of projects, filtered by project, member and date range.
///
/// Examples:
///   perfdash --sample
///   perfdash --data projects.json --range 90d
///   perfdash --data data/ --project checkout --member "Ben Carter"
///   perfdash --data projects.toml --start 2024-01-01 --end 2024-01-31 --format json
///   perfdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file (.json / .toml) or directory of dataset files
    #[arg(short, long, value_name = "PATH", env = "PERFDASH_DATA")]
    pub data: Option<PathBuf>,

    /// Use the built-in sample dataset, ignoring --data and PERFDASH_DATA
    #[arg(long)]
    pub sample: bool,

    /// Project id to report on ("all" for every project)
    #[arg(short, long, value_name = "ID")]
    pub project: Option<String>,

    /// Team member to report on ("all" for everyone)
    #[arg(short, long, value_name = "NAME")]
    pub member: Option<String>,

    /// Date range preset, or "custom" with --start / --end
    #[arg(short, long, value_name = "RANGE")]
    pub range: Option<RangeMode>,

    /// First day of a custom range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last day of a custom range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Reference date for presets and the sample dataset (defaults to today)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Output format (markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .perfdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the projects in the dataset and exit
    #[arg(long)]
    pub list_projects: bool,

    /// List the members available for the selected project and exit
    #[arg(long)]
    pub list_members: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .perfdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        let has_bounds = self.start.is_some() || self.end.is_some();
        if has_bounds && self.range.is_some_and(|r| r != RangeMode::Custom) {
            return Err("--start / --end can only be used with --range custom".to_string());
        }

        if let Some(ref data) = self.data {
            if !self.sample && !data.exists() {
                return Err(format!("Dataset path does not exist: {}", data.display()));
            }
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Range mode requested on the command line; explicit bounds imply custom.
    pub fn effective_range(&self) -> Option<RangeMode> {
        match self.range {
            Some(range) => Some(range),
            None if self.start.is_some() || self.end.is_some() => Some(RangeMode::Custom),
            None => None,
        }
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` value from the config file;
    /// `--quiet` still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
