//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.perfdash.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::filters::{RangeMode, ALL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".perfdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Default filter selection.
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path. Reports go to stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where to load projects from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset file or directory. The built-in sample is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Default filter selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// Project id, or "all".
    #[serde(default = "default_selector")]
    pub project: String,

    /// Member name, or "all".
    #[serde(default = "default_selector")]
    pub member: String,

    /// Range preset ("7d", "30d", "90d") or "custom".
    #[serde(default)]
    pub range: RangeMode,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            project: default_selector(),
            member: default_selector(),
            range: RangeMode::default(),
        }
    }
}

fn default_selector() -> String {
    ALL.to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the per-project health table.
    #[serde(default = "default_true")]
    pub include_health_table: bool,

    /// Include the bucketed trend charts.
    #[serde(default = "default_true")]
    pub include_trends: bool,

    /// Include the delivery-risk list.
    #[serde(default = "default_true")]
    pub include_risk: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_health_table: true,
            include_trends: true,
            include_risk: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.perfdash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; only values given on the command line
    /// override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if args.sample {
            self.data.path = None;
        } else if let Some(ref data) = args.data {
            self.data.path = Some(data.clone());
        }

        if let Some(ref project) = args.project {
            self.filters.project = project.clone();
        }
        if let Some(ref member) = args.member {
            self.filters.member = member.clone();
        }
        if let Some(range) = args.effective_range() {
            self.filters.range = range;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
