//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.shoeqc.toml` files. AQL limits are deliberately not configurable.

use crate::cli::ReportFormat;
use crate::intake::DEFAULT_ANGLE_NAMES;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".shoeqc.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Default order metadata.
    #[serde(default)]
    pub order: OrderDefaults,

    /// View naming and reply discovery.
    #[serde(default)]
    pub views: ViewsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Report format(s) to produce.
    #[serde(default)]
    pub format: ReportFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Minimum number of views required for an inspection.
    #[serde(default = "default_min_views")]
    pub min_views: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: ReportFormat::default(),
            verbose: false,
            min_views: default_min_views(),
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_min_views() -> usize {
    2
}

/// Order metadata used when not given on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDefaults {
    #[serde(default)]
    pub customer: String,

    #[serde(default = "default_inspector")]
    pub inspector: String,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            customer: String::new(),
            inspector: default_inspector(),
        }
    }
}

fn default_inspector() -> String {
    "AI Inspector".to_string()
}

/// View naming and reply discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Angle names assigned to replies by upload position.
    #[serde(default = "default_angle_names")]
    pub angle_names: Vec<String>,

    /// Reply file extensions picked up by `--dir`.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory depth scanned by `--dir`.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            angle_names: default_angle_names(),
            extensions: default_extensions(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_angle_names() -> Vec<String> {
    DEFAULT_ANGLE_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    vec!["json", "txt"].into_iter().map(String::from).collect()
}

fn default_max_depth() -> usize {
    1
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the per-view breakdown.
    #[serde(default = "default_true")]
    pub include_view_details: bool,

    /// Include classifier notes in the per-view breakdown.
    #[serde(default = "default_true")]
    pub include_notes: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_view_details: true,
            include_notes: true,
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

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.output_dir {
            self.general.output_dir = dir.display().to_string();
        }

        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(min_views) = args.min_views {
            self.general.min_views = min_views;
        }

        if let Some(ref customer) = args.customer {
            self.order.customer = customer.clone();
        }
        if let Some(ref inspector) = args.inspector {
            self.order.inspector = inspector.clone();
        }

        if let Some(ref names) = args.angles {
            self.views.angle_names = names.clone();
        }

        if args.no_view_details {
            self.report.include_view_details = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check settings that serde defaults cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.general.min_views == 0 {
            anyhow::bail!("min_views must be at least 1");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
