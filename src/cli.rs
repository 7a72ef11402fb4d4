//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ShoeQC - AQL footwear inspection reports from vision classifier replies
///
/// Reads one classifier reply per photographed angle, aggregates the
/// defects against AQL 2.5 limits and writes JSON, HTML, text or
/// Markdown reports.
///
/// Examples:
///   shoeqc front.json back.json side.json --po 0144540 --style GS1412401B
///   shoeqc --dir replies/ --format html --fail-on reject
///   shoeqc --dir replies/ --dry-run
///   shoeqc --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Classifier reply files, in upload order
    ///
    /// The position of each file decides its angle name (Front View,
    /// Back View, ...).
    #[arg(value_name = "REPLY", conflicts_with = "dir")]
    pub replies: Vec<PathBuf>,

    /// Directory of reply files, ordered by file name
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Purchase order number
    #[arg(long, default_value = "", value_name = "PO")]
    pub po: String,

    /// Product style number
    #[arg(long, default_value = "", value_name = "STYLE")]
    pub style: String,

    /// Product color code
    #[arg(long, default_value = "", value_name = "COLOR")]
    pub color: String,

    /// Customer or brand name
    #[arg(long, value_name = "NAME", env = "SHOEQC_CUSTOMER")]
    pub customer: Option<String>,

    /// QC inspector name
    #[arg(long, value_name = "NAME", env = "SHOEQC_INSPECTOR")]
    pub inspector: Option<String>,

    /// Inspection date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Report format (json, html, text, markdown, all)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Directory reports are written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Exact output file (single format only)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Angle names assigned by upload position (comma-separated)
    ///
    /// Example: --angles "Front,Back,Sole"
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub angles: Option<Vec<String>>,

    /// Minimum number of views required
    #[arg(long, value_name = "COUNT")]
    pub min_views: Option<usize>,

    /// Leave the per-view breakdown out of the reports
    #[arg(long)]
    pub no_view_details: bool,

    /// Fail if the verdict is at or above this level
    ///
    /// Useful for CI pipelines. Exit code 2 when threshold is met.
    /// Values: rework, reject
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .shoeqc.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: list replies and their angles without writing reports
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .shoeqc.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Structured JSON export
    Json,
    /// Styled HTML document
    Html,
    /// Styled plain text
    Text,
    /// Markdown document
    Markdown,
    /// JSON, HTML and text together (default)
    #[default]
    All,
}

impl ReportFormat {
    /// File extension for a single format.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
            ReportFormat::All => "",
        }
    }

    /// Concrete formats this selection expands to.
    pub fn expand(&self) -> Vec<ReportFormat> {
        match self {
            ReportFormat::All => vec![ReportFormat::Json, ReportFormat::Html, ReportFormat::Text],
            single => vec![*single],
        }
    }
}

/// Verdict level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailOnLevel {
    Rework,
    Reject,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.replies.is_empty() && self.dir.is_none() {
            return Err("No replies given. Pass reply files or --dir".to_string());
        }

        for reply in &self.replies {
            if !reply.is_file() {
                return Err(format!("Reply file does not exist: {}", reply.display()));
            }
        }

        if let Some(ref dir) = self.dir {
            if !dir.exists() {
                return Err(format!("Reply directory does not exist: {}", dir.display()));
            }
            if !dir.is_dir() {
                return Err(format!("Reply path is not a directory: {}", dir.display()));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.output.is_some() && self.format == Some(ReportFormat::All) {
            return Err("--output needs a single --format, not 'all'".to_string());
        }

        if self.min_views == Some(0) {
            return Err("Min views must be at least 1".to_string());
        }

        if let Some(ref date) = self.date {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Err(format!("Invalid date '{}', expected YYYY-MM-DD", date));
            }
        }

        Ok(())
    }

    /// The inspection date, defaulting to `today`.
    pub fn inspection_date(&self, today: NaiveDate) -> NaiveDate {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or(today)
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_default` is the configured `general.verbose`; `--quiet`
    /// wins over both.
    pub fn log_level(&self, verbose_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_args(replies: Vec<PathBuf>) -> Args {
        Args {
            replies,
            dir: None,
            po: "0144540".to_string(),
            style: "GS1412401B".to_string(),
            color: "PPB".to_string(),
            customer: None,
            inspector: None,
            date: None,
            format: None,
            output_dir: None,
            output: None,
            angles: None,
            min_views: None,
            no_view_details: false,
            fail_on: None,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    fn reply_files(dir: &TempDir, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.path().join(format!("{}.json", i));
                std::fs::write(&path, "{}").unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_validation_ok() {
        let temp_dir = TempDir::new().unwrap();
        let args = make_args(reply_files(&temp_dir, 2));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_no_replies() {
        let args = make_args(vec![]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_reply() {
        let temp_dir = TempDir::new().unwrap();
        let args = make_args(vec![temp_dir.path().join("missing.json")]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_dir_must_be_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = reply_files(&temp_dir, 1).remove(0);

        let mut args = make_args(vec![]);
        args.dir = Some(file);
        assert!(args.validate().is_err());

        args.dir = Some(temp_dir.path().to_path_buf());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = make_args(reply_files(&temp_dir, 2));
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_output_needs_single_format() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = make_args(reply_files(&temp_dir, 2));
        args.output = Some(PathBuf::from("report.html"));
        args.format = Some(ReportFormat::All);
        assert!(args.validate().is_err());

        args.format = Some(ReportFormat::Html);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_date() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = make_args(reply_files(&temp_dir, 2));
        args.date = Some("2024-13-40".to_string());
        assert!(args.validate().is_err());

        args.date = Some("2024-06-01".to_string());
        assert!(args.validate().is_ok());

        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            args.inspection_date(today),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        args.date = None;
        assert_eq!(args.inspection_date(today), today);
    }

    #[test]
    fn test_report_format_expand() {
        assert_eq!(ReportFormat::All.expand().len(), 3);
        assert_eq!(ReportFormat::Markdown.expand(), vec![ReportFormat::Markdown]);
        assert_eq!(ReportFormat::Text.extension(), "txt");
    }

    #[test]
    fn test_fail_on_ordering() {
        assert!(FailOnLevel::Rework < FailOnLevel::Reject);
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(vec![]);
        assert_eq!(args.log_level(false), tracing::Level::INFO);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
