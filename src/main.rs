//! ShoeQC - AQL footwear inspection from vision classifier replies
//!
//! A CLI tool that reads one classifier reply per photographed angle,
//! aggregates the reported defects against AQL 2.5 limits, and writes
//! inspection reports.
//!
//! Exit codes:
//!   0 - Success (verdict below --fail-on, or no --fail-on set)
//!   1 - Runtime error (config, unreadable directory, report write, etc.)
//!   2 - Verdict at or above the --fail-on level

mod analysis;
mod cli;
mod config;
mod intake;
mod models;
mod report;
mod scanner;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use cli::{Args, FailOnLevel, ReportFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{DefectReport, DefectSeverity, InspectionResult, OrderInfo, OverallCondition};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the log level, so it is loaded first
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("ShoeQC v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    match run_inspection(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Inspection failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .shoeqc.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize angle names, order defaults, and report output.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete inspection workflow. Returns exit code (0 or 2).
fn run_inspection(args: Args, config: Config) -> Result<i32> {
    config.validate()?;
    check_output_target(&args, &config)?;

    // Step 1: Find the replies
    let reply_paths = resolve_replies(&args, &config)?;
    info!("Found {} replies", reply_paths.len());

    if reply_paths.len() < config.general.min_views {
        anyhow::bail!(
            "Please provide at least {} replies from different angles for proper inspection (got {})",
            config.general.min_views,
            reply_paths.len()
        );
    }

    // Handle --dry-run: list views and exit
    if args.dry_run {
        return handle_dry_run(&reply_paths, &config.views.angle_names);
    }

    // Step 2: Read each classifier reply
    println!("🤖 Reading {} classifier replies...", reply_paths.len());
    let entries = intake::collect_replies(&reply_paths, &config.views.angle_names, !args.quiet);
    let reports: Vec<Option<DefectReport>> = entries.iter().map(|e| e.report.clone()).collect();

    let failed = analysis::views_failed(&reports);
    if failed > 0 {
        warn!("{} of {} views could not be classified", failed, reports.len());
    }

    // Step 3: Aggregate against AQL limits
    let verdict = analysis::aggregate(&reports);
    info!("Verdict: {} ({})", verdict.result, verdict.reason);

    // Step 4: Build the report
    println!("\n📝 Generating report...");

    let generated_at = Utc::now();
    let file_stamp = generated_at.with_timezone(&Local).naive_local();
    let order = OrderInfo {
        po_number: args.po.clone(),
        style_number: args.style.clone(),
        color: args.color.clone(),
        customer: config.order.customer.clone(),
        inspector: config.order.inspector.clone(),
        inspection_date: args
            .inspection_date(Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string(),
    };

    let export = report::build_export_report(&verdict, &order, &entries, generated_at);
    let options = report::RenderOptions::from(&config.report);

    // Step 5: Render and save
    let mut written = Vec::new();
    for format in config.general.format.expand() {
        let path = match args.output {
            Some(ref output) => output.clone(),
            None => PathBuf::from(&config.general.output_dir).join(report::report_file_name(
                &order,
                format,
                file_stamp,
            )),
        };

        let content = report::render(&export, format, options)?;
        report::write_report(&path, &content)?;
        debug!("Wrote {:?} report to {}", format, path.display());
        written.push(path);
    }

    // Print summary
    println!("\n📊 Inspection Summary:");
    println!(
        "   Views analyzed: {} | failed: {}",
        analysis::views_analyzed(&reports),
        failed
    );
    let conditions = analysis::condition_breakdown(&reports);
    println!(
        "   Conditions: {} Good: {} | {} Fair: {} | {} Poor: {}",
        OverallCondition::Good.emoji(),
        conditions.get(&OverallCondition::Good).unwrap_or(&0),
        OverallCondition::Fair.emoji(),
        conditions.get(&OverallCondition::Fair).unwrap_or(&0),
        OverallCondition::Poor.emoji(),
        conditions.get(&OverallCondition::Poor).unwrap_or(&0)
    );
    for severity in DefectSeverity::ALL {
        println!(
            "   {} {}: {} (limit {}, headroom {})",
            severity.emoji(),
            severity,
            verdict.count(severity),
            verdict.aql_limits.for_severity(severity),
            analysis::limit_headroom(&verdict, severity)
        );
    }
    println!("\n   Final result: {}", verdict.result.banner());
    println!("   Reason: {}", verdict.reason);

    println!("\n✅ Inspection complete! Reports saved to:");
    for path in &written {
        println!("   {}", path.display());
    }

    // Check --fail-on threshold
    let exit_code = exit_code_for(verdict.result, args.fail_on);
    if let Some(fail_level) = args.fail_on.filter(|_| exit_code == 2) {
        eprintln!(
            "\n⛔ Verdict {} is at or above {:?}. Failing (exit code 2).",
            verdict.result, fail_level
        );
    }

    Ok(exit_code)
}

/// `--output` names one file, so it cannot take several formats.
fn check_output_target(args: &Args, config: &Config) -> Result<()> {
    if args.output.is_some() && config.general.format == ReportFormat::All {
        anyhow::bail!("--output needs a single --format; the configured format is 'all'");
    }

    Ok(())
}

/// Exit code for a finished inspection: 2 when the verdict meets --fail-on.
fn exit_code_for(result: InspectionResult, fail_on: Option<FailOnLevel>) -> i32 {
    match fail_on {
        Some(level) if result >= fail_on_to_result(level) => 2,
        _ => 0,
    }
}

/// Reply files from the command line, or scanned from `--dir`.
fn resolve_replies(args: &Args, config: &Config) -> Result<Vec<PathBuf>> {
    match args.dir {
        Some(ref dir) => {
            info!("Scanning replies in: {}", dir.display());
            let reply_scanner =
                scanner::ReplyScanner::new(scanner::ScanConfig::from(&config.views));
            reply_scanner.scan(dir)
        }
        None => Ok(args.replies.clone()),
    }
}

/// Handle --dry-run: print the views that would be inspected, exit.
fn handle_dry_run(reply_paths: &[PathBuf], angle_names: &[String]) -> Result<i32> {
    println!("\n🔍 Dry run: listing views (no report written)...\n");

    for (idx, path) in reply_paths.iter().enumerate() {
        println!(
            "     📄 {:<20} ← {}",
            intake::angle_name(idx, angle_names),
            path.display()
        );
    }
    println!("\n   Total: {} views", reply_paths.len());

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Convert FailOnLevel to InspectionResult for comparison.
fn fail_on_to_result(level: FailOnLevel) -> InspectionResult {
    match level {
        FailOnLevel::Rework => InspectionResult::Rework,
        FailOnLevel::Reject => InspectionResult::Reject,
    }
}

/// Where the configuration came from, reported once logging is up.
enum ConfigOrigin {
    File(PathBuf),
    Defaults,
    Unreadable(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded config from {}", path.display()),
            ConfigOrigin::Defaults => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` must load; a broken default file falls back to
/// defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::File(config_path.clone())));
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::File(PathBuf::from(CONFIG_FILE_NAME)))),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Defaults)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Unreadable(e))),
    }
}
