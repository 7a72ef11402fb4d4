//! Report building and rendering.
//!
//! The verdict, order metadata and per-view analyses are assembled into an
//! [`ExportReport`], which every renderer consumes.

pub mod generator;
pub mod html;
pub mod text;

pub use generator::{generate_json_report, generate_markdown_report};
pub use html::generate_html_report;
pub use text::generate_text_report;

use crate::cli::ReportFormat;
use crate::intake::ReplyEntry;
use crate::models::{
    DefectDetails, DefectSummary, ExportReport, InspectionSummary, InspectionVerdict, OrderInfo,
    ViewAnalysis,
};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::Path;

/// Inspection standard printed on every report.
pub const INSPECTION_STANDARD: &str = "AQL 2.5";

/// Which optional sections human-readable reports include.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub include_view_details: bool,
    pub include_notes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_view_details: true,
            include_notes: true,
        }
    }
}

impl From<&crate::config::ReportConfig> for RenderOptions {
    fn from(config: &crate::config::ReportConfig) -> Self {
        Self {
            include_view_details: config.include_view_details,
            include_notes: config.include_notes,
        }
    }
}

/// Assemble the export document for a batch.
pub fn build_export_report(
    verdict: &InspectionVerdict,
    order: &OrderInfo,
    entries: &[ReplyEntry],
    generated_at: DateTime<Utc>,
) -> ExportReport {
    ExportReport {
        inspection_summary: InspectionSummary {
            inspection_date: order.inspection_date.clone(),
            inspector: order.inspector.clone(),
            customer: order.customer.clone(),
            po_number: order.po_number.clone(),
            style_number: order.style_number.clone(),
            color: order.color.clone(),
            final_result: verdict.result,
            inspection_standard: INSPECTION_STANDARD.to_string(),
        },
        defect_summary: DefectSummary {
            critical_count: verdict.critical_count,
            major_count: verdict.major_count,
            minor_count: verdict.minor_count,
            aql_limits: verdict.aql_limits,
        },
        defect_details: DefectDetails {
            critical_defects: verdict.critical_defects.clone(),
            major_defects: verdict.major_defects.clone(),
            minor_defects: verdict.minor_defects.clone(),
        },
        angle_analyses: entries
            .iter()
            .map(|entry| ViewAnalysis {
                angle: entry.angle.clone(),
                source: entry.source.display().to_string(),
                report: entry.report.clone(),
            })
            .collect(),
        decision_rationale: verdict.reason.clone(),
        generated_at,
    }
}

/// Render the report in one concrete format.
pub fn render(
    report: &ExportReport,
    format: ReportFormat,
    options: RenderOptions,
) -> Result<String> {
    match format {
        ReportFormat::Json => generate_json_report(report),
        ReportFormat::Html => Ok(generate_html_report(report, options)),
        ReportFormat::Text => Ok(generate_text_report(report, options)),
        ReportFormat::Markdown => Ok(generate_markdown_report(report, options)),
        ReportFormat::All => anyhow::bail!("'all' is not a single report format"),
    }
}

/// Default file name: `QC_Report_{po}_{style}_{YYYYmmdd_HHMMSS}.{ext}`.
///
/// `timestamp` is wall-clock local time; the report body keeps UTC.
pub fn report_file_name(
    order: &OrderInfo,
    format: ReportFormat,
    timestamp: NaiveDateTime,
) -> String {
    format!(
        "QC_Report_{}_{}_{}.{}",
        sanitize_component(&order.po_number),
        sanitize_component(&order.style_number),
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Keep file names portable when order fields contain separators.
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Write a rendered report, creating parent directories as needed.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::InspectionResult;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_build_export_report() {
        let report = sample_report();

        assert_eq!(report.inspection_summary.final_result, InspectionResult::Accept);
        assert_eq!(report.inspection_summary.inspection_standard, "AQL 2.5");
        assert_eq!(report.inspection_summary.po_number, "0144540");
        assert_eq!(report.defect_summary.major_count, 1);
        assert_eq!(report.defect_summary.aql_limits.minor, 14);
        assert_eq!(report.angle_analyses.len(), 2);
        assert!(report.angle_analyses[1].report.is_none());
        assert_eq!(
            report.decision_rationale,
            "All defects within acceptable AQL 2.5 limits"
        );
    }

    #[test]
    fn test_report_file_name() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(14, 30, 5))
            .unwrap();
        let mut order = sample_order();

        assert_eq!(
            report_file_name(&order, ReportFormat::Html, timestamp),
            "QC_Report_0144540_GS1412401B_20240601_143005.html"
        );

        order.style_number = "GS/14 B".to_string();
        assert_eq!(
            report_file_name(&order, ReportFormat::Json, timestamp),
            "QC_Report_0144540_GS-14-B_20240601_143005.json"
        );
    }

    #[test]
    fn test_render_rejects_all() {
        let report = sample_report();
        assert!(render(&report, ReportFormat::All, RenderOptions::default()).is_err());
        assert!(render(&report, ReportFormat::Text, RenderOptions::default()).is_ok());
    }

    #[test]
    fn test_write_report_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("report.txt");

        write_report(&path, "hello").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }
}
