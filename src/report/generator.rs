//! Markdown and JSON report generation.
//!
//! The JSON export is the lossless machine-readable form; the Markdown
//! report mirrors the text report for repositories and issue trackers.

use super::RenderOptions;
use crate::models::{DefectSeverity, ExportReport, ViewAnalysis};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ExportReport, options: RenderOptions) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Footwear Quality Control Inspection Report\n\n");

    output.push_str(&generate_order_section(report));
    output.push_str(&generate_result_section(report));
    output.push_str(&generate_summary_section(report));

    for severity in DefectSeverity::ALL {
        output.push_str(&generate_defect_list_section(report, severity));
    }

    if options.include_view_details {
        output.push_str(&generate_views_section(
            &report.angle_analyses,
            options.include_notes,
        ));
    }

    output.push_str(&generate_footer(report));

    output
}

/// Generate the order information section.
fn generate_order_section(report: &ExportReport) -> String {
    let summary = &report.inspection_summary;
    let mut section = String::new();

    section.push_str("## Order Information\n\n");
    section.push_str(&format!("- **PO Number:** {}\n", summary.po_number));
    section.push_str(&format!("- **Style Number:** {}\n", summary.style_number));
    section.push_str(&format!("- **Color:** {}\n", summary.color));
    section.push_str(&format!("- **Customer:** {}\n", summary.customer));
    section.push_str(&format!("- **Inspector:** {}\n", summary.inspector));
    section.push_str(&format!(
        "- **Inspection Date:** {}\n",
        summary.inspection_date
    ));
    section.push_str(&format!(
        "- **Standard:** {}\n\n",
        summary.inspection_standard
    ));

    section
}

/// Generate the final result section.
fn generate_result_section(report: &ExportReport) -> String {
    format!(
        "## Final Result: {}\n\n> **Decision rationale:** {}\n\n",
        report.inspection_summary.final_result.banner(),
        report.decision_rationale
    )
}

/// Generate the defect summary table.
fn generate_summary_section(report: &ExportReport) -> String {
    let mut section = String::new();

    section.push_str("## Defect Summary\n\n");
    section.push_str("| Severity | Found | AQL Limit | Status |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for severity in DefectSeverity::ALL {
        let count = report.count(severity);
        let limit = report.limit(severity);
        let status = if count > limit { "Exceeded" } else { "OK" };
        section.push_str(&format!(
            "| {} {} | {} | {} | {} |\n",
            severity.emoji(),
            severity,
            count,
            limit,
            status
        ));
    }
    section.push('\n');

    section
}

/// Generate the numbered list for one severity class.
fn generate_defect_list_section(report: &ExportReport, severity: DefectSeverity) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## {} {} Defects ({})\n\n",
        severity.emoji(),
        severity,
        severity.tagline()
    ));

    let defects = report.defect_details.defects(severity);
    if defects.is_empty() {
        section.push_str(&format!(
            "No {} defects identified.\n\n",
            severity.to_string().to_lowercase()
        ));
        return section;
    }

    for (i, defect) in defects.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, defect));
    }
    section.push('\n');

    section
}

/// Generate the per-view breakdown.
fn generate_views_section(views: &[ViewAnalysis], include_notes: bool) -> String {
    let mut section = String::new();

    section.push_str("## Detailed Analysis by View\n\n");

    for view in views {
        let Some(ref analysis) = view.report else {
            section.push_str(&format!(
                "### ⚫ {}\n\n*Classification unavailable for this view.*\n\n",
                view.angle
            ));
            continue;
        };

        section.push_str(&format!(
            "### {} {} - {} (Confidence: {})\n\n",
            analysis.overall_condition.emoji(),
            view.angle,
            analysis.overall_condition,
            analysis.confidence
        ));

        if analysis.is_clean() {
            section.push_str("No defects detected in this view.\n\n");
        } else {
            for severity in DefectSeverity::ALL {
                let defects = analysis.defects(severity);
                if !defects.is_empty() {
                    section.push_str(&format!(
                        "- **{}:** {}\n",
                        severity,
                        defects.join(" | ")
                    ));
                }
            }
            section.push('\n');
        }

        if include_notes {
            if let Some(ref notes) = analysis.notes {
                section.push_str(&format!("> **Inspector Notes:** {}\n\n", notes));
            }
        }
    }

    section
}

/// Generate the report footer.
fn generate_footer(report: &ExportReport) -> String {
    format!(
        "---\n\n*Generated {} by ShoeQC*\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ExportReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_report;

    #[test]
    fn test_generate_markdown_report() {
        let report = sample_report();
        let markdown = generate_markdown_report(&report, RenderOptions::default());

        assert!(markdown.contains("# Footwear Quality Control Inspection Report"));
        assert!(markdown.contains("## Order Information"));
        assert!(markdown.contains("0144540"));
        assert!(markdown.contains("✅ ACCEPTED"));
        assert!(markdown.contains("| ⚠️ Major | 1 | 10 | OK |"));
        assert!(markdown.contains("No critical defects identified."));
        assert!(markdown.contains("1. Thread end at eyelet"));
        assert!(markdown.contains("### 🟡 Front View - Fair (Confidence: High)"));
        assert!(markdown.contains("Classification unavailable"));
        assert!(markdown.contains("Lighting slightly uneven"));
    }

    #[test]
    fn test_markdown_without_view_details() {
        let report = sample_report();
        let options = RenderOptions {
            include_view_details: false,
            include_notes: true,
        };
        let markdown = generate_markdown_report(&report, options);

        assert!(!markdown.contains("Detailed Analysis by View"));
        assert!(!markdown.contains("Lighting slightly uneven"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = sample_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"inspection_summary\""));
        assert!(json.contains("\"final_result\": \"ACCEPT\""));
        assert!(json.contains("\"aql_limits\""));
        assert!(json.contains("\"decision_rationale\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["defect_summary"]["major_count"], 1);
        assert_eq!(value["defect_summary"]["aql_limits"]["major"], 10);
        assert!(value["angle_analyses"][1]["report"].is_null());
        assert_eq!(
            value["angle_analyses"][0]["report"]["inspection_notes"],
            "Lighting slightly uneven"
        );
    }
}
