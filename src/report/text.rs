//! Styled plain-text report.

use super::RenderOptions;
use crate::models::{DefectSeverity, ExportReport, ViewAnalysis};

const WIDTH: usize = 70;

/// Generate the styled text report.
pub fn generate_text_report(report: &ExportReport, options: RenderOptions) -> String {
    let main_separator = "═".repeat(WIDTH);
    let sub_separator = "─".repeat(WIDTH);
    let section_separator = "•".repeat(WIDTH);

    let summary = &report.inspection_summary;
    let mut out = String::new();

    out.push_str(&format!("{}\n", main_separator));
    out.push_str("🔍 FOOTWEAR QUALITY CONTROL INSPECTION REPORT\n");
    out.push_str(&format!("{}\n\n", main_separator));

    out.push_str("📋 ORDER INFORMATION\n");
    out.push_str(&format!("{}\n", sub_separator));
    out.push_str(&format!("📦 PO Number          : {}\n", summary.po_number));
    out.push_str(&format!("👟 Style Number       : {}\n", summary.style_number));
    out.push_str(&format!("🎨 Color Code         : {}\n", summary.color));
    out.push_str(&format!("🏢 Customer           : {}\n", summary.customer));
    out.push_str(&format!("👤 Inspector          : {}\n", summary.inspector));
    out.push_str(&format!("📅 Inspection Date    : {}\n", summary.inspection_date));
    out.push_str(&format!(
        "⚡ Standard Applied   : {} International Standard\n\n",
        summary.inspection_standard
    ));

    out.push_str(&format!("{}\n\n", section_separator));

    out.push_str("🎯 FINAL INSPECTION RESULT\n");
    out.push_str(&format!("{}\n", sub_separator));
    out.push_str(&format!("{}\n\n", summary.final_result.banner()));
    out.push_str("📝 DECISION RATIONALE:\n");
    out.push_str(&format!("{}\n\n", report.decision_rationale));

    out.push_str(&format!("{}\n\n", section_separator));

    out.push_str(&format!(
        "📊 DEFECT SUMMARY ({} COMPLIANCE)\n",
        summary.inspection_standard
    ));
    out.push_str(&format!("{}\n", sub_separator));
    for severity in DefectSeverity::ALL {
        let label = format!("{} Defects", severity);
        out.push_str(&format!(
            "{} {:<17}: {:>3} / {:>3} (Limit)\n",
            severity.emoji(),
            label,
            report.count(severity),
            report.limit(severity)
        ));
    }

    for severity in DefectSeverity::ALL {
        out.push_str(&format!("\n{}\n\n", section_separator));
        out.push_str(&format!(
            "{} {} DEFECTS ({})\n",
            severity.emoji(),
            severity.to_string().to_uppercase(),
            severity.tagline()
        ));
        out.push_str(&format!("{}\n", sub_separator));

        let defects = report.defect_details.defects(severity);
        if defects.is_empty() {
            out.push_str(&format!(
                "✅ No {} defects identified\n",
                severity.to_string().to_lowercase()
            ));
        } else {
            for (i, defect) in defects.iter().enumerate() {
                out.push_str(&format!("{} {:2}. {}\n", bullet(severity), i + 1, defect));
            }
        }
    }

    if options.include_view_details {
        out.push_str(&format!("\n{}\n\n", section_separator));
        out.push_str("🔎 DETAILED ANALYSIS BY VIEW\n");
        out.push_str(&format!("{}\n", sub_separator));
        for view in &report.angle_analyses {
            out.push_str(&view_block(view, options.include_notes));
        }
    }

    out.push_str(&format!("\n{}\n\n", main_separator));
    out.push_str("📊 REPORT METADATA\n");
    out.push_str(&format!("{}\n", sub_separator));
    out.push_str(&format!(
        "• Report Generated   : {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "• Views Inspected    : {}\n",
        report.angle_analyses.len()
    ));
    out.push_str(&format!("{}\n", main_separator));

    out
}

fn bullet(severity: DefectSeverity) -> &'static str {
    match severity {
        DefectSeverity::Critical => "❗",
        DefectSeverity::Major => "🔶",
        DefectSeverity::Minor => "🔸",
    }
}

fn view_block(view: &ViewAnalysis, include_notes: bool) -> String {
    let Some(ref analysis) = view.report else {
        return format!("⚫ {} - classification unavailable\n", view.angle);
    };

    let mut block = format!(
        "{} {} - {} (Confidence: {})\n",
        analysis.overall_condition.emoji(),
        view.angle,
        analysis.overall_condition,
        analysis.confidence
    );

    if analysis.is_clean() {
        block.push_str("   ✅ No defects detected in this view\n");
    }

    for severity in DefectSeverity::ALL {
        let defects = analysis.defects(severity);
        if !defects.is_empty() {
            block.push_str(&format!("   {}: {}\n", severity, defects.join(" | ")));
        }
    }

    if include_notes {
        if let Some(ref notes) = analysis.notes {
            block.push_str(&format!("   Notes: {}\n", notes));
        }
    }

    block
}
