//! Self-contained HTML report.
//!
//! Everything coming from the classifier or the command line is escaped
//! before it is placed in the document.

use super::RenderOptions;
use crate::models::{DefectSeverity, ExportReport, InspectionResult, ViewAnalysis};

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f4f6fb; color: #2d3748; padding: 24px; }
        .container { max-width: 960px; margin: 0 auto; background: #fff; border-radius: 16px; box-shadow: 0 10px 40px rgba(0,0,0,0.08); overflow: hidden; }
        header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: #fff; padding: 32px; }
        header h1 { font-size: 1.8em; margin-bottom: 6px; }
        .subtitle { opacity: 0.85; }
        section { padding: 24px 32px; border-bottom: 1px solid #edf2f7; }
        h2 { font-size: 1.2em; margin-bottom: 14px; }
        .order-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; }
        .order-grid div { background: #f7fafc; border-radius: 8px; padding: 10px 12px; }
        .label { display: block; font-size: 0.75em; text-transform: uppercase; color: #718096; }
        .result { border-radius: 12px; padding: 20px; text-align: center; font-size: 1.6em; font-weight: 700; }
        .result-accept { background: #f0fff4; color: #276749; border: 2px solid #48bb78; }
        .result-rework { background: #fffaf0; color: #9c4221; border: 2px solid #ed8936; }
        .result-reject { background: #fff5f5; color: #9b2c2c; border: 2px solid #f56565; }
        .rationale { margin-top: 12px; padding: 12px; background: #f7fafc; border-left: 4px solid #667eea; }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 10px; text-align: center; border-bottom: 1px solid #edf2f7; }
        th:first-child, td:first-child { text-align: left; }
        .exceeded { color: #c53030; font-weight: 700; }
        .ok { color: #2f855a; font-weight: 700; }
        ol { padding-left: 24px; }
        li { margin: 4px 0; }
        .empty { color: #2f855a; }
        .view { border: 1px solid #e2e8f0; border-radius: 10px; padding: 14px; margin-bottom: 12px; }
        .view h3 { font-size: 1em; margin-bottom: 8px; }
        .notes { font-style: italic; color: #4a5568; margin-top: 8px; }
        footer { padding: 20px 32px; font-size: 0.85em; color: #718096; text-align: center; }
"#;

/// Generate the HTML report.
pub fn generate_html_report(report: &ExportReport, options: RenderOptions) -> String {
    let summary = &report.inspection_summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!(
        "    <title>QC Report - PO {} - {}</title>\n",
        escape_html(&summary.po_number),
        escape_html(&summary.style_number)
    ));
    html.push_str(&format!("    <style>{}    </style>\n", STYLE));
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");

    html.push_str("<header>\n");
    html.push_str("    <h1>🔍 Footwear Quality Control Inspection Report</h1>\n");
    html.push_str(&format!(
        "    <p class=\"subtitle\">Footwear Analysis • {} Standard</p>\n",
        escape_html(&summary.inspection_standard)
    ));
    html.push_str("</header>\n");

    html.push_str(&order_section(report));
    html.push_str(&result_section(report));
    html.push_str(&summary_section(report));

    for severity in DefectSeverity::ALL {
        html.push_str(&defect_list_section(report, severity));
    }

    if options.include_view_details {
        html.push_str("<section>\n    <h2>🔎 Detailed Analysis by View</h2>\n");
        for view in &report.angle_analyses {
            html.push_str(&view_card(view, options.include_notes));
        }
        html.push_str("</section>\n");
    }

    html.push_str(&format!(
        "<footer>Generated {} • ShoeQC</footer>\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</div>\n</body>\n</html>\n");

    html
}

fn order_section(report: &ExportReport) -> String {
    let summary = &report.inspection_summary;
    let fields = [
        ("PO Number", &summary.po_number),
        ("Style Number", &summary.style_number),
        ("Color", &summary.color),
        ("Customer", &summary.customer),
        ("Inspector", &summary.inspector),
        ("Inspection Date", &summary.inspection_date),
    ];

    let mut section = String::from("<section>\n    <h2>📋 Order Information</h2>\n");
    section.push_str("    <div class=\"order-grid\">\n");
    for (label, value) in fields {
        section.push_str(&format!(
            "        <div><span class=\"label\">{}</span>{}</div>\n",
            label,
            escape_html(value)
        ));
    }
    section.push_str("    </div>\n</section>\n");

    section
}

fn result_section(report: &ExportReport) -> String {
    let result = report.inspection_summary.final_result;
    let class = match result {
        InspectionResult::Accept => "result-accept",
        InspectionResult::Rework => "result-rework",
        InspectionResult::Reject => "result-reject",
    };

    format!(
        "<section>\n    <h2>🎯 Final Inspection Result</h2>\n    <div class=\"result {}\">{}</div>\n    <div class=\"rationale\"><strong>📋 Decision Rationale:</strong> {}</div>\n</section>\n",
        class,
        result.banner(),
        escape_html(&report.decision_rationale)
    )
}

fn summary_section(report: &ExportReport) -> String {
    let mut section = format!(
        "<section>\n    <h2>📊 Defect Summary ({} Standard)</h2>\n    <table>\n",
        escape_html(&report.inspection_summary.inspection_standard)
    );
    section.push_str(
        "        <tr><th>Severity</th><th>Found</th><th>AQL Limit</th><th>Status</th></tr>\n",
    );

    for severity in DefectSeverity::ALL {
        let count = report.count(severity);
        let limit = report.limit(severity);
        let (class, status) = if count > limit {
            ("exceeded", "Exceeded")
        } else {
            ("ok", "Within limit")
        };
        section.push_str(&format!(
            "        <tr><td>{} {}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
            severity.emoji(),
            severity,
            count,
            limit,
            class,
            status
        ));
    }

    section.push_str("    </table>\n</section>\n");
    section
}

fn defect_list_section(report: &ExportReport, severity: DefectSeverity) -> String {
    let mut section = format!(
        "<section>\n    <h2>{} {} Defects ({})</h2>\n",
        severity.emoji(),
        severity,
        severity.tagline()
    );

    let defects = report.defect_details.defects(severity);
    if defects.is_empty() {
        section.push_str(&format!(
            "    <p class=\"empty\">✅ No {} defects identified</p>\n",
            severity.to_string().to_lowercase()
        ));
    } else {
        section.push_str("    <ol>\n");
        for defect in defects {
            section.push_str(&format!("        <li>{}</li>\n", escape_html(defect)));
        }
        section.push_str("    </ol>\n");
    }

    section.push_str("</section>\n");
    section
}

fn view_card(view: &ViewAnalysis, include_notes: bool) -> String {
    let Some(ref analysis) = view.report else {
        return format!(
            "    <div class=\"view\"><h3>⚫ {}</h3><p>Classification unavailable for this view.</p></div>\n",
            escape_html(&view.angle)
        );
    };

    let mut card = format!(
        "    <div class=\"view\">\n        <h3>{} {} - {} (Confidence: {})</h3>\n",
        analysis.overall_condition.emoji(),
        escape_html(&view.angle),
        analysis.overall_condition,
        analysis.confidence
    );

    if analysis.is_clean() {
        card.push_str("        <p class=\"empty\">✅ No defects detected in this view</p>\n");
    }

    for severity in DefectSeverity::ALL {
        let defects = analysis.defects(severity);
        if !defects.is_empty() {
            let joined: Vec<String> = defects.iter().map(|d| escape_html(d)).collect();
            card.push_str(&format!(
                "        <p><strong>{} {}:</strong> {}</p>\n",
                severity.emoji(),
                severity,
                joined.join(" | ")
            ));
        }
    }

    if include_notes {
        if let Some(ref notes) = analysis.notes {
            card.push_str(&format!(
                "        <p class=\"notes\">Inspector Notes: {}</p>\n",
                escape_html(notes)
            ));
        }
    }

    card.push_str("    </div>\n");
    card
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}
