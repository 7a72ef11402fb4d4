//! Data models for the inspection tool.
//!
//! This module contains the core data structures used throughout
//! the application for representing per-view defect reports, the
//! batch verdict, and the exported report document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall condition the classifier assigned to a single view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallCondition {
    /// No visible defects or only very minor cosmetic issues
    Good,
    /// Minor defects present but within acceptable limits
    Fair,
    /// Major defects present or excessive minor defects
    Poor,
}

impl fmt::Display for OverallCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallCondition::Good => write!(f, "Good"),
            OverallCondition::Fair => write!(f, "Fair"),
            OverallCondition::Poor => write!(f, "Poor"),
        }
    }
}

impl OverallCondition {
    /// Parse a classifier label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "good" => Some(OverallCondition::Good),
            "fair" => Some(OverallCondition::Fair),
            "poor" => Some(OverallCondition::Poor),
            _ => None,
        }
    }

    /// Returns an emoji representation of the condition.
    pub fn emoji(&self) -> &'static str {
        match self {
            OverallCondition::Good => "🟢",
            OverallCondition::Fair => "🟡",
            OverallCondition::Poor => "🔴",
        }
    }
}

/// How confident the classifier was in its assessment of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

impl Confidence {
    /// Parse a classifier label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

/// Defect severity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectSeverity {
    Minor,
    Major,
    Critical,
}

impl fmt::Display for DefectSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefectSeverity::Minor => write!(f, "Minor"),
            DefectSeverity::Major => write!(f, "Major"),
            DefectSeverity::Critical => write!(f, "Critical"),
        }
    }
}

impl DefectSeverity {
    /// All severities, most severe first (report order).
    pub const ALL: [DefectSeverity; 3] = [
        DefectSeverity::Critical,
        DefectSeverity::Major,
        DefectSeverity::Minor,
    ];

    /// Returns an emoji representation of the severity.
    pub fn emoji(&self) -> &'static str {
        match self {
            DefectSeverity::Critical => "🚨",
            DefectSeverity::Major => "⚠️",
            DefectSeverity::Minor => "ℹ️",
        }
    }

    /// Short description of what the class means to the customer.
    pub fn tagline(&self) -> &'static str {
        match self {
            DefectSeverity::Critical => "Zero Tolerance",
            DefectSeverity::Major => "Customer Impact",
            DefectSeverity::Minor => "Cosmetic Issues",
        }
    }
}

/// Final decision for an inspection batch.
///
/// Ordered by how bad the outcome is, so `--fail-on` can compare levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InspectionResult {
    Accept,
    Rework,
    Reject,
}

impl fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionResult::Accept => write!(f, "ACCEPT"),
            InspectionResult::Rework => write!(f, "REWORK"),
            InspectionResult::Reject => write!(f, "REJECT"),
        }
    }
}

impl InspectionResult {
    /// Returns the banner shown in text and Markdown reports.
    pub fn banner(&self) -> &'static str {
        match self {
            InspectionResult::Accept => "✅ ACCEPTED",
            InspectionResult::Rework => "🔄 REQUIRES REWORK",
            InspectionResult::Reject => "❌ REJECTED",
        }
    }
}

/// Acceptance Quality Limits applied to every batch (AQL 2.5, sample size 200).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqlLimits {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

/// The one set of limits the tool applies.
pub const AQL_LIMITS: AqlLimits = AqlLimits {
    critical: 0,
    major: 10,
    minor: 14,
};

impl AqlLimits {
    /// Limit for a given severity class.
    pub fn for_severity(&self, severity: DefectSeverity) -> usize {
        match severity {
            DefectSeverity::Critical => self.critical,
            DefectSeverity::Major => self.major,
            DefectSeverity::Minor => self.minor,
        }
    }
}

/// Defect classification for a single inspected view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectReport {
    /// Camera viewpoint label, e.g. "Front View".
    pub angle: String,
    #[serde(default)]
    pub critical_defects: Vec<String>,
    #[serde(default)]
    pub major_defects: Vec<String>,
    #[serde(default)]
    pub minor_defects: Vec<String>,
    pub overall_condition: OverallCondition,
    pub confidence: Confidence,
    #[serde(
        rename = "inspection_notes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl DefectReport {
    /// Defects of one severity class, in classifier order.
    pub fn defects(&self, severity: DefectSeverity) -> &[String] {
        match severity {
            DefectSeverity::Critical => &self.critical_defects,
            DefectSeverity::Major => &self.major_defects,
            DefectSeverity::Minor => &self.minor_defects,
        }
    }

    /// Whether the classifier found nothing at all on this view.
    pub fn is_clean(&self) -> bool {
        DefectSeverity::ALL
            .iter()
            .all(|&severity| self.defects(severity).is_empty())
    }
}

/// The aggregated decision for an inspection batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionVerdict {
    pub result: InspectionResult,
    pub reason: String,
    pub critical_count: usize,
    pub major_count: usize,
    pub minor_count: usize,
    pub critical_defects: Vec<String>,
    pub major_defects: Vec<String>,
    pub minor_defects: Vec<String>,
    pub aql_limits: AqlLimits,
}

impl InspectionVerdict {
    /// Unique defect count of one severity class.
    pub fn count(&self, severity: DefectSeverity) -> usize {
        match severity {
            DefectSeverity::Critical => self.critical_count,
            DefectSeverity::Major => self.major_count,
            DefectSeverity::Minor => self.minor_count,
        }
    }
}

/// Purchase-order metadata printed on every report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInfo {
    pub po_number: String,
    pub style_number: String,
    pub color: String,
    pub customer: String,
    pub inspector: String,
    /// Inspection date formatted as `YYYY-MM-DD`.
    pub inspection_date: String,
}

/// Header block of the exported report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionSummary {
    pub inspection_date: String,
    pub inspector: String,
    pub customer: String,
    pub po_number: String,
    pub style_number: String,
    pub color: String,
    pub final_result: InspectionResult,
    pub inspection_standard: String,
}

/// Counts against limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefectSummary {
    pub critical_count: usize,
    pub major_count: usize,
    pub minor_count: usize,
    pub aql_limits: AqlLimits,
}

/// The deduplicated defect lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefectDetails {
    pub critical_defects: Vec<String>,
    pub major_defects: Vec<String>,
    pub minor_defects: Vec<String>,
}

impl DefectDetails {
    pub fn defects(&self, severity: DefectSeverity) -> &[String] {
        match severity {
            DefectSeverity::Critical => &self.critical_defects,
            DefectSeverity::Major => &self.major_defects,
            DefectSeverity::Minor => &self.minor_defects,
        }
    }
}

/// One uploaded view as it appears in the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewAnalysis {
    /// Angle assigned from the upload position.
    pub angle: String,
    /// Where the classifier reply was read from.
    pub source: String,
    /// `None` when the classification failed for this view.
    pub report: Option<DefectReport>,
}

/// The complete exported inspection report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub inspection_summary: InspectionSummary,
    pub defect_summary: DefectSummary,
    pub defect_details: DefectDetails,
    pub angle_analyses: Vec<ViewAnalysis>,
    pub decision_rationale: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportReport {
    /// Count for one severity class from the summary block.
    pub fn count(&self, severity: DefectSeverity) -> usize {
        match severity {
            DefectSeverity::Critical => self.defect_summary.critical_count,
            DefectSeverity::Major => self.defect_summary.major_count,
            DefectSeverity::Minor => self.defect_summary.minor_count,
        }
    }

    /// Limit for one severity class from the summary block.
    pub fn limit(&self, severity: DefectSeverity) -> usize {
        self.defect_summary.aql_limits.for_severity(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ordering() {
        assert!(InspectionResult::Accept < InspectionResult::Rework);
        assert!(InspectionResult::Rework < InspectionResult::Reject);
    }

    #[test]
    fn test_result_serializes_uppercase() {
        let json = serde_json::to_string(&InspectionResult::Rework).unwrap();
        assert_eq!(json, "\"REWORK\"");
        assert_eq!(InspectionResult::Reject.to_string(), "REJECT");
    }

    #[test]
    fn test_condition_parse() {
        assert_eq!(OverallCondition::parse("good"), Some(OverallCondition::Good));
        assert_eq!(OverallCondition::parse(" POOR "), Some(OverallCondition::Poor));
        assert_eq!(OverallCondition::parse("Good/Fair/Poor"), None);
        assert_eq!(Confidence::parse("Medium"), Some(Confidence::Medium));
        assert_eq!(Confidence::parse("unsure"), None);
    }

    #[test]
    fn test_aql_limits() {
        assert_eq!(AQL_LIMITS.for_severity(DefectSeverity::Critical), 0);
        assert_eq!(AQL_LIMITS.for_severity(DefectSeverity::Major), 10);
        assert_eq!(AQL_LIMITS.for_severity(DefectSeverity::Minor), 14);
    }

    #[test]
    fn test_defect_report_missing_lists_deserialize_empty() {
        let json = r#"{
            "angle": "Sole View",
            "major_defects": ["Outsole molding incomplete"],
            "overall_condition": "Fair",
            "confidence": "High"
        }"#;
        let report: DefectReport = serde_json::from_str(json).unwrap();
        assert!(report.critical_defects.is_empty());
        assert!(report.minor_defects.is_empty());
        assert_eq!(report.defects(DefectSeverity::Major).len(), 1);
        assert!(report.notes.is_none());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_with_no_defects_is_clean() {
        let json = r#"{"angle": "Top View", "overall_condition": "Good", "confidence": "High"}"#;
        let report: DefectReport = serde_json::from_str(json).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.overall_condition, OverallCondition::Good);
    }
}
