//! Defect aggregation and AQL decision.
//!
//! This module combines the per-view defect reports of one inspection
//! batch into a single verdict and provides the summary statistics the
//! report generators need.

use crate::models::{
    DefectReport, DefectSeverity, InspectionResult, InspectionVerdict, OverallCondition,
    AQL_LIMITS,
};
use std::collections::{HashMap, HashSet};

/// Aggregate all views of a batch into one verdict.
///
/// `None` entries are views whose classification failed; they contribute
/// nothing. Defects are deduplicated by exact text, keeping the first
/// occurrence across the whole batch.
pub fn aggregate(reports: &[Option<DefectReport>]) -> InspectionVerdict {
    let present: Vec<&DefectReport> = reports.iter().flatten().collect();

    let critical_defects = collect_unique(&present, DefectSeverity::Critical);
    let major_defects = collect_unique(&present, DefectSeverity::Major);
    let minor_defects = collect_unique(&present, DefectSeverity::Minor);

    let critical_count = critical_defects.len();
    let major_count = major_defects.len();
    let minor_count = minor_defects.len();

    let limits = AQL_LIMITS;

    let (result, reason) = if critical_count > limits.critical {
        (
            InspectionResult::Reject,
            format!(
                "Critical defects found ({}) - Zero tolerance policy",
                critical_count
            ),
        )
    } else if major_count > limits.major {
        (
            InspectionResult::Reject,
            format!(
                "Major defects ({}) exceed AQL limit ({})",
                major_count, limits.major
            ),
        )
    } else if minor_count > limits.minor {
        (
            InspectionResult::Rework,
            format!(
                "Minor defects ({}) exceed AQL limit ({})",
                minor_count, limits.minor
            ),
        )
    } else {
        (
            InspectionResult::Accept,
            "All defects within acceptable AQL 2.5 limits".to_string(),
        )
    };

    InspectionVerdict {
        result,
        reason,
        critical_count,
        major_count,
        minor_count,
        critical_defects,
        major_defects,
        minor_defects,
        aql_limits: limits,
    }
}

/// Concatenate one severity class across reports and drop repeats.
fn collect_unique(reports: &[&DefectReport], severity: DefectSeverity) -> Vec<String> {
    dedup_stable(
        reports
            .iter()
            .flat_map(|report| report.defects(severity).iter()),
    )
}

/// Remove duplicate strings, keeping each value at its first position.
pub fn dedup_stable<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique = Vec::new();

    for item in items {
        if seen.insert(item.as_str()) {
            unique.push(item.clone());
        }
    }

    unique
}

/// Count present views by overall condition.
pub fn condition_breakdown(reports: &[Option<DefectReport>]) -> HashMap<OverallCondition, usize> {
    let mut breakdown: HashMap<OverallCondition, usize> = HashMap::new();

    for report in reports.iter().flatten() {
        *breakdown.entry(report.overall_condition).or_default() += 1;
    }

    breakdown
}

/// Number of views that produced a report.
pub fn views_analyzed(reports: &[Option<DefectReport>]) -> usize {
    reports.iter().filter(|r| r.is_some()).count()
}

/// Number of views whose classification failed.
pub fn views_failed(reports: &[Option<DefectReport>]) -> usize {
    reports.iter().filter(|r| r.is_none()).count()
}

/// Remaining allowance before a severity class breaches its limit.
///
/// Negative when the limit is already exceeded.
pub fn limit_headroom(verdict: &InspectionVerdict, severity: DefectSeverity) -> i64 {
    verdict.aql_limits.for_severity(severity) as i64 - verdict.count(severity) as i64
}
