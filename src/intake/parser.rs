//! Parsing of classifier replies.
//!
//! A reply is whatever text the vision classifier returned for one image.
//! The JSON object is located between the first `{` and the last `}` so
//! that surrounding prose or code fences are tolerated.

use crate::models::{Confidence, DefectReport, OverallCondition};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Note attached to the fallback report when a reply has no JSON object.
pub const FALLBACK_NOTE: &str = "API response parsing failed - raw response logged";

/// Why a reply could not be turned into a defect report.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Failed to read reply {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse one classifier reply for the view named `angle`.
///
/// Returns a fallback report when the text contains no JSON object at all,
/// and an error when it contains one that does not parse.
pub fn parse_reply(text: &str, angle: &str) -> Result<DefectReport, IntakeError> {
    let Some(json_str) = extract_json_object(text) else {
        debug!("No JSON object in reply for {}, using fallback", angle);
        return Ok(fallback_report(angle));
    };

    let json: Value = serde_json::from_str(json_str)?;
    Ok(json_to_report(&json, angle))
}

/// The slice between the first `{` and the last `}`, if any.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Report used when the classifier answered without any JSON.
pub fn fallback_report(angle: &str) -> DefectReport {
    DefectReport {
        angle: angle.to_string(),
        critical_defects: Vec::new(),
        major_defects: Vec::new(),
        minor_defects: Vec::new(),
        overall_condition: OverallCondition::Fair,
        confidence: Confidence::Low,
        notes: Some(FALLBACK_NOTE.to_string()),
    }
}

fn json_to_report(json: &Value, angle: &str) -> DefectReport {
    let reply_angle = json["angle"]
        .as_str()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(angle);

    let overall_condition = json["overall_condition"]
        .as_str()
        .and_then(OverallCondition::parse)
        .unwrap_or(OverallCondition::Fair);

    let confidence = json["confidence"]
        .as_str()
        .and_then(Confidence::parse)
        .unwrap_or(Confidence::Low);

    let notes = json["inspection_notes"]
        .as_str()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);

    DefectReport {
        angle: reply_angle.to_string(),
        critical_defects: string_list(&json["critical_defects"]),
        major_defects: string_list(&json["major_defects"]),
        minor_defects: string_list(&json["minor_defects"]),
        overall_condition,
        confidence,
        notes,
    }
}

/// Strings from a JSON array; anything else yields an empty list.
fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let reply = r#"{
            "angle": "Front View",
            "critical_defects": [],
            "major_defects": ["Toe cap asymmetry, left side 3mm lower"],
            "minor_defects": ["Thread end untrimmed at eyelet 2", "Glue residue at toe"],
            "overall_condition": "Fair",
            "confidence": "High",
            "inspection_notes": "Good lighting."
        }"#;

        let report = parse_reply(reply, "Front View").unwrap();

        assert_eq!(report.angle, "Front View");
        assert!(report.critical_defects.is_empty());
        assert_eq!(report.major_defects.len(), 1);
        assert_eq!(report.minor_defects.len(), 2);
        assert_eq!(report.overall_condition, OverallCondition::Fair);
        assert_eq!(report.confidence, Confidence::High);
        assert_eq!(report.notes.as_deref(), Some("Good lighting."));
    }

    #[test]
    fn test_parse_reply_wrapped_in_prose() {
        let reply = "Here is my assessment:\n```json\n{\"major_defects\": [\"Heel tab crooked\"], \"overall_condition\": \"poor\", \"confidence\": \"medium\"}\n```\nLet me know.";

        let report = parse_reply(reply, "Back View").unwrap();

        assert_eq!(report.angle, "Back View");
        assert_eq!(report.major_defects, vec!["Heel tab crooked"]);
        assert_eq!(report.overall_condition, OverallCondition::Poor);
        assert_eq!(report.confidence, Confidence::Medium);
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let report = parse_reply("{}", "Top View").unwrap();

        assert_eq!(report.angle, "Top View");
        assert!(report.is_clean());
        assert_eq!(report.overall_condition, OverallCondition::Fair);
        assert_eq!(report.confidence, Confidence::Low);
        assert!(report.notes.is_none());
    }

    #[test]
    fn test_non_string_items_skipped() {
        let reply = r#"{"minor_defects": ["scuff", 3, null, "stain"], "major_defects": "none"}"#;
        let report = parse_reply(reply, "Sole View").unwrap();

        assert_eq!(report.minor_defects, vec!["scuff", "stain"]);
        assert!(report.major_defects.is_empty());
    }

    #[test]
    fn test_no_json_yields_fallback() {
        let report = parse_reply("I cannot inspect this image.", "Left Side View").unwrap();

        assert_eq!(report, fallback_report("Left Side View"));
        assert_eq!(report.notes.as_deref(), Some(FALLBACK_NOTE));
    }

    #[test]
    fn test_reversed_braces_yield_fallback() {
        let report = parse_reply("} nothing here {", "Top View").unwrap();
        assert_eq!(report.confidence, Confidence::Low);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = parse_reply(r#"{"major_defects": ["unterminated}"#, "Front View");
        assert!(matches!(result, Err(IntakeError::Json(_))));
    }

    #[test]
    fn test_template_placeholder_condition_falls_back() {
        let reply = r#"{"overall_condition": "Good/Fair/Poor", "confidence": "High/Medium/Low"}"#;
        let report = parse_reply(reply, "Front View").unwrap();

        assert_eq!(report.overall_condition, OverallCondition::Fair);
        assert_eq!(report.confidence, Confidence::Low);
    }
}
