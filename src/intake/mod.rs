//! Intake of classifier replies.
//!
//! Each uploaded image has exactly one reply file. Replies are read in
//! upload order and every failure is turned into an absent report so the
//! aggregation step never sees an error.

pub mod parser;

pub use parser::{parse_reply, IntakeError};

use crate::models::DefectReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard viewing angles, in the order photos are expected.
pub const DEFAULT_ANGLE_NAMES: [&str; 6] = [
    "Front View",
    "Back View",
    "Left Side View",
    "Right Side View",
    "Top View",
    "Sole View",
];

/// One uploaded view after intake.
#[derive(Debug, Clone)]
pub struct ReplyEntry {
    /// Angle assigned from the upload position.
    pub angle: String,
    /// Path the reply was read from.
    pub source: PathBuf,
    /// `None` when the reply was missing or malformed.
    pub report: Option<DefectReport>,
}

/// Angle label for the view at `index` (0-based upload position).
pub fn angle_name(index: usize, names: &[String]) -> String {
    names
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Additional View {}", index + 1))
}

/// Read and parse one reply file.
pub fn read_reply(path: &Path, angle: &str) -> Result<DefectReport, IntakeError> {
    let text = std::fs::read_to_string(path).map_err(|source| IntakeError::Read {
        path: path.display().to_string(),
        source,
    })?;

    parse_reply(&text, angle)
}

/// Load one reply, mapping any failure to an absent report.
pub fn load_reply(path: &Path, angle: &str) -> Option<DefectReport> {
    match read_reply(path, angle) {
        Ok(report) => {
            debug!(
                "{}: {} critical, {} major, {} minor",
                angle,
                report.critical_defects.len(),
                report.major_defects.len(),
                report.minor_defects.len()
            );
            Some(report)
        }
        Err(e) => {
            warn!("Error analyzing {}: {}", angle, e);
            None
        }
    }
}

/// Load all replies in upload order.
pub fn collect_replies(
    paths: &[PathBuf],
    angle_names: &[String],
    show_progress: bool,
) -> Vec<ReplyEntry> {
    info!("Collecting {} classifier replies", paths.len());

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(paths.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let mut entries = Vec::with_capacity(paths.len());

    for (idx, path) in paths.iter().enumerate() {
        let angle = angle_name(idx, angle_names);

        if let Some(ref pb) = progress_bar {
            pb.set_message(format!("Analyzing {}...", angle));
        }

        let report = load_reply(path, &angle);
        entries.push(ReplyEntry {
            angle,
            source: path.clone(),
            report,
        });

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Analysis complete");
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn default_names() -> Vec<String> {
        DEFAULT_ANGLE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_angle_name() {
        let names = default_names();
        assert_eq!(angle_name(0, &names), "Front View");
        assert_eq!(angle_name(5, &names), "Sole View");
        assert_eq!(angle_name(6, &names), "Additional View 7");
        assert_eq!(angle_name(0, &[]), "Additional View 1");
    }

    #[test]
    fn test_load_reply_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        assert!(matches!(
            read_reply(&path, "Front View"),
            Err(IntakeError::Read { .. })
        ));
        assert!(load_reply(&path, "Front View").is_none());
    }

    #[test]
    fn test_collect_replies_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let front = temp_dir.path().join("01.json");
        let back = temp_dir.path().join("02.json");
        let side = temp_dir.path().join("03.json");

        std::fs::write(&front, r#"{"major_defects": ["A"], "confidence": "High"}"#).unwrap();
        std::fs::write(&back, r#"{"major_defects": ["B",]}"#).unwrap();
        std::fs::write(&side, "no json here").unwrap();

        let entries = collect_replies(&[front, back, side], &default_names(), false);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].angle, "Front View");
        assert_eq!(
            entries[0].report.as_ref().map(|r| r.major_defects.clone()),
            Some(vec!["A".to_string()])
        );
        assert_eq!(entries[1].angle, "Back View");
        assert!(entries[1].report.is_none());
        assert_eq!(entries[2].angle, "Left Side View");
        assert_eq!(
            entries[2].report.as_ref().and_then(|r| r.notes.clone()),
            Some(parser::FALLBACK_NOTE.to_string())
        );
    }
}
