//! Reply scanner for discovering classifier reply files.
//!
//! When replies are given as a directory instead of explicit paths, the
//! scanner picks the matching files and orders them by file name, which
//! is taken as the upload order.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Configuration for reply scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (e.g., ["json", "txt"])
    pub extensions: Vec<String>,
    /// How deep to descend below the reply directory (1 = direct children)
    pub max_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string(), "txt".to_string()],
            max_depth: 1,
        }
    }
}

impl From<&crate::config::ViewsConfig> for ScanConfig {
    fn from(config: &crate::config::ViewsConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            max_depth: config.max_depth,
        }
    }
}

/// Scanner for discovering reply files.
pub struct ReplyScanner {
    config: ScanConfig,
}

impl ReplyScanner {
    /// Create a new reply scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan a directory for reply files, sorted by file name.
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(self.config.max_depth.max(1))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_visible);

        for entry in walker {
            let entry =
                entry.with_context(|| format!("Failed to scan directory: {}", dir.display()))?;

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            } else {
                debug!("Skipping {}", entry.path().display());
            }
        }

        Ok(files)
    }

    /// Check if a file has one of the configured extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.config
            .extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    }
}

/// Hidden entries below the scanned root are skipped.
fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || !entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("03_side.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("01_front.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("02_back.TXT"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("photo.jpg"), "").unwrap();
        std::fs::write(temp_dir.path().join(".hidden.json"), "{}").unwrap();

        let scanner = ReplyScanner::new(ScanConfig::default());
        let files = scanner.scan(temp_dir.path()).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["01_front.json", "02_back.TXT", "03_side.json"]);
    }

    #[test]
    fn test_scan_respects_depth() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
        std::fs::write(temp_dir.path().join("nested").join("a.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("b.json"), "{}").unwrap();

        let shallow = ReplyScanner::new(ScanConfig::default());
        assert_eq!(shallow.scan(temp_dir.path()).unwrap().len(), 1);

        let deep = ReplyScanner::new(ScanConfig {
            max_depth: 2,
            ..ScanConfig::default()
        });
        assert_eq!(deep.scan(temp_dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_scan_missing_dir_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = ReplyScanner::new(ScanConfig::default());
        assert!(scanner.scan(&temp_dir.path().join("nope")).is_err());
    }
}
