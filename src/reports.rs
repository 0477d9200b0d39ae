//
// reports.rs
// Dicom-Preprocessor-rs
//
// Report collaborator: loads free-text radiology reports and keys them by exam type.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

const EXAM_MARKER: &str = "EXAM:";

/// Key for a report: `CT`, `MR` or `CR` when the exam line names one, else `fallback`.
pub fn classify_report(content: &str, fallback: &str) -> String {
    let exam_line = content
        .lines()
        .map(|line| line.trim().to_uppercase())
        .find(|line| line.starts_with(EXAM_MARKER))
        .unwrap_or_default();

    if exam_line.starts_with("EXAM: CT") || exam_line.starts_with("EXAM:CT") {
        "CT".to_string()
    } else if exam_line.starts_with("EXAM: MR") || exam_line.starts_with("EXAM:MR") {
        "MR".to_string()
    } else if exam_line.contains("CHEST")
        || exam_line.contains("X RAY")
        || exam_line.contains("XR ")
    {
        "CR".to_string()
    } else {
        fallback.to_string()
    }
}

/// Read every `.txt` report under `dir`, in sorted path order.
///
/// A missing directory yields no reports. When two files map to the same
/// key, the one visited last wins.
pub fn load_reports(dir: &Path) -> BTreeMap<String, String> {
    let mut reports = BTreeMap::new();
    if !dir.is_dir() {
        return reports;
    }

    let files = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("txt"))
        });

    for entry in files {
        let path = entry.path();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping unreadable report {:?}: {}", path, e);
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes).trim().to_string();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = classify_report(&content, &stem);
        reports.insert(key, content);
    }

    reports
}
