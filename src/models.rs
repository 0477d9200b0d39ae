//
// models.rs
// Dicom-Preprocessor-rs
//
// Serializable data structures: normalized per-image metadata and the metadata.json index document.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Patient identity as written to the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    pub name: String,
    pub id: String,
    pub birth_date: String,
    pub sex: String,
}

/// Study-level attributes as read from one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyInfo {
    pub uid: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub modality: String,
    pub institution: String,
    pub referring_physician: String,
    pub accession: String,
}

/// Series-level attributes as read from one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInfo {
    pub uid: String,
    pub number: i64,
    pub description: String,
    pub body_part: String,
}

/// Normalized metadata of a single image; every field has a defined default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub patient: PatientInfo,
    pub study: StudyInfo,
    pub series: SeriesInfo,
    pub instance_number: i64,
    pub slice_location: f64,
    pub rows: i64,
    pub columns: i64,
}

/// Series entry of the index, in final slice order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEntry {
    pub uid: String,
    pub number: i64,
    pub description: String,
    pub body_part: String,
    pub slice_count: usize,
    pub rows: i64,
    pub columns: i64,
    pub images: Vec<String>,
}

/// Study entry of the index, with its series already ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyEntry {
    pub uid: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub modality: String,
    pub institution: String,
    pub referring_physician: String,
    pub accession: String,
    pub series: Vec<SeriesEntry>,
}

/// Outcome counts of a run plus provenance of the source media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryInfo {
    pub total_files: usize,
    pub intact_files: usize,
    pub damaged_files: usize,
    pub error_files: usize,
    pub recovery_date: String,
    pub source_media: String,
}

/// The metadata.json document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataIndex {
    pub patient: Option<PatientInfo>,
    pub studies: Vec<StudyEntry>,
    pub reports: BTreeMap<String, String>,
    pub recovery_info: RecoveryInfo,
}
