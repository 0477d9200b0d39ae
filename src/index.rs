//
// index.rs
// Dicom-Preprocessor-rs
//
// Index builder: lays ordered studies out on disk and assembles the metadata.json document.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::BTreeMap;

use crate::aggregate::StudyGroup;
use crate::models::{MetadataIndex, PatientInfo, RecoveryInfo, SeriesEntry, StudyEntry};
use crate::record::ImageRecord;
use crate::stats::RecoveryStats;
use crate::storage;

/// Where a study goes on disk: its index entry plus each slice's relative path.
#[derive(Debug)]
pub struct StudyLayout<'a> {
    pub dir_name: String,
    pub entry: StudyEntry,
    pub slices: Vec<(String, &'a ImageRecord)>,
}

/// Run-level facts copied verbatim into `recoveryInfo`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provenance {
    pub recovery_date: String,
    pub source_media: String,
}

/// Assign directory and file names following the final order of `study`.
///
/// Series directories are numbered by position, not by series number.
pub fn layout_study(study: &StudyGroup) -> StudyLayout<'_> {
    let dir_name = storage::study_dir_name(
        &study.info.modality,
        &study.info.description,
        &study.uid,
    );

    let mut slices = Vec::with_capacity(study.image_count());
    let mut series_entries = Vec::with_capacity(study.series.len());

    for (series_idx, series) in study.series.iter().enumerate() {
        let series_dir = storage::series_dir_name(series_idx + 1);
        let mut images = Vec::with_capacity(series.records().len());

        for (slice_idx, record) in series.records().iter().enumerate() {
            let relative = format!(
                "{}/{}/{}",
                dir_name,
                series_dir,
                storage::slice_file_name(slice_idx + 1)
            );
            images.push(relative.clone());
            slices.push((relative, record));
        }

        let info = series.info();
        let first = &series.first().metadata;
        series_entries.push(SeriesEntry {
            uid: series.uid.clone(),
            number: info.number,
            description: info.description.clone(),
            body_part: info.body_part.clone(),
            slice_count: series.records().len(),
            rows: first.rows,
            columns: first.columns,
            images,
        });
    }

    let info = &study.info;
    let entry = StudyEntry {
        uid: study.uid.clone(),
        date: info.date.clone(),
        time: info.time.clone(),
        description: info.description.clone(),
        modality: info.modality.clone(),
        institution: info.institution.clone(),
        referring_physician: info.referring_physician.clone(),
        accession: info.accession.clone(),
        series: series_entries,
    };

    StudyLayout {
        dir_name,
        entry,
        slices,
    }
}

pub fn recovery_info(stats: &RecoveryStats, provenance: &Provenance) -> RecoveryInfo {
    RecoveryInfo {
        total_files: stats.total(),
        intact_files: stats.intact(),
        damaged_files: stats.damaged(),
        error_files: stats.errors(),
        recovery_date: provenance.recovery_date.clone(),
        source_media: provenance.source_media.clone(),
    }
}

/// Assemble the final document. `studies` must already be in final order.
pub fn build_index(
    patient: Option<PatientInfo>,
    studies: Vec<StudyEntry>,
    reports: BTreeMap<String, String>,
    stats: &RecoveryStats,
    provenance: &Provenance,
) -> MetadataIndex {
    MetadataIndex {
        patient,
        studies,
        reports,
        recovery_info: recovery_info(stats, provenance),
    }
}
