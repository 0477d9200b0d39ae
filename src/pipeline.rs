//
// pipeline.rs
// Dicom-Preprocessor-rs
//
// End-to-end run: discover, build records, aggregate, write slices and the metadata index.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::info;

use crate::aggregate::Aggregator;
use crate::batch;
use crate::config::PreprocessConfig;
use crate::decoder::{DicomDecoder, DicomFileDecoder};
use crate::index::{self, Provenance};
use crate::models::{MetadataIndex, PatientInfo};
use crate::record::ImageRecordBuilder;
use crate::reports;
use crate::stats::RecoveryStats;
use crate::storage::OutputStore;

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub index: MetadataIndex,
    pub index_path: PathBuf,
}

pub fn run(config: &PreprocessConfig) -> Result<RunSummary> {
    run_with_decoder(config, DicomFileDecoder)
}

/// Same as [`run`] with a caller-supplied decoder.
pub fn run_with_decoder<D>(config: &PreprocessConfig, decoder: D) -> Result<RunSummary>
where
    D: DicomDecoder + Sync,
{
    // Environment problems are the only fatal conditions, and they are checked up front.
    if !config.input_dir.is_dir() {
        bail!("Input directory {:?} does not exist", config.input_dir);
    }
    let store = OutputStore::new(&config.output_dir)?;

    let files = batch::discover_files(&config.input_dir, config.min_file_size);
    info!("Found {} DICOM files in {:?}", files.len(), config.input_dir);

    let builder = ImageRecordBuilder::new(decoder);
    let outcomes = batch::process_files(&files, &builder, config.parallel);

    // Aggregation starts only once every file has an outcome.
    let mut stats = RecoveryStats::new();
    let mut patient: Option<PatientInfo> = None;
    let mut aggregator = Aggregator::new();
    for outcome in outcomes {
        stats.record(&outcome.result);
        if let Ok(record) = outcome.result {
            if patient.is_none() {
                patient = Some(record.metadata.patient.clone());
            }
            aggregator.push(record);
        }
    }

    info!(
        "Processed: {} OK, {} damaged, {} errors",
        stats.intact(),
        stats.damaged(),
        stats.errors()
    );

    let studies = aggregator.finalize();
    info!(
        "Studies: {}, Total series: {}",
        studies.len(),
        studies.iter().map(|s| s.series.len()).sum::<usize>()
    );

    let mut entries = Vec::with_capacity(studies.len());
    for study in &studies {
        let layout = index::layout_study(study);
        for (relative, record) in &layout.slices {
            store.write_slice(relative, &record.pixels)?;
        }
        for series in &layout.entry.series {
            info!(
                "  {} / {}: {} slices",
                layout.entry.modality, series.description, series.slice_count
            );
        }
        entries.push(layout.entry);
    }

    let reports = config
        .reports_dir
        .as_deref()
        .map(reports::load_reports)
        .unwrap_or_default();

    let provenance = Provenance {
        recovery_date: config.recovery_date_string(),
        source_media: config.source_media.clone(),
    };
    let index = index::build_index(patient, entries, reports, &stats, &provenance);
    let index_path = store.write_index(&index)?;

    info!("Metadata saved to: {:?}", index_path);
    info!("PNGs saved to: {:?}", store.root());

    Ok(RunSummary { index, index_path })
}
