//
// record.rs
// Dicom-Preprocessor-rs
//
// Builds one normalized, rendered image record per source file and classifies files that cannot produce one.
//
// Thales Matheus Mendonça Santos - November 2025

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use dicom_dictionary_std::tags;
use dicom_pixeldata::WindowLevel;
use ndarray::Array2;
use serde::Serialize;

use crate::decoder::{DicomDecoder, RawImage};
use crate::dicom_access::ElementAccess;
use crate::error::SkipReason;
use crate::frame;
use crate::metadata;
use crate::models::ImageMetadata;
use crate::windowing;

/// Canonical per-image unit: normalized metadata, the window used and one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub metadata: ImageMetadata,
    pub window: WindowLevel,
    pub pixels: Array2<u8>,
}

/// Pixel-free view of a record, used by `inspect`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary<'a> {
    #[serde(flatten)]
    pub metadata: &'a ImageMetadata,
    pub window_center: f64,
    pub window_width: f64,
    pub rendered_shape: [usize; 2],
}

impl ImageRecord {
    pub fn summary(&self) -> RecordSummary<'_> {
        RecordSummary {
            metadata: &self.metadata,
            window_center: self.window.center,
            window_width: self.window.width,
            rendered_shape: [self.pixels.nrows(), self.pixels.ncols()],
        }
    }
}

/// Runs decode and normalization for individual files.
#[derive(Debug, Clone, Default)]
pub struct ImageRecordBuilder<D> {
    decoder: D,
}

impl<D: DicomDecoder> ImageRecordBuilder<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// Decode and build a record. Panics inside the pipeline are contained
    /// here so one hostile file cannot end the batch.
    pub fn build(&self, path: &Path) -> Result<ImageRecord, SkipReason> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            let raw = self.decoder.decode(path)?;
            build_record(raw)
        }))
        .unwrap_or_else(|payload| Err(SkipReason::Unexpected(panic_message(payload.as_ref()))))
    }
}

/// Normalize an already decoded image into a record.
pub fn build_record(raw: RawImage) -> Result<ImageRecord, SkipReason> {
    let RawImage {
        attributes,
        samples,
    } = raw;

    // All-zero payloads are what unreadable sectors of the source disc decode to.
    if samples.iter().all(|&v| v == 0.0) {
        return Err(SkipReason::DamagedAllZero);
    }

    let slope = attributes.float(tags::RESCALE_SLOPE, 1.0);
    let intercept = attributes.float(tags::RESCALE_INTERCEPT, 0.0);
    let calibrated = windowing::rescale(&samples, slope, intercept);

    let metadata = metadata::extract_image_metadata(&attributes);
    let window = match (
        attributes.first_float(tags::WINDOW_CENTER),
        attributes.first_float(tags::WINDOW_WIDTH),
    ) {
        (Some(center), Some(width)) => WindowLevel { center, width },
        _ => windowing::derive_default_window(&calibrated, &metadata.study.modality),
    };

    let rendered = windowing::apply_windowing(&calibrated, window.center, window.width)?;
    let pixels = frame::select_representative_frame(&rendered);

    Ok(ImageRecord {
        metadata,
        window,
        pixels,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic while processing file".to_string())
}
