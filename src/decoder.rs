//
// decoder.rs
// Dicom-Preprocessor-rs
//
// Decoder collaborator: turns a file on disk into detached attributes plus raw (uncalibrated) samples.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::Path;

use anyhow::{Context, Result};
use dicom_dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject};
use dicom_pixeldata::{
    ConvertOptions, ModalityLutOption, PixelDecoder, PixelRepresentation, VoiLutOption,
};
use ndarray::{Array3, Array4};

use crate::dicom_access::{AttributeSet, ElementAccess};
use crate::error::SkipReason;
use crate::frame;
use crate::metadata::RECORD_TAGS;

/// Decoded source image: attribute text and samples shaped `(frames, rows, columns)`.
///
/// Samples are the stored values; rescale slope/intercept have not been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub attributes: AttributeSet,
    pub samples: Array3<f64>,
}

/// Source of raw images. Failures must already be classified.
pub trait DicomDecoder {
    fn decode(&self, path: &Path) -> Result<RawImage, SkipReason>;
}

/// Decoder backed by dicom-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomFileDecoder;

impl DicomDecoder for DicomFileDecoder {
    fn decode(&self, path: &Path) -> Result<RawImage, SkipReason> {
        let obj = open_file(path).map_err(|e| SkipReason::Read(e.to_string()))?;

        if !obj.has_element(tags::PIXEL_DATA) {
            return Err(SkipReason::NoPixelData);
        }

        let samples =
            decode_samples(&obj).map_err(|e| SkipReason::PixelDecode(format!("{:#}", e)))?;
        let attributes = AttributeSet::capture(&obj, RECORD_TAGS);

        Ok(RawImage {
            attributes,
            samples,
        })
    }
}

fn decode_samples(obj: &DefaultDicomObject) -> Result<Array3<f64>> {
    let decoded = obj
        .decode_pixel_data()
        .context("Failed to decode pixel data")?;

    // Calibration and windowing are done by the record builder, so ask for stored values.
    let options = ConvertOptions::new()
        .with_modality_lut(ModalityLutOption::None)
        .with_voi_lut(VoiLutOption::Identity);

    let bits_allocated = decoded.bits_allocated();
    let samples: Array4<f64> = if decoded.pixel_representation() == PixelRepresentation::Unsigned
    {
        if bits_allocated <= 8 {
            decoded
                .to_ndarray_with_options::<u8>(&options)
                .context("Failed to convert to u8 ndarray")?
                .mapv(f64::from)
        } else if bits_allocated <= 16 {
            decoded
                .to_ndarray_with_options::<u16>(&options)
                .context("Failed to convert to u16 ndarray")?
                .mapv(f64::from)
        } else {
            decoded
                .to_ndarray_with_options::<u32>(&options)
                .context("Failed to convert to u32 ndarray")?
                .mapv(f64::from)
        }
    } else if bits_allocated <= 8 {
        decoded
            .to_ndarray_with_options::<i8>(&options)
            .context("Failed to convert to i8 ndarray")?
            .mapv(f64::from)
    } else if bits_allocated <= 16 {
        decoded
            .to_ndarray_with_options::<i16>(&options)
            .context("Failed to convert to i16 ndarray")?
            .mapv(f64::from)
    } else {
        decoded
            .to_ndarray_with_options::<i32>(&options)
            .context("Failed to convert to i32 ndarray")?
            .mapv(f64::from)
    };

    Ok(frame::to_grayscale(samples))
}
