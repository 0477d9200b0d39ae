//
// windowing.rs
// Dicom-Preprocessor-rs
//
// Rescales raw samples to calibrated units and maps a display window onto 8-bit intensities.
//
// Thales Matheus Mendonça Santos - November 2025

use dicom_pixeldata::WindowLevel;
use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::error::InvalidWindowError;

/// Brain window used for CT when the file carries no window of its own.
pub const CT_DEFAULT_WINDOW: WindowLevel = WindowLevel {
    center: 40.0,
    width: 80.0,
};

/// Lower and upper percentiles bounding the heuristic window.
const LOW_PERCENTILE: f64 = 5.0;
const HIGH_PERCENTILE: f64 = 95.0;

/// Apply the per-file linear calibration `value * slope + intercept`.
pub fn rescale<S, D>(samples: &ArrayBase<S, D>, slope: f64, intercept: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    samples.mapv(|v| v * slope + intercept)
}

/// Clip samples to `[center - width/2, center + width/2]` and map that range onto `[0, 255]`.
pub fn apply_windowing<S, D>(
    samples: &ArrayBase<S, D>,
    center: f64,
    width: f64,
) -> Result<Array<u8, D>, InvalidWindowError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let invalid = InvalidWindowError { center, width };
    // Written as negations so NaN parameters are rejected as well.
    if !(width > 0.0) {
        return Err(invalid);
    }
    let low = center - width / 2.0;
    let high = center + width / 2.0;
    let span = high - low;
    if !(span > 0.0) || !span.is_finite() {
        return Err(invalid);
    }

    Ok(samples.mapv(|v| {
        let clipped = v.clamp(low, high);
        // NaN samples survive clamp; `as u8` saturates them to zero.
        ((clipped - low) / span * 255.0).round() as u8
    }))
}

/// Window to use when the source attributes carry none.
///
/// CT values are Hounsfield units, so a fixed brain window is meaningful. For
/// any other modality the window spans the 5th..95th percentile of strictly
/// positive samples, which keeps background/air out of the estimate.
pub fn derive_default_window<S, D>(samples: &ArrayBase<S, D>, modality: &str) -> WindowLevel
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if modality == "CT" {
        return CT_DEFAULT_WINDOW;
    }

    let mut positive: Vec<f64> = samples.iter().copied().filter(|&v| v > 0.0).collect();
    let (low, high) = if positive.is_empty() {
        // Flat or background-only frame: pass the 0..255 range straight through.
        (0.0, 255.0)
    } else {
        positive.sort_by(f64::total_cmp);
        (
            percentile(&positive, LOW_PERCENTILE),
            percentile(&positive, HIGH_PERCENTILE),
        )
    };

    WindowLevel {
        center: (low + high) / 2.0,
        width: (high - low).max(1.0),
    }
}

/// Linear-interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
