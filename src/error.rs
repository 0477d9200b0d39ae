//
// error.rs
// Dicom-Preprocessor-rs
//
// Per-file failure categories. None of these abort a run: they are tallied and the file is skipped.
//
// Thales Matheus Mendonça Santos - November 2025

use thiserror::Error;

/// Reason a single source file did not produce an image record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("read error: {0}")]
    Read(String),
    #[error("no pixel data")]
    NoPixelData,
    #[error("pixel decode error: {0}")]
    PixelDecode(String),
    #[error("all-zero pixel data (damaged)")]
    DamagedAllZero,
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl SkipReason {
    /// Damage means the source media itself is corrupt, not that decoding went wrong.
    pub fn is_damage(&self) -> bool {
        matches!(self, SkipReason::DamagedAllZero)
    }
}

/// Raised when a window has a non-positive width or collapses to an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid window parameters: center={center}, width={width}")]
pub struct InvalidWindowError {
    pub center: f64,
    pub width: f64,
}

impl From<InvalidWindowError> for SkipReason {
    fn from(err: InvalidWindowError) -> Self {
        SkipReason::PixelDecode(err.to_string())
    }
}
