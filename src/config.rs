use std::path::PathBuf;

use chrono::{Local, NaiveDate};

/// Files of this many bytes or fewer are not considered image candidates.
pub const DEFAULT_MIN_FILE_SIZE: u64 = 1000;

pub const DEFAULT_SOURCE_MEDIA: &str = "unspecified";

/// Settings for one preprocessing run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reports_dir: Option<PathBuf>,
    pub min_file_size: u64,
    pub source_media: String,
    /// Fixed date for `recoveryInfo`; today's local date when unset.
    pub recovery_date: Option<NaiveDate>,
    pub parallel: bool,
}

impl PreprocessConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            reports_dir: None,
            min_file_size: DEFAULT_MIN_FILE_SIZE,
            source_media: DEFAULT_SOURCE_MEDIA.to_string(),
            recovery_date: None,
            parallel: true,
        }
    }

    /// ISO `YYYY-MM-DD` date recorded in the index.
    pub fn recovery_date_string(&self) -> String {
        self.recovery_date
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string()
    }
}
