use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::decoder::DicomDecoder;
use crate::error::SkipReason;
use crate::record::{ImageRecord, ImageRecordBuilder};

/// Result of running one file through the record builder.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ImageRecord, SkipReason>,
}

/// Every regular file under `dir` larger than `min_size` bytes, in sorted path order.
pub fn discover_files(dir: &Path, min_size: u64) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable path under {:?}: {}", dir, e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.metadata().map_or(false, |m| m.len() > min_size))
        .map(|e| e.into_path())
        .collect()
}

/// Build a record for every file. Outcomes come back in input order even when
/// files are processed in parallel.
pub fn process_files<D>(
    files: &[PathBuf],
    builder: &ImageRecordBuilder<D>,
    parallel: bool,
) -> Vec<FileOutcome>
where
    D: DicomDecoder + Sync,
{
    let total = files.len();
    let done = AtomicUsize::new(0);

    let process = |path: &PathBuf| {
        let result = builder.build(path);
        if let Err(reason) = &result {
            debug!("Skipping {:?}: {}", path, reason);
        }
        let count = done.fetch_add(1, Ordering::Relaxed) + 1;
        if count % 100 == 0 {
            info!("Processing {}/{}...", count, total);
        }
        FileOutcome {
            path: path.clone(),
            result,
        }
    };

    if parallel {
        files.par_iter().map(process).collect()
    } else {
        files.iter().map(process).collect()
    }
}
