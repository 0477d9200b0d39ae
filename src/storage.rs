//
// storage.rs
// Dicom-Preprocessor-rs
//
// Owns the output directory: synthesizes collision-resistant study folder names and persists slices and the index.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::render;

/// Upper bound, in characters, for a study directory name.
pub const STUDY_DIR_MAX_LEN: usize = 58;

/// Length of the UID digest appended to study directory names.
const UID_SUFFIX_LEN: usize = 8;

pub const INDEX_FILE_NAME: &str = "metadata.json";

#[derive(Clone, Debug)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        // Fail before any file is processed if the output root cannot be created or written.
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create output directory {:?}", root))?;
        NamedTempFile::new_in(&root)
            .with_context(|| format!("Output directory {:?} is not writable", root))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Encode one slice as PNG under `relative` (forward-slash separated).
    pub fn write_slice(&self, relative: &str, pixels: &Array2<u8>) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        render::write_png(pixels, &path)?;
        Ok(path)
    }

    pub fn write_index<T: Serialize>(&self, index: &T) -> Result<PathBuf> {
        let path = self.root.join(INDEX_FILE_NAME);
        let json = serde_json::to_string_pretty(index).context("Failed to serialize index")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(path)
    }
}

/// `{modality}_{description}_{uid digest}`, made filesystem-safe.
///
/// Substitution runs before truncation, and only the readable prefix is
/// truncated, so the digest always survives and keeps names distinct.
pub fn study_dir_name(modality: &str, description: &str, study_uid: &str) -> String {
    let suffix = uid_digest(study_uid);
    let prefix = sanitize_component(&format!("{}_{}", modality, description));
    let budget = STUDY_DIR_MAX_LEN - UID_SUFFIX_LEN - 1;
    let prefix: String = prefix.chars().take(budget).collect();
    let prefix = prefix.trim_end_matches(['_', '-', '.']);
    if prefix.is_empty() {
        suffix
    } else {
        format!("{}_{}", prefix, suffix)
    }
}

pub fn series_dir_name(ordinal: usize) -> String {
    format!("series_{:03}", ordinal)
}

pub fn slice_file_name(ordinal: usize) -> String {
    format!("slice_{:04}.png", ordinal)
}

fn uid_digest(uid: &str) -> String {
    let hash = hex::encode(Sha256::digest(uid.as_bytes()));
    hash[..UID_SUFFIX_LEN].to_string()
}

fn sanitize_component(input: &str) -> String {
    // Whitespace becomes '_', separators and other unsafe characters become '-'.
    input
        .chars()
        .map(|c| {
            if c.is_whitespace() {
                '_'
            } else if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
