//
// lib.rs
// Dicom-Preprocessor-rs
//
// Exposes the crate's modules and re-exports the entry points for both binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Public surface of the library: one module per pipeline stage, plus config and CLI glue.
pub mod aggregate;
pub mod batch;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod dicom_access;
pub mod error;
pub mod frame;
pub mod index;
pub mod metadata;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod reports;
pub mod stats;
pub mod storage;
pub mod windowing;

pub use cli::{run as run_cli, Cli, Commands};
pub use config::PreprocessConfig;
pub use error::{InvalidWindowError, SkipReason};
pub use pipeline::{run, RunSummary};
