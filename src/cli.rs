//
// cli.rs
// Dicom-Preprocessor-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the corresponding modules.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::{PreprocessConfig, DEFAULT_MIN_FILE_SIZE, DEFAULT_SOURCE_MEDIA};
use crate::decoder::DicomFileDecoder;
use crate::record::ImageRecordBuilder;
use crate::{pipeline, render};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "dicom-preprocessor")]
#[command(about = "Converts recovered DICOM media into PNG slices and a metadata index", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a DICOM directory tree into PNG slices plus metadata.json
    Process(ProcessArgs),
    /// Build the normalized record of a single file and print it as JSON
    Inspect {
        file: PathBuf,
        /// Also write the rendered frame as PNG
        #[arg(long)]
        preview: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long)]
    output: PathBuf,
    /// Directory with free-text radiology reports (*.txt)
    #[arg(short, long)]
    reports: Option<PathBuf>,
    /// Files of this size in bytes or smaller are ignored
    #[arg(long, default_value_t = DEFAULT_MIN_FILE_SIZE)]
    min_size: u64,
    /// Label describing where the files were recovered from
    #[arg(long, default_value = DEFAULT_SOURCE_MEDIA)]
    source_media: String,
    /// Recovery date to record (YYYY-MM-DD); defaults to today
    #[arg(long)]
    recovery_date: Option<NaiveDate>,
    /// Process files one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,
}

impl From<ProcessArgs> for PreprocessConfig {
    fn from(args: ProcessArgs) -> Self {
        PreprocessConfig {
            input_dir: args.input,
            output_dir: args.output,
            reports_dir: args.reports,
            min_file_size: args.min_size,
            source_media: args.source_media,
            recovery_date: args.recovery_date,
            parallel: !args.sequential,
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Process(args) => {
            pipeline::run(&args.into())?;
        }
        Commands::Inspect { file, preview } => inspect(&file, preview.as_deref())?,
    }

    Ok(())
}

fn inspect(file: &Path, preview: Option<&Path>) -> anyhow::Result<()> {
    let builder = ImageRecordBuilder::new(DicomFileDecoder);
    match builder.build(file) {
        Ok(record) => {
            let json = serde_json::to_string_pretty(&record.summary())
                .context("Failed to serialize record")?;
            println!("{}", json);
            if let Some(path) = preview {
                render::write_png(&record.pixels, path)?;
                println!("Preview saved to: {:?}", path);
            }
        }
        Err(reason) => {
            let kind = if reason.is_damage() { "damaged" } else { "error" };
            println!("Skipped {:?} ({}): {}", file, kind, reason);
        }
    }
    Ok(())
}
