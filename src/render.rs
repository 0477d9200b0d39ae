//
// render.rs
// Dicom-Preprocessor-rs
//
// Image encoder collaborator: persists rendered 8-bit frames as lossless PNG.
//
// Thales Matheus Mendonça Santos - November 2025

use anyhow::{Context, Result};
use image::{GrayImage, ImageFormat};
use ndarray::Array2;
use std::path::Path;

fn to_gray_image(pixels: &Array2<u8>) -> Result<GrayImage> {
    let (rows, columns) = pixels.dim();
    // iter() walks in logical row-major order whatever the memory layout.
    let buffer: Vec<u8> = pixels.iter().copied().collect();
    GrayImage::from_raw(columns as u32, rows as u32, buffer)
        .context("Pixel buffer does not match frame dimensions")
}

pub fn write_png(pixels: &Array2<u8>, path: &Path) -> Result<()> {
    let image = to_gray_image(pixels)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to save image to {:?}", path))
}
