//! Optical character recognition via the tesseract binary.
//!
//! ## Why shell out instead of binding libtesseract?
//!
//! The C-library bindings drag a native build of tesseract and leptonica
//! into every consumer's build, and their version matrix is painful across
//! platforms. The `tesseract` CLI is a stable, universally packaged
//! interface: stage the image as a file, read recognised text from stdout.
//! A missing binary surfaces as a recoverable [`ExtractError`], which the
//! extractor degrades to empty text — OCR accuracy is explicitly
//! best-effort.

use crate::config::ResolveConfig;
use crate::error::ExtractError;
use image::DynamicImage;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Recognise text in an in-memory image (a rasterised PDF page).
///
/// The image is staged as a temporary PNG because tesseract only reads
/// files; the temp file is deleted when the handle drops, even on error.
pub fn ocr_image(image: &DynamicImage, config: &ResolveConfig) -> Result<String, ExtractError> {
    let tmp = tempfile::Builder::new()
        .prefix("uniresolve-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| ExtractError::OcrFailed {
            detail: format!("temp file: {e}"),
        })?;

    image
        .save_with_format(tmp.path(), image::ImageFormat::Png)
        .map_err(|e| ExtractError::OcrFailed {
            detail: format!("staging image: {e}"),
        })?;

    run_engine(tmp.path(), config)
}

/// Recognise text in an image file on disk.
///
/// The file is handed to tesseract as-is; leptonica reads every raster
/// format the classifier admits, so no re-encoding is needed.
pub fn ocr_file(path: &Path, config: &ResolveConfig) -> Result<String, ExtractError> {
    run_engine(path, config)
}

/// Invoke the OCR engine on one image file and capture stdout.
fn run_engine(image_path: &Path, config: &ResolveConfig) -> Result<String, ExtractError> {
    debug!(
        "OCR: {} {} (lang={})",
        config.ocr_command,
        image_path.display(),
        config.ocr_language
    );

    // "-" sends recognised text to stdout instead of an output file.
    let output = Command::new(&config.ocr_command)
        .arg(image_path)
        .arg("-")
        .args(["-l", &config.ocr_language])
        .output();

    match output {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ExtractError::OcrUnavailable {
            command: config.ocr_command.clone(),
        }),
        Err(e) => Err(ExtractError::OcrFailed {
            detail: e.to_string(),
        }),
        Ok(out) if !out.status.success() => Err(ExtractError::OcrFailed {
            detail: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        }),
        Ok(out) => Ok(String::from_utf8_lossy(&out.stdout).into_owned()),
    }
}
