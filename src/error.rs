//! Error types for the uniresolve library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ResolveError`] — **Fatal**: the caller cannot proceed at all
//!   (reference workbook missing, required column absent, invalid
//!   configuration). Returned as `Err(ResolveError)` from
//!   [`crate::table::load_reference_table`] and config building.
//!
//! * [`ExtractError`] — **Non-fatal**: one document could not be read
//!   (corrupt file, missing OCR binary, broken DOCX container). Caught at
//!   the [`crate::pipeline::extract::extract_text`] boundary, logged as a
//!   warning, and degraded to an empty string so the resolution pipeline
//!   keeps moving through the remaining documents.
//!
//! The separation mirrors how results are reported: a failed document is a
//! data outcome (empty text, no match), not an exception the presentation
//! layer has to handle.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the uniresolve library.
///
/// Per-document failures use [`ExtractError`] and degrade to empty text
/// rather than being propagated here.
#[derive(Debug, Error)]
pub enum ResolveError {
    // ── Reference table errors ────────────────────────────────────────────
    /// Ranking workbook was not found at the given path.
    #[error("Ranking workbook not found: '{path}'\nCheck the path exists and is readable.")]
    TableNotFound { path: PathBuf },

    /// calamine could not open or parse the workbook.
    #[error("Failed to read ranking workbook '{path}': {detail}")]
    TableRead { path: PathBuf, detail: String },

    /// The requested worksheet does not exist in the workbook.
    #[error("Worksheet '{sheet}' not found in '{path}'\nAvailable sheets: {available:?}")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    /// The worksheet has no rows at all.
    #[error("Worksheet '{sheet}' in '{path}' is empty")]
    EmptySheet { path: PathBuf, sheet: String },

    /// No header row carries the required institution-name column.
    ///
    /// The pipeline cannot produce candidates without it, so this is raised
    /// at load time rather than surfacing later as a mysterious zero-match.
    #[error("Ranking sheet must include a '{column}' column (checked the first {rows_checked} rows of '{path}')")]
    MissingNameColumn {
        path: PathBuf,
        column: String,
        rows_checked: usize,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error while extracting text from a single document.
///
/// Never crosses the [`crate::pipeline::extract::extract_text`] boundary:
/// the extractor logs the failure and returns an empty string, because a
/// document that cannot be read is equivalent to a document with nothing
/// usable in it.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document could not be opened or read from disk.
    #[error("Cannot open '{path}': {detail}")]
    Open { path: PathBuf, detail: String },

    /// pdfium could not be bound or the PDF could not be loaded.
    #[error("PDF processing failed for '{path}': {detail}")]
    Pdf { path: PathBuf, detail: String },

    /// A page could not be rasterised for OCR.
    #[error("Rasterisation failed for page {page}: {detail}")]
    Rasterise { page: usize, detail: String },

    /// The OCR binary is not on PATH.
    #[error("OCR engine '{command}' not found on PATH\nInstall tesseract or point the config at the binary.")]
    OcrUnavailable { command: String },

    /// tesseract ran but exited non-zero.
    #[error("OCR failed: {detail}")]
    OcrFailed { detail: String },

    /// The DOCX container or its document XML is malformed.
    #[error("DOCX parsing failed for '{path}': {detail}")]
    Docx { path: PathBuf, detail: String },
}
