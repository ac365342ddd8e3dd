//! File-kind classification: map a path to an explicit format variant.
//!
//! ## Why an enum instead of MIME guessing?
//!
//! Loose MIME heuristics make the extractor's fallback chain implicit
//! branching — it is impossible to see from the code which formats are
//! handled and which fall through. An enumerated kind with an `Unknown`
//! variant turns the chain into an exhaustive `match`: adding a format
//! means adding a variant, and the compiler points at every site that must
//! decide what to do with it.

use std::path::Path;

/// The document formats the extractor knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.pdf` — text-layer extraction first, OCR over rasterised pages as
    /// fallback.
    Pdf,
    /// `.docx` — ZIP container with document XML; always has a text layer.
    WordDocument,
    /// `.txt`, `.text`, `.md` — read directly.
    PlainText,
    /// Raster images — OCR directly.
    Image,
    /// Anything else (including legacy binary `.doc` and spreadsheets
    /// submitted as documents) — unsupported, extracts to empty text.
    Unknown,
}

/// Classify a path by its extension (lower-cased).
pub fn classify(path: &Path) -> FileKind {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_lowercase(),
        None => return FileKind::Unknown,
    };
    match ext.as_str() {
        "pdf" => FileKind::Pdf,
        "docx" => FileKind::WordDocument,
        "txt" | "text" | "md" => FileKind::PlainText,
        "png" | "jpg" | "jpeg" | "bmp" | "gif" | "tif" | "tiff" | "webp" => FileKind::Image,
        _ => FileKind::Unknown,
    }
}
