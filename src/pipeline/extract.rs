//! Text extraction: format-driven, fallback-chained, never failing.
//!
//! ## The fallback strategy
//!
//! OCR is expensive and lossy, so it runs only when lightweight extraction
//! is insufficient or inapplicable by format:
//!
//! * PDF — read the text layer first; only when it is suspiciously short
//!   (a scanned document) rasterise every page and OCR each in order.
//! * DOCX / plain text — always have a text layer; no OCR fallback.
//! * Images — OCR is the only option.
//! * Anything else — unsupported, extracts to empty text.
//!
//! ## Why `extract_text` cannot fail
//!
//! A corrupt file, an absent OCR binary, or an unreadable page are all
//! equivalent to "this document told us nothing": the orchestrator must move
//! on to the next document either way. Failures are logged with
//! `tracing::warn!` and degrade to an empty string at this boundary.

use crate::config::ResolveConfig;
use crate::error::ExtractError;
use crate::pipeline::classify::{classify, FileKind};
use crate::pipeline::{cleanup, ocr};
use pdfium_render::prelude::*;
use quick_xml::events::Event;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extract the best-effort raw text content of one document.
///
/// Never returns an error: any internal failure is logged as a non-fatal
/// warning and yields an empty string. The result is tidied by
/// [`cleanup::tidy_text`] so it is fit for manual review.
pub fn extract_text(path: &Path, config: &ResolveConfig) -> String {
    info!("Extracting text from: {}", path.display());
    match extract_inner(path, config) {
        Ok(text) => {
            let text = cleanup::tidy_text(&text);
            debug!("Extracted {} chars from '{}'", text.chars().count(), path.display());
            text
        }
        Err(e) => {
            warn!("Extraction failed for '{}': {}", path.display(), e);
            String::new()
        }
    }
}

/// Exhaustive dispatch over the classified file kind.
fn extract_inner(path: &Path, config: &ResolveConfig) -> Result<String, ExtractError> {
    match classify(path) {
        FileKind::Pdf => extract_pdf(path, config),
        FileKind::WordDocument => extract_docx(path),
        FileKind::PlainText => extract_plain_text(path),
        FileKind::Image => ocr::ocr_file(path, config),
        FileKind::Unknown => {
            warn!("Unsupported or unknown file type: {}", path.display());
            Ok(String::new())
        }
    }
}

// ── PDF ──────────────────────────────────────────────────────────────────────

/// PDF extraction: text layer first, OCR over rasterised pages as fallback.
fn extract_pdf(path: &Path, config: &ResolveConfig) -> Result<String, ExtractError> {
    let pdfium = bind_pdfium(path)?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| ExtractError::Pdf {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    // Text layer across all pages. A page without one yields nothing rather
    // than aborting; the length check below decides whether that matters.
    let mut layer = String::new();
    for page in document.pages().iter() {
        if let Ok(text) = page.text() {
            layer.push_str(&text.all());
            layer.push('\n');
        }
    }

    if layer.trim().chars().count() > config.text_layer_min_chars {
        debug!("Used PDF text layer ({} chars)", layer.trim().chars().count());
        return Ok(layer);
    }

    // Scanned document: rasterise each page and OCR in page order.
    info!(
        "Text layer below {} chars; running OCR over rasterised pages",
        config.text_layer_min_chars
    );
    let render_config = PdfRenderConfig::new()
        .set_target_width(config.max_rendered_pixels as i32)
        .set_maximum_height(config.max_rendered_pixels as i32);

    let mut out = String::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ExtractError::Rasterise {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?;
        let image = bitmap.as_image();
        debug!("OCR page {} ({}x{} px)", idx + 1, image.width(), image.height());
        out.push_str(&ocr::ocr_image(&image, config)?);
    }
    Ok(out)
}

/// Bind to a pdfium library next to the executable or on the system.
fn bind_pdfium(path: &Path) -> Result<Pdfium, ExtractError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| ExtractError::Pdf {
            path: path.to_path_buf(),
            detail: format!("pdfium binding failed: {e:?}"),
        })
}

// ── DOCX ─────────────────────────────────────────────────────────────────────

/// DOCX extraction: read `word/document.xml` out of the ZIP container and
/// collect its text nodes, breaking lines at paragraph ends.
fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = std::fs::File::open(path).map_err(|e| ExtractError::Open {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let docx_err = |detail: String| ExtractError::Docx {
        path: path.to_path_buf(),
        detail,
    };

    let mut archive = zip::ZipArchive::new(file).map_err(|e| docx_err(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| docx_err(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| docx_err(e.to_string()))?;

    docx_xml_to_text(&xml).map_err(docx_err)
}

/// Collect text from WordprocessingML, with `</w:p>` as line breaks and
/// `<w:tab/>`/`<w:br/>` as their whitespace equivalents.
fn docx_xml_to_text(xml: &str) -> Result<String, String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut out = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                out.push_str(&t.unescape().map_err(|e| e.to_string())?);
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => out.push('\n'),
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"br" => out.push('\n'),
                b"tab" => out.push('\t'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
    }
    Ok(out)
}

// ── Plain text ───────────────────────────────────────────────────────────────

/// Plain-text extraction, tolerant of non-UTF-8 bytes (old exports, odd
/// encodings) via lossy conversion.
fn extract_plain_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::Open {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
