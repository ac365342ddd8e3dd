//! Pipeline stages for document-to-institution resolution.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the OCR engine) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! classify ──▶ extract ──▶ cleanup ──▶ matcher ──▶ rankings
//! (file kind)  (text/OCR)  (tidying)   (scoring)   (row + tiers)
//! ```
//!
//! 1. [`classify`] — map a path to an explicit [`classify::FileKind`];
//!    the extractor's fallback chain is an exhaustive match over it
//! 2. [`extract`]  — best-effort raw text; PDF text layer with OCR fallback,
//!    never propagates an error past its boundary
//! 3. [`ocr`]      — tesseract shell-out on rasterised pages and images
//! 4. [`cleanup`]  — deterministic tidying so retained raw text is readable
//! 5. [`matcher`]  — two-phase candidate scoring (exact variants, then
//!    weighted keywords)
//! 6. [`rankings`] — resolve a matched name to exactly one table row and
//!    project its tiered ranking data

pub mod classify;
pub mod cleanup;
pub mod extract;
pub mod matcher;
pub mod ocr;
pub mod rankings;
