//! # uniresolve
//!
//! Resolve an applicant's home institution from unstructured documents
//! (transcripts, CVs, reference letters) and enrich the result with
//! ranking data.
//!
//! ## Why this crate?
//!
//! Admissions documents arrive as whatever the applicant had: text-layer
//! PDFs, phone-camera scans, DOCX exports, the occasional stray
//! spreadsheet. Institution names inside them are noisy — split across
//! lines, OCR-mangled, with or without honorifics — and ranking tables
//! list the same institution once per campus. This crate owns the whole
//! messy middle: best-effort text extraction with an OCR fallback,
//! two-phase fuzzy matching against the table's name list, and
//! city/state-evidence disambiguation down to exactly one row.
//!
//! ## Pipeline Overview
//!
//! ```text
//! documents (transcript ▸ CV ▸ reference letters, priority order)
//!  │
//!  ├─ 1. Classify  explicit file-kind dispatch (PDF / DOCX / text / image)
//!  ├─ 2. Extract   text layer first; rasterise + tesseract OCR as fallback
//!  ├─ 3. Match     exact-variant containment, then weighted keywords ≥ 75
//!  ├─ 4. Resolve   city/state evidence narrows multi-campus rows
//!  └─ 5. Project   tiered ranking fields → Resolution record
//! ```
//!
//! The first document whose text yields an accepted match wins; later
//! documents are not read. Every attempt retains its extracted text so a
//! human can review what the pipeline saw even when nothing matched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uniresolve::{
//!     load_reference_table, resolve_student, ResolveConfig, StudentDocuments,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ResolveConfig::default();
//!     let table = load_reference_table("ranking.xlsx", Some("TBS India 25"), &config)?;
//!     let candidates = table.candidate_names();
//!
//!     let docs = StudentDocuments {
//!         transcript: Some("transcript.pdf".into()),
//!         cv: Some("cv.docx".into()),
//!         references: vec!["letter1.pdf".into()],
//!     };
//!
//!     let result = resolve_student(&docs, &table, &candidates, &config);
//!     match &result.institution {
//!         Some(inst) => println!("{} ({:.1})", inst.name, result.score),
//!         None => println!("no match; review:\n{}", result.raw_text),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! Only two things are fatal: an unreadable ranking workbook and a missing
//! institution-name column ([`ResolveError`]). Everything else — corrupt
//! documents, a missing tesseract binary, sub-threshold matches,
//! ambiguous campuses — degrades to data in the [`Resolution`] record so
//! the caller can always render *something*.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `uniresolve` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! uniresolve = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod history;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ResolveConfig, ResolveConfigBuilder, NAME_COLUMN};
pub use error::{ExtractError, ResolveError};
pub use history::{LogEntry, ResolutionLog};
pub use output::{MatchResult, MatchStrategy, ResolvedInstitution, Resolution, SourceLabel};
pub use pipeline::classify::{classify, FileKind};
pub use pipeline::extract::extract_text;
pub use pipeline::matcher::find_institution;
pub use pipeline::rankings::lookup_ranking;
pub use resolve::{resolve_student, StudentDocuments};
pub use table::{load_reference_table, ReferenceTable, Row};
