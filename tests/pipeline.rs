//! End-to-end integration tests for uniresolve.
//!
//! These tests build a real XLSX ranking workbook on disk with
//! `rust_xlsxwriter`, write plain-text documents into a temp directory, and
//! drive the full resolve path through the public API. No external binaries
//! (pdfium, tesseract) are required: the document fixtures are text files,
//! and unsupported formats are expected to degrade rather than fail.
//!
//! Run with:
//!   cargo test --test pipeline -- --nocapture

use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use uniresolve::{
    load_reference_table, lookup_ranking, resolve_student, ResolveConfig, ResolveError,
    SourceLabel, StudentDocuments,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Write a ranking workbook with a decorative title row above the header,
/// mirroring the layout real ranking spreadsheets ship with.
fn write_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("ranking.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("TBS India 25").unwrap();

    // Row 0: merged-style title the header scan must skip over.
    sheet.write(0, 0, "National Ranking Survey 2025").unwrap();

    // Row 1: the actual header.
    let header = [
        "Name of Institution",
        "City",
        "State",
        "Top 100 Overall",
        "QS Global",
        "101-200 Overall",
    ];
    for (col, title) in header.iter().enumerate() {
        sheet.write(1, col as u16, *title).unwrap();
    }

    // Data rows. Numeric ranks are written as numbers so the loader's
    // whole-float rendering ("12", not "12.0") is exercised.
    let rows: &[(&str, &str, &str, Option<f64>, Option<f64>, Option<f64>)] = &[
        ("Acme Institute of Technology", "Springfield", "Ohio", Some(12.0), None, None),
        ("Acme Institute of Technology", "Shelbyville", "Ohio", None, None, Some(104.0)),
        ("National Institute of Science", "Bengaluru", "Karnataka", Some(3.0), Some(155.0), None),
        ("Dr. Ambedkar College of Engineering", "Nagpur", "Maharashtra", None, None, Some(121.0)),
    ];
    for (i, (name, city, state, t100, qs, t200)) in rows.iter().enumerate() {
        let r = (i + 2) as u32;
        sheet.write(r, 0, *name).unwrap();
        sheet.write(r, 1, *city).unwrap();
        sheet.write(r, 2, *state).unwrap();
        if let Some(v) = t100 {
            sheet.write(r, 3, *v).unwrap();
        }
        if let Some(v) = qs {
            sheet.write(r, 4, *v).unwrap();
        }
        if let Some(v) = t200 {
            sheet.write(r, 5, *v).unwrap();
        }
    }

    workbook.save(&path).unwrap();
    path
}

fn write_doc(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ── Table loading ────────────────────────────────────────────────────────────

#[test]
fn workbook_loads_with_header_offset() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);
    let config = ResolveConfig::default();

    let table = load_reference_table(&path, Some("TBS India 25"), &config).unwrap();

    let names = table.unique_names();
    assert_eq!(names.len(), 3); // Acme listed twice, deduped
    assert!(names.contains(&"Acme Institute of Technology".to_string()));
    assert!(names.contains(&"Dr. Ambedkar College of Engineering".to_string()));

    // candidate_names keeps duplicates and table order.
    assert_eq!(table.candidate_names().len(), 4);
}

#[test]
fn missing_sheet_is_fatal_and_lists_alternatives() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);
    let config = ResolveConfig::default();

    let err = load_reference_table(&path, Some("Nope"), &config).unwrap_err();
    match err {
        ResolveError::SheetNotFound { available, .. } => {
            assert!(available.iter().any(|s| s == "TBS India 25"));
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[test]
fn missing_workbook_is_fatal() {
    let config = ResolveConfig::default();
    let err = load_reference_table("/nonexistent/ranking.xlsx", None, &config).unwrap_err();
    assert!(matches!(err, ResolveError::TableNotFound { .. }));
}

#[test]
fn numeric_ranks_render_without_decimal_point() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);
    let config = ResolveConfig::default();
    let table = load_reference_table(&path, None, &config).unwrap();

    let inst = lookup_ranking("national institute of science", &table, None, &config).unwrap();
    let tier1 = inst.tier1.unwrap();
    assert_eq!(tier1.get("Top 100 Overall").map(String::as_str), Some("3"));
    assert_eq!(tier1.get("QS Global").map(String::as_str), Some("155"));
}

// ── Full resolution ──────────────────────────────────────────────────────────

#[test]
fn transcript_resolves_campus_from_city_evidence() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);
    let config = ResolveConfig::default();
    let table = load_reference_table(&path, None, &config).unwrap();
    let candidates = table.candidate_names();

    let docs = StudentDocuments {
        transcript: Some(write_doc(
            &dir,
            "transcript.txt",
            "Official Transcript\nAcme Institute of Technology\nShelbyville, Ohio\nB.Tech 2019-2023",
        )),
        cv: None,
        references: vec![],
    };

    let result = resolve_student(&docs, &table, &candidates, &config);
    let inst = result.institution.expect("should match");
    assert_eq!(inst.name, "Acme Institute of Technology");
    assert_eq!(inst.city.as_deref(), Some("Shelbyville"));
    assert_eq!(result.source, SourceLabel::Transcript);
    assert_eq!(result.score, 100.0);
    assert!(result.raw_text.contains("Official Transcript"));
}

#[test]
fn honorific_variant_matches_unpunctuated_document() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);
    let config = ResolveConfig::default();
    let table = load_reference_table(&path, None, &config).unwrap();
    let candidates = table.candidate_names();

    // OCR output commonly drops the "Dr." prefix entirely.
    let docs = StudentDocuments {
        cv: Some(write_doc(
            &dir,
            "cv.txt",
            "Education: Ambedkar College of Engineering, Nagpur",
        )),
        ..Default::default()
    };

    let result = resolve_student(&docs, &table, &candidates, &config);
    let inst = result.institution.expect("should match");
    assert_eq!(inst.name, "Dr. Ambedkar College of Engineering");
    assert_eq!(result.source, SourceLabel::Cv);
}

#[test]
fn unsupported_transcript_degrades_to_later_stages() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);
    let config = ResolveConfig::default();
    let table = load_reference_table(&path, None, &config).unwrap();
    let candidates = table.candidate_names();

    // An XLSX handed in as a transcript extracts to nothing; the reference
    // letter still carries the day.
    let docs = StudentDocuments {
        transcript: Some(path.clone()),
        cv: None,
        references: vec![write_doc(
            &dir,
            "letter.txt",
            "I taught this student at the National Institute of Science in Bengaluru.",
        )],
    };

    let result = resolve_student(&docs, &table, &candidates, &config);
    let inst = result.institution.expect("should match");
    assert_eq!(inst.name, "National Institute of Science");
    assert_eq!(result.source, SourceLabel::ReferenceLetter("letter.txt".into()));
}

#[test]
fn no_match_keeps_last_text_and_best_score() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(&dir);
    let config = ResolveConfig::default();
    let table = load_reference_table(&path, None, &config).unwrap();
    let candidates = table.candidate_names();

    let docs = StudentDocuments {
        transcript: Some(write_doc(
            &dir,
            "transcript.txt",
            // Partial hit: some significant tokens, below threshold.
            "national science fair participation certificate",
        )),
        cv: Some(write_doc(&dir, "cv.txt", "entirely unrelated contents")),
        references: vec![],
    };

    let result = resolve_student(&docs, &table, &candidates, &config);
    assert!(result.institution.is_none());
    assert_eq!(result.source, SourceLabel::Cv);
    assert_eq!(result.raw_text, "entirely unrelated contents");
    assert!(result.score > 0.0 && result.score < 75.0);
}
