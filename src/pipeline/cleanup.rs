//! Post-extraction cleanup: deterministic tidying of raw document text.
//!
//! ## Why clean text that only a matcher will read?
//!
//! The matcher normalises whitespace itself, but the extracted text is also
//! *retained verbatim* in every [`crate::output::Resolution`] for manual
//! human review when no match is found. OCR output in particular arrives
//! with carriage returns, zero-width junk from PDF text layers, and walls of
//! blank lines between page fragments. A handful of cheap, deterministic
//! rules makes that review text readable without touching content.
//!
//! ## Rule Order
//!
//! Line endings are normalised before per-line trimming, and blank-line
//! collapsing runs last so it sees the lines the earlier rules produced.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to freshly extracted text.
///
/// Each rule is a pure function (`&str → String`) with no shared state.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF/CR → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 1
/// 5. Trim leading/trailing blank lines
pub fn tidy_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim_matches('\n').to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip invisible Unicode ──────────────────────────────────────────

static RE_INVISIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{200B}\u{200C}\u{200D}\u{2060}\u{FEFF}\u{00AD}]").unwrap());

fn remove_invisible_chars(input: &str) -> String {
    RE_INVISIBLE.replace_all(input, "").to_string()
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}
