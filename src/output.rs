//! Result records crossing the library boundary.
//!
//! Every failure state of the pipeline is represented as *data* in these
//! records (a `None` name, a [`SourceLabel::NoMatch`] label, a score of 0)
//! rather than as an error, so a presentation layer can always render a
//! "no match, here is what we read" page instead of an error page.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Which matching strategy produced a [`MatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Phase 1: every token of some honorific variant of the candidate name
    /// appeared verbatim in the normalised text.
    ExactVariant,
    /// Phase 2: weighted keyword scoring (completeness + in-order bonus).
    /// Also reported for no-match results, since phase 2 produced the best
    /// score that fell short of the threshold.
    WeightedKeyword,
}

/// Outcome of matching one document's text against the candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Matched institution name (lower-cased, as it appears in the candidate
    /// list). `None` signals "no match".
    pub name: Option<String>,
    /// Confidence score. 100 for exact-variant matches; the raw
    /// `(completeness + order_bonus) × 100` value for weighted matches,
    /// which may exceed 100. For no-match results this is the best score
    /// seen, possibly 0.
    pub score: f64,
    /// The strategy that produced this result.
    pub strategy: MatchStrategy,
}

impl MatchResult {
    /// A no-match result carrying the best (sub-threshold) score observed.
    pub fn none(best_score: f64) -> Self {
        Self {
            name: None,
            score: best_score,
            strategy: MatchStrategy::WeightedKeyword,
        }
    }

    /// True when a candidate was accepted.
    pub fn is_match(&self) -> bool {
        self.name.is_some()
    }
}

/// One reference-table row projected into the externally visible shape.
///
/// The tier maps are `None` — not empty maps — when no qualifying column has
/// data for the row, so consumers can distinguish "no ranking data" from
/// "ranked with zero categories" without inspecting map contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedInstitution {
    /// Institution name exactly as cased in the reference table.
    pub name: String,
    /// City, when the table carries a `City`/`CITY` column for this row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State, when the table carries a `State`/`STATE` column for this row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Tier-1 ranking categories with non-blank values for this row.
    #[serde(rename = "tier_1", skip_serializing_if = "Option::is_none")]
    pub tier1: Option<BTreeMap<String, String>>,
    /// Tier-2 ranking categories with non-blank values for this row.
    #[serde(rename = "tier_2", skip_serializing_if = "Option::is_none")]
    pub tier2: Option<BTreeMap<String, String>>,
}

/// Which input document produced the accepted match (or was last attempted).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum SourceLabel {
    Transcript,
    Cv,
    /// A reference letter, tagged with its file name.
    ReferenceLetter(String),
    /// No stage ran at all (no documents were supplied).
    NoMatch,
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLabel::Transcript => write!(f, "Transcript"),
            SourceLabel::Cv => write!(f, "CV"),
            SourceLabel::ReferenceLetter(name) => write!(f, "Reference Letter: {}", name),
            SourceLabel::NoMatch => write!(f, "No match"),
        }
    }
}

// Serialised as the human-facing label string so JSON consumers see
// "Reference Letter: letter1.pdf" rather than an enum wrapper.
impl Serialize for SourceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The record returned for every resolution, match or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// The resolved institution with ranking data. `None` when no document
    /// matched, or when a matched name unexpectedly resolved to zero table
    /// rows (propagated gracefully per the table invariant).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<ResolvedInstitution>,
    /// The stage that matched, or the stage that last ran when nothing
    /// matched, or [`SourceLabel::NoMatch`] when no stage ran.
    pub source: SourceLabel,
    /// Raw text extracted from the last document attempted. Retained even
    /// on total failure so a human can review what the pipeline read.
    pub raw_text: String,
    /// Confidence score of the accepted match, or the best score observed
    /// across all attempted stages when nothing was accepted.
    pub score: f64,
}

impl Resolution {
    /// True when a document matched and resolved to a table row.
    pub fn is_resolved(&self) -> bool {
        self.institution.is_some()
    }
}
