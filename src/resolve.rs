//! Resolution orchestration: drive extraction and matching across a
//! student's documents in priority order.
//!
//! ## Stage order
//!
//! Transcript, then CV, then each reference letter in the order supplied.
//! Transcripts name the issuing institution with near-certainty; CVs
//! usually do; reference letters are written on anyone's letterhead. The
//! machine has a single terminal condition — the first stage whose text
//! yields an accepted match stops it — so a weaker document can never
//! override a stronger one.
//!
//! ## Text retention
//!
//! Every attempted stage overwrites the retained raw text, match or not.
//! This is intentional: even on total failure the caller receives the most
//! recently extracted text for manual human review, instead of an empty
//! error page.

use crate::config::ResolveConfig;
use crate::output::{Resolution, SourceLabel};
use crate::pipeline::extract::extract_text;
use crate::pipeline::matcher::find_institution;
use crate::pipeline::rankings::lookup_ranking;
use crate::table::ReferenceTable;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The up-to-three document sources for one applicant, in priority order.
#[derive(Debug, Clone, Default)]
pub struct StudentDocuments {
    /// Academic transcript — strongest evidence, tried first.
    pub transcript: Option<PathBuf>,
    /// Curriculum vitae — tried second.
    pub cv: Option<PathBuf>,
    /// Reference letters — tried last, in the order given.
    pub references: Vec<PathBuf>,
}

impl StudentDocuments {
    /// The attempted stages in priority order, each with its source label.
    fn stages(&self) -> Vec<(SourceLabel, &Path)> {
        let mut stages = Vec::new();
        if let Some(ref p) = self.transcript {
            stages.push((SourceLabel::Transcript, p.as_path()));
        }
        if let Some(ref p) = self.cv {
            stages.push((SourceLabel::Cv, p.as_path()));
        }
        for p in &self.references {
            stages.push((SourceLabel::ReferenceLetter(file_label(p)), p.as_path()));
        }
        stages
    }
}

/// File-name tag for a reference letter's source label.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve an applicant's home institution from their documents.
///
/// `candidates` is the lower-cased name list derived from `table` (see
/// [`ReferenceTable::candidate_names`]); both must stay untouched for the
/// duration of the call.
///
/// Always returns a well-formed [`Resolution`]: failure states are data
/// (a `None` institution, a best-effort score, retained raw text), never
/// errors.
pub fn resolve_student(
    docs: &StudentDocuments,
    table: &ReferenceTable,
    candidates: &[String],
    config: &ResolveConfig,
) -> Resolution {
    let mut last_text = String::new();
    let mut last_source: Option<SourceLabel> = None;
    let mut best_score = 0.0_f64;

    for (label, path) in docs.stages() {
        info!("Stage {}: {}", label, path.display());

        let text = extract_text(path, config);
        last_text = text; // retained regardless of match outcome

        let result = find_institution(&last_text, candidates, config);
        best_score = best_score.max(result.score);

        if let Some(name) = result.name {
            info!(
                "Accepted '{}' at {:.1} from {}",
                name, result.score, label
            );
            let institution = lookup_ranking(&name, table, Some(&last_text), config);
            if institution.is_none() {
                // The candidate list should mirror the table; a miss here
                // is a data inconsistency, reported as "no match" rather
                // than a failure.
                warn!("Matched name '{}' resolved to no table row", name);
            }
            return Resolution {
                institution,
                source: label,
                raw_text: last_text,
                score: result.score,
            };
        }

        last_source = Some(label);
    }

    info!("No stage produced a match (best score: {:.1})", best_score);
    Resolution {
        institution: None,
        source: last_source.unwrap_or(SourceLabel::NoMatch),
        raw_text: last_text,
        score: best_score,
    }
}
