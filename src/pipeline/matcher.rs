//! Institution matching: two-phase scoring of document text against the
//! candidate name list.
//!
//! ## Why two phases?
//!
//! Exact evidence beats statistical evidence. An institution whose
//! distinctive multi-word name appears verbatim in the document — even
//! split across lines by a transcript layout — is a certain match and is
//! accepted immediately at score 100 (phase 1). Only when no candidate
//! passes that bar does the weighted-keyword phase run, combining token
//! completeness with an in-order bonus and accepting the best candidate
//! only above a threshold. The threshold bounds false positives; the
//! phase order bounds false negatives from OCR noise.
//!
//! ## Tie-breaks
//!
//! Both phases iterate candidates in table order. Phase 1 stops at the
//! first success; phase 2 keeps a running best under a strictly-greater
//! comparison, so later candidates with an equal score never displace an
//! earlier one. First in the table wins, deterministically.

use crate::config::ResolveConfig;
use crate::output::{MatchResult, MatchStrategy};
use tracing::debug;

/// Match document text against the candidate list.
///
/// `candidates` is the lower-cased name list in table order (see
/// [`crate::table::ReferenceTable::candidate_names`]).
///
/// Returns a [`MatchResult`] whose `name` is `None` when nothing reached
/// the acceptance threshold; its `score` then carries the best
/// sub-threshold score observed (possibly 0).
pub fn find_institution(
    text: &str,
    candidates: &[String],
    config: &ResolveConfig,
) -> MatchResult {
    // Collapse whitespace runs (multi-line names, OCR artefacts) and
    // lower-case. The hyphen/period-stripped variant serves phase 1, where
    // punctuation in the source document must not break containment.
    let cleaned = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let normalized = cleaned.replace('-', " ").replace('.', "");

    // ── Phase 1: exact multi-word containment ───────────────────────────
    for name in candidates {
        let lowered = name.to_lowercase();
        // Honorific variants: as-is, and with "Dr." stripped in punctuated
        // or unpunctuated form.
        let variants = [
            lowered.clone(),
            lowered.replace("dr. ", "").trim().to_string(),
            lowered.replace("dr ", "").trim().to_string(),
        ];
        for variant in &variants {
            let tokens: Vec<&str> = variant.split_whitespace().collect();
            // An empty variant (honorific-only name) must not match
            // everything.
            if !tokens.is_empty() && tokens.iter().all(|t| normalized.contains(t)) {
                debug!("Exact match: {} (variant: {})", name, variant);
                return MatchResult {
                    name: Some(name.clone()),
                    score: 100.0,
                    strategy: MatchStrategy::ExactVariant,
                };
            }
        }
    }

    // ── Phase 2: weighted keyword scoring ───────────────────────────────
    let mut best_name: Option<&String> = None;
    let mut best_score = 0.0_f64;

    for name in candidates {
        let lowered = name.to_lowercase();
        // Significant tokens: long enough to be distinctive evidence.
        // "of", "the" and other short connectives are noise.
        let terms: Vec<&str> = lowered
            .split_whitespace()
            .filter(|t| t.chars().count() > config.min_significant_len)
            .collect();
        if terms.is_empty() {
            continue; // zero significant tokens scores 0
        }

        let present = terms.iter().filter(|t| normalized.contains(**t)).count();
        let completeness = present as f64 / terms.len() as f64;

        // Order bonus: every significant token present, and their first
        // occurrences non-decreasing left to right.
        let mut bonus = 0.0;
        let positions: Option<Vec<usize>> =
            terms.iter().map(|t| normalized.find(*t)).collect();
        if let Some(pos) = positions {
            if pos.windows(2).all(|w| w[0] <= w[1]) {
                bonus = config.order_bonus;
            }
        }

        let total = (completeness + bonus) * 100.0;
        // Strictly greater: equal scores keep the earlier candidate.
        if total > best_score {
            best_score = total;
            best_name = Some(name);
            debug!("New best match: {} (score: {:.1})", name, total);
        }
    }

    if best_score >= config.accept_threshold {
        if let Some(name) = best_name {
            debug!("Best match accepted: {} ({:.1})", name, best_score);
            return MatchResult {
                name: Some(name.clone()),
                score: best_score,
                strategy: MatchStrategy::WeightedKeyword,
            };
        }
    }

    debug!("No strong match (best score: {:.1})", best_score);
    MatchResult::none(best_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResolveConfig {
        ResolveConfig::default()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_text_never_matches() {
        let candidates = names(&["acme institute of technology"]);
        let r = find_institution("", &candidates, &config());
        assert_eq!(r.name, None);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn empty_candidate_list_never_matches() {
        let r = find_institution("any text at all", &[], &config());
        assert_eq!(r.name, None);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn exact_match_survives_line_breaks() {
        let candidates = names(&["acme institute of technology"]);
        let text = "Transcript of Records\nAcme\nInstitute\nof Technology\nSpringfield";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.name.as_deref(), Some("acme institute of technology"));
        assert_eq!(r.score, 100.0);
        assert_eq!(r.strategy, MatchStrategy::ExactVariant);
    }

    #[test]
    fn exact_match_ignores_punctuation_in_text() {
        let candidates = names(&["acme institute of technology"]);
        let text = "Acme Institute of Technology. Est. 1952";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.score, 100.0);
    }

    #[test]
    fn honorific_variants_match_stripped_form() {
        // The text carries the name without the honorific; the candidate
        // includes it in punctuated form.
        let candidates = names(&["dr. ambedkar college of law"]);
        let text = "graduated from Ambedkar College of Law in 2021";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.name.as_deref(), Some("dr. ambedkar college of law"));
        assert_eq!(r.score, 100.0);

        // Unpunctuated honorific behaves identically.
        let candidates = names(&["dr ambedkar college of law"]);
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.score, 100.0);
    }

    #[test]
    fn phase_one_first_candidate_wins() {
        // Both names fully contained; the earlier one in table order wins.
        let candidates = names(&["national institute", "national institute of science"]);
        let text = "National Institute of Science";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.name.as_deref(), Some("national institute"));
    }

    #[test]
    fn weighted_score_exactly_at_threshold_is_accepted() {
        // 3 of 4 significant tokens present, one missing → completeness
        // 0.75, no order bonus → exactly 75.0, which must be accepted.
        let candidates = names(&["alphaville betatown gammaland deltaport"]);
        let text = "students from gammaland and betatown near alphaville";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(
            r.name.as_deref(),
            Some("alphaville betatown gammaland deltaport")
        );
        assert_eq!(r.score, 75.0);
        assert_eq!(r.strategy, MatchStrategy::WeightedKeyword);
    }

    #[test]
    fn weighted_score_below_threshold_is_rejected_with_score() {
        // 2 of 3 significant tokens → 66.67, below 75.
        let candidates = names(&["alphaville betatown gammaland"]);
        let text = "betatown and gammaland";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.name, None);
        assert!((r.score - 200.0 / 3.0).abs() < 1e-9, "got {}", r.score);
    }

    #[test]
    fn order_bonus_requires_every_token_present() {
        let candidates = names(&["uniqalpha uniqbeta uniqgamma uniqdelta"]);
        // 3 of 4 present and in order, but one missing → no bonus.
        let text = "uniqalpha then uniqbeta then uniqgamma";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.score, 75.0);
    }

    #[test]
    fn out_of_order_tokens_forfeit_the_bonus() {
        // Phase 1 is defeated by the absent short token "x9"; all
        // significant tokens are present but reversed → completeness 1.0,
        // no bonus → 100, via the weighted phase.
        let candidates = names(&["x9 qalpha qbeta qgamma"]);
        let text = "qgamma qbeta qalpha";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.score, 100.0);
        assert_eq!(r.strategy, MatchStrategy::WeightedKeyword);
    }

    #[test]
    fn order_bonus_lifts_score_above_100() {
        // Defeat phase 1 by including a name token absent from the text,
        // then check the bonus arithmetic on a fresh candidate where all
        // significant tokens are present in order but phase 1 fails on a
        // short token.
        let candidates = names(&["x9 qalpha qbeta qgamma"]);
        // "x9" (short token, kept only by phase 1) is absent → phase 1
        // fails; significant tokens qalpha/qbeta/qgamma all present in
        // order → (1.0 + 0.3) × 100 = 130.
        let text = "qalpha qbeta qgamma";
        let r = find_institution(text, &candidates, &config());
        assert_eq!(r.name.as_deref(), Some("x9 qalpha qbeta qgamma"));
        assert!((r.score - 130.0).abs() < 1e-9, "got {}", r.score);
        assert_eq!(r.strategy, MatchStrategy::WeightedKeyword);
    }

    #[test]
    fn equal_scores_keep_first_candidate() {
        let candidates = names(&[
            "qdelta qepsilon northcampus",
            "qdelta qepsilon southcampus",
        ]);
        // Both score identically (2 of 3 present, no bonus): first wins
        // when the threshold is lowered enough to accept.
        let text = "qdelta and qepsilon";
        let config = ResolveConfig::builder().accept_threshold(50.0).build().unwrap();
        let r = find_institution(text, &candidates, &config);
        assert_eq!(r.name.as_deref(), Some("qdelta qepsilon northcampus"));
    }

    #[test]
    fn honorific_only_candidate_matches_nothing() {
        let candidates = names(&["dr. ", "dr "]);
        let r = find_institution("some unrelated text", &candidates, &config());
        assert_eq!(r.name, None);
    }
}
