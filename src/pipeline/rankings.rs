//! Ranking disambiguation: a matched name → exactly one table row → a
//! projected result record.
//!
//! ## Multi-campus rows
//!
//! Ranking tables list multi-campus institutions once per campus under the
//! same name, so a matched name alone can be ambiguous. The extracted
//! document text is secondary evidence: a transcript almost always names
//! the campus city somewhere, and often the state. Narrowing by city, then
//! by state, resolves the common cases; whenever the evidence runs out the
//! first row in original table order wins. That fallback trades precision
//! for availability — a result is always produced when any row matched the
//! name — and is deterministic across repeated calls.

use crate::config::ResolveConfig;
use crate::output::ResolvedInstitution;
use crate::table::{ReferenceTable, Row};
use std::collections::BTreeMap;
use tracing::debug;

/// Column spellings tolerated for the city and state fields.
const CITY_COLUMNS: &[&str] = &["CITY", "City"];
const STATE_COLUMNS: &[&str] = &["STATE", "State"];

/// Resolve a matched institution name to one table row and project it.
///
/// Returns `None` only when no row carries `name` (case-insensitively) —
/// per the table invariant the orchestrator treats that as "no match",
/// never as an error.
pub fn lookup_ranking(
    name: &str,
    table: &ReferenceTable,
    text: Option<&str>,
    config: &ResolveConfig,
) -> Option<ResolvedInstitution> {
    let rows = table.rows_named(name);
    let row = match rows.as_slice() {
        [] => return None,
        [only] => *only,
        many => disambiguate(many, table, text),
    };
    Some(project(row, table, config))
}

/// Narrow multiple same-named rows using city, then state, evidence from
/// the document text. Each filter runs only when the table carries the
/// column at all; the first row wins whenever narrowing empties the set or
/// no text is available.
fn disambiguate<'a>(rows: &[&'a Row], table: &ReferenceTable, text: Option<&str>) -> &'a Row {
    let Some(text) = text else {
        return rows[0];
    };
    let text = text.to_lowercase();

    let mut filtered: Vec<&Row> = rows.to_vec();

    if has_any_column(table, CITY_COLUMNS) {
        filtered.retain(|row| {
            row.get_any(CITY_COLUMNS)
                .map(|city| text.contains(&city.to_lowercase()))
                .unwrap_or(false)
        });
    }

    if filtered.len() > 1 && has_any_column(table, STATE_COLUMNS) {
        filtered.retain(|row| {
            row.get_any(STATE_COLUMNS)
                .map(|state| text.contains(&state.to_lowercase()))
                .unwrap_or(false)
        });
    }

    match filtered.first() {
        Some(row) => row,
        None => {
            debug!("Disambiguation evidence exhausted; using first row");
            rows[0]
        }
    }
}

fn has_any_column(table: &ReferenceTable, columns: &[&str]) -> bool {
    columns.iter().any(|c| table.has_column(c))
}

/// Project a table row into the externally visible record: name as cased in
/// the table, city/state, and the two tier maps (omitted when empty).
fn project(row: &Row, table: &ReferenceTable, config: &ResolveConfig) -> ResolvedInstitution {
    ResolvedInstitution {
        name: row.get(table.name_column()).unwrap_or("").to_string(),
        city: row.get_any(CITY_COLUMNS).map(str::to_string),
        state: row.get_any(STATE_COLUMNS).map(str::to_string),
        tier1: tier_map(row, &config.tier1_columns),
        tier2: tier_map(row, &config.tier2_columns),
    }
}

/// Collect the non-blank values of the given ranking columns.
/// `None` — not an empty map — when no column qualifies.
fn tier_map(row: &Row, columns: &[String]) -> Option<BTreeMap<String, String>> {
    let map: BTreeMap<String, String> = columns
        .iter()
        .filter_map(|col| row.get(col).map(|v| (col.clone(), v.to_string())))
        .collect();
    (!map.is_empty()).then_some(map)
}
