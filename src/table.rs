//! Reference table loading: ranking workbooks → an immutable row table.
//!
//! ## Why scan for the header row?
//!
//! Ranking workbooks in the wild carry a cosmetic title/metadata row above
//! the real header ("Rankings 2025", a logo cell, a date). Hard-coding
//! "header is row 2" breaks the moment someone exports a clean sheet, and
//! "header is row 1" breaks on the decorated ones. Scanning the first few
//! rows for the required institution-name column handles both layouts and
//! turns a malformed workbook into a precise load-time error instead of a
//! silent zero-candidate table.

use crate::config::ResolveConfig;
use crate::error::ResolveError;
use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How many leading rows are searched for the header.
const HEADER_SCAN_ROWS: usize = 3;

/// One table row: column header → non-blank cell value.
///
/// Blank cells are not stored, so "column present with data" is a plain
/// `get(...).is_some()` check everywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    /// Build a row from `(column, value)` pairs, dropping blank values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let cells = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect();
        Self { cells }
    }

    /// The value of `column`, if present and non-blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// The first present value among the given column spellings.
    ///
    /// Workbooks are inconsistent about `City` vs `CITY`; both the
    /// disambiguator and the projection accept either.
    pub fn get_any<'a>(&'a self, columns: &[&str]) -> Option<&'a str> {
        columns.iter().find_map(|c| self.get(c))
    }
}

/// An immutable, ordered ranking table with a designated name column.
///
/// Loaded once per session via [`load_reference_table`] (or built in memory
/// via [`ReferenceTable::from_rows`]) and never mutated afterwards; every
/// pipeline invocation borrows it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTable {
    columns: Vec<String>,
    rows: Vec<Row>,
    name_column: String,
}

impl ReferenceTable {
    /// Build a table from in-memory rows.
    ///
    /// `columns` is the ordered header list; each data row pairs with it
    /// positionally. Fails if `name_column` is not among the columns —
    /// the same fatal check the workbook loader applies.
    pub fn from_rows(
        columns: Vec<String>,
        data: Vec<Vec<String>>,
        name_column: &str,
    ) -> Result<Self, ResolveError> {
        if !columns.iter().any(|c| c == name_column) {
            return Err(ResolveError::MissingNameColumn {
                path: PathBuf::from("<in-memory>"),
                column: name_column.to_string(),
                rows_checked: 1,
            });
        }
        let rows = data
            .into_iter()
            .map(|values| Row::from_pairs(columns.iter().cloned().zip(values)))
            .collect();
        Ok(Self {
            columns,
            rows,
            name_column: name_column.to_string(),
        })
    }

    /// Ordered column headers.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in original table order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The designated institution-name column header.
    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    /// True when the table carries a column with this exact header.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Lower-cased institution names in table order, blanks dropped.
    ///
    /// Duplicates are preserved on purpose: multi-campus institutions appear
    /// once per campus, and matching ties must favour the first row.
    pub fn candidate_names(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(&self.name_column))
            .map(|name| name.to_lowercase())
            .collect()
    }

    /// Sorted, deduplicated institution names (original casing), for
    /// directory listings and autocomplete.
    pub fn unique_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .rows
            .iter()
            .filter_map(|row| row.get(&self.name_column))
            .map(|name| name.trim().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// All rows whose institution name equals `name` case-insensitively,
    /// in original table order.
    pub fn rows_named(&self, name: &str) -> Vec<&Row> {
        let wanted = name.to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                row.get(&self.name_column)
                    .map(|n| n.to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Load and validate a ranking workbook.
///
/// Reads the named worksheet (or the first one when `sheet` is `None`),
/// locates the header row within the first few rows, and builds the table.
/// Missing workbook, missing sheet, or a sheet without the configured
/// institution-name column are all fatal: the caller must not proceed
/// without a usable table.
pub fn load_reference_table(
    path: impl AsRef<Path>,
    sheet: Option<&str>,
    config: &ResolveConfig,
) -> Result<ReferenceTable, ResolveError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ResolveError::TableNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| ResolveError::TableRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let available = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => {
            if !available.iter().any(|s| s == name) {
                return Err(ResolveError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: name.to_string(),
                    available,
                });
            }
            name.to_string()
        }
        None => available
            .first()
            .cloned()
            .ok_or_else(|| ResolveError::TableRead {
                path: path.to_path_buf(),
                detail: "workbook contains no worksheets".into(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ResolveError::TableRead {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    if grid.is_empty() {
        return Err(ResolveError::EmptySheet {
            path: path.to_path_buf(),
            sheet: sheet_name,
        });
    }

    // Locate the header row: the first leading row carrying the name column.
    let scan_limit = grid.len().min(HEADER_SCAN_ROWS);
    let header_idx = grid[..scan_limit]
        .iter()
        .position(|row| row.iter().any(|cell| cell.trim() == config.name_column))
        .ok_or_else(|| ResolveError::MissingNameColumn {
            path: path.to_path_buf(),
            column: config.name_column.clone(),
            rows_checked: scan_limit,
        })?;

    let columns: Vec<String> = grid[header_idx]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect();
    debug!(
        "Header found at row {} with {} columns",
        header_idx + 1,
        columns.len()
    );

    let data: Vec<Vec<String>> = grid[header_idx + 1..]
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .cloned()
        .collect();

    let table = ReferenceTable::from_rows(columns, data, &config.name_column)?;
    info!(
        "Loaded reference table '{}' sheet '{}': {} rows, {} candidates",
        path.display(),
        sheet_name,
        table.rows().len(),
        table.candidate_names().len()
    );
    Ok(table)
}

/// Render a calamine cell as the string the rest of the pipeline sees.
///
/// Whole floats print without the trailing `.0` — rank cells arrive as
/// numeric `57.0` from Excel but must compare and display as `"57"`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ReferenceTable {
        ReferenceTable::from_rows(
            vec![
                "Name of Institution".into(),
                "City".into(),
                "State".into(),
                "Top 100 Overall".into(),
            ],
            vec![
                vec![
                    "Acme Institute of Technology".into(),
                    "Springfield".into(),
                    "Ohio".into(),
                    "12".into(),
                ],
                vec![
                    "Acme Institute of Technology".into(),
                    "Shelbyville".into(),
                    "Ohio".into(),
                    "".into(),
                ],
                vec!["National College".into(), "Delhi".into(), "".into(), "3".into()],
            ],
            "Name of Institution",
        )
        .unwrap()
    }

    #[test]
    fn from_rows_requires_name_column() {
        let err = ReferenceTable::from_rows(
            vec!["Institution".into()],
            vec![],
            "Name of Institution",
        );
        assert!(matches!(
            err,
            Err(ResolveError::MissingNameColumn { .. })
        ));
    }

    #[test]
    fn candidate_names_are_lowercased_in_order_with_duplicates() {
        let t = sample_table();
        assert_eq!(
            t.candidate_names(),
            vec![
                "acme institute of technology",
                "acme institute of technology",
                "national college"
            ]
        );
    }

    #[test]
    fn unique_names_are_sorted_and_deduplicated() {
        let t = sample_table();
        assert_eq!(
            t.unique_names(),
            vec!["Acme Institute of Technology", "National College"]
        );
    }

    #[test]
    fn rows_named_matches_case_insensitively_in_order() {
        let t = sample_table();
        let rows = t.rows_named("ACME institute OF technology");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("City"), Some("Springfield"));
        assert_eq!(rows[1].get("City"), Some("Shelbyville"));
    }

    #[test]
    fn blank_cells_are_dropped() {
        let t = sample_table();
        let rows = t.rows_named("national college");
        assert_eq!(rows[0].get("State"), None);
        assert_eq!(rows[0].get("Top 100 Overall"), Some("3"));
    }

    #[test]
    fn get_any_tolerates_either_spelling() {
        let row = Row::from_pairs([("CITY", "Mumbai")]);
        assert_eq!(row.get_any(&["CITY", "City"]), Some("Mumbai"));
        assert_eq!(row.get_any(&["STATE", "State"]), None);
    }

    #[test]
    fn whole_floats_lose_trailing_zero() {
        assert_eq!(cell_to_string(&Data::Float(57.0)), "57");
        assert_eq!(cell_to_string(&Data::Float(57.5)), "57.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
