//! Configuration types for institution resolution.
//!
//! All pipeline behaviour is controlled through [`ResolveConfig`], built via
//! its [`ResolveConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across an entire resolution session, serialise
//! it for logging, and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};

/// Column header that must exist in every reference table.
pub const NAME_COLUMN: &str = "Name of Institution";

/// Tier-1 ranking-category columns, projected in this order.
pub const TIER1_COLUMNS: &[&str] = &[
    "Top 100 Overall",
    "Top 100 University",
    "Top 100 College",
    "Top 100 Engineering",
    "QS Global",
];

/// Tier-2 ranking-category columns, projected in this order.
pub const TIER2_COLUMNS: &[&str] = &["101-200 Overall", "101-200 University", "101-200 College"];

/// Configuration for one resolution session.
///
/// Built via [`ResolveConfig::builder()`] or [`ResolveConfig::default()`].
///
/// # Example
/// ```rust
/// use uniresolve::ResolveConfig;
///
/// let config = ResolveConfig::builder()
///     .accept_threshold(80.0)
///     .ocr_language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Header of the institution-name column in the reference table.
    /// Default: `"Name of Institution"`.
    pub name_column: String,

    /// Minimum weighted-keyword score for a phase-2 match to be accepted.
    /// Range: 0–130. Default: 75.0.
    ///
    /// The raw score is `(completeness + order_bonus) × 100` and may exceed
    /// 100 when the order bonus applies. 75 means "three quarters of the
    /// distinctive words of the name were found", which in practice rejects
    /// almost every coincidental overlap while tolerating one OCR-mangled
    /// token in a four-token name.
    pub accept_threshold: f64,

    /// Tokens of an institution name longer than this many characters count
    /// as significant matching evidence. Default: 3.
    ///
    /// "of", "the", "and" and similar connectives appear in nearly every
    /// document; letting them count would inflate completeness for every
    /// candidate at once.
    pub min_significant_len: usize,

    /// Bonus added to completeness when every significant token occurs in
    /// the text in name order. Default: 0.3.
    pub order_bonus: f64,

    /// A PDF text layer shorter than this many characters (after trimming)
    /// is treated as evidence of a scanned document and triggers the OCR
    /// fallback. Default: 50.
    ///
    /// Scanned PDFs usually yield zero or a handful of stray glyphs from
    /// stamps and metadata; genuine text-layer PDFs of even a one-page
    /// transcript comfortably clear 50 characters.
    pub text_layer_min_chars: usize,

    /// Maximum rendered page dimension (width or height) in pixels when
    /// rasterising for OCR. Default: 2000.
    ///
    /// A safety cap: an A0 poster page could otherwise rasterise to a
    /// 13 000 × 18 000 px image and exhaust memory. 2000 px keeps glyphs
    /// comfortably above tesseract's minimum usable size for typical
    /// transcript layouts.
    pub max_rendered_pixels: u32,

    /// OCR engine executable. Default: `"tesseract"` (resolved via PATH).
    pub ocr_command: String,

    /// Language passed to the OCR engine (`-l`). Default: `"eng"`.
    pub ocr_language: String,

    /// Tier-1 ranking columns projected into results, in order.
    pub tier1_columns: Vec<String>,

    /// Tier-2 ranking columns projected into results, in order.
    pub tier2_columns: Vec<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            name_column: NAME_COLUMN.to_string(),
            accept_threshold: 75.0,
            min_significant_len: 3,
            order_bonus: 0.3,
            text_layer_min_chars: 50,
            max_rendered_pixels: 2000,
            ocr_command: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            tier1_columns: TIER1_COLUMNS.iter().map(|s| s.to_string()).collect(),
            tier2_columns: TIER2_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolveConfig {
    /// Create a new builder for `ResolveConfig`.
    pub fn builder() -> ResolveConfigBuilder {
        ResolveConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ResolveConfig`].
#[derive(Debug)]
pub struct ResolveConfigBuilder {
    config: ResolveConfig,
}

impl ResolveConfigBuilder {
    pub fn name_column(mut self, column: impl Into<String>) -> Self {
        self.config.name_column = column.into();
        self
    }

    pub fn accept_threshold(mut self, threshold: f64) -> Self {
        self.config.accept_threshold = threshold.clamp(0.0, 130.0);
        self
    }

    pub fn min_significant_len(mut self, len: usize) -> Self {
        self.config.min_significant_len = len;
        self
    }

    pub fn order_bonus(mut self, bonus: f64) -> Self {
        self.config.order_bonus = bonus.clamp(0.0, 1.0);
        self
    }

    pub fn text_layer_min_chars(mut self, chars: usize) -> Self {
        self.config.text_layer_min_chars = chars;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn ocr_command(mut self, command: impl Into<String>) -> Self {
        self.config.ocr_command = command.into();
        self
    }

    pub fn ocr_language(mut self, language: impl Into<String>) -> Self {
        self.config.ocr_language = language.into();
        self
    }

    pub fn tier1_columns(mut self, columns: Vec<String>) -> Self {
        self.config.tier1_columns = columns;
        self
    }

    pub fn tier2_columns(mut self, columns: Vec<String>) -> Self {
        self.config.tier2_columns = columns;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ResolveConfig, ResolveError> {
        let c = &self.config;
        if c.name_column.trim().is_empty() {
            return Err(ResolveError::InvalidConfig(
                "Institution-name column header must be non-empty".into(),
            ));
        }
        if !(0.0..=130.0).contains(&c.accept_threshold) {
            return Err(ResolveError::InvalidConfig(format!(
                "Accept threshold must be 0–130, got {}",
                c.accept_threshold
            )));
        }
        if c.ocr_command.trim().is_empty() {
            return Err(ResolveError::InvalidConfig(
                "OCR command must be non-empty".into(),
            ));
        }
        Ok(self.config)
    }
}
