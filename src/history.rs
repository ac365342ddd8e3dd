//! Bounded history of recent resolutions.
//!
//! The core never persists anything; a caller that wants a "recent
//! lookups" view (an admissions dashboard, a review queue) owns one of
//! these instead of accumulating results in unbounded session state. The
//! log is a fixed-capacity ring buffer: pushing beyond capacity evicts the
//! oldest entry, and iteration yields newest first — the order a reviewer
//! reads it in.

use crate::output::{Resolution, SourceLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One remembered resolution, trimmed to what a review list displays.
///
/// The raw text is deliberately not retained here — it can run to hundreds
/// of kilobytes per document and belongs with the caller's own storage if
/// they need it later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the resolution completed.
    pub timestamp: DateTime<Utc>,
    /// Which document produced the result.
    pub source: SourceLabel,
    /// Resolved institution name, when there was one.
    pub institution: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// Confidence score of the result.
    pub score: f64,
}

impl LogEntry {
    /// Summarise a resolution, timestamped now.
    pub fn from_resolution(resolution: &Resolution) -> Self {
        Self {
            timestamp: Utc::now(),
            source: resolution.source.clone(),
            institution: resolution.institution.as_ref().map(|i| i.name.clone()),
            city: resolution
                .institution
                .as_ref()
                .and_then(|i| i.city.clone()),
            state: resolution
                .institution
                .as_ref()
                .and_then(|i| i.state.clone()),
            score: resolution.score,
        }
    }
}

/// Fixed-capacity, newest-first log of recent resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionLog {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

impl ResolutionLog {
    /// Create a log holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Record a resolution, evicting the oldest entry when full.
    pub fn record(&mut self, resolution: &Resolution) {
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(LogEntry::from_resolution(resolution));
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ResolutionLog {
    /// Ten entries — enough for a review session without growing a
    /// server-side session cookie unboundedly.
    fn default() -> Self {
        Self::new(10)
    }
}
