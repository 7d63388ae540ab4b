//! Per-column diagnostics for recovered cells.

use std::collections::BTreeMap;

use serde::Serialize;

/// Counts of cells that were set to missing during formatting.
///
/// `cast_failures` counts values that could not be parsed as the column's
/// type; `unknown_levels` counts values with no matching code, label, or
/// event. Neither condition stops a formatting call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    pub cast_failures: BTreeMap<String, usize>,
    pub unknown_levels: BTreeMap<String, usize>,
}

impl FormatReport {
    pub fn record_cast_failures(&mut self, column: &str, count: usize) {
        if count > 0 {
            *self.cast_failures.entry(column.to_string()).or_insert(0) += count;
        }
    }

    pub fn record_unknown_levels(&mut self, column: &str, count: usize) {
        if count > 0 {
            *self.unknown_levels.entry(column.to_string()).or_insert(0) += count;
        }
    }

    pub fn total_cast_failures(&self) -> usize {
        self.cast_failures.values().sum()
    }

    pub fn total_unknown_levels(&self) -> usize {
        self.unknown_levels.values().sum()
    }

    pub fn is_clean(&self) -> bool {
        self.cast_failures.is_empty() && self.unknown_levels.is_empty()
    }

    /// (cast failures, unknown levels) for one column.
    pub fn column_counts(&self, column: &str) -> (usize, usize) {
        (
            self.cast_failures.get(column).copied().unwrap_or(0),
            self.unknown_levels.get(column).copied().unwrap_or(0),
        )
    }

    pub(crate) fn clear(&mut self) {
        self.cast_failures.clear();
        self.unknown_levels.clear();
    }
}
