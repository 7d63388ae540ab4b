use std::path::PathBuf;

use serde::Serialize;

use redcap_format::{ColumnKind, RecordTable};
use redcap_model::FormatProvenance;

/// One row of the column summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub kind: &'static str,
    /// Number of factor levels; zero for other kinds.
    pub levels: usize,
    pub missing: usize,
    pub cast_failures: usize,
    pub unknown_levels: usize,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormatSummary {
    pub records: PathBuf,
    pub output: Option<PathBuf>,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub provenance: Option<FormatProvenance>,
}

impl FormatSummary {
    pub fn from_table(records: PathBuf, output: Option<PathBuf>, table: &RecordTable) -> Self {
        Self {
            records,
            output,
            rows: table.height(),
            columns: summarize_columns(table),
            provenance: table.provenance().copied(),
        }
    }

    pub fn total_cast_failures(&self) -> usize {
        self.columns.iter().map(|column| column.cast_failures).sum()
    }

    pub fn total_unknown_levels(&self) -> usize {
        self.columns.iter().map(|column| column.unknown_levels).sum()
    }
}

pub fn summarize_columns(table: &RecordTable) -> Vec<ColumnSummary> {
    let data = table.data();
    table
        .column_names()
        .into_iter()
        .map(|name| {
            let kind = table.kind(&name).unwrap_or_default();
            let levels = match &kind {
                ColumnKind::Factor { levels } => levels.len(),
                _ => 0,
            };
            let missing = data
                .column(&name)
                .map(|column| column.null_count())
                .unwrap_or(0);
            let (cast_failures, unknown_levels) = table.report().column_counts(&name);
            let label = table.label(&name).map(str::to_string);
            ColumnSummary {
                kind: kind.name(),
                levels,
                missing,
                cast_failures,
                unknown_levels,
                label,
                column: name,
            }
        })
        .collect()
}
