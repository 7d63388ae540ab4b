//! Record table representation.
//!
//! A [`RecordTable`] is a Polars DataFrame plus a side-table keyed by column
//! name. The side-table records what each column holds (its [`ColumnKind`],
//! including factor levels) and its display label, so formatting state never
//! has to be encoded in the DataFrame itself. A freshly ingested export is a
//! `RecordTable` with no side-table entries and no provenance.

use std::collections::BTreeMap;

use polars::prelude::{
    BooleanChunked, Column, DataFrame, IntoColumn, NamedFrom, NewChunkedArray, PolarsResult,
    Series,
};
use redcap_common::column_strings;
use redcap_model::FormatProvenance;

use crate::report::FormatReport;

/// Semantic type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Character,
    Numeric,
    Date,
    DateTime,
    /// Ordered categorical stored as text; every non-missing value is one
    /// of `levels`.
    Factor { levels: Vec<String> },
}

impl ColumnKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Factor { .. } => "factor",
        }
    }
}

/// Side-table entry for one column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMeta {
    pub kind: ColumnKind,
    pub label: Option<String>,
}

/// A raw or formatted record export.
#[derive(Debug, Clone)]
pub struct RecordTable {
    data: DataFrame,
    columns: BTreeMap<String, ColumnMeta>,
    provenance: Option<FormatProvenance>,
    report: FormatReport,
}

impl RecordTable {
    /// Wrap an exported DataFrame with no formatting metadata.
    pub fn new(data: DataFrame) -> Self {
        Self {
            data,
            columns: BTreeMap::new(),
            provenance: None,
            report: FormatReport::default(),
        }
    }

    /// Build a raw table of text columns from header and row cells.
    ///
    /// Short rows are padded with empty cells.
    pub fn from_rows<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> PolarsResult<Self> {
        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let values: Vec<String> = rows
                    .iter()
                    .map(|row| row.get(idx).cloned().unwrap_or_default())
                    .collect();
                Series::new(header.as_ref().into(), values).into_column()
            })
            .collect();
        Ok(Self::new(DataFrame::new(columns)?))
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Returns the number of records in the table.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Column values as text, `None` for missing cells.
    pub fn values(&self, name: &str) -> Option<Vec<Option<String>>> {
        self.data.column(name).ok().map(column_strings)
    }

    pub fn column_meta(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.get(name)
    }

    /// Semantic type of a column; untouched columns are character.
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        if !self.has_column(name) {
            return None;
        }
        Some(
            self.columns
                .get(name)
                .map(|meta| meta.kind.clone())
                .unwrap_or_default(),
        )
    }

    pub fn levels(&self, name: &str) -> Option<&[String]> {
        match &self.columns.get(name)?.kind {
            ColumnKind::Factor { levels } => Some(levels),
            _ => None,
        }
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.columns.get(name)?.label.as_deref()
    }

    /// Display labels keyed by column name.
    pub fn labels(&self) -> BTreeMap<&str, &str> {
        self.columns
            .iter()
            .filter_map(|(name, meta)| meta.label.as_deref().map(|label| (name.as_str(), label)))
            .collect()
    }

    /// Flags this table was formatted with, if it has been formatted.
    pub fn provenance(&self) -> Option<&FormatProvenance> {
        self.provenance.as_ref()
    }

    pub fn report(&self) -> &FormatReport {
        &self.report
    }

    /// Replace a column, keeping its position and label.
    pub(crate) fn replace_column(&mut self, series: Series, kind: ColumnKind) -> PolarsResult<()> {
        let name = series.name().as_str().to_string();
        self.data.with_column(series)?;
        self.columns.entry(name).or_default().kind = kind;
        Ok(())
    }

    pub(crate) fn set_label(&mut self, name: &str, label: Option<String>) {
        self.columns.entry(name.to_string()).or_default().label = label;
    }

    pub(crate) fn clear_labels(&mut self) {
        for meta in self.columns.values_mut() {
            meta.label = None;
        }
    }

    pub(crate) fn set_provenance(&mut self, provenance: FormatProvenance) {
        self.provenance = Some(provenance);
    }

    pub(crate) fn report_mut(&mut self) -> &mut FormatReport {
        &mut self.report
    }

    /// Keep the rows where `mask` is true and the named columns, in their
    /// current order. Side-table entries of dropped columns are removed.
    pub(crate) fn retain(&mut self, mask: &[bool], keep_columns: &[String]) -> PolarsResult<()> {
        let mask = BooleanChunked::from_slice("keep".into(), mask);
        let filtered = self.data.filter(&mask)?;
        self.data = filtered.select(keep_columns.iter().map(String::as_str))?;
        self.columns.retain(|name, _| keep_columns.contains(name));
        Ok(())
    }
}
