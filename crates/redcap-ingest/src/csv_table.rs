use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;

/// A CSV file held as normalized text cells.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of the first header matching one of `aliases`, ignoring case.
    pub fn find_column(&self, aliases: &[&str]) -> Option<usize> {
        self.headers.iter().position(|header| {
            aliases
                .iter()
                .any(|alias| header.eq_ignore_ascii_case(alias))
        })
    }

    /// Deserialize every row into `T`, renaming headers through `columns`.
    ///
    /// Each entry pairs a serde field name with the header aliases accepted
    /// for it. Headers that match no entry are ignored.
    pub fn deserialize_rows<T: DeserializeOwned>(
        &self,
        columns: &[(&str, &[&str])],
        required: &[&str],
    ) -> Result<Vec<T>> {
        let mut canonical: Vec<String> = self.headers.clone();
        for (field, aliases) in columns {
            match self.find_column(aliases) {
                Some(idx) => canonical[idx] = (*field).to_string(),
                None if required.contains(field) => {
                    bail!("missing required column {field}")
                }
                None => {}
            }
        }
        let headers = StringRecord::from(canonical);
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let record = StringRecord::from(row.clone());
                record
                    .deserialize(Some(&headers))
                    .with_context(|| format!("row {}", idx + 2))
            })
            .collect()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file whose first row holds the headers.
///
/// Short rows are padded with empty cells so every row has one cell per
/// header.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut records = reader.records();
    let Some(header) = records.next() else {
        return Ok(CsvTable::default());
    };
    let header = header.with_context(|| format!("read header: {}", path.display()))?;
    let headers: Vec<String> = header.iter().map(normalize_header).collect();
    let mut rows = Vec::new();
    for record in records {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.len() > headers.len() {
            bail!(
                "{}: row {} has {} cells but only {} headers",
                path.display(),
                rows.len() + 2,
                row.len(),
                headers.len()
            );
        }
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}
