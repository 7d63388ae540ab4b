use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use tracing::debug;

use redcap_format::RecordTable;

use crate::csv_table::read_csv_table;

/// Read a records export as an all-text table.
pub fn read_records(path: &Path) -> Result<RecordTable> {
    let table = read_csv_table(path)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "read records"
    );
    RecordTable::from_rows(&table.headers, &table.rows)
        .with_context(|| format!("build record table: {}", path.display()))
}

/// Write `table` as CSV with one header row.
///
/// Missing cells are written empty, so the file can be read back with
/// [`read_records`] and formatted again.
pub fn write_records(table: &RecordTable, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    let names = table.column_names();
    writer
        .write_record(&names)
        .with_context(|| format!("write header: {}", path.display()))?;
    let columns: Vec<Vec<Option<String>>> = names
        .iter()
        .map(|name| table.values(name).unwrap_or_default())
        .collect();
    for row in 0..table.height() {
        let record = columns
            .iter()
            .map(|values| values.get(row).cloned().flatten().unwrap_or_default());
        writer
            .write_record(record)
            .with_context(|| format!("write row {}: {}", row + 2, path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
