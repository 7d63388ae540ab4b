//! Removal of empty rows and columns.

use polars::prelude::PolarsResult;
use tracing::debug;

use crate::table::RecordTable;

/// Drop rows missing in every column and columns missing in every row.
///
/// Remaining rows and columns keep their relative order. Tables with no
/// rows or no columns are returned unchanged.
pub fn strip_empty(mut table: RecordTable) -> PolarsResult<RecordTable> {
    let height = table.height();
    if height == 0 || table.width() == 0 {
        return Ok(table);
    }
    let mut row_has_value = vec![false; height];
    let mut keep_columns = Vec::with_capacity(table.width());
    for column in table.data().get_columns() {
        if column.null_count() == height {
            continue;
        }
        keep_columns.push(column.name().as_str().to_string());
        let present = column.is_not_null();
        for (idx, flag) in present.into_iter().enumerate() {
            if flag == Some(true) {
                row_has_value[idx] = true;
            }
        }
    }
    let dropped_rows = row_has_value.iter().filter(|keep| !**keep).count();
    let dropped_columns = table.width() - keep_columns.len();
    if dropped_rows == 0 && dropped_columns == 0 {
        return Ok(table);
    }
    debug!(dropped_rows, dropped_columns, "stripping empty rows and columns");
    table.retain(&row_has_value, &keep_columns)?;
    Ok(table)
}
