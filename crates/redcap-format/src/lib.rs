//! Metadata-driven formatting of REDCap record exports.
//!
//! This crate turns a raw export, where every column is text, into a typed
//! table using the project's data dictionary:
//!
//! - **table**: [`RecordTable`], a DataFrame with per-column kind and label
//! - **cast**: per-field cast rules and the column casting loop
//! - **datetime**: date and datetime parsing for validated text fields
//! - **system**: form status and repeat columns
//! - **events**: event column translation
//! - **strip**: removal of empty rows and columns
//! - **format**: [`format_records`], the pipeline entry point

pub mod cast;
pub mod datetime;
pub mod error;
pub mod events;
pub mod format;
pub mod report;
pub mod strip;
pub mod system;
pub mod table;

pub use cast::{
    CHECKED, CastRule, CellSource, ColumnPlan, UNCHECKED, cast_cells, cast_rule, cast_values,
    plan_columns,
};
pub use error::{FormatError, Result};
pub use events::{detect_event_source, translate_events};
pub use format::format_records;
pub use report::FormatReport;
pub use strip::strip_empty;
pub use system::{
    COMPLETE_SUFFIX, EVENT_COLUMN, REPEAT_INSTANCE_COLUMN, REPEAT_INSTRUMENT_COLUMN,
};
pub use table::{ColumnKind, ColumnMeta, RecordTable};
