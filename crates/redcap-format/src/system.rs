//! REDCap system columns.
//!
//! Record exports carry columns that are not in the data dictionary: the
//! event and repeat bookkeeping columns and one `<form>_complete` status
//! column per instrument. Form status and repeat instance are cast like
//! declared fields; everything else passes through with blank cells set to
//! missing.

use polars::prelude::{DataType, NamedFrom, PolarsResult, Series};
use redcap_model::{Choice, DataDictionary, FormatOptions};

use crate::cast::{CastRule, ColumnPlan, cast_cells, cell_source};
use crate::table::RecordTable;

pub const EVENT_COLUMN: &str = "redcap_event_name";
pub const REPEAT_INSTRUMENT_COLUMN: &str = "redcap_repeat_instrument";
pub const REPEAT_INSTANCE_COLUMN: &str = "redcap_repeat_instance";

/// Suffix of form status columns.
pub const COMPLETE_SUFFIX: &str = "_complete";

/// Form status choices, in level order.
pub fn form_status_choices() -> Vec<Choice> {
    vec![
        Choice::new("0", "Incomplete"),
        Choice::new("1", "Unverified"),
        Choice::new("2", "Complete"),
    ]
}

/// Cast rules for the system columns of `dictionary`'s forms.
pub fn system_rules(dictionary: &DataDictionary, options: &FormatOptions) -> Vec<(String, CastRule)> {
    let status = if options.factors {
        CastRule::Factor {
            choices: form_status_choices(),
        }
    } else {
        CastRule::Code {
            choices: form_status_choices(),
            numeric: true,
        }
    };
    let mut rules: Vec<(String, CastRule)> = dictionary
        .form_names()
        .into_iter()
        .map(|form| (format!("{form}{COMPLETE_SUFFIX}"), status.clone()))
        .collect();
    rules.push((
        REPEAT_INSTANCE_COLUMN.to_string(),
        CastRule::Numeric {
            comma_decimal: false,
        },
    ));
    rules
}

/// Cast the system columns present in `table`.
///
/// `dictionary` is the full dictionary: a form made only of file or
/// descriptive fields still has a status column. Columns already cast by
/// `plans` are left alone.
pub fn cast_system_columns(
    table: &mut RecordTable,
    dictionary: &DataDictionary,
    plans: &[ColumnPlan],
    options: &FormatOptions,
) -> PolarsResult<Vec<String>> {
    let mut cast = Vec::new();
    for (name, rule) in system_rules(dictionary, options) {
        if plans
            .iter()
            .any(|plan| plan.export.export_field_name == name)
        {
            continue;
        }
        let Some(values) = table.values(&name) else {
            continue;
        };
        let source = cell_source(table, &name, &rule);
        let outcome = cast_cells(&name, &values, &rule, source)?;
        let report = table.report_mut();
        report.record_cast_failures(&name, outcome.cast_failures);
        report.record_unknown_levels(&name, outcome.unknown_levels);
        table.replace_column(outcome.series, outcome.kind)?;
        cast.push(name);
    }
    Ok(cast)
}

/// Set blank text cells to missing in every column not otherwise cast.
///
/// Column kinds are kept, so a factor produced by an earlier pass stays a
/// factor.
pub fn blank_to_missing(
    table: &mut RecordTable,
    plans: &[ColumnPlan],
    handled: &[String],
) -> PolarsResult<()> {
    for name in table.column_names() {
        if handled.contains(&name)
            || plans
                .iter()
                .any(|plan| plan.export.export_field_name == name)
        {
            continue;
        }
        let is_text = table
            .data()
            .column(&name)
            .is_ok_and(|column| column.dtype() == &DataType::String);
        if !is_text {
            continue;
        }
        let Some(values) = table.values(&name) else {
            continue;
        };
        if !values.iter().flatten().any(|v| v.trim().is_empty()) {
            continue;
        }
        let cleaned: Vec<Option<String>> = values
            .into_iter()
            .map(|value| value.filter(|v| !v.trim().is_empty()))
            .collect();
        let kind = table.kind(&name).unwrap_or_default();
        table.replace_column(Series::new(name.as_str().into(), cleaned), kind)?;
    }
    Ok(())
}
