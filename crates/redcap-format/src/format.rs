//! Record formatting entry point.

use redcap_model::{DataDictionary, EventMap, EventTranslation, FormatOptions, FormatProvenance};
use tracing::{debug, info, info_span};

use crate::cast::{apply_labels, cast_columns, plan_columns};
use crate::error::{FormatError, Result};
use crate::events::translate_events;
use crate::strip::strip_empty;
use crate::system::{blank_to_missing, cast_system_columns};
use crate::table::RecordTable;

/// Format a record export against its data dictionary.
///
/// Steps, in order: descriptive, file and calc fields are dropped from the
/// dictionary; every remaining field's export columns are cast; form status
/// and repeat instance columns are cast; labels are attached or removed; the
/// event column is translated; empty rows and columns are stripped. The
/// result carries the provenance of the four formatting flags and a report
/// of cells set to missing.
///
/// Malformed dictionaries and a missing event map fail the whole call
/// before any column is cast.
///
/// # Examples
///
/// ```
/// use redcap_format::{RecordTable, format_records};
/// use redcap_model::{DataDictionary, FieldDefinition, FieldType, FormatOptions};
///
/// let dictionary = DataDictionary::new(vec![
///     FieldDefinition::new("record_id", FieldType::Text),
///     FieldDefinition::new("sex", FieldType::Radio).with_choices("0, Female | 1, Male"),
/// ])
/// .unwrap();
/// let raw = RecordTable::from_rows(
///     &["record_id", "sex"],
///     &[vec!["1".to_string(), "1".to_string()]],
/// )
/// .unwrap();
///
/// let formatted = format_records(raw, &dictionary, &FormatOptions::default(), None).unwrap();
/// assert_eq!(formatted.values("sex").unwrap(), vec![Some("Male".to_string())]);
/// assert_eq!(formatted.levels("sex").unwrap(), ["Female", "Male"]);
/// ```
pub fn format_records(
    raw: RecordTable,
    dictionary: &DataDictionary,
    options: &FormatOptions,
    events: Option<&EventMap>,
) -> Result<RecordTable> {
    let span = info_span!(
        "format_records",
        rows = raw.height(),
        columns = raw.width(),
        fields = dictionary.len()
    );
    let _guard = span.enter();

    if options.event_translation != EventTranslation::None && events.is_none() {
        return Err(FormatError::MissingEventMap);
    }
    let data_fields = dictionary.data_fields();
    let plans = plan_columns(&data_fields, options)?;
    debug!(
        fields = data_fields.len(),
        export_columns = plans.len(),
        "built cast plan"
    );

    let mut table = raw;
    table.report_mut().clear();
    cast_columns(&mut table, &plans)?;
    let system = cast_system_columns(&mut table, dictionary, &plans, options)?;
    blank_to_missing(&mut table, &plans, &system)?;
    apply_labels(&mut table, &plans, options.labels);
    translate_events(
        &mut table,
        events,
        options.event_translation,
        options.event_source,
    )?;
    if options.strip {
        table = strip_empty(table)?;
    }
    table.set_provenance(FormatProvenance::from(options));

    let report = table.report();
    info!(
        rows = table.height(),
        columns = table.width(),
        cast_failures = report.total_cast_failures(),
        unknown_levels = report.total_unknown_levels(),
        "formatted records"
    );
    Ok(table)
}
