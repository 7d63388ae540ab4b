use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use redcap_format::{RecordTable, format_records};
use redcap_ingest::{load_data_dictionary, load_event_map, read_records, write_records};
use redcap_model::{ExportFieldName, FieldType, export_field_names};

use crate::cli::{FieldsArgs, FormatArgs};
use crate::config::load_options;
use crate::logging::redact_value;
use crate::types::FormatSummary;

pub fn run_format(args: &FormatArgs) -> Result<FormatSummary> {
    let span = info_span!("format", records = %args.records.display());
    let _guard = span.enter();

    let options = args.overrides().apply(load_options(args.config.as_deref())?);
    let dictionary = load_data_dictionary(&args.metadata)?;
    let events = args
        .events
        .as_deref()
        .map(load_event_map)
        .transpose()?;
    let raw = read_records(&args.records)?;
    let before = RecordTable::new(raw.data().clone());

    let formatted = format_records(raw, &dictionary, &options, events.as_ref())
        .with_context(|| format!("format {}", args.records.display()))?;
    // Row positions only line up when nothing was stripped.
    if !options.strip {
        log_failure_examples(&before, &formatted);
    }

    if let Some(path) = &args.output {
        write_records(&formatted, path)?;
        info!(path = %path.display(), "wrote formatted records");
    }
    Ok(FormatSummary::from_table(
        args.records.clone(),
        args.output.clone(),
        &formatted,
    ))
}

/// Log the first raw value of each column that was set to missing.
fn log_failure_examples(before: &RecordTable, after: &RecordTable) {
    let report = after.report();
    let columns = report
        .cast_failures
        .keys()
        .chain(report.unknown_levels.keys());
    for column in columns {
        let (Some(raw), Some(formatted)) = (before.values(column), after.values(column)) else {
            continue;
        };
        let example = raw
            .iter()
            .zip(&formatted)
            .enumerate()
            .find_map(|(row, (raw, formatted))| match (raw.as_deref(), formatted) {
                (Some(value), None) if !value.trim().is_empty() => Some((row, value)),
                _ => None,
            });
        if let Some((row, value)) = example {
            debug!(column = %column, row, value = redact_value(value), "value set to missing");
        }
    }
}

pub fn run_fields(args: &FieldsArgs) -> Result<Vec<ExportFieldName>> {
    let dictionary = load_data_dictionary(&args.metadata)?;
    let exports = export_field_names(&dictionary.excluding_types(&[FieldType::Descriptive]))
        .with_context(|| format!("export names: {}", args.metadata.display()))?;
    debug!(columns = exports.len(), "expanded export field names");
    Ok(exports)
}
