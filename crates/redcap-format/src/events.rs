//! Event column translation.
//!
//! Longitudinal exports identify each row's event by its unique event name
//! in `redcap_event_name`. Translation maps the column to display labels or
//! back, producing a factor whose levels are the target representation in
//! event map order.

use polars::prelude::{NamedFrom, Series};
use redcap_model::{EventMap, EventSource, EventTranslation};
use tracing::{debug, warn};

use crate::error::{FormatError, Result};
use crate::system::EVENT_COLUMN;
use crate::table::{ColumnKind, RecordTable};

/// Decide which representation the event values are in.
///
/// Any value matching a known event label marks the column as labeled.
/// This misreads a raw column whose unique names collide with labels; pass
/// an explicit [`EventSource`] to [`translate_events`] when that can happen.
pub fn detect_event_source(values: &[Option<String>], events: &EventMap) -> EventSource {
    let labeled = values
        .iter()
        .flatten()
        .any(|value| events.is_label(value.trim()));
    if labeled {
        EventSource::Label
    } else {
        EventSource::Raw
    }
}

/// Translate the event column of `table`.
///
/// Values not found in the source representation become missing. A table
/// without an event column is left unchanged.
pub fn translate_events(
    table: &mut RecordTable,
    events: Option<&EventMap>,
    translation: EventTranslation,
    source: EventSource,
) -> Result<()> {
    if translation == EventTranslation::None {
        return Ok(());
    }
    let events = events.ok_or(FormatError::MissingEventMap)?;
    let Some(values) = table.values(EVENT_COLUMN) else {
        debug!("no event column, skipping event translation");
        return Ok(());
    };
    let source = match source {
        EventSource::Detect => detect_event_source(&values, events),
        explicit => explicit,
    };
    debug!(?translation, ?source, "translating event column");

    let mut unknown = 0;
    let translated: Vec<Option<String>> = values
        .iter()
        .map(|value| {
            let value = value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
            let result = translate_value(value, events, translation, source);
            if result.is_none() {
                unknown += 1;
            }
            result.map(str::to_string)
        })
        .collect();
    if unknown > 0 {
        warn!(column = EVENT_COLUMN, cells = unknown, "event values not in event map");
    }
    let levels: Vec<String> = match translation {
        EventTranslation::ToRaw => events.unique_names(),
        _ => events.labels(),
    }
    .into_iter()
    .map(str::to_string)
    .collect();

    table.report_mut().record_unknown_levels(EVENT_COLUMN, unknown);
    table.replace_column(
        Series::new(EVENT_COLUMN.into(), translated),
        ColumnKind::Factor { levels },
    )?;
    Ok(())
}

fn translate_value<'a>(
    value: &str,
    events: &'a EventMap,
    translation: EventTranslation,
    source: EventSource,
) -> Option<&'a str> {
    match (translation, source) {
        (EventTranslation::ToLabel, EventSource::Label) => events
            .labels()
            .into_iter()
            .find(|label| *label == value),
        (EventTranslation::ToLabel, _) => events.label_for(value),
        (EventTranslation::ToRaw, EventSource::Label) => events.unique_name_for(value),
        (EventTranslation::ToRaw, _) => events
            .unique_names()
            .into_iter()
            .find(|name| *name == value),
        (EventTranslation::None, _) => None,
    }
}
