use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use redcap_model::{EventDefinition, EventMap};

use crate::csv_table::{CsvTable, read_csv_table};

const COLUMNS: &[(&str, &[&str])] = &[
    ("unique_event_name", &["unique_event_name", "Unique event name"]),
    ("event_name", &["event_name", "Event Name", "Event Label"]),
];

pub fn parse_event_map(table: &CsvTable) -> Result<EventMap> {
    let events: Vec<EventDefinition> = table
        .deserialize_rows(COLUMNS, &["unique_event_name", "event_name"])
        .context("parse event rows")?;
    debug!(events = events.len(), "parsed event definitions");
    Ok(EventMap::new(events)?)
}

/// Load an event definitions CSV export.
pub fn load_event_map(path: &Path) -> Result<EventMap> {
    let table = read_csv_table(path)?;
    parse_event_map(&table).with_context(|| format!("event definitions: {}", path.display()))
}
