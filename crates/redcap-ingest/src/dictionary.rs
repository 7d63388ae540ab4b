use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use redcap_model::{DataDictionary, FieldDefinition};

use crate::csv_table::{CsvTable, read_csv_table};

// API exports use the snake_case names; the project download page uses the
// long form headers.
const FIELD_NAME: &[&str] = &["field_name", "Variable / Field Name"];
const FORM_NAME: &[&str] = &["form_name", "Form Name"];
const FIELD_TYPE: &[&str] = &["field_type", "Field Type"];
const FIELD_LABEL: &[&str] = &["field_label", "Field Label"];
const CHOICES: &[&str] = &[
    "select_choices_or_calculations",
    "Choices, Calculations, OR Slider Labels",
];
const VALIDATION: &[&str] = &[
    "text_validation_type_or_show_slider_number",
    "Text Validation Type OR Show Slider Number",
];

const COLUMNS: &[(&str, &[&str])] = &[
    ("field_name", FIELD_NAME),
    ("form_name", FORM_NAME),
    ("field_type", FIELD_TYPE),
    ("field_label", FIELD_LABEL),
    ("select_choices_or_calculations", CHOICES),
    ("text_validation_type_or_show_slider_number", VALIDATION),
];

pub fn parse_data_dictionary(table: &CsvTable) -> Result<DataDictionary> {
    let fields: Vec<FieldDefinition> = table
        .deserialize_rows(COLUMNS, &["field_name", "field_type"])
        .context("parse data dictionary rows")?;
    debug!(fields = fields.len(), "parsed data dictionary");
    Ok(DataDictionary::new(fields)?)
}

/// Load a data dictionary CSV export.
pub fn load_data_dictionary(path: &Path) -> Result<DataDictionary> {
    let table = read_csv_table(path)?;
    parse_data_dictionary(&table).with_context(|| format!("data dictionary: {}", path.display()))
}
