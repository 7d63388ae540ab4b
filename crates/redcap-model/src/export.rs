//! Export field names.
//!
//! A record export does not use declared field names for checkbox fields:
//! each checkbox choice becomes its own column named
//! `<field>___<code>`. Every other field exports under its own name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dictionary::DataDictionary;
use crate::error::DictionaryError;
use crate::field::{FieldDefinition, FieldType};

/// Separator between a checkbox field name and its coded value.
pub const CHECKBOX_SEPARATOR: &str = "___";

/// Separator between a field label and a choice label.
pub const CHOICE_LABEL_SEPARATOR: &str = ": ";

/// One physical export column and the declared field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFieldName {
    pub original_field_name: String,
    /// Choice code for checkbox columns.
    pub choice_value: Option<String>,
    pub export_field_name: String,
    /// Display label for the column.
    pub label: String,
    /// Choice label for checkbox columns.
    pub choice_label: Option<String>,
}

/// Physical column name of one checkbox choice.
///
/// ```
/// use redcap_model::export::checkbox_column_name;
///
/// assert_eq!(checkbox_column_name("symptoms", "1"), "symptoms___1");
/// assert_eq!(checkbox_column_name("race", "-99"), "race____99");
/// assert_eq!(checkbox_column_name("race", "UNK"), "race___unk");
/// ```
pub fn checkbox_column_name(field_name: &str, code: &str) -> String {
    let code: String = code
        .chars()
        .map(|ch| match ch {
            '-' | '.' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    format!("{field_name}{CHECKBOX_SEPARATOR}{code}")
}

/// Export columns of a single field, in choice order for checkboxes.
pub fn field_export_names(field: &FieldDefinition) -> Result<Vec<ExportFieldName>, DictionaryError> {
    if field.field_type != FieldType::Checkbox {
        return Ok(vec![ExportFieldName {
            original_field_name: field.field_name.clone(),
            choice_value: None,
            export_field_name: field.field_name.clone(),
            label: field.field_label.clone(),
            choice_label: None,
        }]);
    }
    let choices = field.choices()?;
    Ok(choices
        .into_iter()
        .map(|choice| ExportFieldName {
            original_field_name: field.field_name.clone(),
            export_field_name: checkbox_column_name(&field.field_name, &choice.code),
            label: format!(
                "{}{CHOICE_LABEL_SEPARATOR}{}",
                field.field_label, choice.label
            ),
            choice_value: Some(choice.code),
            choice_label: Some(choice.label),
        })
        .collect())
}

/// Export columns for every field of `dictionary`, in dictionary order.
///
/// Fails if a checkbox choice list cannot be parsed, or if two entries
/// would share one physical column.
pub fn export_field_names(dictionary: &DataDictionary) -> Result<Vec<ExportFieldName>, DictionaryError> {
    let mut names = Vec::new();
    let mut owners: BTreeMap<String, String> = BTreeMap::new();
    for field in dictionary.fields() {
        for entry in field_export_names(field)? {
            if owners
                .insert(entry.export_field_name.clone(), field.field_name.clone())
                .is_some()
            {
                return Err(DictionaryError::DuplicateExportName {
                    field: field.field_name.clone(),
                    export_name: entry.export_field_name,
                });
            }
            names.push(entry);
        }
    }
    Ok(names)
}
