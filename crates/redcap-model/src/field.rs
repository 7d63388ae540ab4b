//! Data dictionary field definitions.
//!
//! A [`FieldDefinition`] is one row of the project's data dictionary. The
//! formatting engine never inspects `field_type` strings directly; it asks
//! for the field's [`FieldCategory`] and dispatches on that.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::choices::{Choice, parse_choices};
use crate::error::ChoiceParseError;

/// Declared REDCap field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Notes,
    Calc,
    File,
    Descriptive,
    Checkbox,
    Radio,
    Dropdown,
    YesNo,
    TrueFalse,
    Slider,
    Sql,
    /// Any type this crate does not know; formatted as text.
    Other(String),
}

/// Field types that never carry castable data in a record export.
pub const NON_DATA_TYPES: [FieldType; 3] =
    [FieldType::Descriptive, FieldType::File, FieldType::Calc];

impl FieldType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "notes" => Self::Notes,
            "calc" => Self::Calc,
            "file" => Self::File,
            "descriptive" => Self::Descriptive,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "dropdown" | "select" => Self::Dropdown,
            "yesno" => Self::YesNo,
            "truefalse" => Self::TrueFalse,
            "slider" => Self::Slider,
            "sql" => Self::Sql,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Notes => "notes",
            Self::Calc => "calc",
            Self::File => "file",
            Self::Descriptive => "descriptive",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Dropdown => "dropdown",
            Self::YesNo => "yesno",
            Self::TrueFalse => "truefalse",
            Self::Slider => "slider",
            Self::Sql => "sql",
            Self::Other(name) => name,
        }
    }

    /// Returns true if exports of this type hold record data.
    pub fn carries_data(&self) -> bool {
        !NON_DATA_TYPES.contains(self)
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component order of a validated date entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateOrder {
    #[default]
    Ymd,
    Mdy,
    Dmy,
}

impl DateOrder {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ymd" => Some(Self::Ymd),
            "mdy" => Some(Self::Mdy),
            "dmy" => Some(Self::Dmy),
            _ => None,
        }
    }
}

/// Text validation rule, taken from `text_validation_type_or_show_slider_number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationType {
    None,
    Date(DateOrder),
    DateTime(DateOrder),
    DateTimeSeconds(DateOrder),
    Integer,
    Number { comma_decimal: bool },
    Other(String),
}

impl ValidationType {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim().to_ascii_lowercase();
        if value.is_empty() {
            return Self::None;
        }
        if let Some(order) = value.strip_prefix("datetime_seconds_").and_then(DateOrder::from_suffix) {
            return Self::DateTimeSeconds(order);
        }
        if let Some(order) = value.strip_prefix("datetime_").and_then(DateOrder::from_suffix) {
            return Self::DateTime(order);
        }
        if let Some(order) = value.strip_prefix("date_").and_then(DateOrder::from_suffix) {
            return Self::Date(order);
        }
        match value.as_str() {
            "date" => Self::Date(DateOrder::Ymd),
            "datetime" => Self::DateTime(DateOrder::Ymd),
            "integer" | "int" => Self::Integer,
            "number" | "float" => Self::Number {
                comma_decimal: false,
            },
            other if other.starts_with("number_") => Self::Number {
                comma_decimal: other.contains("comma_decimal"),
            },
            _ => Self::Other(value),
        }
    }
}

/// Formatting category of a field.
///
/// This is the closed set the cast table is written against; every declared
/// type and validation combination maps to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Checkbox,
    /// radio, dropdown, yesno, truefalse
    Categorical,
    Date(DateOrder),
    DateTime(DateOrder),
    Numeric { comma_decimal: bool },
    Character,
    /// descriptive, file, calc
    NoData,
}

/// One row of the data dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub field_name: String,
    #[serde(default)]
    pub form_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub field_label: String,
    #[serde(default)]
    pub select_choices_or_calculations: String,
    #[serde(default)]
    pub text_validation_type_or_show_slider_number: String,
}

impl FieldDefinition {
    pub fn new(field_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_name: field_name.into(),
            form_name: String::new(),
            field_type,
            field_label: String::new(),
            select_choices_or_calculations: String::new(),
            text_validation_type_or_show_slider_number: String::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = label.into();
        self
    }

    #[must_use]
    pub fn with_form(mut self, form_name: impl Into<String>) -> Self {
        self.form_name = form_name.into();
        self
    }

    #[must_use]
    pub fn with_choices(mut self, choices: impl Into<String>) -> Self {
        self.select_choices_or_calculations = choices.into();
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: impl Into<String>) -> Self {
        self.text_validation_type_or_show_slider_number = validation.into();
        self
    }

    pub fn validation(&self) -> ValidationType {
        match self.field_type {
            FieldType::Text => ValidationType::parse(&self.text_validation_type_or_show_slider_number),
            _ => ValidationType::None,
        }
    }

    pub fn category(&self) -> FieldCategory {
        match &self.field_type {
            FieldType::Calc | FieldType::File | FieldType::Descriptive => FieldCategory::NoData,
            FieldType::Checkbox => FieldCategory::Checkbox,
            FieldType::Radio | FieldType::Dropdown | FieldType::YesNo | FieldType::TrueFalse => {
                FieldCategory::Categorical
            }
            FieldType::Slider => FieldCategory::Numeric {
                comma_decimal: false,
            },
            FieldType::Text => match self.validation() {
                ValidationType::Date(order) => FieldCategory::Date(order),
                ValidationType::DateTime(order) | ValidationType::DateTimeSeconds(order) => {
                    FieldCategory::DateTime(order)
                }
                ValidationType::Integer => FieldCategory::Numeric {
                    comma_decimal: false,
                },
                ValidationType::Number { comma_decimal } => FieldCategory::Numeric { comma_decimal },
                ValidationType::None | ValidationType::Other(_) => FieldCategory::Character,
            },
            FieldType::Notes | FieldType::Sql | FieldType::Other(_) => FieldCategory::Character,
        }
    }

    /// Decoded choices of a choice-bearing field, in declared order.
    ///
    /// yesno and truefalse fields fall back to their implicit choice sets
    /// when the dictionary leaves the choice string empty. Fields of any
    /// other category have no choices.
    pub fn choices(&self) -> Result<Vec<Choice>, ChoiceParseError> {
        let raw = self.select_choices_or_calculations.trim();
        match (&self.field_type, raw.is_empty()) {
            (FieldType::YesNo, true) => Ok(vec![Choice::new("1", "Yes"), Choice::new("0", "No")]),
            (FieldType::TrueFalse, true) => {
                Ok(vec![Choice::new("1", "True"), Choice::new("0", "False")])
            }
            _ => match self.category() {
                FieldCategory::Checkbox | FieldCategory::Categorical => {
                    parse_choices(&self.field_name, raw)
                }
                _ => Ok(Vec::new()),
            },
        }
    }
}
