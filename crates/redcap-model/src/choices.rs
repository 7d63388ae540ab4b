//! Choice list decoding.
//!
//! Choice-bearing fields store their options as a single string such as
//! `1, Fever | 2, Cough`. The order of appearance is the canonical level
//! order for every categorical column derived from the field.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ChoiceParseError;

/// Separator between choices.
pub const CHOICE_DELIMITER: char = '|';

/// Separator between a choice code and its label.
pub const CODE_LABEL_SEPARATOR: char = ',';

/// A single (code, label) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub code: String,
    pub label: String,
}

impl Choice {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Parse the raw choice string of `field_name`.
///
/// Empty input yields no choices. Each segment is split on the first
/// separator only, so labels may themselves contain commas.
///
/// # Examples
///
/// ```
/// use redcap_model::choices::parse_choices;
///
/// let choices = parse_choices("symptoms", "1, Fever | 2, Cough, dry").unwrap();
/// assert_eq!(choices.len(), 2);
/// assert_eq!(choices[1].code, "2");
/// assert_eq!(choices[1].label, "Cough, dry");
/// ```
pub fn parse_choices(field_name: &str, raw: &str) -> Result<Vec<Choice>, ChoiceParseError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut choices = Vec::new();
    let mut seen = BTreeSet::new();
    for segment in raw.split(CHOICE_DELIMITER) {
        let malformed = || ChoiceParseError::MalformedSegment {
            field: field_name.to_string(),
            segment: segment.trim().to_string(),
        };
        let (code, label) = segment.split_once(CODE_LABEL_SEPARATOR).ok_or_else(malformed)?;
        let code = code.trim();
        let label = label.trim();
        if code.is_empty() || label.is_empty() {
            return Err(malformed());
        }
        if !seen.insert(code.to_string()) {
            return Err(ChoiceParseError::DuplicateCode {
                field: field_name.to_string(),
                code: code.to_string(),
            });
        }
        choices.push(Choice::new(code, label));
    }
    Ok(choices)
}
