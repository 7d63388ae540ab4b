use thiserror::Error;

/// A choice list that cannot be decoded into `code, label` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceParseError {
    #[error("field {field}: malformed choice segment '{segment}' (expected 'code, label')")]
    MalformedSegment { field: String, segment: String },
    #[error("field {field}: choice code '{code}' appears more than once")]
    DuplicateCode { field: String, code: String },
}

/// Data dictionary errors.
///
/// Every variant except `FieldNotFound` means the dictionary itself is
/// malformed and no formatting result can be produced from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    #[error("duplicate field name in data dictionary: {field}")]
    DuplicateField { field: String },
    #[error("field not found in data dictionary: {field}")]
    FieldNotFound { field: String },
    #[error("export column {export_name} does not map back to a single field (seen on {field})")]
    DuplicateExportName { field: String, export_name: String },
    #[error(transparent)]
    Choice(#[from] ChoiceParseError),
}

impl DictionaryError {
    /// Returns true for errors that describe a malformed dictionary.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::FieldNotFound { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventMapError {
    #[error("duplicate unique event name in event map: {unique_event_name}")]
    DuplicateEvent { unique_event_name: String },
}
