use polars::prelude::PolarsError;
use redcap_model::DictionaryError;
use thiserror::Error;

/// Errors that abort a formatting call.
///
/// Cell-level problems (unparseable values, unknown codes) are not errors;
/// they are recorded in the table's [`FormatReport`](crate::FormatReport).
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed data dictionary: {0}")]
    MalformedDictionary(#[from] DictionaryError),
    #[error("event translation requested but no event map was supplied")]
    MissingEventMap,
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, FormatError>;
