#![deny(unsafe_code)]

use crate::options::FormatOptions;

/// The formatting flags a table was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormatProvenance {
    pub factors: bool,
    pub labels: bool,
    pub dates: bool,
    pub checkbox_labels: bool,
}

impl From<&FormatOptions> for FormatProvenance {
    fn from(options: &FormatOptions) -> Self {
        Self {
            factors: options.factors,
            labels: options.labels,
            dates: options.dates,
            checkbox_labels: options.checkbox_labels,
        }
    }
}
