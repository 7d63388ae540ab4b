//! Configuration options for record formatting.
//!
//! Options are always passed explicitly into a formatting call; nothing is
//! read from process-wide state.

use serde::{Deserialize, Serialize};

/// Requested direction for the event column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTranslation {
    /// Leave the event column untouched.
    #[default]
    None,
    /// Unique event names to display labels.
    ToLabel,
    /// Display labels to unique event names.
    ToRaw,
}

/// Assumed representation of the event column before translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Treat the column as labeled when any value matches a known label.
    ///
    /// This is a heuristic: a unique event name that is textually equal to
    /// some event label makes the direction ambiguous. Use `Raw` or `Label`
    /// when the representation is known.
    #[default]
    Detect,
    Raw,
    Label,
}

/// Options controlling record formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Convert categorical fields to factors with declared level order.
    pub factors: bool,
    /// Attach field labels to output columns.
    pub labels: bool,
    /// Parse date and datetime validated text fields.
    pub dates: bool,
    /// Use choice labels instead of checked/unchecked markers for checkboxes.
    pub checkbox_labels: bool,
    pub event_translation: EventTranslation,
    pub event_source: EventSource,
    /// Remove rows and columns that are entirely missing.
    pub strip: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            factors: true,
            labels: true,
            dates: true,
            checkbox_labels: false,
            event_translation: EventTranslation::None,
            event_source: EventSource::Detect,
            strip: false,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that only split and type columns: no factors, labels, or dates.
    pub fn raw() -> Self {
        Self {
            factors: false,
            labels: false,
            dates: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_factors(mut self, enable: bool) -> Self {
        self.factors = enable;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, enable: bool) -> Self {
        self.labels = enable;
        self
    }

    #[must_use]
    pub fn with_dates(mut self, enable: bool) -> Self {
        self.dates = enable;
        self
    }

    #[must_use]
    pub fn with_checkbox_labels(mut self, enable: bool) -> Self {
        self.checkbox_labels = enable;
        self
    }

    #[must_use]
    pub fn with_event_translation(mut self, translation: EventTranslation) -> Self {
        self.event_translation = translation;
        self
    }

    #[must_use]
    pub fn with_event_source(mut self, source: EventSource) -> Self {
        self.event_source = source;
        self
    }

    #[must_use]
    pub fn with_strip(mut self, enable: bool) -> Self {
        self.strip = enable;
        self
    }
}
