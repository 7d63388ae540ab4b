//! Formatting options from a TOML file and command line flags.
//!
//! The file holds the fields of [`FormatOptions`] at the top level:
//!
//! ```toml
//! factors = false
//! checkbox_labels = true
//! event_translation = "to_label"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use redcap_model::{EventSource, EventTranslation, FormatOptions};

/// Command line adjustments applied on top of the loaded options.
///
/// `None` keeps whatever the config file chose.
#[derive(Debug, Clone, Default)]
pub struct FormatOverrides {
    pub factors: Option<bool>,
    pub labels: Option<bool>,
    pub dates: Option<bool>,
    pub checkbox_labels: Option<bool>,
    pub strip: Option<bool>,
    pub event_translation: Option<EventTranslation>,
    pub event_source: Option<EventSource>,
}

impl FormatOverrides {
    #[must_use]
    pub fn apply(&self, mut options: FormatOptions) -> FormatOptions {
        options.factors = self.factors.unwrap_or(options.factors);
        options.labels = self.labels.unwrap_or(options.labels);
        options.dates = self.dates.unwrap_or(options.dates);
        options.checkbox_labels = self.checkbox_labels.unwrap_or(options.checkbox_labels);
        options.strip = self.strip.unwrap_or(options.strip);
        if let Some(translation) = self.event_translation {
            options.event_translation = translation;
        }
        if let Some(source) = self.event_source {
            options.event_source = source;
        }
        options
    }
}

pub fn parse_options(contents: &str) -> Result<FormatOptions> {
    toml::from_str(contents).context("parse formatting options")
}

/// Load options from `path`, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<FormatOptions> {
    let Some(path) = path else {
        return Ok(FormatOptions::default());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let options =
        parse_options(&contents).with_context(|| format!("config: {}", path.display()))?;
    debug!(path = %path.display(), ?options, "loaded formatting options");
    Ok(options)
}
