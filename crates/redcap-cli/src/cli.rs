//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use crate::config::FormatOverrides;
use redcap_model::{EventSource, EventTranslation};

#[derive(Parser)]
#[command(
    name = "redcap",
    version,
    about = "Format REDCap record exports into typed tables",
    long_about = "Format REDCap record exports into typed tables.\n\n\
                  Reads a records CSV export together with the project's data dictionary,\n\
                  converts codes to labels, parses dates and numbers, and expands checkbox\n\
                  columns according to the dictionary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Format a records export and print a column summary.
    Format(FormatArgs),

    /// List the export column names defined by a data dictionary.
    Fields(FieldsArgs),
}

#[derive(Parser)]
pub struct FormatArgs {
    /// Records export CSV.
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Data dictionary CSV.
    #[arg(long = "metadata", value_name = "FILE")]
    pub metadata: PathBuf,

    /// Event definitions CSV, required for event translation.
    #[arg(long = "events", value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// TOML file with formatting options; flags override it.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build labelled factors from choice codes.
    #[arg(long = "factors", overrides_with = "no_factors")]
    pub factors: bool,

    /// Keep choice codes instead of building labelled factors.
    #[arg(long = "no-factors", overrides_with = "factors")]
    pub no_factors: bool,

    /// Attach field labels to columns.
    #[arg(long = "labels", overrides_with = "no_labels")]
    pub labels: bool,

    /// Do not attach field labels to columns.
    #[arg(long = "no-labels", overrides_with = "labels")]
    pub no_labels: bool,

    /// Parse date and datetime fields.
    #[arg(long = "dates", overrides_with = "no_dates")]
    pub dates: bool,

    /// Leave date and datetime fields as text.
    #[arg(long = "no-dates", overrides_with = "dates")]
    pub no_dates: bool,

    /// Use the choice label for checked checkbox cells.
    #[arg(long = "checkbox-labels", overrides_with = "no_checkbox_labels")]
    pub checkbox_labels: bool,

    /// Use Checked/Unchecked markers for checkbox cells.
    #[arg(long = "no-checkbox-labels", overrides_with = "checkbox_labels")]
    pub no_checkbox_labels: bool,

    /// Translate the event column to labels or unique names.
    #[arg(long = "events-to", value_enum, value_name = "FORM")]
    pub events_to: Option<EventFormArg>,

    /// Which representation the event column currently holds.
    #[arg(long = "event-source", value_enum)]
    pub event_source: Option<EventSourceArg>,

    /// Drop rows and columns with no values.
    #[arg(long = "strip", overrides_with = "no_strip")]
    pub strip: bool,

    /// Keep rows and columns with no values.
    #[arg(long = "no-strip", overrides_with = "strip")]
    pub no_strip: bool,

    /// Write the formatted records to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl FormatArgs {
    pub fn overrides(&self) -> FormatOverrides {
        FormatOverrides {
            factors: flag_pair(self.factors, self.no_factors),
            labels: flag_pair(self.labels, self.no_labels),
            dates: flag_pair(self.dates, self.no_dates),
            checkbox_labels: flag_pair(self.checkbox_labels, self.no_checkbox_labels),
            strip: flag_pair(self.strip, self.no_strip),
            event_translation: self.events_to.map(|form| match form {
                EventFormArg::Label => EventTranslation::ToLabel,
                EventFormArg::Raw => EventTranslation::ToRaw,
            }),
            event_source: self.event_source.map(|source| match source {
                EventSourceArg::Detect => EventSource::Detect,
                EventSourceArg::Raw => EventSource::Raw,
                EventSourceArg::Label => EventSource::Label,
            }),
        }
    }
}

/// Resolve a `--x`/`--no-x` pair; `None` when neither was given.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Parser)]
pub struct FieldsArgs {
    /// Data dictionary CSV.
    #[arg(long = "metadata", value_name = "FILE")]
    pub metadata: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EventFormArg {
    Label,
    Raw,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EventSourceArg {
    Detect,
    Raw,
    Label,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
