//! Shared utilities for REDCap crates.
//!
//! This crate provides common utilities used across the workspace,
//! including Polars value helpers.

pub mod polars_utils;

pub use polars_utils::{
    UNIX_EPOCH_DAYS_FROM_CE, any_to_string, column_strings, format_numeric, parse_f64,
};
