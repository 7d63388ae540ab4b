//! Field casting.
//!
//! Every export column of a declared field is cast by exactly one
//! [`CastRule`]. The rule is chosen once per column by [`cast_rule`], which
//! is the only place that looks at the field's category and the formatting
//! flags together.
//!
//! Casting reads values as text, so columns already produced by an earlier
//! formatting pass are accepted: choice labels map back to their choice,
//! `Checked`/`Unchecked` read as checkbox states, and date or numeric
//! columns are re-read from their text form.

use polars::prelude::{DataType, NamedFrom, PolarsResult, Series, TimeUnit};
use redcap_common::parse_f64;
use redcap_model::{
    Choice, DataDictionary, DateOrder, DictionaryError, ExportFieldName, FieldCategory,
    FormatOptions, export_field_names,
};
use tracing::{debug, warn};

use crate::datetime::{epoch_days, epoch_millis, parse_date_value, parse_datetime_value};
use crate::table::{ColumnKind, RecordTable};

/// Factor level of a checked checkbox choice.
pub const CHECKED: &str = "Checked";
/// Factor level of an unchecked checkbox choice.
pub const UNCHECKED: &str = "Unchecked";

/// How a single export column is cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastRule {
    /// 0/1, where an empty cell is 0.
    CheckboxNumeric { choice_label: String },
    /// `Unchecked`/`Checked` factor.
    CheckboxMarker { choice_label: String },
    /// Empty string or the choice label; a factor when `factor` is set.
    CheckboxLabel { choice_label: String, factor: bool },
    /// Choice codes passed through, numeric when every declared code is.
    Code { choices: Vec<Choice>, numeric: bool },
    /// Choice labels as a factor in declared choice order.
    Factor { choices: Vec<Choice> },
    Date(DateOrder),
    DateTime(DateOrder),
    Numeric { comma_decimal: bool },
    Character,
}

/// Select the cast rule for one export column.
pub fn cast_rule(
    category: FieldCategory,
    choices: &[Choice],
    column: &ExportFieldName,
    options: &FormatOptions,
) -> CastRule {
    let choice_label = || column.choice_label.clone().unwrap_or_default();
    match (category, options.factors, options.checkbox_labels) {
        (FieldCategory::Checkbox, false, false) => CastRule::CheckboxNumeric {
            choice_label: choice_label(),
        },
        (FieldCategory::Checkbox, true, false) => CastRule::CheckboxMarker {
            choice_label: choice_label(),
        },
        (FieldCategory::Checkbox, factor, true) => CastRule::CheckboxLabel {
            choice_label: choice_label(),
            factor,
        },
        (FieldCategory::Categorical, false, _) => CastRule::Code {
            choices: choices.to_vec(),
            numeric: !choices.is_empty()
                && choices.iter().all(|choice| parse_f64(&choice.code).is_some()),
        },
        (FieldCategory::Categorical, true, _) => CastRule::Factor {
            choices: choices.to_vec(),
        },
        (FieldCategory::Date(order), _, _) if options.dates => CastRule::Date(order),
        (FieldCategory::DateTime(order), _, _) if options.dates => CastRule::DateTime(order),
        (FieldCategory::Numeric { comma_decimal }, _, _) => CastRule::Numeric { comma_decimal },
        (
            FieldCategory::Date(_)
            | FieldCategory::DateTime(_)
            | FieldCategory::Character
            | FieldCategory::NoData,
            _,
            _,
        ) => CastRule::Character,
    }
}

/// An export column together with its cast rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub export: ExportFieldName,
    pub rule: CastRule,
}

/// Build the cast plan of every export column of `dictionary`.
///
/// All choice lists are decoded here, so a malformed dictionary fails
/// before any column is touched.
pub fn plan_columns(
    dictionary: &DataDictionary,
    options: &FormatOptions,
) -> Result<Vec<ColumnPlan>, DictionaryError> {
    let exports = export_field_names(dictionary)?;
    let mut plans = Vec::with_capacity(exports.len());
    for export in exports {
        let field = dictionary.lookup(&export.original_field_name)?;
        let category = field.category();
        let choices = match category {
            FieldCategory::Categorical => field.choices()?,
            _ => Vec::new(),
        };
        let rule = cast_rule(category, &choices, &export, options);
        plans.push(ColumnPlan { export, rule });
    }
    Ok(plans)
}

/// Result of casting one column.
#[derive(Debug, Clone)]
pub struct CastOutcome {
    pub series: Series,
    pub kind: ColumnKind,
    /// Cells that could not be parsed and were set to missing.
    pub cast_failures: usize,
    /// Cells with no matching choice.
    pub unknown_levels: usize,
}

impl CastOutcome {
    fn new(series: Series, kind: ColumnKind) -> Self {
        Self {
            series,
            kind,
            cast_failures: 0,
            unknown_levels: 0,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// What the cells of a column hold before casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellSource {
    /// Codes and raw values of an export.
    #[default]
    Raw,
    /// Labels written by an earlier formatting pass.
    Labels,
}

/// Cell source of column `name` in `table`, given the rule about to cast it.
///
/// Factor columns and checkbox columns written with choice labels hold
/// labels; anything else is read as raw codes.
pub(crate) fn cell_source(table: &RecordTable, name: &str, rule: &CastRule) -> CellSource {
    let Some(meta) = table.column_meta(name) else {
        return CellSource::Raw;
    };
    if matches!(meta.kind, ColumnKind::Factor { .. }) {
        return CellSource::Labels;
    }
    let checkbox = matches!(
        rule,
        CastRule::CheckboxNumeric { .. }
            | CastRule::CheckboxMarker { .. }
            | CastRule::CheckboxLabel { .. }
    );
    if checkbox && table.provenance().is_some_and(|p| p.checkbox_labels) {
        return CellSource::Labels;
    }
    CellSource::Raw
}

/// Checkbox state of a cell: `Some(true)` checked, `Some(false)` unchecked,
/// `None` for a value that is neither.
fn checkbox_state(value: Option<&str>, choice_label: &str, source: CellSource) -> Option<bool> {
    match (value, source) {
        (None, _) => Some(false),
        (Some(v), CellSource::Labels) if v == choice_label || v == CHECKED => Some(true),
        (Some("0") | Some(UNCHECKED), _) => Some(false),
        (Some("1") | Some(CHECKED), _) => Some(true),
        (Some(v), _) if v == choice_label => Some(true),
        (Some(_), _) => None,
    }
}

fn find_choice<'a>(
    choices: &'a [Choice],
    value: &str,
    numeric: bool,
    source: CellSource,
) -> Option<&'a Choice> {
    if source == CellSource::Labels
        && let Some(choice) = choices.iter().find(|choice| choice.label == value)
    {
        return Some(choice);
    }
    if let Some(choice) = choices.iter().find(|choice| choice.code == value) {
        return Some(choice);
    }
    if numeric && let Some(number) = parse_f64(value) {
        if let Some(choice) = choices
            .iter()
            .find(|choice| parse_f64(&choice.code) == Some(number))
        {
            return Some(choice);
        }
    }
    choices.iter().find(|choice| choice.label == value)
}

fn distinct_labels(choices: &[Choice]) -> Vec<String> {
    let mut levels: Vec<String> = Vec::with_capacity(choices.len());
    for choice in choices {
        if !levels.contains(&choice.label) {
            levels.push(choice.label.clone());
        }
    }
    levels
}

/// Cast the raw text values of one column according to `rule`.
pub fn cast_values(name: &str, values: &[Option<String>], rule: &CastRule) -> PolarsResult<CastOutcome> {
    cast_cells(name, values, rule, CellSource::Raw)
}

/// Cast the text values of one column according to `rule`, reading them as
/// `source`.
pub fn cast_cells(
    name: &str,
    values: &[Option<String>],
    rule: &CastRule,
    source: CellSource,
) -> PolarsResult<CastOutcome> {
    match rule {
        CastRule::CheckboxNumeric { choice_label } => {
            let mut unknown = 0;
            let cast: Vec<Option<f64>> = values
                .iter()
                .map(|value| match checkbox_state(non_blank(value), choice_label, source) {
                    Some(true) => Some(1.0),
                    Some(false) => Some(0.0),
                    None => {
                        unknown += 1;
                        None
                    }
                })
                .collect();
            let mut outcome = CastOutcome::new(Series::new(name.into(), cast), ColumnKind::Numeric);
            outcome.unknown_levels = unknown;
            Ok(outcome)
        }
        CastRule::CheckboxMarker { choice_label } => {
            let mut unknown = 0;
            let cast: Vec<Option<&str>> = values
                .iter()
                .map(|value| match checkbox_state(non_blank(value), choice_label, source) {
                    Some(true) => Some(CHECKED),
                    Some(false) => Some(UNCHECKED),
                    None => {
                        unknown += 1;
                        None
                    }
                })
                .collect();
            let levels = vec![UNCHECKED.to_string(), CHECKED.to_string()];
            let mut outcome = CastOutcome::new(
                Series::new(name.into(), cast),
                ColumnKind::Factor { levels },
            );
            outcome.unknown_levels = unknown;
            Ok(outcome)
        }
        CastRule::CheckboxLabel {
            choice_label,
            factor,
        } => {
            let mut unknown = 0;
            let cast: Vec<Option<&str>> = values
                .iter()
                .map(|value| match checkbox_state(non_blank(value), choice_label, source) {
                    Some(true) => Some(choice_label.as_str()),
                    Some(false) => Some(""),
                    None => {
                        unknown += 1;
                        None
                    }
                })
                .collect();
            let kind = if *factor {
                ColumnKind::Factor {
                    levels: vec![String::new(), choice_label.clone()],
                }
            } else {
                ColumnKind::Character
            };
            let mut outcome = CastOutcome::new(Series::new(name.into(), cast), kind);
            outcome.unknown_levels = unknown;
            Ok(outcome)
        }
        CastRule::Code { choices, numeric } => {
            let mut unknown = 0;
            let mut failures = 0;
            let mut codes: Vec<Option<String>> = Vec::with_capacity(values.len());
            for value in values {
                let Some(value) = non_blank(value) else {
                    codes.push(None);
                    continue;
                };
                match find_choice(choices, value, *numeric, source) {
                    Some(choice) => codes.push(Some(choice.code.clone())),
                    None if *numeric && parse_f64(value).is_none() => {
                        failures += 1;
                        codes.push(None);
                    }
                    None => {
                        unknown += 1;
                        codes.push(Some(value.to_string()));
                    }
                }
            }
            let mut outcome = if *numeric {
                let numbers: Vec<Option<f64>> = codes
                    .iter()
                    .map(|code| code.as_deref().and_then(parse_f64))
                    .collect();
                CastOutcome::new(Series::new(name.into(), numbers), ColumnKind::Numeric)
            } else {
                CastOutcome::new(Series::new(name.into(), codes), ColumnKind::Character)
            };
            outcome.cast_failures = failures;
            outcome.unknown_levels = unknown;
            Ok(outcome)
        }
        CastRule::Factor { choices } => {
            let mut unknown = 0;
            let labels: Vec<Option<&str>> = values
                .iter()
                .map(|value| {
                    let value = non_blank(value)?;
                    let choice = find_choice(choices, value, false, source);
                    if choice.is_none() {
                        unknown += 1;
                    }
                    choice.map(|choice| choice.label.as_str())
                })
                .collect();
            let mut outcome = CastOutcome::new(
                Series::new(name.into(), labels),
                ColumnKind::Factor {
                    levels: distinct_labels(choices),
                },
            );
            outcome.unknown_levels = unknown;
            Ok(outcome)
        }
        CastRule::Date(order) => {
            let mut failures = 0;
            let days: Vec<Option<i32>> = values
                .iter()
                .map(|value| {
                    let value = non_blank(value)?;
                    let date = parse_date_value(value, *order);
                    if date.is_none() {
                        failures += 1;
                    }
                    date.map(epoch_days)
                })
                .collect();
            let series = Series::new(name.into(), days).cast(&DataType::Date)?;
            let mut outcome = CastOutcome::new(series, ColumnKind::Date);
            outcome.cast_failures = failures;
            Ok(outcome)
        }
        CastRule::DateTime(order) => {
            let mut failures = 0;
            let millis: Vec<Option<i64>> = values
                .iter()
                .map(|value| {
                    let value = non_blank(value)?;
                    let datetime = parse_datetime_value(value, *order);
                    if datetime.is_none() {
                        failures += 1;
                    }
                    datetime.map(epoch_millis)
                })
                .collect();
            let series = Series::new(name.into(), millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
            let mut outcome = CastOutcome::new(series, ColumnKind::DateTime);
            outcome.cast_failures = failures;
            Ok(outcome)
        }
        CastRule::Numeric { comma_decimal } => {
            let mut failures = 0;
            let numbers: Vec<Option<f64>> = values
                .iter()
                .map(|value| {
                    let value = non_blank(value)?;
                    let number = if *comma_decimal {
                        parse_f64(&value.replace(',', "."))
                    } else {
                        parse_f64(value)
                    };
                    if number.is_none() {
                        failures += 1;
                    }
                    number
                })
                .collect();
            let mut outcome =
                CastOutcome::new(Series::new(name.into(), numbers), ColumnKind::Numeric);
            outcome.cast_failures = failures;
            Ok(outcome)
        }
        CastRule::Character => {
            let text: Vec<Option<String>> = values
                .iter()
                .map(|value| value.clone().filter(|v| !v.trim().is_empty()))
                .collect();
            Ok(CastOutcome::new(
                Series::new(name.into(), text),
                ColumnKind::Character,
            ))
        }
    }
}

/// Cast every planned column present in `table`.
///
/// Planned columns missing from the table are skipped: callers may export a
/// subset of fields.
pub fn cast_columns(table: &mut RecordTable, plans: &[ColumnPlan]) -> PolarsResult<()> {
    for plan in plans {
        let name = plan.export.export_field_name.as_str();
        let Some(values) = table.values(name) else {
            debug!(
                column = %name,
                field = %plan.export.original_field_name,
                "column not in export, skipping"
            );
            continue;
        };
        let source = cell_source(table, name, &plan.rule);
        let outcome = cast_cells(name, &values, &plan.rule, source)?;
        if outcome.cast_failures > 0 {
            warn!(
                column = %name,
                cells = outcome.cast_failures,
                "unparseable cells set to missing"
            );
        }
        if outcome.unknown_levels > 0 {
            warn!(
                column = %name,
                cells = outcome.unknown_levels,
                "values without a matching choice"
            );
        }
        let report = table.report_mut();
        report.record_cast_failures(name, outcome.cast_failures);
        report.record_unknown_levels(name, outcome.unknown_levels);
        table.replace_column(outcome.series, outcome.kind)?;
    }
    Ok(())
}

/// Attach or remove display labels.
///
/// With `enabled`, every planned column present in the table takes its
/// export label, replacing any earlier one. Otherwise all labels are
/// removed.
pub fn apply_labels(table: &mut RecordTable, plans: &[ColumnPlan], enabled: bool) {
    if !enabled {
        table.clear_labels();
        return;
    }
    for plan in plans {
        let name = plan.export.export_field_name.as_str();
        if table.has_column(name) {
            table.set_label(name, Some(plan.export.label.clone()));
        }
    }
}
