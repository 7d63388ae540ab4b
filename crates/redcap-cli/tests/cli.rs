//! Command handler tests against files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use redcap_cli::cli::{Cli, Command};
use redcap_cli::commands::{run_fields, run_format};

const METADATA: &str = "\
field_name,form_name,field_type,field_label,select_choices_or_calculations,text_validation_type_or_show_slider_number
record_id,enrollment,text,Record ID,,
intro,enrollment,descriptive,Welcome,,
sex,enrollment,radio,Sex,\"0, Female | 1, Male\",
dob,enrollment,text,Date of birth,,date_ymd
symptoms,enrollment,checkbox,Symptoms,\"1, Fever | 2, Cough\",
";

const RECORDS: &str = "\
record_id,sex,dob,symptoms___1,symptoms___2
1,1,2020-02-30,1,
2,7,1999-12-31,,1
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn parse(args: &[&str]) -> Command {
    Cli::try_parse_from(args).expect("valid arguments").command
}

#[test]
fn format_summarizes_columns() {
    let dir = TempDir::new().unwrap();
    let metadata = write(dir.path(), "metadata.csv", METADATA);
    let records = write(dir.path(), "records.csv", RECORDS);
    let Command::Format(args) = parse(&[
        "redcap",
        "format",
        records.to_str().unwrap(),
        "--metadata",
        metadata.to_str().unwrap(),
    ]) else {
        panic!("expected format command");
    };

    let summary = run_format(&args).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.total_cast_failures(), 1);
    assert_eq!(summary.total_unknown_levels(), 1);
    insta::assert_json_snapshot!(summary.columns, @r#"
    [
      {
        "column": "record_id",
        "kind": "character",
        "levels": 0,
        "missing": 0,
        "cast_failures": 0,
        "unknown_levels": 0,
        "label": "Record ID"
      },
      {
        "column": "sex",
        "kind": "factor",
        "levels": 2,
        "missing": 1,
        "cast_failures": 0,
        "unknown_levels": 1,
        "label": "Sex"
      },
      {
        "column": "dob",
        "kind": "date",
        "levels": 0,
        "missing": 1,
        "cast_failures": 1,
        "unknown_levels": 0,
        "label": "Date of birth"
      },
      {
        "column": "symptoms___1",
        "kind": "factor",
        "levels": 2,
        "missing": 0,
        "cast_failures": 0,
        "unknown_levels": 0,
        "label": "Symptoms: Fever"
      },
      {
        "column": "symptoms___2",
        "kind": "factor",
        "levels": 2,
        "missing": 0,
        "cast_failures": 0,
        "unknown_levels": 0,
        "label": "Symptoms: Cough"
      }
    ]
    "#);
}

#[test]
fn config_file_and_flags_combine() {
    let dir = TempDir::new().unwrap();
    let metadata = write(dir.path(), "metadata.csv", METADATA);
    let records = write(dir.path(), "records.csv", RECORDS);
    let config = write(dir.path(), "format.toml", "factors = false\nlabels = false\n");
    let output = dir.path().join("formatted.csv");
    let Command::Format(args) = parse(&[
        "redcap",
        "format",
        records.to_str().unwrap(),
        "--metadata",
        metadata.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--checkbox-labels",
        "--no-dates",
        "--output",
        output.to_str().unwrap(),
    ]) else {
        panic!("expected format command");
    };

    let summary = run_format(&args).unwrap();
    let provenance = summary.provenance.unwrap();
    assert!(!provenance.factors);
    assert!(!provenance.labels);
    assert!(!provenance.dates);
    assert!(provenance.checkbox_labels);

    let written = fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(written, @r"
    record_id,sex,dob,symptoms___1,symptoms___2
    1,1,2020-02-30,Fever,
    2,7,1999-12-31,,Cough
    ");
}

#[test]
fn event_translation_without_events_fails() {
    let dir = TempDir::new().unwrap();
    let metadata = write(dir.path(), "metadata.csv", METADATA);
    let records = write(dir.path(), "records.csv", RECORDS);
    let Command::Format(args) = parse(&[
        "redcap",
        "format",
        records.to_str().unwrap(),
        "--metadata",
        metadata.to_str().unwrap(),
        "--events-to",
        "label",
    ]) else {
        panic!("expected format command");
    };
    let err = run_format(&args).unwrap_err();
    assert!(format!("{err:#}").contains("no event map"));
}

#[test]
fn fields_lists_checkbox_columns() {
    let dir = TempDir::new().unwrap();
    let metadata = write(dir.path(), "metadata.csv", METADATA);
    let Command::Fields(args) = parse(&["redcap", "fields", "--metadata", metadata.to_str().unwrap()])
    else {
        panic!("expected fields command");
    };
    let names: Vec<String> = run_fields(&args)
        .unwrap()
        .into_iter()
        .map(|export| export.export_field_name)
        .collect();
    assert_eq!(
        names,
        ["record_id", "sex", "dob", "symptoms___1", "symptoms___2"]
    );
}

#[test]
fn rejects_unknown_event_form() {
    assert!(
        Cli::try_parse_from([
            "redcap",
            "format",
            "records.csv",
            "--metadata",
            "metadata.csv",
            "--events-to",
            "sideways",
        ])
        .is_err()
    );
}
