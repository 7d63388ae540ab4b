//! End-to-end tests for record formatting.

use polars::prelude::{DataType, TimeUnit};
use redcap_format::{
    CHECKED, ColumnKind, EVENT_COLUMN, FormatError, RecordTable, UNCHECKED, format_records,
};
use redcap_model::{
    DataDictionary, DictionaryError, EventDefinition, EventMap, EventSource, EventTranslation,
    FieldDefinition, FieldType, FormatOptions,
};

fn dictionary() -> DataDictionary {
    DataDictionary::new(vec![
        FieldDefinition::new("record_id", FieldType::Text)
            .with_form("enrollment")
            .with_label("Record ID"),
        FieldDefinition::new("intro", FieldType::Descriptive).with_form("enrollment"),
        FieldDefinition::new("dob", FieldType::Text)
            .with_form("enrollment")
            .with_label("Date of birth")
            .with_validation("date_ymd"),
        FieldDefinition::new("sex", FieldType::Radio)
            .with_form("enrollment")
            .with_label("Sex")
            .with_choices("0, Female | 1, Male"),
        FieldDefinition::new("consent", FieldType::YesNo)
            .with_form("enrollment")
            .with_label("Consented?"),
        FieldDefinition::new("symptoms", FieldType::Checkbox)
            .with_form("visit")
            .with_label("Symptoms")
            .with_choices("1, Fever | 2, Cough"),
        FieldDefinition::new("weight", FieldType::Text)
            .with_form("visit")
            .with_label("Weight (kg)")
            .with_validation("number"),
        FieldDefinition::new("seen_at", FieldType::Text)
            .with_form("visit")
            .with_label("Seen at")
            .with_validation("datetime_ymd"),
        FieldDefinition::new("bmi", FieldType::Calc).with_form("visit"),
        FieldDefinition::new("comments", FieldType::Notes)
            .with_form("visit")
            .with_label("Comments"),
    ])
    .expect("valid dictionary")
}

fn events() -> EventMap {
    EventMap::new(vec![
        EventDefinition::new("baseline_arm_1", "Baseline"),
        EventDefinition::new("week_4_arm_1", "Week 4"),
    ])
    .expect("valid event map")
}

const HEADERS: [&str; 13] = [
    "record_id",
    "redcap_event_name",
    "dob",
    "sex",
    "consent",
    "enrollment_complete",
    "symptoms___1",
    "symptoms___2",
    "weight",
    "seen_at",
    "bmi",
    "comments",
    "visit_complete",
];

fn raw() -> RecordTable {
    let rows: Vec<Vec<String>> = [
        ["1", "baseline_arm_1", "1980-05-17", "1", "1", "2", "1", "", "72.5", "2021-03-01 09:15", "24.1", "", "2"],
        ["2", "week_4_arm_1", "2020-02-30", "0", "0", "1", "", "1", "n/a", "", "", "late", "0"],
        ["3", "week_9_arm_1", "", "", "", "", "", "", "", "", "", "", ""],
    ]
    .iter()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
    .collect();
    RecordTable::from_rows(&HEADERS, &rows).expect("raw table")
}

fn values(table: &RecordTable, name: &str) -> Vec<Option<String>> {
    table.values(name).expect("column present")
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

#[test]
fn default_options_build_factors_dates_and_labels() {
    let formatted = format_records(raw(), &dictionary(), &FormatOptions::default(), None).unwrap();

    assert_eq!(
        values(&formatted, "sex"),
        vec![Some("Male".to_string()), Some("Female".to_string()), None]
    );
    assert_eq!(formatted.levels("sex").unwrap(), ["Female", "Male"]);
    assert_eq!(
        values(&formatted, "consent"),
        vec![Some("Yes".to_string()), Some("No".to_string()), None]
    );
    assert_eq!(
        values(&formatted, "symptoms___1"),
        some(&[CHECKED, UNCHECKED, UNCHECKED])
    );
    assert_eq!(
        values(&formatted, "enrollment_complete"),
        vec![Some("Complete".to_string()), Some("Unverified".to_string()), None]
    );

    let data = formatted.data();
    assert_eq!(data.column("dob").unwrap().dtype(), &DataType::Date);
    assert_eq!(
        data.column("seen_at").unwrap().dtype(),
        &DataType::Datetime(TimeUnit::Milliseconds, None)
    );
    assert_eq!(data.column("weight").unwrap().dtype(), &DataType::Float64);

    assert_eq!(formatted.label("symptoms___2"), Some("Symptoms: Cough"));
    assert_eq!(formatted.label("dob"), Some("Date of birth"));
    assert_eq!(formatted.label(EVENT_COLUMN), None);
    assert_eq!(formatted.height(), 3);
}

#[test]
fn row_order_and_columns_are_preserved() {
    let formatted = format_records(raw(), &dictionary(), &FormatOptions::default(), None).unwrap();
    assert_eq!(formatted.column_names(), HEADERS);
    assert_eq!(values(&formatted, "record_id"), some(&["1", "2", "3"]));
}

#[test]
fn invalid_date_is_missing_and_reported() {
    let formatted = format_records(raw(), &dictionary(), &FormatOptions::default(), None).unwrap();
    let dob = values(&formatted, "dob");
    assert_eq!(dob[0].as_deref(), Some("1980-05-17"));
    assert_eq!(dob[1], None);
    assert_eq!(formatted.report().column_counts("dob"), (1, 0));
    assert_eq!(formatted.report().column_counts("weight"), (1, 0));
}

#[test]
fn raw_options_keep_codes_and_numbers() {
    let formatted = format_records(raw(), &dictionary(), &FormatOptions::raw(), None).unwrap();
    assert_eq!(
        values(&formatted, "sex"),
        vec![Some("1".to_string()), Some("0".to_string()), None]
    );
    assert_eq!(formatted.kind("sex"), Some(ColumnKind::Numeric));
    assert_eq!(values(&formatted, "symptoms___1"), some(&["1", "0", "0"]));
    assert_eq!(formatted.kind("dob"), Some(ColumnKind::Character));
    assert_eq!(values(&formatted, "dob")[1].as_deref(), Some("2020-02-30"));
    assert!(formatted.labels().is_empty());
}

#[test]
fn checkbox_scenarios() {
    let dictionary = DataDictionary::new(vec![
        FieldDefinition::new("symptoms", FieldType::Checkbox)
            .with_label("Symptoms")
            .with_choices("1, Fever | 2, Cough"),
    ])
    .unwrap();
    let raw = || {
        RecordTable::from_rows(
            &["symptoms___1", "symptoms___2"],
            &[vec!["1".to_string(), String::new()]],
        )
        .unwrap()
    };

    let markers = format_records(
        raw(),
        &dictionary,
        &FormatOptions::new().with_labels(false),
        None,
    )
    .unwrap();
    assert_eq!(values(&markers, "symptoms___1"), some(&[CHECKED]));
    assert_eq!(values(&markers, "symptoms___2"), some(&[UNCHECKED]));
    assert!(matches!(markers.kind("symptoms___1"), Some(ColumnKind::Factor { .. })));

    let labels = format_records(
        raw(),
        &dictionary,
        &FormatOptions::new()
            .with_factors(false)
            .with_checkbox_labels(true),
        None,
    )
    .unwrap();
    assert_eq!(values(&labels, "symptoms___1"), some(&["Fever"]));
    assert_eq!(values(&labels, "symptoms___2"), some(&[""]));

    let numeric = format_records(raw(), &dictionary, &FormatOptions::raw(), None).unwrap();
    assert_eq!(numeric.kind("symptoms___2"), Some(ColumnKind::Numeric));
    assert_eq!(values(&numeric, "symptoms___2"), some(&["0"]));

    let labeled_factor = format_records(
        raw(),
        &dictionary,
        &FormatOptions::new().with_checkbox_labels(true),
        None,
    )
    .unwrap();
    assert_eq!(values(&labeled_factor, "symptoms___1"), some(&["Fever"]));
    assert_eq!(labeled_factor.levels("symptoms___2").unwrap(), ["", "Cough"]);
}

#[test]
fn reformatting_with_same_options_is_stable() {
    let option_sets = [
        FormatOptions::default(),
        FormatOptions::raw(),
        FormatOptions::new().with_checkbox_labels(true),
        FormatOptions::new()
            .with_factors(false)
            .with_checkbox_labels(true)
            .with_event_translation(EventTranslation::ToLabel),
    ];
    let map = events();
    for options in option_sets {
        let once = format_records(raw(), &dictionary(), &options, Some(&map)).unwrap();
        let twice = format_records(once.clone(), &dictionary(), &options, Some(&map)).unwrap();
        assert_eq!(once.column_names(), twice.column_names());
        for name in once.column_names() {
            assert_eq!(once.values(&name), twice.values(&name), "column {name}");
            assert_eq!(once.kind(&name), twice.kind(&name), "column {name}");
            assert_eq!(once.label(&name), twice.label(&name), "column {name}");
        }
        assert_eq!(once.provenance(), twice.provenance());
    }
}

#[test]
fn reformatting_is_stable_when_labels_look_like_codes() {
    let dictionary = DataDictionary::new(vec![
        FieldDefinition::new("record_id", FieldType::Text).with_form("family"),
        FieldDefinition::new("kids", FieldType::Checkbox)
            .with_form("family")
            .with_choices("1, 0 | 2, 1"),
        FieldDefinition::new("siblings", FieldType::Radio)
            .with_form("family")
            .with_choices("1, 0 | 2, 1"),
    ])
    .unwrap();
    let rows = vec![
        vec!["1".to_string(), "1".to_string(), "0".to_string(), "1".to_string()],
        vec!["2".to_string(), "0".to_string(), "1".to_string(), "2".to_string()],
    ];
    let headers = ["record_id", "kids___1", "kids___2", "siblings"];
    for options in [
        FormatOptions::new().with_checkbox_labels(true),
        FormatOptions::new()
            .with_factors(false)
            .with_checkbox_labels(true),
    ] {
        let raw = RecordTable::from_rows(&headers, &rows).unwrap();
        let once = format_records(raw, &dictionary, &options, None).unwrap();
        assert_eq!(values(&once, "kids___1"), some(&["0", ""]));
        assert_eq!(values(&once, "kids___2"), some(&["", "1"]));
        let twice = format_records(once.clone(), &dictionary, &options, None).unwrap();
        for name in once.column_names() {
            assert_eq!(once.values(&name), twice.values(&name), "column {name}");
        }
        assert_eq!(twice.report().total_unknown_levels(), 0);
    }

    let raw = RecordTable::from_rows(&headers, &rows).unwrap();
    let once = format_records(raw, &dictionary, &FormatOptions::default(), None).unwrap();
    assert_eq!(values(&once, "siblings"), some(&["0", "1"]));
    let twice = format_records(once.clone(), &dictionary, &FormatOptions::default(), None).unwrap();
    assert_eq!(values(&twice, "siblings"), some(&["0", "1"]));
    assert_eq!(values(&twice, "kids___1"), values(&once, "kids___1"));
}

#[test]
fn status_of_form_without_data_fields_is_cast() {
    let dictionary = DataDictionary::new(vec![
        FieldDefinition::new("record_id", FieldType::Text).with_form("enrollment"),
        FieldDefinition::new("consent_scan", FieldType::File).with_form("consent_upload"),
    ])
    .unwrap();
    let raw = RecordTable::from_rows(
        &["record_id", "enrollment_complete", "consent_upload_complete"],
        &[vec!["1".to_string(), "2".to_string(), "2".to_string()]],
    )
    .unwrap();
    let formatted = format_records(raw, &dictionary, &FormatOptions::default(), None).unwrap();
    assert_eq!(values(&formatted, "enrollment_complete"), some(&["Complete"]));
    assert_eq!(values(&formatted, "consent_upload_complete"), some(&["Complete"]));
    assert_eq!(
        formatted.levels("consent_upload_complete").unwrap(),
        ["Incomplete", "Unverified", "Complete"]
    );
}

#[test]
fn event_round_trip() {
    let map = events();
    let labeled = format_records(
        raw(),
        &dictionary(),
        &FormatOptions::default().with_event_translation(EventTranslation::ToLabel),
        Some(&map),
    )
    .unwrap();
    assert_eq!(
        values(&labeled, EVENT_COLUMN),
        vec![Some("Baseline".to_string()), Some("Week 4".to_string()), None]
    );
    assert_eq!(labeled.levels(EVENT_COLUMN).unwrap(), ["Baseline", "Week 4"]);

    let restored = format_records(
        labeled,
        &dictionary(),
        &FormatOptions::default().with_event_translation(EventTranslation::ToRaw),
        Some(&map),
    )
    .unwrap();
    assert_eq!(
        values(&restored, EVENT_COLUMN),
        vec![
            Some("baseline_arm_1".to_string()),
            Some("week_4_arm_1".to_string()),
            None
        ]
    );
}

#[test]
fn explicit_event_source_is_honoured() {
    let map = events();
    let options = FormatOptions::default()
        .with_event_translation(EventTranslation::ToRaw)
        .with_event_source(EventSource::Raw);
    let formatted = format_records(raw(), &dictionary(), &options, Some(&map)).unwrap();
    assert_eq!(
        values(&formatted, EVENT_COLUMN),
        vec![
            Some("baseline_arm_1".to_string()),
            Some("week_4_arm_1".to_string()),
            None
        ]
    );
}

#[test]
fn missing_event_map_fails_the_call() {
    let options = FormatOptions::default().with_event_translation(EventTranslation::ToLabel);
    let err = format_records(raw(), &dictionary(), &options, None).unwrap_err();
    assert!(matches!(err, FormatError::MissingEventMap));
}

#[test]
fn malformed_dictionary_fails_the_call() {
    let dictionary = DataDictionary::new(vec![
        FieldDefinition::new("symptoms", FieldType::Checkbox).with_choices("1, Fever | Cough"),
    ])
    .unwrap();
    let err = format_records(raw(), &dictionary, &FormatOptions::default(), None).unwrap_err();
    match err {
        FormatError::MalformedDictionary(DictionaryError::Choice(inner)) => {
            assert!(inner.to_string().contains("Cough"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn excluded_field_types_pass_through() {
    let formatted = format_records(raw(), &dictionary(), &FormatOptions::default(), None).unwrap();
    assert_eq!(formatted.kind("bmi"), Some(ColumnKind::Character));
    assert_eq!(formatted.label("bmi"), None);
    assert_eq!(
        values(&formatted, "bmi"),
        vec![Some("24.1".to_string()), None, None]
    );
}

#[test]
fn fields_missing_from_export_are_skipped() {
    let raw = RecordTable::from_rows(&["record_id"], &[vec!["1".to_string()]]).unwrap();
    let formatted = format_records(raw, &dictionary(), &FormatOptions::default(), None).unwrap();
    assert_eq!(formatted.column_names(), ["record_id"]);
    assert_eq!(formatted.label("record_id"), Some("Record ID"));
}

#[test]
fn strip_removes_empty_rows_and_columns() {
    let dictionary = DataDictionary::new(vec![
        FieldDefinition::new("a", FieldType::Text),
        FieldDefinition::new("b", FieldType::Text),
    ])
    .unwrap();
    let raw = RecordTable::from_rows(
        &["a", "b"],
        &[
            vec!["x".to_string(), String::new()],
            vec![String::new(), String::new()],
            vec!["y".to_string(), String::new()],
        ],
    )
    .unwrap();
    let formatted = format_records(
        raw,
        &dictionary,
        &FormatOptions::default().with_strip(true),
        None,
    )
    .unwrap();
    assert_eq!(formatted.column_names(), ["a"]);
    assert_eq!(values(&formatted, "a"), some(&["x", "y"]));
}

#[test]
fn provenance_records_flags() {
    let options = FormatOptions::default()
        .with_labels(false)
        .with_checkbox_labels(true);
    let formatted = format_records(raw(), &dictionary(), &options, None).unwrap();
    insta::assert_json_snapshot!(formatted.provenance().unwrap(), @r#"
    {
      "factors": true,
      "labels": false,
      "dates": true,
      "checkbox_labels": true
    }
    "#);
}
