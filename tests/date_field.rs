use chrono::{Local, NaiveDate, TimeZone};
use fuse_fields::fields::{DateOptions, Field, FieldOptions};
use fuse_fields::types::Value;
use fuse_fields::{ErrorClass, FieldError};

fn date(options: DateOptions) -> Field {
    Field::date(FieldOptions::named("when"), options).unwrap()
}

#[test]
fn fuzzy_text_yields_calendar_date() {
    let field = date(DateOptions {
        date_attribute: Some("date".to_string()),
        ..Default::default()
    });
    assert_eq!(
        field.set("meeting on 2023-05-01 at noon").unwrap(),
        Value::Date(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap())
    );
}

#[test]
fn fuzzy_text_keeps_time_of_day() {
    let field = date(DateOptions::default());
    let expected = NaiveDate::from_ymd_opt(2021, 9, 3)
        .unwrap()
        .and_hms_opt(17, 45, 0)
        .unwrap();
    assert_eq!(
        field.set("Delivered Friday, Sep 3rd 2021 at 5:45 pm").unwrap(),
        Value::DateTime(expected)
    );
}

#[test]
fn numbers_are_local_unix_timestamps() {
    let field = date(DateOptions::default());
    let expected = Local
        .timestamp_opt(1_690_000_000, 0)
        .unwrap()
        .naive_local();
    assert_eq!(field.set(1_690_000_000i64).unwrap(), Value::DateTime(expected));
    assert_eq!(field.set(1_690_000_000.0).unwrap(), Value::DateTime(expected));
}

#[test]
fn as_string_uses_output_format() {
    let european = date(DateOptions {
        as_string: true,
        ..Default::default()
    });
    assert_eq!(european.set("2023-05-01").unwrap(), Value::from("01.05.2023"));

    let iso = date(DateOptions {
        as_string: true,
        out_date_format: Some("%Y/%m/%d %H:%M".to_string()),
        ..Default::default()
    });
    assert_eq!(
        iso.set("May 1, 2023 9:05").unwrap(),
        Value::from("2023/05/01 09:05")
    );
}

#[test]
fn unparseable_text_is_coercion_error() {
    let err = date(DateOptions::default()).set("not a date at all").unwrap_err();
    assert!(matches!(err, FieldError::Parse { .. }));
    assert_eq!(err.class(), ErrorClass::Coercion);
}

#[test]
fn unknown_attribute_fails_before_any_value() {
    let err = Field::date(
        FieldOptions::default(),
        DateOptions {
            date_attribute: Some("strftime".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn year_attribute_without_formatting() {
    let field = date(DateOptions {
        date_attribute: Some("year".to_string()),
        ..Default::default()
    });
    assert_eq!(field.set("12/31/1999").unwrap(), Value::Int64(1999));
}

#[test]
fn formatting_a_year_is_structural_error() {
    let field = date(DateOptions {
        as_string: true,
        date_attribute: Some("year".to_string()),
        ..Default::default()
    });
    let err = field.set("2023-05-01").unwrap_err();
    assert!(matches!(err, FieldError::MissingAttribute { .. }));
    assert_eq!(err.class(), ErrorClass::Structural);
}
