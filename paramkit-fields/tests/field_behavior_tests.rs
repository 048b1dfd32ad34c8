use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{NaiveDate, NaiveTime};
use paramkit_fields::{
    Field, FieldValue, UploadSettings, ValidationError, ValueType,
};
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_choice_validator() {
    let field = Field::choice("c", ["a", "b"]).initial("a").build().unwrap();
    let validator = field.value_validator();
    assert!(validator.validate(&json!("b")).is_ok());
    assert!(validator.validate(&json!("z")).is_err());
}

#[test]
fn test_multi_choice_validator() {
    let field = Field::multi_choice("m", ["a", "b", "c"])
        .initial(["a", "b"])
        .build()
        .unwrap();
    let validator = field.value_validator();
    assert!(validator.validate(&json!(["a"])).is_ok());
    assert!(validator.validate(&json!(["a", "b", "c"])).is_ok());
    assert!(matches!(
        validator.validate(&json!(["a", "d"])),
        Err(ValidationError::NotSubset { .. })
    ));
    assert!(matches!(
        validator.validate(&json!([])),
        Err(ValidationError::EmptyValue { .. })
    ));
}

#[test]
fn test_multi_choice_allowing_empty_accepts_no_selection() {
    let field = Field::multi_choice("m", ["a"])
        .allow_empty(true)
        .build()
        .unwrap();
    assert_eq!(
        field.value_validator().validate(&json!([])).unwrap(),
        FieldValue::List(vec![])
    );
}

#[test]
fn test_range_schema_is_bounded() {
    let field = Field::range("volume", 5.0, 0.0, 10.0).build().unwrap();
    let entry = field.to_schema_field();
    assert_eq!(
        entry.value_type,
        ValueType::BoundedFloat {
            min: 0.0,
            max: 10.0
        }
    );
    assert_eq!(entry.default, Some(json!(5.0)));
}

#[test]
fn test_file_upload_round_trip() {
    let dir = TempDir::new().unwrap();
    let bytes = b"\x00\x01binary\xffpayload".to_vec();
    let field = Field::file("upload").build().unwrap();
    let value = field
        .value_validator()
        .with_uploads(UploadSettings::default().with_temp_dir(dir.path()))
        .validate(&json!(STANDARD.encode(&bytes)))
        .unwrap();

    let file = value.as_file().unwrap();
    assert!(file.path().is_file());
    assert_eq!(std::fs::read(file.path()).unwrap(), bytes);
}

#[test]
fn test_file_upload_rejects_malformed_payload() {
    let dir = TempDir::new().unwrap();
    let field = Field::file("upload").build().unwrap();
    let err = field
        .value_validator()
        .with_uploads(UploadSettings::default().with_temp_dir(dir.path()))
        .validate(&json!("@@not-base64@@"))
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidBase64 { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_only_file_fields_are_uncacheable() {
    assert!(!Field::file("f").build().unwrap().cacheable());
    assert!(Field::text_box("t").build().unwrap().cacheable());
    assert!(Field::date("d").build().unwrap().cacheable());
}

#[test]
fn test_markup_is_idempotent() {
    let field = Field::multi_choice("toppings", ["ham", "egg"])
        .label("Toppings <extra>")
        .initial(["egg"])
        .build()
        .unwrap();
    assert_eq!(
        field.to_markup().unwrap().to_xml(),
        field.to_markup().unwrap().to_xml()
    );
}

#[test]
fn test_temporal_initials_are_iso_text_in_markup() {
    let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
    let field = Field::date("d").initial(date).build().unwrap();
    assert_eq!(
        field.to_markup().unwrap().attr("initial").as_deref(),
        Some("2024-07-04")
    );

    let time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    let field = Field::date_time("dt").initial(date.and_time(time)).build().unwrap();
    assert_eq!(
        field.to_markup().unwrap().attr("initial").as_deref(),
        Some("2024-07-04T08:00:00")
    );
}

#[test]
fn test_tags_initial_round_trips_through_markup() {
    let field = Field::tags("t")
        .initial(["plain", "with \"quotes\"", "a,b"])
        .build()
        .unwrap();
    let text = field.to_markup().unwrap().attr("initial").unwrap();
    let decoded: Vec<String> = serde_json::from_str(&text).unwrap();
    assert_eq!(
        FieldValue::List(decoded),
        field.initial().cloned().unwrap()
    );
}

proptest! {
    #[test]
    fn prop_label_cannot_inject_markup(label in "[ -~]{1,40}") {
        let field = Field::switch("s").label(label.clone()).build().unwrap();
        let node = field.to_markup().unwrap();
        let xml = node.to_xml();

        prop_assert_eq!(node.attr("label"), Some(label));
        prop_assert_eq!(xml.matches('<').count(), 1);
        prop_assert_eq!(xml.matches('>').count(), 1);
        prop_assert_eq!(xml.matches('"').count(), 2 * node.attributes().len());
    }

    #[test]
    fn prop_range_accepts_exactly_its_bounds(value in -20.0f64..20.0) {
        let field = Field::range("r", 0.0, -10.0, 10.0).build().unwrap();
        let accepted = field.value_validator().validate(&json!(value)).is_ok();
        prop_assert_eq!(accepted, (-10.0..=10.0).contains(&value));
    }
}
