//! Checking raw values that arrive from the front end.
//!
//! A [`ValueValidator`] borrows its field and is cheap to create, so callers
//! ask for one per incoming value. Validation never mutates the field and
//! never touches shared state beyond the upload directory, which makes it
//! safe to run for many submissions at once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use paramkit_config::UploadSettings;
use serde_json::Value;
use tracing::debug;

use crate::error::ValidationError;
use crate::field::Field;
use crate::kind::FieldKind;
use crate::upload::decode_upload;
use crate::value::{FieldValue, ValueKind};

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Validator for values of one field.
#[derive(Debug, Clone)]
pub struct ValueValidator<'a> {
    field: &'a Field,
    uploads: UploadSettings,
}

impl Field {
    /// Validator using default upload settings.
    pub fn value_validator(&self) -> ValueValidator<'_> {
        ValueValidator {
            field: self,
            uploads: UploadSettings::default(),
        }
    }
}

impl<'a> ValueValidator<'a> {
    /// Store uploads according to `settings` instead of the defaults.
    pub fn with_uploads(mut self, settings: UploadSettings) -> Self {
        self.uploads = settings;
        self
    }

    pub fn field(&self) -> &'a Field {
        self.field
    }

    /// Accept `raw` as a typed value of the field, or say why not.
    pub fn validate(&self, raw: &Value) -> Result<FieldValue, ValidationError> {
        let result = self.check(raw);
        if let Err(e) = &result {
            debug!(name = %self.field.name(), tag = self.field.tag(), error = %e, "rejected value");
        }
        result
    }

    fn check(&self, raw: &Value) -> Result<FieldValue, ValidationError> {
        let field = self.field;
        match field.kind() {
            FieldKind::Switch => raw
                .as_bool()
                .map(FieldValue::Bool)
                .ok_or_else(|| self.mismatch(raw)),
            FieldKind::TextBox => {
                let text = self.string(raw)?;
                if text.is_empty() && field.required() {
                    return Err(self.empty());
                }
                Ok(FieldValue::Text(text.to_string()))
            }
            FieldKind::NumberBox => self.number(raw).map(FieldValue::Float),
            FieldKind::Range { min, max, .. } => {
                let value = self.number(raw)?;
                if value < *min || value > *max {
                    return Err(ValidationError::OutOfRange {
                        name: field.name().to_string(),
                        value,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(FieldValue::Float(value))
            }
            FieldKind::Choice { options } => {
                let value = self.string(raw)?;
                if !options.iter().any(|o| o == value) {
                    return Err(ValidationError::NotInOptions {
                        name: field.name().to_string(),
                        value: value.to_string(),
                        options: options.clone(),
                    });
                }
                Ok(FieldValue::Text(value.to_string()))
            }
            FieldKind::MultiChoice { options } => {
                let items = self.string_list(raw)?;
                let invalid: Vec<String> = items
                    .iter()
                    .filter(|item| !options.contains(*item))
                    .cloned()
                    .collect();
                if !invalid.is_empty() {
                    return Err(ValidationError::NotSubset {
                        name: field.name().to_string(),
                        invalid,
                        options: options.clone(),
                    });
                }
                if items.is_empty() && field.required() {
                    return Err(self.empty());
                }
                Ok(FieldValue::List(items))
            }
            FieldKind::Tags => {
                let items = self.string_list(raw)?;
                if items.is_empty() && field.required() {
                    return Err(self.empty());
                }
                Ok(FieldValue::List(items))
            }
            FieldKind::Date => {
                let text = self.string(raw)?;
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(FieldValue::Date)
                    .map_err(|_| self.format("date", text))
            }
            FieldKind::Time => {
                let text = self.string(raw)?;
                TIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
                    .map(FieldValue::Time)
                    .ok_or_else(|| self.format("time", text))
            }
            FieldKind::DateTime => {
                let text = self.string(raw)?;
                parse_datetime(text)
                    .map(FieldValue::DateTime)
                    .ok_or_else(|| self.format("datetime", text))
            }
            FieldKind::File => self.file(raw),
        }
    }

    fn file(&self, raw: &Value) -> Result<FieldValue, ValidationError> {
        let field = self.field;
        let payload = match raw {
            Value::Null if field.required() => return Err(self.empty()),
            Value::Null => return Ok(FieldValue::File(None)),
            Value::String(payload) => payload,
            other => return Err(self.mismatch(other)),
        };
        if payload.trim().is_empty() && field.required() {
            return Err(self.empty());
        }

        let file = decode_upload(field.name(), payload, &self.uploads)?;
        if !file.is_regular_file() {
            return Err(ValidationError::NotAFile {
                name: field.name().to_string(),
                path: file.into_path(),
            });
        }
        Ok(FieldValue::File(Some(file)))
    }

    fn string<'v>(&self, raw: &'v Value) -> Result<&'v str, ValidationError> {
        raw.as_str().ok_or_else(|| self.mismatch(raw))
    }

    fn number(&self, raw: &Value) -> Result<f64, ValidationError> {
        raw.as_f64().ok_or_else(|| self.mismatch(raw))
    }

    fn string_list(&self, raw: &Value) -> Result<Vec<String>, ValidationError> {
        let items = raw.as_array().ok_or_else(|| self.mismatch(raw))?;
        items
            .iter()
            .map(|item| item.as_str().map(String::from).ok_or_else(|| self.mismatch(raw)))
            .collect()
    }

    fn mismatch(&self, raw: &Value) -> ValidationError {
        ValidationError::TypeMismatch {
            name: self.field.name().to_string(),
            expected: expected_json(self.field.value_kind()),
            actual: json_type_name(raw),
        }
    }

    fn empty(&self) -> ValidationError {
        ValidationError::EmptyValue {
            name: self.field.name().to_string(),
        }
    }

    fn format(&self, expected: &'static str, value: &str) -> ValidationError {
        ValidationError::InvalidFormat {
            name: self.field.name().to_string(),
            expected,
            value: value.to_string(),
        }
    }
}

/// Naive ISO-8601 forms first, then RFC 3339 with an offset, normalized to UTC.
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

fn expected_json(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Boolean => "a boolean",
        ValueKind::Float => "a number",
        ValueKind::StringList => "an array of strings",
        ValueKind::File => "a base64 string or null",
        ValueKind::String | ValueKind::Date | ValueKind::Time | ValueKind::DateTime => "a string",
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
