//! Field values and the semantic value types fields declare.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The semantic type of values a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Boolean,
    String,
    Float,
    StringList,
    Date,
    Time,
    DateTime,
    File,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Float => "float",
            ValueKind::StringList => "list of strings",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "datetime",
            ValueKind::File => "file",
        }
    }
}

/// Handle to a file on disk, produced by decoding an upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(PathBuf);

impl FileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// True when the handle designates an existing regular file.
    pub fn is_regular_file(&self) -> bool {
        self.0.is_file()
    }

    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

/// A typed value held by a field, either as its initial value or after a
/// submitted value has been validated.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    Float(f64),
    List(Vec<String>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    File(Option<FileRef>),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Bool(_) => ValueKind::Boolean,
            FieldValue::Text(_) => ValueKind::String,
            FieldValue::Float(_) => ValueKind::Float,
            FieldValue::List(_) => ValueKind::StringList,
            FieldValue::Date(_) => ValueKind::Date,
            FieldValue::Time(_) => ValueKind::Time,
            FieldValue::DateTime(_) => ValueKind::DateTime,
            FieldValue::File(_) => ValueKind::File,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            FieldValue::File(f) => f.as_ref(),
            _ => None,
        }
    }

    /// Wire form of the value: dates as ISO-8601 text, files as their path.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => json!(b),
            FieldValue::Text(s) => json!(s),
            FieldValue::Float(f) => json!(f),
            FieldValue::List(items) => json!(items),
            FieldValue::Date(d) => json!(iso_date(d)),
            FieldValue::Time(t) => json!(iso_time(t)),
            FieldValue::DateTime(dt) => json!(iso_datetime(dt)),
            FieldValue::File(f) => match f {
                Some(file) => json!(file.path().to_string_lossy()),
                None => Value::Null,
            },
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(value: [&str; N]) -> Self {
        FieldValue::List(value.into_iter().map(String::from).collect())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(value: NaiveTime) -> Self {
        FieldValue::Time(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<FileRef> for FieldValue {
    fn from(value: FileRef) -> Self {
        FieldValue::File(Some(value))
    }
}

/// `YYYY-MM-DD`
pub fn iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `HH:MM:SS`, with six fractional digits when sub-second precision is set.
///
/// Fixed-width fields keep lexical and chronological order identical.
pub fn iso_time(time: &NaiveTime) -> String {
    if time.nanosecond() == 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M:%S%.6f").to_string()
    }
}

/// `YYYY-MM-DDTHH:MM:SS[.ffffff]`
pub fn iso_datetime(datetime: &NaiveDateTime) -> String {
    format!("{}T{}", iso_date(&datetime.date()), iso_time(&datetime.time()))
}
