//! The closed set of field variants.
//!
//! Everything that differs between variants (tag, value kind, cacheability,
//! how the initial value is serialized, extra markup attributes, the schema
//! descriptor) is answered by one `match` per concern here. Adding a variant
//! means adding one arm to each of these and nothing elsewhere.

use paramkit_markup::{AttrValue, Attributes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::ValueType;
use crate::value::{iso_date, iso_datetime, iso_time, FieldValue, ValueKind};

/// A field variant together with its variant-specific extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldKind {
    Switch,
    TextBox,
    NumberBox,
    Range {
        min: f64,
        max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    Choice {
        options: Vec<String>,
    },
    MultiChoice {
        options: Vec<String>,
    },
    Tags,
    Date,
    Time,
    DateTime,
    File,
}

impl FieldKind {
    /// Markup element name.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Switch => "Switch",
            FieldKind::TextBox => "TextBox",
            FieldKind::NumberBox => "NumberBox",
            FieldKind::Range { .. } => "Range",
            FieldKind::Choice { .. } => "Choice",
            FieldKind::MultiChoice { .. } => "MultiChoice",
            FieldKind::Tags => "Tags",
            FieldKind::Date => "Date",
            FieldKind::Time => "Time",
            FieldKind::DateTime => "DateTime",
            FieldKind::File => "File",
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            FieldKind::Switch => ValueKind::Boolean,
            FieldKind::TextBox | FieldKind::Choice { .. } => ValueKind::String,
            FieldKind::NumberBox | FieldKind::Range { .. } => ValueKind::Float,
            FieldKind::MultiChoice { .. } | FieldKind::Tags => ValueKind::StringList,
            FieldKind::Date => ValueKind::Date,
            FieldKind::Time => ValueKind::Time,
            FieldKind::DateTime => ValueKind::DateTime,
            FieldKind::File => ValueKind::File,
        }
    }

    /// Whether values from this field may key a cache.
    ///
    /// A file handle says nothing about the bytes behind it, and every
    /// upload lands in a fresh artifact, so File never is.
    pub fn cacheable(&self) -> bool {
        !matches!(self, FieldKind::File)
    }

    /// Variants whose empty value is meaningful and can be allowed.
    pub fn supports_allow_empty(&self) -> bool {
        matches!(
            self,
            FieldKind::TextBox | FieldKind::MultiChoice { .. } | FieldKind::Tags | FieldKind::File
        )
    }

    /// Schema descriptor for values of this variant.
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldKind::Switch => ValueType::Boolean,
            FieldKind::TextBox => ValueType::String,
            FieldKind::NumberBox => ValueType::Float,
            FieldKind::Range { min, max, .. } => ValueType::BoundedFloat {
                min: *min,
                max: *max,
            },
            FieldKind::Choice { options } => ValueType::OneOf(options.clone()),
            FieldKind::MultiChoice { options } => ValueType::SubsetOf(options.clone()),
            FieldKind::Tags => ValueType::StringList,
            FieldKind::Date => ValueType::Date,
            FieldKind::Time => ValueType::Time,
            FieldKind::DateTime => ValueType::DateTime,
            FieldKind::File => ValueType::File,
        }
    }

    /// On-the-wire form of an initial value.
    ///
    /// Lists become JSON text and temporal values their ISO-8601 text;
    /// everything else passes through unchanged.
    pub fn normalize_initial(&self, value: &FieldValue) -> AttrValue {
        match value {
            FieldValue::Bool(b) => AttrValue::Bool(*b),
            FieldValue::Text(s) => AttrValue::Text(s.clone()),
            FieldValue::Float(f) => AttrValue::Float(*f),
            FieldValue::List(items) => AttrValue::Text(list_to_json(items)),
            FieldValue::Date(d) => AttrValue::Text(iso_date(d)),
            FieldValue::Time(t) => AttrValue::Text(iso_time(t)),
            FieldValue::DateTime(dt) => AttrValue::Text(iso_datetime(dt)),
            FieldValue::File(f) => AttrValue::Text(
                f.as_ref()
                    .map(|file| file.path().to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
        }
    }

    /// Add the variant-specific attributes after the shared ones.
    pub fn extend_attributes(&self, attrs: Attributes) -> Attributes {
        match self {
            FieldKind::Range { min, max, step } => attrs
                .with("min", *min)
                .with("max", *max)
                .with_opt("step", *step),
            FieldKind::Choice { options } | FieldKind::MultiChoice { options } => {
                attrs.with("choices", list_to_json(options))
            }
            _ => attrs,
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            FieldKind::Choice { options } | FieldKind::MultiChoice { options } => Some(options),
            _ => None,
        }
    }
}

/// JSON array text for a list of strings.
pub(crate) fn list_to_json(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}
