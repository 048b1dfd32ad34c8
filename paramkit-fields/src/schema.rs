//! Schema contributions and the composite form schema.
//!
//! Each field contributes a [`SchemaField`]: its [`ValueType`] descriptor
//! and default. A [`FormSchema`] collects them by name and can emit a JSON
//! Schema document to check a whole payload in one pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::trace;

use crate::error::SchemaError;
use crate::field::Field;

/// Type descriptor for the values a field accepts, with the constraints the
/// schema can enforce on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "constraint", rename_all = "kebab-case")]
pub enum ValueType {
    Boolean,
    String,
    Float,
    BoundedFloat { min: f64, max: f64 },
    OneOf(Vec<String>),
    SubsetOf(Vec<String>),
    StringList,
    Date,
    Time,
    DateTime,
    File,
}

impl ValueType {
    /// JSON Schema fragment for one value of this type.
    ///
    /// `required` tightens the variants whose empty value is otherwise
    /// acceptable: strings and lists must be non-empty, and a file must be
    /// sent rather than `null`.
    pub fn to_json_schema(&self, required: bool) -> Value {
        match self {
            ValueType::Boolean => json!({"type": "boolean"}),
            ValueType::String if required => json!({"type": "string", "minLength": 1}),
            ValueType::String => json!({"type": "string"}),
            ValueType::Float => json!({"type": "number"}),
            ValueType::BoundedFloat { min, max } => {
                json!({"type": "number", "minimum": min, "maximum": max})
            }
            ValueType::OneOf(options) => json!({"type": "string", "enum": options}),
            ValueType::SubsetOf(options) => {
                let mut fragment = json!({
                    "type": "array",
                    "items": {"type": "string", "enum": options},
                    "uniqueItems": true,
                });
                if required {
                    fragment["minItems"] = json!(1);
                }
                fragment
            }
            ValueType::StringList if required => {
                json!({"type": "array", "items": {"type": "string"}, "minItems": 1})
            }
            ValueType::StringList => json!({"type": "array", "items": {"type": "string"}}),
            ValueType::Date => json!({"type": "string", "format": "date"}),
            ValueType::Time => json!({"type": "string", "format": "time"}),
            ValueType::DateTime => json!({"type": "string", "format": "date-time"}),
            ValueType::File if required => {
                json!({"type": "string", "minLength": 1, "contentEncoding": "base64"})
            }
            ValueType::File => json!({"type": ["string", "null"], "contentEncoding": "base64"}),
        }
    }
}

/// One field's contribution to a composite schema: `(type, default)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub value_type: ValueType,
    pub default: Option<Value>,
    pub required: bool,
}

impl SchemaField {
    /// Whether a payload must carry this field: required and no default to fall back on.
    pub fn must_be_present(&self) -> bool {
        self.required && self.default.is_none()
    }

    /// The value fragment with the default attached.
    pub fn to_json_schema(&self) -> Value {
        let mut fragment = self.value_type.to_json_schema(self.required);
        if let (Some(default), Some(obj)) = (&self.default, fragment.as_object_mut()) {
            obj.insert("default".into(), default.clone());
        }
        fragment
    }
}

impl Field {
    pub fn to_schema_field(&self) -> SchemaField {
        SchemaField {
            value_type: self.kind().value_type(),
            default: self.initial().map(|v| v.to_json()),
            required: self.required(),
        }
    }
}

/// Schema of a whole form, keyed by field name in form order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSchema {
    fields: IndexMap<String, SchemaField>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `name`.
    pub fn insert(&mut self, name: impl Into<String>, field: SchemaField) {
        self.fields.insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON Schema document for a submitted payload object.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for (name, field) in &self.fields {
            properties.insert(name.clone(), field.to_json_schema());
            if field.must_be_present() {
                required.push(Value::String(name.clone()));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Check a payload against the composite schema.
    ///
    /// Missing and `null` values are resolved the way a form submission
    /// resolves them before checking: the default fills in when there is
    /// one, and an optional field without one is dropped. Defaults are
    /// therefore held to the same constraints as submitted values.
    ///
    /// Returns one message per violation; an empty list means the payload
    /// conforms.
    pub fn check(&self, payload: &Value) -> Result<Vec<String>, SchemaError> {
        let schema = self.to_json_schema();
        let validator = jsonschema::validator_for(&schema).map_err(|e| SchemaError::Compile {
            message: e.to_string(),
        })?;
        let resolved = self.apply_defaults(payload);
        let violations: Vec<String> = validator
            .iter_errors(&resolved)
            .map(|e| e.to_string())
            .collect();
        trace!(violations = violations.len(), "checked payload against form schema");
        Ok(violations)
    }
}

impl FormSchema {
    fn apply_defaults(&self, payload: &Value) -> Value {
        let Value::Object(map) = payload else {
            return payload.clone();
        };
        let mut map = map.clone();
        for (name, field) in &self.fields {
            if !map.get(name).map_or(true, Value::is_null) {
                continue;
            }
            match &field.default {
                Some(default) => {
                    map.insert(name.clone(), default.clone());
                }
                None if !field.required => {
                    map.remove(name);
                }
                None => {}
            }
        }
        Value::Object(map)
    }
}

impl FromIterator<(String, SchemaField)> for FormSchema {
    fn from_iter<T: IntoIterator<Item = (String, SchemaField)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    #[test]
    fn range_contributes_bounded_float() {
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
    fn file_contributes_optional_file() {
        let field = Field::file("upload").allow_empty(true).build().unwrap();
        let entry = field.to_schema_field();
        assert_eq!(entry.value_type, ValueType::File);
        assert_eq!(entry.default, None);
        assert!(!entry.must_be_present());
    }

    #[test]
    fn json_schema_lists_fields_without_defaults_as_required() {
        let schema: FormSchema = [
            Field::switch("flag").build().unwrap(),
            Field::choice("colour", ["red", "blue"]).build().unwrap(),
        ]
        .iter()
        .map(|f| (f.name().to_string(), f.to_schema_field()))
        .collect();

        let doc = schema.to_json_schema();
        assert_eq!(doc["required"], json!(["colour"]));
        assert_eq!(doc["properties"]["flag"]["default"], json!(false));
        assert_eq!(doc["properties"]["colour"]["enum"], json!(["red", "blue"]));
        assert_eq!(doc["additionalProperties"], json!(false));
    }

    #[test]
    fn check_reports_bound_and_membership_violations() {
        let schema: FormSchema = [
            Field::range("volume", 5.0, 0.0, 10.0).build().unwrap(),
            Field::multi_choice("tags", ["a", "b"]).build().unwrap(),
        ]
        .iter()
        .map(|f| (f.name().to_string(), f.to_schema_field()))
        .collect();

        let ok = schema.check(&json!({"volume": 3, "tags": ["a"]})).unwrap();
        assert!(ok.is_empty());

        let bad = schema
            .check(&json!({"volume": 11, "tags": ["a", "z"]}))
            .unwrap();
        assert!(bad.len() >= 2);

        let extra = schema.check(&json!({"tags": ["b"], "other": 1})).unwrap();
        assert_eq!(extra.len(), 1);
    }

    #[test]
    fn required_fragments_reject_empty_values() {
        assert_eq!(
            ValueType::StringList.to_json_schema(true)["minItems"],
            json!(1)
        );
        assert_eq!(ValueType::String.to_json_schema(true)["minLength"], json!(1));
        assert_eq!(ValueType::File.to_json_schema(true)["type"], json!("string"));
        assert_eq!(
            ValueType::File.to_json_schema(false)["type"],
            json!(["string", "null"])
        );
        assert!(ValueType::String.to_json_schema(false).get("minLength").is_none());
    }

    #[test]
    fn check_holds_defaults_to_the_constraints() {
        let schema: FormSchema = [
            Field::range("volume", 50.0, 0.0, 10.0).build().unwrap(),
            Field::multi_choice("tags", ["a"]).build().unwrap(),
        ]
        .iter()
        .map(|f| (f.name().to_string(), f.to_schema_field()))
        .collect();

        let violations = schema.check(&json!({"tags": null})).unwrap();
        assert!(violations.len() >= 2);
    }
}
