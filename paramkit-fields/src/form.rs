//! An ordered set of fields validated together.
//!
//! A [`Form`] is built once and then only read, so an `Arc<Form>` can serve
//! any number of concurrent submissions. Each call to
//! [`Form::validate_submission`] works on its own payload and produces its
//! own [`Submission`]; nothing is shared between calls except the event sink.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use paramkit_config::UploadSettings;
use paramkit_markup::{build, Attributes, Node};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FormError, SubmissionError, ValidationError};
use crate::events::{EventSink, SubmissionEvent, TracingSink};
use crate::field::Field;
use crate::schema::FormSchema;
use crate::value::FieldValue;

/// Markup element wrapping the field elements of a form.
pub const CONTROLS_TAG: &str = "Controls";

pub struct Form {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    sink: Arc<dyn EventSink>,
    uploads: UploadSettings,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.fields)
            .field("uploads", &self.uploads)
            .finish_non_exhaustive()
    }
}

impl Form {
    pub fn builder() -> FormBuilder {
        FormBuilder::default()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every field is cacheable, i.e. submissions may key a cache.
    pub fn is_cacheable(&self) -> bool {
        self.fields.iter().all(Field::cacheable)
    }

    /// A `Controls` element with one child per field, in form order.
    pub fn to_markup(&self) -> paramkit_markup::Result<Node> {
        self.fields
            .iter()
            .try_fold(build(CONTROLS_TAG, Attributes::new())?, |node, field| {
                field.to_markup().map(|child| node.with_child(child))
            })
    }

    pub fn schema(&self) -> FormSchema {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.to_schema_field()))
            .collect()
    }

    /// Validate every field of a submitted payload.
    ///
    /// Fields are checked independently and all rejections are reported
    /// together. A field missing from the payload, or sent as `null`, takes
    /// its initial value; without one it is absent if optional and an error
    /// if required. Keys that name no field are rejected.
    pub fn validate_submission(
        &self,
        payload: &Map<String, Value>,
    ) -> Result<Submission, SubmissionError> {
        let mut values = IndexMap::with_capacity(self.fields.len());
        let mut errors = Vec::new();

        for field in &self.fields {
            match self.resolve(field, payload.get(field.name())) {
                Ok(value) => {
                    values.insert(field.name().to_string(), value);
                }
                Err(e) => errors.push(e),
            }
        }
        for key in payload.keys() {
            if !self.index.contains_key(key) {
                errors.push(ValidationError::UnknownField { name: key.clone() });
            }
        }

        let event = SubmissionEvent {
            accepted: errors.is_empty(),
            field_count: self.fields.len(),
            rejected: errors.iter().map(|e| e.field().to_string()).collect(),
        };
        self.sink.send(&event);

        if errors.is_empty() {
            Ok(Submission { values })
        } else {
            debug!(rejected = errors.len(), "submission rejected");
            Err(SubmissionError { errors })
        }
    }

    /// Defaults go through the same validator as submitted values.
    fn resolve(
        &self,
        field: &Field,
        raw: Option<&Value>,
    ) -> Result<Option<FieldValue>, ValidationError> {
        let validator = field.value_validator().with_uploads(self.uploads.clone());
        match raw {
            Some(value) if !value.is_null() => validator.validate(value).map(Some),
            _ => match field.initial() {
                // A file handle has no payload to decode again.
                Some(initial) if matches!(initial, FieldValue::File(_)) => Ok(Some(initial.clone())),
                Some(initial) => validator.validate(&initial.to_json()).map(Some),
                None if !field.required() => Ok(None),
                None => Err(ValidationError::MissingRequired {
                    name: field.name().to_string(),
                }),
            },
        }
    }
}

/// Collects fields for a [`Form`].
#[derive(Default)]
#[must_use = "a builder does nothing until `build` is called"]
pub struct FormBuilder {
    fields: Vec<Field>,
    sink: Option<Arc<dyn EventSink>>,
    uploads: UploadSettings,
}

impl FormBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Where submission events go. Defaults to [`TracingSink`].
    pub fn event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// How File fields store their uploads.
    pub fn uploads(mut self, settings: UploadSettings) -> Self {
        self.uploads = settings;
        self
    }

    pub fn build(self) -> Result<Form, FormError> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (i, field) in self.fields.iter().enumerate() {
            if index.insert(field.name().to_string(), i).is_some() {
                return Err(FormError::DuplicateFieldName {
                    name: field.name().to_string(),
                });
            }
        }
        debug!(fields = self.fields.len(), "built form");
        Ok(Form {
            fields: self.fields,
            index,
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
            uploads: self.uploads,
        })
    }
}

/// The accepted values of one submission, in form order.
///
/// A field maps to `None` when it was optional, not submitted, and had no
/// initial value.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    values: IndexMap<String, Option<FieldValue>>,
}

impl Submission {
    /// Value of `name`, if the field exists and has one.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Wire form of every value; absent fields become `null`.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| {
                let json = v.as_ref().map(FieldValue::to_json).unwrap_or(Value::Null);
                (k.clone(), json)
            })
            .collect();
        Value::Object(map)
    }
}
