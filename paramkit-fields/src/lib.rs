//! Typed parameter fields
//!
//! `paramkit-fields` defines the closed set of input fields a front end can
//! render (switches, text and number boxes, ranges, choices, tag lists,
//! dates and times, file uploads) and everything a server needs to do with
//! them.
//!
//! # Architecture
//!
//! - **Fail-fast construction**: a [`Field`] only comes out of
//!   [`FieldBuilder::build`], which rejects bad names, labels, bounds and
//!   initial values before the field exists
//! - **Three views of one field**: markup for the renderer
//!   ([`Field::to_markup`]), a schema contribution for payload checks
//!   ([`Field::to_schema_field`]), and a validator for values arriving later
//!   ([`Field::value_validator`])
//! - **One match per concern**: all variant-specific behavior lives on
//!   [`FieldKind`]
//! - **Forms**: [`Form`] validates whole submissions, collects per-field
//!   errors and reports each submission to an injected [`EventSink`]
//!
//! ```
//! use paramkit_fields::{Field, Form};
//! use serde_json::json;
//!
//! let form = Form::builder()
//!     .field(Field::range("volume", 5.0, 0.0, 10.0).label("Volume").build()?)
//!     .field(Field::choice("colour", ["red", "blue"]).build()?)
//!     .build()?;
//!
//! let payload = json!({"colour": "red"});
//! let submission = form.validate_submission(payload.as_object().unwrap())?;
//! assert_eq!(submission.get("volume").and_then(|v| v.as_f64()), Some(5.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod events;
pub mod field;
pub mod form;
pub mod kind;
pub mod markup;
pub mod schema;
pub mod upload;
pub mod validation;
pub mod value;

pub use error::{ConstructionError, FormError, SchemaError, SubmissionError, ValidationError};
pub use events::{EventSink, SubmissionEvent, TracingSink};
pub use field::{check_invariants, Field, FieldBuilder};
pub use form::{Form, FormBuilder, Submission, CONTROLS_TAG};
pub use kind::FieldKind;
pub use schema::{FormSchema, SchemaField, ValueType};
pub use upload::decode_upload;
pub use validation::ValueValidator;
pub use value::{iso_date, iso_datetime, iso_time, FieldValue, FileRef, ValueKind};

pub use paramkit_config::UploadSettings;
