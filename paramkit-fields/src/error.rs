//! Error types for field construction and value validation

use std::path::PathBuf;

use paramkit_markup::MarkupError;
use thiserror::Error;

/// Errors raised while constructing a field.
///
/// Construction is all-or-nothing: when one of these is returned no field
/// exists.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConstructionError {
    /// Field name is the empty string
    #[error("a non-empty name must be provided")]
    EmptyName,

    /// Label was given but empty
    #[error("label of field '{name}' must be a non-empty string or absent")]
    EmptyLabel { name: String },

    /// A Range bound or step is infinite or NaN
    #[error("{bound} of field '{name}' must not be inf or nan, got {value}")]
    NonFiniteBound {
        name: String,
        bound: &'static str,
        value: f64,
    },

    /// Range minimum is above its maximum
    #[error("min {min} of field '{name}' exceeds max {max}")]
    InvertedRange { name: String, min: f64, max: f64 },

    /// Choice or MultiChoice built without options
    #[error("at least one option must be provided for field '{name}'")]
    NoOptions { name: String },

    /// An option is the empty string
    #[error("all options of field '{name}' must be non-empty strings")]
    EmptyOption { name: String },

    /// Initial value (or one of its items) is not among the options
    #[error("initial value '{value}' of field '{name}' must be present in the options")]
    InitialNotInOptions { name: String, value: String },

    /// Initial value has the wrong shape for the field
    #[error("initial value of field '{name}' must be {expected}, got {actual}")]
    InitialTypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Builder option applied to a variant that has no such option
    #[error("{tag} field '{name}' does not support {option}")]
    UnsupportedOption {
        name: String,
        tag: &'static str,
        option: &'static str,
    },

    /// Text that cannot be carried in markup
    #[error("field '{name}' cannot be rendered: {source}")]
    Markup {
        name: String,
        #[source]
        source: MarkupError,
    },
}

/// Errors raised when a value arriving from the front end is rejected.
///
/// Each error belongs to exactly one field; see [`ValidationError::field`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value has the wrong JSON type
    #[error("field '{name}' expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Required field was not submitted and has no default
    #[error("required field '{name}' is missing")]
    MissingRequired { name: String },

    /// Required field was submitted empty
    #[error("field '{name}' must not be empty")]
    EmptyValue { name: String },

    /// Choice value outside the options
    #[error("field '{name}' value '{value}' is not in options: {options:?}")]
    NotInOptions {
        name: String,
        value: String,
        options: Vec<String>,
    },

    /// MultiChoice selection that is not a subset of the options
    #[error("field '{name}' selections {invalid:?} are not in options: {options:?}")]
    NotSubset {
        name: String,
        invalid: Vec<String>,
        options: Vec<String>,
    },

    /// Range value outside its bounds
    #[error("field '{name}' value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Text that does not parse as the expected date/time form
    #[error("field '{name}' value '{value}' is not a valid {expected}")]
    InvalidFormat {
        name: String,
        expected: &'static str,
        value: String,
    },

    /// Upload payload is not base64
    #[error("field '{name}' upload is not valid base64: {message}")]
    InvalidBase64 { name: String, message: String },

    /// Decoded upload exceeds the configured limit
    #[error("field '{name}' upload of {actual} bytes exceeds the limit of {limit} bytes")]
    UploadTooLarge { name: String, limit: u64, actual: u64 },

    /// Upload could not be written to storage
    #[error("field '{name}' upload could not be stored: {source}")]
    Storage {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Upload handle does not designate an existing regular file
    #[error("field '{name}' upload {path} is not a regular file")]
    NotAFile { name: String, path: PathBuf },

    /// Submitted key does not match any field of the form
    #[error("unknown field '{name}'")]
    UnknownField { name: String },
}

impl ValidationError {
    /// Name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { name, .. }
            | ValidationError::MissingRequired { name }
            | ValidationError::EmptyValue { name }
            | ValidationError::NotInOptions { name, .. }
            | ValidationError::NotSubset { name, .. }
            | ValidationError::OutOfRange { name, .. }
            | ValidationError::InvalidFormat { name, .. }
            | ValidationError::InvalidBase64 { name, .. }
            | ValidationError::UploadTooLarge { name, .. }
            | ValidationError::Storage { name, .. }
            | ValidationError::NotAFile { name, .. }
            | ValidationError::UnknownField { name } => name,
        }
    }
}

/// Errors assembling a form from fields
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    /// Two fields share a name
    #[error("duplicate field name: {name}")]
    DuplicateFieldName { name: String },
}

/// Every per-field rejection of one submission.
#[derive(Debug, Error)]
#[error("submission rejected: {} field error(s)", .errors.len())]
pub struct SubmissionError {
    pub errors: Vec<ValidationError>,
}

impl SubmissionError {
    /// Names of the rejected fields, in form order.
    pub fn rejected_fields(&self) -> Vec<&str> {
        self.errors.iter().map(ValidationError::field).collect()
    }

    /// The error for one field, if it was rejected.
    pub fn for_field(&self, name: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field() == name)
    }
}

/// Errors compiling or applying a composite JSON Schema
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Generated schema was rejected by the schema compiler
    #[error("schema could not be compiled: {message}")]
    Compile { message: String },
}
