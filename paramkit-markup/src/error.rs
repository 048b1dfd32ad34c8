//! Error types for markup construction

use thiserror::Error;

/// Result type for markup operations
pub type Result<T> = std::result::Result<T, MarkupError>;

/// Errors that can occur while building markup elements
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarkupError {
    /// Tag is not a valid XML element name
    #[error("invalid element name: '{name}'")]
    InvalidTagName { name: String },

    /// Attribute key is not a valid XML attribute name
    #[error("invalid attribute name: '{name}'")]
    InvalidAttributeName { name: String },

    /// Text contains a character XML cannot represent
    #[error("{context} contains a character not allowed in markup: U+{code:04X}")]
    InvalidCharacter { context: String, code: u32 },
}
