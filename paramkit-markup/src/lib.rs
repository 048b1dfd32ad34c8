//! Markup elements for the parameter front end
//!
//! `paramkit-markup` is the small element-construction layer the field
//! definitions render through. It knows nothing about fields: callers hand
//! it a tag and an ordered attribute set via [`build`], and get back a
//! [`Node`] that can be nested and serialized to XML text.
//!
//! # Guarantees
//!
//! - **Names are checked**: tags and attribute keys must be XML names
//! - **Text is checked**: attribute values must only contain characters XML 1.0 can carry
//! - **Values are escaped**: [`Node::to_xml`] escapes every attribute value, so a
//!   user-chosen label such as `"><script>` can never open a new element

pub mod error;
pub mod node;

pub use error::{MarkupError, Result};
pub use node::{build, check_text, escape_attribute, AttrValue, Attributes, Node};
