//! Element nodes, attribute sets, and XML serialization.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{MarkupError, Result};

/// A single attribute value before it is rendered to text.
///
/// Booleans render as `true`/`false` and floats always carry a decimal
/// point (`5.0`), so the front end can tell numbers from free text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Bool(bool),
    Float(f64),
}

impl AttrValue {
    /// The unescaped text form of this value.
    pub fn render(&self) -> String {
        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Float(f) => format!("{f:?}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

/// Ordered attribute set. Insertion order is the serialization order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set an attribute only when a value is present. Absent values are omitted
    /// entirely rather than rendered as an empty string.
    pub fn with_opt<V: Into<AttrValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A markup element: a tag, its attributes, and nested child elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    tag: String,
    attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

/// Build an element from a tag and attributes.
///
/// Fails if the tag or any attribute key is not an XML name, or if a text
/// value carries a character XML 1.0 cannot represent (NUL, most C0 controls).
pub fn build(tag: &str, attributes: Attributes) -> Result<Node> {
    if !is_xml_name(tag) {
        return Err(MarkupError::InvalidTagName {
            name: tag.to_string(),
        });
    }
    for (key, value) in attributes.iter() {
        if !is_xml_name(key) {
            return Err(MarkupError::InvalidAttributeName {
                name: key.to_string(),
            });
        }
        if let AttrValue::Text(text) = value {
            check_text(key, text)?;
        }
    }
    Ok(Node {
        tag: tag.to_string(),
        attributes,
        children: Vec::new(),
    })
}

impl Node {
    /// Append a child element.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Rendered (unescaped) text of an attribute.
    pub fn attr(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(AttrValue::render)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Serialize to XML text. Elements without children are self-closing.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in self.attributes.iter() {
            // Writing to a String cannot fail.
            let _ = write!(out, " {}=\"{}\"", key, escape_attribute(&value.render()));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_xml(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape text for use inside a double-quoted attribute.
///
/// Tab, newline and carriage return are written as character references so
/// XML attribute-value normalization does not collapse them into spaces.
pub fn escape_attribute(text: &str) -> String {
    let escaped = html_escape::encode_double_quoted_attribute(text);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped.into_owned();
    }
    escaped
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

/// Check that `text` only holds characters XML 1.0 can carry.
///
/// `context` names the value in the error message (e.g. `label`).
pub fn check_text(context: &str, text: &str) -> Result<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(MarkupError::InvalidCharacter {
            context: context.to_string(),
            code: c as u32,
        }),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn build_renders_self_closing_element() {
        let node = build(
            "Switch",
            Attributes::new()
                .with("name", "dark_mode")
                .with("required", true)
                .with("initial", false),
        )
        .unwrap();
        assert_eq!(
            node.to_xml(),
            r#"<Switch name="dark_mode" required="true" initial="false"/>"#
        );
    }

    #[test]
    fn absent_attributes_are_omitted() {
        let node = build(
            "TextBox",
            Attributes::new()
                .with("name", "title")
                .with_opt::<String>("label", None),
        )
        .unwrap();
        assert!(!node.attributes().contains_key("label"));
        assert_eq!(node.to_xml(), r#"<TextBox name="title"/>"#);
    }

    #[test]
    fn floats_keep_decimal_point() {
        let node = build(
            "Range",
            Attributes::new().with("min", 0.0).with("step", 0.5),
        )
        .unwrap();
        assert_eq!(node.attr("min").as_deref(), Some("0.0"));
        assert_eq!(node.attr("step").as_deref(), Some("0.5"));
    }

    #[test]
    fn injection_attempt_is_escaped() {
        let node = build(
            "TextBox",
            Attributes::new().with("label", r#""/><script>alert(1)</script>"#),
        )
        .unwrap();
        let xml = node.to_xml();
        assert!(!xml.contains("<script>"));
        assert!(xml.contains("&quot;"));
        assert!(xml.contains("&lt;script&gt;"));
    }

    #[test]
    fn children_render_in_order() {
        let parent = build("Controls", Attributes::new())
            .unwrap()
            .with_child(build("A", Attributes::new()).unwrap())
            .with_child(build("B", Attributes::new()).unwrap());
        assert_eq!(parent.to_xml(), "<Controls><A/><B/></Controls>");
    }

    #[test]
    fn invalid_tag_rejected() {
        let err = build("1bad", Attributes::new()).unwrap_err();
        assert_eq!(
            err,
            MarkupError::InvalidTagName {
                name: "1bad".into()
            }
        );
        assert!(build("", Attributes::new()).is_err());
        assert!(build("has space", Attributes::new()).is_err());
    }

    #[test]
    fn invalid_attribute_name_rejected() {
        let err = build("A", Attributes::new().with("bad key", "x")).unwrap_err();
        assert!(matches!(err, MarkupError::InvalidAttributeName { .. }));
    }

    #[test]
    fn control_characters_rejected() {
        let err = build("A", Attributes::new().with("label", "bad\u{0}")).unwrap_err();
        assert_eq!(
            err,
            MarkupError::InvalidCharacter {
                context: "label".into(),
                code: 0
            }
        );
        assert!(check_text("label", "tab\tand\nnewline").is_ok());
        assert!(check_text("label", "bell\u{7}").is_err());
    }

    #[test]
    fn whitespace_controls_survive_escaping() {
        assert_eq!(escape_attribute("a\nb"), "a&#10;b");
        assert_eq!(escape_attribute("plain"), "plain");
    }

    proptest! {
        #[test]
        fn escaped_attribute_decodes_to_original(text in "[^\u{0}-\u{8}\u{b}\u{c}\u{e}-\u{1f}]*") {
            let escaped = escape_attribute(&text);
            prop_assert!(!escaped.contains('"'));
            prop_assert!(!escaped.contains('<'));
            let decoded = html_escape::decode_html_entities(&escaped);
            prop_assert_eq!(decoded.as_ref(), text.as_str());
        }
    }
}
