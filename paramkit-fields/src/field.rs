//! Field instances and their builders.
//!
//! A [`Field`] only ever comes out of [`FieldBuilder::build`], which runs
//! [`check_invariants`] before handing the field over. Fields have no
//! mutating methods, so a field that exists is valid for its whole life.

use paramkit_markup::check_text;
use tracing::debug;

use crate::error::ConstructionError;
use crate::kind::FieldKind;
use crate::value::{FieldValue, ValueKind};

/// One constructed, immutable parameter definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    label: Option<String>,
    required: bool,
    initial: Option<FieldValue>,
    kind: FieldKind,
}

impl Field {
    /// Boolean toggle; initial value `false`.
    pub fn switch(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::Switch).initial(false)
    }

    /// Free text; initial value `""`.
    pub fn text_box(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::TextBox).initial("")
    }

    /// Unbounded number.
    pub fn number_box(name: impl Into<String>, initial: f64) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::NumberBox).initial(initial)
    }

    /// Number between `min` and `max`; add a step with [`FieldBuilder::step`].
    pub fn range(name: impl Into<String>, initial: f64, min: f64, max: f64) -> FieldBuilder {
        FieldBuilder::new(
            name,
            FieldKind::Range {
                min,
                max,
                step: None,
            },
        )
        .initial(initial)
    }

    /// One element of `options`; no initial value.
    pub fn choice<I, S>(name: impl Into<String>, options: I) -> FieldBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        FieldBuilder::new(name, FieldKind::Choice { options })
    }

    /// Any subset of `options`; initial value `[]`.
    pub fn multi_choice<I, S>(name: impl Into<String>, options: I) -> FieldBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        FieldBuilder::new(name, FieldKind::MultiChoice { options }).initial(Vec::<String>::new())
    }

    /// Free list of strings; initial value `[]`.
    pub fn tags(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::Tags).initial(Vec::<String>::new())
    }

    pub fn date(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::Date)
    }

    pub fn time(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::Time)
    }

    pub fn date_time(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::DateTime)
    }

    /// Uploaded file, submitted as base64. Never cacheable.
    pub fn file(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldKind::File)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn initial(&self) -> Option<&FieldValue> {
        self.initial.as_ref()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind.value_kind()
    }

    pub fn cacheable(&self) -> bool {
        self.kind.cacheable()
    }
}

/// Collects the arguments of one field and checks them all at once.
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until `build` is called"]
pub struct FieldBuilder {
    name: String,
    label: Option<String>,
    initial: Option<FieldValue>,
    allow_empty: Option<bool>,
    step: Option<f64>,
    kind: FieldKind,
}

impl FieldBuilder {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            initial: None,
            allow_empty: None,
            step: None,
            kind,
        }
    }

    /// Human-readable label. `""` is rejected at build time.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn initial(mut self, initial: impl Into<FieldValue>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Drop any initial value, including the variant default.
    pub fn no_initial(mut self) -> Self {
        self.initial = None;
        self
    }

    /// Accept empty values. Only TextBox, MultiChoice, Tags and File support it.
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = Some(allow_empty);
        self
    }

    /// Range increment. Only Range supports it.
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Build the field, or report the first violated rule.
    pub fn build(self) -> Result<Field, ConstructionError> {
        let tag = self.kind.tag();
        if self.allow_empty.is_some() && !self.kind.supports_allow_empty() {
            return Err(ConstructionError::UnsupportedOption {
                name: self.name,
                tag,
                option: "allow_empty",
            });
        }

        let mut kind = self.kind;
        if let Some(step) = self.step {
            match &mut kind {
                FieldKind::Range { step: slot, .. } => *slot = Some(step),
                _ => {
                    return Err(ConstructionError::UnsupportedOption {
                        name: self.name,
                        tag,
                        option: "step",
                    })
                }
            }
        }

        let field = Field {
            name: self.name,
            label: self.label,
            required: !self.allow_empty.unwrap_or(false),
            initial: self.initial,
            kind,
        };
        check_invariants(&field)?;

        debug!(
            name = %field.name,
            tag = field.tag(),
            required = field.required,
            "constructed field"
        );
        Ok(field)
    }
}

/// Every construction rule, applied to a fully assembled field.
pub fn check_invariants(field: &Field) -> Result<(), ConstructionError> {
    let name = &field.name;
    if name.is_empty() {
        return Err(ConstructionError::EmptyName);
    }
    check_markup_text(name, "name", name)?;

    if let Some(label) = &field.label {
        if label.is_empty() {
            return Err(ConstructionError::EmptyLabel { name: name.clone() });
        }
        check_markup_text(name, "label", label)?;
    }

    if let Some(initial) = &field.initial {
        let expected = field.kind.value_kind();
        if initial.kind() != expected {
            return Err(ConstructionError::InitialTypeMismatch {
                name: name.clone(),
                expected: expected.as_str(),
                actual: initial.kind().as_str(),
            });
        }
        match initial {
            FieldValue::Text(text) => check_markup_text(name, "initial", text)?,
            FieldValue::List(items) => {
                for item in items {
                    check_markup_text(name, "initial", item)?;
                }
            }
            _ => {}
        }
    }

    match &field.kind {
        FieldKind::Range { min, max, step } => {
            check_finite(name, "min", *min)?;
            check_finite(name, "max", *max)?;
            if let Some(step) = step {
                check_finite(name, "step", *step)?;
            }
            if min > max {
                return Err(ConstructionError::InvertedRange {
                    name: name.clone(),
                    min: *min,
                    max: *max,
                });
            }
            if let Some(FieldValue::Float(initial)) = &field.initial {
                check_finite(name, "initial", *initial)?;
            }
        }
        FieldKind::NumberBox => {
            if let Some(FieldValue::Float(initial)) = &field.initial {
                check_finite(name, "initial", *initial)?;
            }
        }
        FieldKind::Choice { options } => {
            check_options(name, options)?;
            if let Some(FieldValue::Text(initial)) = &field.initial {
                if !options.contains(initial) {
                    return Err(ConstructionError::InitialNotInOptions {
                        name: name.clone(),
                        value: initial.clone(),
                    });
                }
            }
        }
        FieldKind::MultiChoice { options } => {
            check_options(name, options)?;
            if let Some(FieldValue::List(initial)) = &field.initial {
                if let Some(missing) = initial.iter().find(|item| !options.contains(*item)) {
                    return Err(ConstructionError::InitialNotInOptions {
                        name: name.clone(),
                        value: missing.clone(),
                    });
                }
            }
        }
        _ => {}
    }

    Ok(())
}

fn check_finite(name: &str, bound: &'static str, value: f64) -> Result<(), ConstructionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConstructionError::NonFiniteBound {
            name: name.to_string(),
            bound,
            value,
        })
    }
}

fn check_options(name: &str, options: &[String]) -> Result<(), ConstructionError> {
    if options.is_empty() {
        return Err(ConstructionError::NoOptions {
            name: name.to_string(),
        });
    }
    for option in options {
        if option.is_empty() {
            return Err(ConstructionError::EmptyOption {
                name: name.to_string(),
            });
        }
        check_markup_text(name, "option", option)?;
    }
    Ok(())
}

fn check_markup_text(name: &str, context: &str, text: &str) -> Result<(), ConstructionError> {
    check_text(context, text).map_err(|source| ConstructionError::Markup {
        name: name.to_string(),
        source,
    })
}
