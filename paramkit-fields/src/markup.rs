//! Rendering fields as markup elements for the front end.

use paramkit_markup::{build, AttrValue, Attributes, Node};

use crate::field::Field;

impl Field {
    /// Serialized initial value, if the field has one.
    pub fn normalized_initial(&self) -> Option<AttrValue> {
        self.initial().map(|v| self.kind().normalize_initial(v))
    }

    /// The shared attributes followed by the variant extras:
    /// `name, label, required, initial, [min, max, step | choices]`.
    pub fn attributes(&self) -> Attributes {
        let attrs = Attributes::new()
            .with("name", self.name())
            .with_opt("label", self.label())
            .with("required", self.required())
            .with_opt("initial", self.normalized_initial());
        self.kind().extend_attributes(attrs)
    }

    /// One element named after the variant tag.
    ///
    /// Construction already rejected every string markup cannot carry, so
    /// this only fails for fields assembled outside the builders.
    pub fn to_markup(&self) -> paramkit_markup::Result<Node> {
        build(self.tag(), self.attributes())
    }
}
