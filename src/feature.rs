use crate::geometry::Geometry;
use crate::symbol::LabelSymbol;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Name of the feature property that supplies label text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Field {
    pub name: String,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    /// Placement resolved for this feature by the last collision pass.
    #[serde(skip)]
    label_symbol: Option<LabelSymbol>,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            properties: BTreeMap::new(),
            label_symbol: None,
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Label text for `field`. Strings are used as-is, numbers and booleans
    /// are formatted; anything else has no label.
    pub fn label_text(&self, field: &Field) -> Option<Cow<'_, str>> {
        match self.properties.get(&field.name)? {
            Value::String(text) => Some(Cow::Borrowed(text.as_str())),
            Value::Number(number) => Some(Cow::Owned(number.to_string())),
            Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn label_symbol(&self) -> Option<&LabelSymbol> {
        self.label_symbol.as_ref()
    }

    pub fn set_label_symbol(&mut self, symbol: LabelSymbol) {
        self.label_symbol = Some(symbol);
    }

    pub fn clear_label_symbol(&mut self) {
        self.label_symbol = None;
    }

    /// The symbol this feature's label should be drawn with: its own
    /// override if a collision pass set one, otherwise `template`.
    pub fn resolved_symbol<'a>(&'a self, template: &'a LabelSymbol) -> &'a LabelSymbol {
        self.label_symbol.as_ref().unwrap_or(template)
    }
}
