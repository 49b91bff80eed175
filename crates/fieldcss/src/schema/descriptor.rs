//! Field descriptors.
//!
//! A [`FieldDescriptor`] is the declarative description of one configurable
//! setting. Descriptors are written by block authors, either in Rust with the
//! builder methods or as JSON:
//!
//! ```json
//! {
//!   "key": "fontSize",
//!   "type": "number", "min": 8, "max": 96, "unit": "px",
//!   "default": 16,
//!   "responsive": true,
//!   "selectors": ["{{WRAPPER}} .title { font-size: {{VALUE}}{{UNIT}}; }"]
//! }
//! ```
//!
//! Registration compiles a descriptor into a [`Field`]: the same data plus
//! the parsed selector templates.

use crate::parser::template::SelectorTemplate;
use crate::schema::condition::Condition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The structured value kinds, each lowered by its own generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    Spacing,
    BorderRadius,
    Background,
    Typography,
    Border,
    Flex,
}

impl CompositeKind {
    /// Four-sided kinds expose `{{VALUE.TOP}}` and friends and may use
    /// declaration-body templates.
    pub fn is_box(self) -> bool {
        matches!(self, Self::Spacing | Self::BorderRadius)
    }
}

/// What kind of value a field holds, with its constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
        /// Unit applied to bare numbers.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Choice {
        options: Vec<String>,
    },
    Toggle,
    Composite {
        kind: CompositeKind,
    },
    CustomCss,
}

impl FieldKind {
    pub fn number() -> Self {
        Self::Number {
            min: None,
            max: None,
            step: None,
            unit: None,
        }
    }

    pub fn composite(&self) -> Option<CompositeKind> {
        match self {
            Self::Composite { kind } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Number { .. } | Self::Choice { .. } | Self::Toggle
        )
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number { .. } => "number",
            Self::Choice { .. } => "choice",
            Self::Toggle => "toggle",
            Self::Composite { kind } => match kind {
                CompositeKind::Spacing => "spacing",
                CompositeKind::BorderRadius => "border_radius",
                CompositeKind::Background => "background",
                CompositeKind::Typography => "typography",
                CompositeKind::Border => "border",
                CompositeKind::Flex => "flex",
            },
            Self::CustomCss => "custom_css",
        }
    }
}

/// The declarative description of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Default value. `null` means the field emits nothing unless set.
    #[serde(default)]
    pub default: Value,
    /// Property written for bare selector templates of scalar and spacing
    /// fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<String>,
    #[serde(default)]
    pub responsive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Translates a scalar's text before it is written, e.g. `true` to
    /// `block`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub value_map: BTreeMap<String, String>,
    /// Key of the composite field this field refines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl FieldDescriptor {
    pub fn new(key: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            kind,
            default: Value::Null,
            property: None,
            selectors: Vec::new(),
            responsive: false,
            condition: None,
            value_map: BTreeMap::new(),
            group: None,
        }
    }

    pub fn text(key: &str) -> Self {
        Self::new(key, FieldKind::Text)
    }

    pub fn number(key: &str) -> Self {
        Self::new(key, FieldKind::number())
    }

    pub fn choice(key: &str, options: &[&str]) -> Self {
        Self::new(
            key,
            FieldKind::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        )
    }

    pub fn toggle(key: &str) -> Self {
        Self::new(key, FieldKind::Toggle)
    }

    pub fn composite(key: &str, kind: CompositeKind) -> Self {
        Self::new(key, FieldKind::Composite { kind })
    }

    pub fn custom_css(key: &str) -> Self {
        Self::new(key, FieldKind::CustomCss)
    }

    /// Sets numeric bounds. Ignored for non-number kinds.
    pub fn range(mut self, lo: Option<f64>, hi: Option<f64>) -> Self {
        if let FieldKind::Number { min, max, .. } = &mut self.kind {
            *min = lo;
            *max = hi;
        }
        self
    }

    /// Sets the numeric step. Ignored for non-number kinds.
    pub fn step(mut self, value: f64) -> Self {
        if let FieldKind::Number { step, .. } = &mut self.kind {
            *step = Some(value);
        }
        self
    }

    /// Sets the unit applied to bare numbers. Ignored for non-number kinds.
    pub fn unit(mut self, value: &str) -> Self {
        if let FieldKind::Number { unit, .. } = &mut self.kind {
            *unit = Some(value.to_string());
        }
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = value;
        self
    }

    pub fn property(mut self, name: &str) -> Self {
        self.property = Some(name.to_string());
        self
    }

    pub fn selector(mut self, template: &str) -> Self {
        self.selectors.push(template.to_string());
        self
    }

    pub fn responsive(mut self) -> Self {
        self.responsive = true;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn map_value(mut self, from: &str, to: &str) -> Self {
        self.value_map.insert(from.to_string(), to.to_string());
        self
    }

    pub fn group(mut self, key: &str) -> Self {
        self.group = Some(key.to_string());
        self
    }
}

/// A registered field: its descriptor plus compiled templates.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) descriptor: FieldDescriptor,
    pub(crate) templates: Vec<SelectorTemplate>,
    pub(crate) unknown_placeholders: Vec<String>,
}

impl Field {
    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn kind(&self) -> &FieldKind {
        &self.descriptor.kind
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn templates(&self) -> &[SelectorTemplate] {
        &self.templates
    }

    pub fn is_responsive(&self) -> bool {
        self.descriptor.responsive
    }

    pub fn property(&self) -> Option<&str> {
        self.descriptor.property.as_deref()
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.descriptor.condition.as_ref()
    }

    pub fn group(&self) -> Option<&str> {
        self.descriptor.group.as_deref()
    }

    pub fn mapped<'a>(&'a self, text: &str) -> Option<&'a str> {
        self.descriptor.value_map.get(text).map(String::as_str)
    }

    pub fn has_value_map(&self) -> bool {
        !self.descriptor.value_map.is_empty()
    }

    /// Placeholders in this field's templates that are not recognized.
    pub fn unknown_placeholders(&self) -> &[String] {
        &self.unknown_placeholders
    }
}
