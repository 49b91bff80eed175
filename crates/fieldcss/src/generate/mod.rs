//! Lowering of resolved values into declarations.
//!
//! Each composite kind has a pure generator in its own submodule, mapping a
//! normalized value to a list of [`Property`] pairs. Generators never fail:
//! anything they cannot express is skipped and reported as a
//! [`WarningKind`].
//!
//! [`lower`] dispatches on [`ResolvedValue`] and also computes the texts
//! substituted for `{{VALUE}}`, `{{UNIT}}` and the side placeholders.
//! [`expand_field`] then runs every selector template of a field.

pub mod background;
pub mod border;
pub mod flex;
pub mod spacing;
pub mod typography;

use crate::error::WarningKind;
use crate::parser::template::SlotValues;
use crate::schema::descriptor::Field;
use crate::types::{Declaration, Property, ResolvedValue, format_number};

/// A value ready for template expansion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lowered {
    /// Text for `{{VALUE}}`.
    pub value: String,
    /// Text for `{{UNIT}}`.
    pub unit: String,
    /// Texts for the side placeholders of four-sided values.
    pub sides: Option<[String; 4]>,
    /// Declarations written for bare selector templates.
    pub properties: Vec<Property>,
}

/// Lowers one value of a field. Returns `None` when the value produces no
/// CSS at all.
pub fn lower(
    field: &Field,
    value: &ResolvedValue,
    warnings: &mut Vec<WarningKind>,
) -> Option<Lowered> {
    let lowered = match value {
        ResolvedValue::Empty | ResolvedValue::CustomCss(_) => return None,
        ResolvedValue::Text(text) | ResolvedValue::Choice(text) => {
            if text.trim().is_empty() {
                return None;
            }
            scalar(field, field.mapped(text).unwrap_or(text.as_str()), "")
        }
        ResolvedValue::Number { value, unit } => {
            let text = format_number(*value);
            match field.mapped(&text) {
                Some(mapped) => scalar(field, mapped, ""),
                None => scalar(field, &text, unit),
            }
        }
        ResolvedValue::Toggle(on) => {
            let key = if *on { "true" } else { "false" };
            match field.mapped(key) {
                Some(mapped) => scalar(field, mapped, ""),
                None if field.has_value_map() => return None,
                None => scalar(field, key, ""),
            }
        }
        ResolvedValue::Spacing(sides) | ResolvedValue::BorderRadius(sides) => {
            let property = match value {
                ResolvedValue::BorderRadius(_) => Some(field.property().unwrap_or("border-radius")),
                _ => field.property(),
            };
            Lowered {
                value: sides.shorthand(),
                unit: sides.unit.clone(),
                sides: Some(spacing::side_texts(sides)),
                properties: property
                    .map(|p| spacing::box_sides(p, sides))
                    .unwrap_or_default(),
            }
        }
        ResolvedValue::Background(bg) => generated(background::background(bg, warnings))?,
        ResolvedValue::Typography(t) => generated(typography::typography(t))?,
        ResolvedValue::Border(b) => generated(border::border(b, warnings))?,
        ResolvedValue::Flex(layout) => generated(flex::flex(layout, warnings))?,
    };
    Some(lowered)
}

fn scalar(field: &Field, value: &str, unit: &str) -> Lowered {
    Lowered {
        value: value.to_string(),
        unit: unit.to_string(),
        sides: None,
        properties: field
            .property()
            .map(|p| vec![Property::new(p, format!("{value}{unit}"))])
            .unwrap_or_default(),
    }
}

fn generated(properties: Vec<Property>) -> Option<Lowered> {
    if properties.is_empty() {
        return None;
    }
    Some(Lowered {
        properties,
        ..Lowered::default()
    })
}

/// Expands every selector template of `field` for one value.
///
/// Each template yields its own declaration group, in template order.
pub fn expand_field(
    field: &Field,
    value: &ResolvedValue,
    wrapper: &str,
    warnings: &mut Vec<WarningKind>,
) -> Vec<Declaration> {
    let Some(lowered) = lower(field, value, warnings) else {
        return Vec::new();
    };
    let slots = SlotValues {
        wrapper,
        value: &lowered.value,
        unit: &lowered.unit,
        sides: lowered.sides.as_ref(),
    };

    let mut declarations = Vec::new();
    for template in field.templates() {
        let rule = template.expand(&slots, &lowered.properties);
        let selector = rule.selector.trim();
        if selector.is_empty() {
            continue;
        }
        declarations.extend(rule.properties.into_iter().map(|p| p.scoped(selector)));
    }
    declarations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CompositeKind, FieldDescriptor, SchemaRegistry};
    use crate::types::BoxSides;
    use serde_json::json;

    fn field(descriptor: FieldDescriptor) -> Field {
        let mut builder = SchemaRegistry::builder();
        let key = descriptor.key.clone();
        builder.register("t", vec![descriptor]).unwrap();
        builder
            .build()
            .lookup("t")
            .unwrap()
            .field(&key)
            .unwrap()
            .clone()
    }

    #[test]
    fn number_with_bare_selector_uses_property() {
        let f = field(
            FieldDescriptor::number("size")
                .unit("px")
                .property("font-size")
                .selector("{{WRAPPER}} h2"),
        );
        let decls = expand_field(
            &f,
            &ResolvedValue::Number {
                value: 18.0,
                unit: "px".into(),
            },
            ".b1",
            &mut Vec::new(),
        );
        assert_eq!(decls, vec![Property::new("font-size", "18px").scoped(".b1 h2")]);
    }

    #[test]
    fn multiple_templates_produce_independent_groups() {
        let f = field(
            FieldDescriptor::text("color")
                .selector("{{WRAPPER}} a { color: {{VALUE}}; }")
                .selector("{{WRAPPER}} a:hover { border-color: {{VALUE}}; }"),
        );
        let decls = expand_field(&f, &ResolvedValue::Text("red".into()), ".b1", &mut Vec::new());
        assert_eq!(
            decls,
            vec![
                Property::new("color", "red").scoped(".b1 a"),
                Property::new("border-color", "red").scoped(".b1 a:hover"),
            ]
        );
    }

    #[test]
    fn toggles_map_to_css_text() {
        let f = field(
            FieldDescriptor::toggle("hide")
                .map_value("true", "none")
                .property("display")
                .selector("{{WRAPPER}}"),
        );
        let on = expand_field(&f, &ResolvedValue::Toggle(true), ".b1", &mut Vec::new());
        assert_eq!(on, vec![Property::new("display", "none").scoped(".b1")]);
        let off = expand_field(&f, &ResolvedValue::Toggle(false), ".b1", &mut Vec::new());
        assert!(off.is_empty());
    }

    #[test]
    fn spacing_sides_fill_body_templates() {
        let f = field(
            FieldDescriptor::composite("margin", CompositeKind::Spacing).selector(
                "{{WRAPPER}} { margin-top: {{VALUE.TOP}}{{UNIT}}; margin-bottom: {{VALUE.BOTTOM}}{{UNIT}}; }",
            ),
        );
        let sides = BoxSides::vertical_horizontal(4.0, 8.0, "rem");
        let decls = expand_field(&f, &ResolvedValue::Spacing(sides), ".b1", &mut Vec::new());
        assert_eq!(
            decls,
            vec![
                Property::new("margin-top", "4rem").scoped(".b1"),
                Property::new("margin-bottom", "4rem").scoped(".b1"),
            ]
        );
    }

    #[test]
    fn border_radius_defaults_its_property() {
        let f = field(
            FieldDescriptor::composite("radius", CompositeKind::BorderRadius)
                .selector("{{WRAPPER}} img"),
        );
        let decls = expand_field(
            &f,
            &ResolvedValue::BorderRadius(BoxSides::all(6.0, "px")),
            ".b1",
            &mut Vec::new(),
        );
        assert_eq!(
            decls,
            vec![Property::new("border-radius", "6px 6px 6px 6px").scoped(".b1 img")]
        );
    }

    #[test]
    fn empty_text_emits_nothing() {
        let f = field(FieldDescriptor::text("c").property("color").selector("{{WRAPPER}}"));
        assert!(expand_field(&f, &ResolvedValue::Text(String::new()), ".b1", &mut Vec::new())
            .is_empty());
    }

    #[test]
    fn composite_warnings_are_collected() {
        let f = field(
            FieldDescriptor::composite("bg", CompositeKind::Background)
                .selector("{{WRAPPER}}")
                .default_value(json!({"type": "color", "color": "red"})),
        );
        let mut warnings = Vec::new();
        let bg = crate::types::Background::from_json(&json!({"type": "video"})).unwrap();
        assert!(expand_field(&f, &ResolvedValue::Background(bg), ".b1", &mut warnings).is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
