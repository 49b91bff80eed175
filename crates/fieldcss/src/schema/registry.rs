//! The field schema registry.
//!
//! Schemas are registered through a [`RegistryBuilder`] while the process
//! starts up. [`RegistryBuilder::build`] freezes them into a
//! [`SchemaRegistry`], which has no mutating methods at all and can be
//! shared between threads behind an `Arc` without locking.
//!
//! ```rust
//! use fieldcss::schema::{FieldDescriptor, SchemaRegistry};
//! use serde_json::json;
//!
//! let mut builder = SchemaRegistry::builder();
//! builder
//!     .register(
//!         "heading",
//!         vec![FieldDescriptor::text("color")
//!             .property("color")
//!             .selector("{{WRAPPER}} h2")
//!             .default_value(json!("#222"))],
//!     )
//!     .unwrap();
//! let registry = builder.build();
//!
//! assert_eq!(registry.lookup("heading").unwrap().len(), 1);
//! ```

use crate::FieldCssError;
use crate::parser::template::SelectorTemplate;
use crate::resolver::normalize;
use crate::schema::descriptor::{CompositeKind, Field, FieldDescriptor, FieldKind};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// The compiled fields of one block type.
#[derive(Debug, Clone)]
pub struct Schema {
    block_type: String,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    emission_order: Vec<usize>,
}

impl Schema {
    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.index_of(key).map(|i| &self.fields[i])
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Field indices in the order their CSS is emitted: declaration order,
    /// except that group members follow their group immediately.
    pub fn emission_order(&self) -> &[usize] {
        &self.emission_order
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read-only lookup of schemas by block type.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns the schema of `block_type`.
    pub fn lookup(&self, block_type: &str) -> Result<&Schema, FieldCssError> {
        self.schemas
            .get(block_type)
            .ok_or_else(|| FieldCssError::SchemaNotFound(block_type.to_string()))
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.schemas.contains_key(block_type)
    }

    /// Registered block types, sorted.
    pub fn block_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

/// Collects schemas before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: HashMap<String, Schema>,
}

impl RegistryBuilder {
    /// Compiles and stores the fields of `block_type`.
    ///
    /// Fails with [`FieldCssError::DuplicateSchema`] if the block type is
    /// already registered, or [`FieldCssError::InvalidSchema`] /
    /// [`FieldCssError::InvalidTemplate`] if a descriptor is inconsistent.
    pub fn register(
        &mut self,
        block_type: &str,
        descriptors: Vec<FieldDescriptor>,
    ) -> Result<&mut Self, FieldCssError> {
        if self.schemas.contains_key(block_type) {
            return Err(FieldCssError::DuplicateSchema(block_type.to_string()));
        }
        let schema = compile(block_type, descriptors)?;
        log::debug!(
            "registered schema `{}` with {} field(s)",
            block_type,
            schema.len()
        );
        self.schemas.insert(block_type.to_string(), schema);
        Ok(self)
    }

    /// Registers a JSON array of field descriptors.
    pub fn register_json(&mut self, block_type: &str, json: &str) -> Result<&mut Self, FieldCssError> {
        let descriptors: Vec<FieldDescriptor> = serde_json::from_str(json)?;
        self.register(block_type, descriptors)
    }

    /// Registers every schema of a JSON document mapping block types to
    /// descriptor arrays.
    ///
    /// ```json
    /// { "heading": [ { "key": "color", "type": "text" } ], "card": [] }
    /// ```
    pub fn register_document(&mut self, json: &str) -> Result<&mut Self, FieldCssError> {
        let document: BTreeMap<String, Vec<FieldDescriptor>> = serde_json::from_str(json)?;
        for (block_type, descriptors) in document {
            self.register(&block_type, descriptors)?;
        }
        Ok(self)
    }

    /// Reads a schema document from disk. See [`Self::register_document`].
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, FieldCssError> {
        let text = std::fs::read_to_string(path)?;
        self.register_document(&text)
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}

fn compile(block_type: &str, descriptors: Vec<FieldDescriptor>) -> Result<Schema, FieldCssError> {
    let invalid = |field: &str, reason: String| FieldCssError::InvalidSchema {
        block_type: block_type.to_string(),
        field: field.to_string(),
        reason,
    };

    let mut index = HashMap::new();
    for (i, d) in descriptors.iter().enumerate() {
        if d.key.is_empty() || d.key.contains('.') {
            return Err(invalid(&d.key, "field keys must be non-empty and contain no `.`".into()));
        }
        if index.insert(d.key.clone(), i).is_some() {
            return Err(invalid(&d.key, "duplicate field key".into()));
        }
    }

    let mut fields = Vec::with_capacity(descriptors.len());
    for d in &descriptors {
        check_descriptor(d, &descriptors, &index).map_err(|reason| invalid(&d.key, reason))?;

        let templates = d
            .selectors
            .iter()
            .map(|source| SelectorTemplate::parse(source))
            .collect::<Result<Vec<_>, _>>()?;
        check_templates(d, &templates).map_err(|reason| invalid(&d.key, reason))?;

        let unknown_placeholders: Vec<String> = templates
            .iter()
            .flat_map(SelectorTemplate::unknown_placeholders)
            .collect();
        for name in &unknown_placeholders {
            log::warn!(
                "{}.{}: unknown placeholder `{{{{{}}}}}` will be kept verbatim",
                block_type,
                d.key,
                name
            );
        }

        check_default(d).map_err(|reason| invalid(&d.key, reason))?;

        fields.push(Field {
            descriptor: d.clone(),
            templates,
            unknown_placeholders,
        });
    }

    let emission_order = emission_order(&fields, &index);
    Ok(Schema {
        block_type: block_type.to_string(),
        fields,
        index,
        emission_order,
    })
}

fn check_descriptor(
    d: &FieldDescriptor,
    all: &[FieldDescriptor],
    index: &HashMap<String, usize>,
) -> Result<(), String> {
    match &d.kind {
        FieldKind::Number { min, max, step, .. } => {
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(format!("min {min} is above max {max}"));
                }
            }
            if step.is_some_and(|s| s <= 0.0) {
                return Err("step must be positive".into());
            }
        }
        FieldKind::Choice { options } if options.is_empty() => {
            return Err("choice fields need at least one option".into());
        }
        FieldKind::CustomCss => {
            if d.responsive {
                return Err("custom CSS cannot be responsive".into());
            }
            if !d.selectors.is_empty() {
                return Err("custom CSS takes no selector templates".into());
            }
        }
        _ => {}
    }

    if let Some(condition) = &d.condition {
        for referenced in condition.fields() {
            if referenced == d.key {
                return Err("condition refers to the field itself".into());
            }
            if !index.contains_key(referenced) {
                return Err(format!("condition refers to unknown field `{referenced}`"));
            }
        }
    }

    if let Some(group) = &d.group {
        let target = index
            .get(group)
            .map(|&i| &all[i])
            .ok_or_else(|| format!("group `{group}` does not exist"))?;
        if target.key == d.key {
            return Err("a field cannot be its own group".into());
        }
        if target.kind.composite().is_none() {
            return Err(format!("group `{group}` is not a composite field"));
        }
        if target.group.is_some() {
            return Err(format!("group `{group}` is itself a group member"));
        }
    }
    Ok(())
}

fn check_templates(d: &FieldDescriptor, templates: &[SelectorTemplate]) -> Result<(), String> {
    let composite = d.kind.composite();
    let is_box = composite.is_some_and(|k| k.is_box());

    for template in templates {
        if !is_box && template.slots().iter().any(|slot| slot.is_side()) {
            return Err(format!(
                "`{}` uses side placeholders on a {} field",
                template.source,
                d.kind.name()
            ));
        }
        match (&template.body, composite) {
            (Some(_), Some(kind)) if !kind.is_box() => {
                return Err(format!(
                    "{} fields generate their own declarations; `{}` must be a bare selector",
                    d.kind.name(),
                    template.source
                ));
            }
            (None, Some(CompositeKind::Spacing)) | (None, None)
                if d.property.is_none() =>
            {
                return Err(format!(
                    "bare selector `{}` needs a `property`",
                    template.source
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validates the default with the field's own constraints. A responsive
/// default may be a per-breakpoint map; breakpoints are not known here, so
/// its members are validated one by one when the whole object is not a
/// valid value.
fn check_default(d: &FieldDescriptor) -> Result<(), String> {
    let whole = normalize(&d.kind, &d.default);
    match (&d.default, whole) {
        (_, Ok(_)) => Ok(()),
        (serde_json::Value::Object(map), Err(_)) if d.responsive => map
            .iter()
            .try_for_each(|(bp, value)| {
                normalize(&d.kind, value)
                    .map(|_| ())
                    .map_err(|e| format!("default for `{bp}`: {e}"))
            }),
        (_, Err(e)) => Err(format!("default: {e}")),
    }
}

fn emission_order(fields: &[Field], index: &HashMap<String, usize>) -> Vec<usize> {
    let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, field) in fields.iter().enumerate() {
        if let Some(group) = field.group().and_then(|g| index.get(g)) {
            members.entry(*group).or_default().push(i);
        }
    }

    let mut order = Vec::with_capacity(fields.len());
    let mut placed = HashSet::new();
    for (i, field) in fields.iter().enumerate() {
        if field.group().is_some() {
            continue;
        }
        order.push(i);
        placed.insert(i);
        for &member in members.get(&i).into_iter().flatten() {
            if placed.insert(member) {
                order.push(member);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::condition::Condition;
    use serde_json::json;

    fn register(fields: Vec<FieldDescriptor>) -> Result<SchemaRegistry, FieldCssError> {
        let mut builder = SchemaRegistry::builder();
        builder.register("block", fields)?;
        Ok(builder.build())
    }

    fn reason(err: FieldCssError) -> String {
        match err {
            FieldCssError::InvalidSchema { reason, .. } => reason,
            other => panic!("expected InvalidSchema, got {other:?}"),
        }
    }

    #[test]
    fn lookup_unknown_block_type() {
        let registry = register(vec![]).unwrap();
        assert!(matches!(
            registry.lookup("other"),
            Err(FieldCssError::SchemaNotFound(t)) if t == "other"
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut builder = SchemaRegistry::builder();
        builder.register("block", vec![]).unwrap();
        assert!(matches!(
            builder.register("block", vec![]),
            Err(FieldCssError::DuplicateSchema(_))
        ));
    }

    #[test]
    fn invalid_defaults_are_rejected() {
        let err = register(vec![
            FieldDescriptor::number("size")
                .range(Some(0.0), Some(10.0))
                .default_value(json!(20)),
        ])
        .unwrap_err();
        assert!(reason(err).contains("above the maximum"));
    }

    #[test]
    fn per_breakpoint_defaults_are_accepted() {
        register(vec![
            FieldDescriptor::number("size")
                .responsive()
                .default_value(json!({"wide": 24, "narrow": 16})),
        ])
        .unwrap();
    }

    #[test]
    fn conditions_must_reference_known_fields() {
        let err = register(vec![
            FieldDescriptor::text("color").condition(Condition::truthy("missing")),
        ])
        .unwrap_err();
        assert!(reason(err).contains("unknown field `missing`"));
    }

    #[test]
    fn bare_scalar_selector_needs_property() {
        let err = register(vec![FieldDescriptor::text("color").selector("{{WRAPPER}}")])
            .unwrap_err();
        assert!(reason(err).contains("needs a `property`"));
    }

    #[test]
    fn generated_composites_reject_body_templates() {
        let err = register(vec![
            FieldDescriptor::composite("bg", CompositeKind::Background)
                .selector("{{WRAPPER}} { background: {{VALUE}}; }"),
        ])
        .unwrap_err();
        assert!(reason(err).contains("bare selector"));
    }

    #[test]
    fn side_placeholders_need_a_box_field() {
        let err = register(vec![
            FieldDescriptor::text("x").selector("{{WRAPPER}} { margin-top: {{VALUE.TOP}}; }"),
        ])
        .unwrap_err();
        assert!(reason(err).contains("side placeholders"));
    }

    #[test]
    fn responsive_custom_css_is_rejected() {
        let err = register(vec![FieldDescriptor::custom_css("css").responsive()]).unwrap_err();
        assert!(reason(err).contains("cannot be responsive"));
    }

    #[test]
    fn broken_templates_surface_as_template_errors() {
        let err = register(vec![
            FieldDescriptor::text("x").selector("{{WRAPPER}} { color: {{VALUE}}"),
        ])
        .unwrap_err();
        assert!(matches!(err, FieldCssError::InvalidTemplate { .. }));
    }

    #[test]
    fn group_members_follow_their_group() {
        let registry = register(vec![
            FieldDescriptor::text("color").group("border").property("border-color"),
            FieldDescriptor::text("title"),
            FieldDescriptor::composite("border", CompositeKind::Border),
        ])
        .unwrap();
        let schema = registry.lookup("block").unwrap();
        let keys: Vec<&str> = schema
            .emission_order()
            .iter()
            .map(|&i| schema.fields()[i].key())
            .collect();
        assert_eq!(keys, vec!["title", "border", "color"]);
    }

    #[test]
    fn registers_json_documents() {
        let mut builder = SchemaRegistry::builder();
        builder
            .register_document(
                r#"{
                    "heading": [
                        {"key": "align", "type": "choice", "options": ["left", "center"],
                         "default": "left", "property": "text-align",
                         "selectors": ["{{WRAPPER}}"]}
                    ],
                    "spacer": []
                }"#,
            )
            .unwrap();
        let registry = builder.build();
        assert_eq!(registry.block_types(), vec!["heading", "spacer"]);
    }

    #[test]
    fn unknown_placeholders_are_recorded() {
        let registry = register(vec![
            FieldDescriptor::text("w").selector("{{WRAPPER}} { width: {{SIZE}}; }"),
        ])
        .unwrap();
        let field = registry.lookup("block").unwrap().field("w").unwrap();
        assert_eq!(field.unknown_placeholders(), ["SIZE".to_string()]);
    }
}
