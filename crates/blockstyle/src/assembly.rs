//! Stylesheet assembly.
//!
//! Runs the `fieldcss` stages for one block instance and orders the result:
//!
//! 1. one base block with every field's widest-breakpoint declarations,
//!    in schema emission order;
//! 2. one `max-width` media block per narrower breakpoint, widest first;
//! 3. the sanitized custom CSS of each `custom_css` field.
//!
//! Within each block later declarations for the same selector and property
//! replace earlier ones, so a field emitted later wins.

use fieldcss::emit::{Block, CssWriter, OutputStyle, RuleSet};
use fieldcss::error::{Diagnostics, FieldErrorKind, WarningKind};
use fieldcss::generate::expand_field;
use fieldcss::resolver::{ResolvedField, resolve};
use fieldcss::responsive::{self, Layer};
use fieldcss::sanitizer::{SanitizePolicy, sanitize};
use fieldcss::schema::Schema;
use fieldcss::schema::descriptor::FieldKind;
use fieldcss::types::{Breakpoints, ResolvedValue};
use fieldcss::SettingsTree;

/// Where a fragment came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOrigin {
    Base,
    Responsive { breakpoint: String },
    Custom { field: String },
}

/// One block of the final stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFragment {
    pub origin: FragmentOrigin,
    /// Position class: 0 for the base, the breakpoint index for overrides,
    /// one past the last breakpoint for custom CSS.
    pub rank: usize,
    pub block: Block,
}

/// Everything needed to assemble a block's stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub breakpoints: &'a Breakpoints,
    /// The scoping selector, e.g. `.block-42`.
    pub wrapper: &'a str,
    pub policy: SanitizePolicy,
}

/// An assembled, not yet rendered stylesheet.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub fragments: Vec<GeneratedFragment>,
    pub diagnostics: Diagnostics,
}

impl Stylesheet {
    /// Renders the fragments in rank order.
    pub fn render(&self, style: OutputStyle) -> String {
        let mut fragments: Vec<&GeneratedFragment> = self.fragments.iter().collect();
        fragments.sort_by_key(|f| f.rank);
        let blocks: Vec<Block> = fragments.into_iter().map(|f| f.block.clone()).collect();
        CssWriter::new(style).write(&blocks)
    }
}

pub fn assemble(schema: &Schema, settings: &SettingsTree, cx: &AssemblyContext<'_>) -> Stylesheet {
    let mut diagnostics = Diagnostics::new();
    let resolved = resolve(schema, settings, cx.breakpoints, &mut diagnostics);

    let mut base = RuleSet::new();
    let mut overrides: Vec<RuleSet> = vec![RuleSet::new(); cx.breakpoints.len()];
    let mut custom = Vec::new();

    for entry in resolved.iter().filter(|r| r.visible) {
        let key = entry.field.key();
        diagnostics.warn_all(
            key,
            entry
                .field
                .unknown_placeholders()
                .iter()
                .map(|name| WarningKind::UnknownPlaceholder(name.clone())),
        );

        if matches!(entry.field.kind(), FieldKind::CustomCss) {
            custom.extend(custom_fragments(entry, cx, &mut diagnostics));
            continue;
        }

        let mut warnings = Vec::new();
        if entry.values.len() <= 1 {
            base.extend(expand_field(entry.field, entry.base(), cx.wrapper, &mut warnings));
        } else {
            let layers: Vec<Layer<'_>> = cx
                .breakpoints
                .iter()
                .zip(&entry.values)
                .map(|(breakpoint, value)| Layer {
                    breakpoint,
                    value,
                    declarations: expand_field(entry.field, value, cx.wrapper, &mut warnings),
                })
                .collect();
            let expansion = responsive::expand(layers);
            base.extend(expansion.base);
            for o in expansion.overrides {
                match cx.breakpoints.index_of(&o.breakpoint) {
                    Some(index) => overrides[index].extend(o.declarations),
                    None => log::warn!("override for unknown breakpoint `{}`", o.breakpoint),
                }
            }
        }

        // The same problem repeats once per breakpoint; report it once.
        let mut unique: Vec<WarningKind> = Vec::with_capacity(warnings.len());
        for warning in warnings {
            if !unique.contains(&warning) {
                unique.push(warning);
            }
        }
        diagnostics.warn_all(key, unique);
    }

    let mut fragments = vec![GeneratedFragment {
        origin: FragmentOrigin::Base,
        rank: 0,
        block: Block::Rules(base),
    }];
    for (index, rules) in overrides.into_iter().enumerate() {
        let Some(breakpoint) = cx.breakpoints.get(index) else {
            continue;
        };
        let Some(max) = breakpoint.max else {
            continue;
        };
        if rules.is_empty() {
            continue;
        }
        fragments.push(GeneratedFragment {
            origin: FragmentOrigin::Responsive {
                breakpoint: breakpoint.name.clone(),
            },
            rank: index,
            block: Block::max_width(max, rules),
        });
    }
    fragments.extend(custom);

    log::trace!(
        "{}: assembled {} fragment(s), {} error(s), {} warning(s)",
        schema.block_type(),
        fragments.len(),
        diagnostics.errors.len(),
        diagnostics.warnings.len()
    );
    Stylesheet {
        fragments,
        diagnostics,
    }
}

fn custom_fragments(
    entry: &ResolvedField<'_>,
    cx: &AssemblyContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<GeneratedFragment> {
    let key = entry.field.key();
    let ResolvedValue::CustomCss(source) = entry.base() else {
        return Vec::new();
    };
    if source.trim().is_empty() {
        return Vec::new();
    }

    match sanitize(source, cx.wrapper, cx.policy) {
        Ok(sanitized) => {
            diagnostics.warn_all(key, sanitized.warnings);
            sanitized
                .blocks
                .into_iter()
                .map(|block| GeneratedFragment {
                    origin: FragmentOrigin::Custom {
                        field: key.to_string(),
                    },
                    rank: cx.breakpoints.len(),
                    block,
                })
                .collect()
        }
        Err(reason) => {
            log::warn!("{key}: custom CSS skipped: {reason}");
            diagnostics.error(key, None, FieldErrorKind::MalformedCustomCss(reason));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcss::schema::{CompositeKind, Condition, FieldDescriptor, SchemaRegistry};
    use serde_json::json;

    fn registry(fields: Vec<FieldDescriptor>) -> SchemaRegistry {
        let mut builder = SchemaRegistry::builder();
        builder.register("card", fields).unwrap();
        builder.build()
    }

    fn run(registry: &SchemaRegistry, settings: serde_json::Value) -> Stylesheet {
        let breakpoints = Breakpoints::default();
        let cx = AssemblyContext {
            breakpoints: &breakpoints,
            wrapper: ".b1",
            policy: SanitizePolicy::default(),
        };
        let settings = settings.as_object().cloned().unwrap_or_default();
        assemble(registry.lookup("card").unwrap(), &settings, &cx)
    }

    #[test]
    fn base_then_overrides_then_custom() {
        let registry = registry(vec![
            FieldDescriptor::number("size")
                .unit("px")
                .responsive()
                .selector("{{WRAPPER}} { font-size: {{VALUE}}{{UNIT}}; }"),
            FieldDescriptor::custom_css("css"),
        ]);
        let sheet = run(
            &registry,
            json!({"size": {"wide": 24, "medium": 18}, "css": "a { color: red }"}),
        );
        let origins: Vec<&FragmentOrigin> = sheet.fragments.iter().map(|f| &f.origin).collect();
        assert_eq!(
            origins,
            vec![
                &FragmentOrigin::Base,
                &FragmentOrigin::Responsive {
                    breakpoint: "medium".into()
                },
                &FragmentOrigin::Custom { field: "css".into() },
            ]
        );
        assert_eq!(
            sheet.render(OutputStyle::Compact),
            ".b1{font-size:24px}@media(max-width:1023px){.b1{font-size:18px}}.b1 a{color:red}"
        );
    }

    #[test]
    fn hidden_fields_emit_nothing() {
        let registry = registry(vec![
            FieldDescriptor::toggle("show_border").default_value(json!(false)),
            FieldDescriptor::composite("border", CompositeKind::Border)
                .selector("{{WRAPPER}}")
                .condition(Condition::truthy("show_border")),
        ]);
        let sheet = run(
            &registry,
            json!({"border": {"width": 2, "unit": "px", "style": "solid", "color": "#000"}}),
        );
        assert_eq!(sheet.render(OutputStyle::Compact), "");
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn malformed_custom_css_is_an_error() {
        let registry = registry(vec![
            FieldDescriptor::text("color").property("color").selector("{{WRAPPER}}"),
            FieldDescriptor::custom_css("css"),
        ]);
        let sheet = run(&registry, json!({"color": "red", "css": "a { color: red"}));
        assert_eq!(sheet.render(OutputStyle::Compact), ".b1{color:red}");
        assert!(matches!(
            sheet.diagnostics.errors[0].kind,
            FieldErrorKind::MalformedCustomCss(_)
        ));
    }

    #[test]
    fn repeated_generator_warnings_are_reported_once() {
        let registry = registry(vec![
            FieldDescriptor::composite("bg", CompositeKind::Background)
                .responsive()
                .selector("{{WRAPPER}}"),
        ]);
        let sheet = run(&registry, json!({"bg": {"type": "video"}}));
        assert_eq!(sheet.diagnostics.warnings.len(), 1);
    }

    #[test]
    fn unknown_placeholders_are_reported() {
        let registry = registry(vec![
            FieldDescriptor::text("color").selector("{{WRAPPER}} {{TAG}} { color: {{VALUE}}; }"),
        ]);
        let sheet = run(&registry, json!({"color": "red"}));
        assert_eq!(
            sheet.diagnostics.warnings[0].kind,
            WarningKind::UnknownPlaceholder("TAG".into())
        );
    }
}
