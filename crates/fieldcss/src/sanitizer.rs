//! Sanitizing and scoping of user-supplied CSS.
//!
//! Custom CSS is the one place where free text reaches the stylesheet, so it
//! passes through a fixed pipeline:
//!
//! 1. **rewrite**: `{{WRAPPER}}` becomes the block's scoping class
//! 2. **tokenize**: comments are stripped and the text is split into
//!    top-level rules by matching braces (see [`crate::parser::custom`])
//! 3. **validate**: each rule is checked against the selector, property and
//!    value blocklists; failing rules are dropped with a warning
//! 4. **scope**: selectors are prefixed with the scoping class unless their
//!    first compound already starts with it and the rest hangs below it
//!    (`.block-1 p`, `.block-1 > p`). `.block-1 ~ p` or `:not(.block-1) p`
//!    would reach outside the block, so they are prefixed too
//!
//! Input that cannot be tokenized at all (unbalanced braces, an unterminated
//! comment) is rejected as a whole.
//!
//! ```rust
//! use fieldcss::emit::CssWriter;
//! use fieldcss::sanitizer::{sanitize, SanitizePolicy};
//!
//! let css = sanitize("p{color:red}", ".block-xyz", SanitizePolicy::default()).unwrap();
//! assert_eq!(CssWriter::default().write(&css.blocks), ".block-xyz p{color:red}");
//! ```

use crate::emit::{Block, Rule, RuleSet, minify};
use crate::error::{SanitizeError, WarningKind};
use crate::parser::custom::{RawItem, has_nested_block, parse_declarations, strip_comments, tokenize};
use crate::parser::units::parse_number;
use crate::parser::values::split_top_level;
use bitflags::bitflags;
use nom::{
    character::complete::char,
    combinator::all_consuming,
    sequence::terminated,
};
use phf::phf_set;

bitflags! {
    /// What the sanitizer lets through.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct SanitizePolicy: u8 {
        /// Prefix unscoped selectors with the scoping class. Without it,
        /// unscoped rules are rejected.
        const AUTO_SCOPE = 0b0000_0001;
        /// Keep `@keyframes` blocks (unscoped, with a warning).
        const ALLOW_KEYFRAMES = 0b0000_0010;
        /// Keep `@media` and `@supports` blocks, scoping their rules.
        const ALLOW_MEDIA = 0b0000_0100;
    }
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self::all()
    }
}

static BLOCKED_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "behavior", "-moz-binding",
};

static BLOCKED_TYPES: phf::Set<&'static str> = phf_set! {
    "html", "body",
};

/// Matched against values with whitespace, backslashes and quotes removed
/// and ASCII letters lower-cased.
const BLOCKED_VALUE_PATTERNS: [&str; 8] = [
    "javascript:",
    "vbscript:",
    "expression(",
    "data:text/html",
    "data:text/javascript",
    "data:application/javascript",
    "data:application/x-javascript",
    "data:image/svg+xml",
];

/// The accepted part of a custom CSS input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedCss {
    pub blocks: Vec<Block>,
    pub warnings: Vec<WarningKind>,
}

impl SanitizedCss {
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_empty)
    }

    fn reject(&mut self, selector: &str, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("custom CSS rule `{}` rejected: {}", selector, reason);
        self.warnings.push(WarningKind::SanitizerRejection {
            selector: selector.to_string(),
            reason,
        });
    }

    /// Appends a rule to the trailing plain-rules block.
    fn push_rule(&mut self, rule: Rule) {
        if let Some(Block::Rules(rules)) = self.blocks.last_mut() {
            rules.push_rule(rule);
        } else {
            let mut rules = RuleSet::new();
            rules.push_rule(rule);
            self.blocks.push(Block::Rules(rules));
        }
    }
}

/// Sanitizes `source` and scopes it under `wrapper` (a class selector such
/// as `.block-42`).
///
/// Returns `Err` when the input is malformed as a whole.
pub fn sanitize(
    source: &str,
    wrapper: &str,
    policy: SanitizePolicy,
) -> Result<SanitizedCss, SanitizeError> {
    let rewritten = source.replace("{{WRAPPER}}", wrapper);
    let clean = strip_comments(&rewritten)?;
    let items = tokenize(&clean)?;

    let mut out = SanitizedCss::default();
    for item in items {
        match item {
            RawItem::Statement(statement) => {
                out.reject(statement, "statement at-rules are not allowed");
            }
            RawItem::Block { prelude, body } if prelude.starts_with('@') => {
                at_rule(&mut out, prelude, body, wrapper, policy);
            }
            RawItem::Block { prelude, body } => match style_rule(prelude, body, wrapper, policy) {
                Ok(Some(rule)) => out.push_rule(rule),
                Ok(None) => {}
                Err(reason) => out.reject(prelude, reason),
            },
        }
    }
    Ok(out)
}

fn at_rule(out: &mut SanitizedCss, prelude: &str, body: &str, wrapper: &str, policy: SanitizePolicy) {
    let name = prelude
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if let Err(reason) = check_value(prelude) {
        out.reject(prelude, reason);
        return;
    }

    match name.as_str() {
        "@keyframes" | "@-webkit-keyframes" if policy.contains(SanitizePolicy::ALLOW_KEYFRAMES) => {
            match keyframes(prelude, body) {
                Ok(body) => {
                    out.warnings.push(WarningKind::AtRuleAllowed(prelude.to_string()));
                    out.blocks.push(Block::Verbatim {
                        prelude: prelude.to_string(),
                        body,
                    });
                }
                Err(reason) => out.reject(prelude, reason),
            }
        }
        "@media" | "@supports" if policy.contains(SanitizePolicy::ALLOW_MEDIA) => {
            let items = match tokenize(body) {
                Ok(items) => items,
                Err(reason) => {
                    out.reject(prelude, reason.to_string());
                    return;
                }
            };
            let mut rules = RuleSet::new();
            for item in items {
                match item {
                    RawItem::Block { prelude: inner, body } if !inner.starts_with('@') => {
                        match style_rule(inner, body, wrapper, policy) {
                            Ok(Some(rule)) => rules.push_rule(rule),
                            Ok(None) => {}
                            Err(reason) => out.reject(inner, reason),
                        }
                    }
                    RawItem::Block { prelude: inner, .. } | RawItem::Statement(inner) => {
                        out.reject(inner, format!("not allowed inside {name}"));
                    }
                }
            }
            if !rules.is_empty() {
                out.blocks.push(Block::AtRule {
                    prelude: prelude.to_string(),
                    rules,
                });
            }
        }
        _ => out.reject(prelude, format!("{name} is not allowed")),
    }
}

/// Validates a keyframes block and returns its minified body.
fn keyframes(prelude: &str, body: &str) -> Result<String, String> {
    let mut words = prelude.split_whitespace().skip(1);
    let name = words.next().ok_or_else(|| "keyframes need a name".to_string())?;
    if words.next().is_some()
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!("`{name}` is not a valid animation name"));
    }
    for item in tokenize(body).map_err(|e| e.to_string())? {
        let RawItem::Block { prelude: step, body } = item else {
            return Err("keyframes may only contain steps".into());
        };
        check_keyframe_step(step)?;
        if has_nested_block(body) {
            return Err(format!("keyframe `{step}` contains nested blocks"));
        }
        for property in parse_declarations(body).map_err(|e| e.to_string())? {
            check_property(&property.name, &property.value)?;
        }
    }
    Ok(minify(body))
}

/// A step selector is a list of `from`, `to` or percentages in `0%..=100%`.
fn check_keyframe_step(step: &str) -> Result<(), String> {
    let valid = |offset: &str| {
        let offset = offset.trim();
        if offset.eq_ignore_ascii_case("from") || offset.eq_ignore_ascii_case("to") {
            return true;
        }
        let percent: nom::IResult<&str, f64> =
            all_consuming(terminated(parse_number, char('%')))(offset);
        matches!(percent, Ok((_, n)) if (0.0..=100.0).contains(&n))
    };
    if split_top_level(step, ',').into_iter().all(valid) {
        Ok(())
    } else {
        Err(format!("`{step}` is not a keyframe selector"))
    }
}

/// Validates and scopes one style rule. `Ok(None)` means the rule was
/// valid but empty.
fn style_rule(
    prelude: &str,
    body: &str,
    wrapper: &str,
    policy: SanitizePolicy,
) -> Result<Option<Rule>, String> {
    if has_nested_block(body) {
        return Err("nested rules are not supported".into());
    }
    let selector = scope_selector(prelude, wrapper, policy)?;

    let properties = parse_declarations(body).map_err(|e| e.to_string())?;
    for property in &properties {
        check_property(&property.name, &property.value)?;
    }
    if properties.is_empty() {
        return Ok(None);
    }
    Ok(Some(Rule {
        selector,
        properties,
    }))
}

/// Checks every selector of a comma-separated list and prefixes unscoped
/// ones with `wrapper`.
fn scope_selector(prelude: &str, wrapper: &str, policy: SanitizePolicy) -> Result<String, String> {
    if prelude.contains('<') || prelude.contains('@') {
        return Err("selector contains forbidden characters".into());
    }

    let mut scoped = Vec::new();
    for part in split_top_level(prelude, ',') {
        let part = part.split_whitespace().collect::<Vec<_>>().join(" ");
        if part.is_empty() {
            return Err("empty selector".into());
        }
        check_selector(&part)?;

        if is_scoped(&part, wrapper) {
            scoped.push(part);
        } else if policy.contains(SanitizePolicy::AUTO_SCOPE) {
            scoped.push(format!("{wrapper} {part}"));
        } else {
            return Err(format!("`{part}` is not scoped to {wrapper}"));
        }
    }
    Ok(scoped.join(", "))
}

/// Rejects the universal selector, `html`, `body` and `:root`.
fn check_selector(selector: &str) -> Result<(), String> {
    let compounds = selector
        .split(|c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~'))
        .filter(|c| !c.is_empty());
    for compound in compounds {
        if compound.starts_with('*') {
            return Err("the universal selector is not allowed".into());
        }
        if compound.to_ascii_lowercase().starts_with(":root") {
            return Err("`:root` is not allowed".into());
        }
        let type_part: String = compound
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect::<String>()
            .to_ascii_lowercase();
        if BLOCKED_TYPES.contains(type_part.as_str()) {
            return Err(format!("`{type_part}` selectors are not allowed"));
        }
    }
    Ok(())
}

/// True when the first compound of `selector` starts with `class` (so
/// `.block-12` does not count for `.block-1`) and is followed by nothing, a
/// descendant combinator or a child combinator.
fn is_scoped(selector: &str, class: &str) -> bool {
    let Some(rest) = selector.strip_prefix(class) else {
        return false;
    };
    if rest
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return false;
    }
    let after = rest[first_compound_len(rest)..].trim_start();
    !after.starts_with(['+', '~'])
}

/// Byte length of the leading compound selector, skipping over brackets,
/// parentheses and quoted strings.
fn first_compound_len(selector: &str) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in selector.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && (c.is_whitespace() || matches!(c, '>' | '+' | '~')) => {
                return i;
            }
            _ => {}
        }
    }
    selector.len()
}

fn check_property(name: &str, value: &str) -> Result<(), String> {
    if BLOCKED_PROPERTIES.contains(name) {
        return Err(format!("property `{name}` is not allowed"));
    }
    check_value(value)
}

fn check_value(value: &str) -> Result<(), String> {
    if value.contains('<') {
        return Err("`<` is not allowed".into());
    }
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\\' | '"' | '\''))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match BLOCKED_VALUE_PATTERNS
        .iter()
        .find(|pattern| normalized.contains(*pattern))
    {
        Some(pattern) => Err(format!("value contains `{pattern}`")),
        None => Ok(()),
    }
}
