//! CSS text emission.
//!
//! Declarations are grouped into [`RuleSet`]s, rule sets into [`Block`]s,
//! and a [`CssWriter`] renders blocks in one of two styles:
//!
//! ```text
//! compact:   .b1{font-size:24px}@media(max-width:1023px){.b1{font-size:20px}}
//!
//! expanded:  .b1 {
//!              font-size: 24px;
//!            }
//!            @media (max-width: 1023px) {
//!              .b1 {
//!                font-size: 20px;
//!              }
//!            }
//! ```

use crate::types::{Declaration, Property};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Compact,
    Expanded,
}

/// A selector with its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub properties: Vec<Property>,
}

/// An ordered list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration to the rule for its selector, creating the rule
    /// on first use. A property already present in that rule is replaced in
    /// place, so the later value wins.
    pub fn push(&mut self, declaration: Declaration) {
        let Declaration {
            selector,
            name,
            value,
        } = declaration;
        match self.rules.iter_mut().find(|r| r.selector == selector) {
            Some(rule) => match rule.properties.iter_mut().find(|p| p.name == name) {
                Some(existing) => existing.value = value,
                None => rule.properties.push(Property { name, value }),
            },
            None => self.rules.push(Rule {
                selector,
                properties: vec![Property { name, value }],
            }),
        }
    }

    /// Appends a rule without merging it into existing ones.
    pub fn push_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.iter().all(|r| r.properties.is_empty())
    }
}

impl Extend<Declaration> for RuleSet {
    fn extend<T: IntoIterator<Item = Declaration>>(&mut self, iter: T) {
        for declaration in iter {
            self.push(declaration);
        }
    }
}

impl FromIterator<Declaration> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Declaration>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// A top-level stylesheet segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Rules(RuleSet),
    /// A conditional group rule (`@media`, `@supports`) around rules.
    AtRule { prelude: String, rules: RuleSet },
    /// An at-rule whose body is kept as minified text (`@keyframes`).
    Verbatim { prelude: String, body: String },
}

impl Block {
    pub fn max_width(max: u32, rules: RuleSet) -> Self {
        Self::AtRule {
            prelude: format!("@media (max-width: {max}px)"),
            rules,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Rules(rules) | Self::AtRule { rules, .. } => rules.is_empty(),
            Self::Verbatim { .. } => false,
        }
    }
}

/// Renders blocks to CSS text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssWriter {
    style: OutputStyle,
}

impl CssWriter {
    pub fn new(style: OutputStyle) -> Self {
        Self { style }
    }

    pub fn write(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks.iter().filter(|b| !b.is_empty()) {
            self.write_block(&mut out, block);
        }
        out
    }

    fn write_block(&self, out: &mut String, block: &Block) {
        match (self.style, block) {
            (_, Block::Rules(rules)) => self.write_rules(out, rules, 0),
            (OutputStyle::Compact, Block::AtRule { prelude, rules }) => {
                out.push_str(&minify_prelude(prelude));
                out.push('{');
                self.write_rules(out, rules, 0);
                out.push('}');
            }
            (OutputStyle::Expanded, Block::AtRule { prelude, rules }) => {
                out.push_str(prelude.trim());
                out.push_str(" {\n");
                self.write_rules(out, rules, 1);
                out.push_str("}\n");
            }
            (OutputStyle::Compact, Block::Verbatim { prelude, body }) => {
                out.push_str(&minify_prelude(prelude));
                out.push('{');
                out.push_str(body);
                out.push('}');
            }
            (OutputStyle::Expanded, Block::Verbatim { prelude, body }) => {
                out.push_str(prelude.trim());
                out.push_str(" {\n  ");
                out.push_str(body);
                out.push_str("\n}\n");
            }
        }
    }

    fn write_rules(&self, out: &mut String, rules: &RuleSet, depth: usize) {
        let indent = "  ".repeat(depth);
        for rule in rules.rules().iter().filter(|r| !r.properties.is_empty()) {
            match self.style {
                OutputStyle::Compact => {
                    out.push_str(&minify(&rule.selector));
                    out.push('{');
                    for (i, p) in rule.properties.iter().enumerate() {
                        if i > 0 {
                            out.push(';');
                        }
                        out.push_str(&p.name);
                        out.push(':');
                        out.push_str(p.value.trim());
                    }
                    out.push('}');
                }
                OutputStyle::Expanded => {
                    out.push_str(&indent);
                    out.push_str(rule.selector.trim());
                    out.push_str(" {\n");
                    for p in &rule.properties {
                        out.push_str(&indent);
                        out.push_str("  ");
                        out.push_str(&p.name);
                        out.push_str(": ");
                        out.push_str(p.value.trim());
                        out.push_str(";\n");
                    }
                    out.push_str(&indent);
                    out.push_str("}\n");
                }
            }
        }
    }
}

/// Minifies CSS text: strips comments, collapses whitespace, removes
/// whitespace around `{`, `}`, `;`, `,` and after `:`, and drops the last
/// `;` before `}`. Whitespace before `:` is kept since it is significant in
/// selectors (`a :hover`). Quoted strings are copied unchanged.
///
/// ```rust
/// use fieldcss::emit::minify;
///
/// assert_eq!(minify("from { opacity: 0; }  /* x */ to{opacity:1}"), "from{opacity:0}to{opacity:1}");
/// ```
pub fn minify(text: &str) -> String {
    const TIGHT: [char; 4] = ['{', '}', ';', ','];

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut previous = '\0';
            for inner in chars.by_ref() {
                if previous == '*' && inner == '/' {
                    break;
                }
                previous = inner;
            }
            pending_space = true;
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space {
            let after_tight = out
                .chars()
                .last()
                .is_none_or(|last| TIGHT.contains(&last) || last == ':');
            if !after_tight && !TIGHT.contains(&c) {
                out.push(' ');
            }
            pending_space = false;
        }
        if c == '}' && out.ends_with(';') {
            out.pop();
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

/// Minifies an at-rule prelude and joins the at-keyword to a directly
/// following parenthesis: `@media (max-width: 767px)` becomes
/// `@media(max-width:767px)`.
fn minify_prelude(prelude: &str) -> String {
    let mut text = minify(prelude);
    if text.starts_with('@') {
        if let Some(space) = text.find(' ') {
            if text[space + 1..].starts_with('(') {
                text.remove(space);
            }
        }
    }
    text
}
