//! Selector templates.
//!
//! A field declares how its value reaches the stylesheet through one or more
//! selector templates:
//!
//! ```text
//! {{WRAPPER}} .title { font-size: {{VALUE}}{{UNIT}}; }
//! {{WRAPPER}}:hover
//! ```
//!
//! The first form carries its own declaration body. The second is a bare
//! selector: the declarations come from the field's composite generator (or
//! its `property` for scalar fields).
//!
//! ## Placeholders
//!
//! | Placeholder       | Expands to                                        |
//! |-------------------|---------------------------------------------------|
//! | `{{WRAPPER}}`     | the block's scoping selector, e.g. `.block-42`    |
//! | `{{VALUE}}`       | the resolved value                                |
//! | `{{UNIT}}`        | the value's unit (empty for text)                 |
//! | `{{VALUE.TOP}}`   | a spacing side, without unit (also `RIGHT`, ...)  |
//!
//! Templates are parsed once at registration into literal and slot tokens.
//! Expansion walks the tokens, so substituted text is never re-scanned for
//! placeholders. Unknown placeholders are kept as [`Token::Unknown`] and
//! written back verbatim.

use crate::FieldCssError;
use crate::types::declaration::Property;
use crate::parser::values::parse_property_name;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt},
    multi::{many0, many1},
    sequence::{delimited, preceded, tuple},
};
use phf::phf_map;

/// A recognized placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Wrapper,
    Value,
    Unit,
    ValueTop,
    ValueRight,
    ValueBottom,
    ValueLeft,
}

impl Slot {
    /// Side placeholders only make sense for four-sided values.
    pub fn is_side(self) -> bool {
        matches!(
            self,
            Self::ValueTop | Self::ValueRight | Self::ValueBottom | Self::ValueLeft
        )
    }
}

static SLOTS: phf::Map<&'static str, Slot> = phf_map! {
    "WRAPPER" => Slot::Wrapper,
    "VALUE" => Slot::Value,
    "UNIT" => Slot::Unit,
    "VALUE.TOP" => Slot::ValueTop,
    "VALUE.RIGHT" => Slot::ValueRight,
    "VALUE.BOTTOM" => Slot::ValueBottom,
    "VALUE.LEFT" => Slot::ValueLeft,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Slot(Slot),
    /// A `{{NAME}}` placeholder that is not recognized. Expanded verbatim.
    Unknown(String),
}

/// A sequence of literal and placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateText {
    pub tokens: Vec<Token>,
}

/// Concrete values for the placeholders of one expansion.
#[derive(Debug, Clone, Default)]
pub struct SlotValues<'a> {
    pub wrapper: &'a str,
    pub value: &'a str,
    pub unit: &'a str,
    /// Side values in CSS order (top, right, bottom, left), unit-less.
    pub sides: Option<&'a [String; 4]>,
}

impl SlotValues<'_> {
    fn get(&self, slot: Slot) -> &str {
        let side = |i: usize| self.sides.map_or("", |s| s[i].as_str());
        match slot {
            Slot::Wrapper => self.wrapper,
            Slot::Value => self.value,
            Slot::Unit => self.unit,
            Slot::ValueTop => side(0),
            Slot::ValueRight => side(1),
            Slot::ValueBottom => side(2),
            Slot::ValueLeft => side(3),
        }
    }
}

impl TemplateText {
    /// Substitutes every slot in a single left-to-right pass.
    pub fn expand(&self, values: &SlotValues<'_>) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Slot(slot) => out.push_str(values.get(*slot)),
                Token::Unknown(name) => {
                    out.push_str("{{");
                    out.push_str(name);
                    out.push_str("}}");
                }
            }
        }
        out
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Slot(s) => Some(*s),
            _ => None,
        })
    }

    pub fn unknown(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Unknown(name) => Some(name.as_str()),
            _ => None,
        })
    }

    fn trim(mut self) -> Self {
        if let Some(Token::Literal(first)) = self.tokens.first_mut() {
            *first = first.trim_start().to_string();
        }
        if let Some(Token::Literal(last)) = self.tokens.last_mut() {
            *last = last.trim_end().to_string();
        }
        self.tokens
            .retain(|t| !matches!(t, Token::Literal(text) if text.is_empty()));
        self
    }
}

/// One `property: value` entry inside a template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDeclaration {
    pub property: String,
    pub value: TemplateText,
}

/// A parsed selector template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTemplate {
    pub source: String,
    pub selector: TemplateText,
    /// The declaration body; `None` for a bare selector template.
    pub body: Option<Vec<TemplateDeclaration>>,
}

/// The result of expanding one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedRule {
    pub selector: String,
    pub properties: Vec<Property>,
}

impl SelectorTemplate {
    /// Parses a template source string.
    pub fn parse(source: &str) -> Result<Self, FieldCssError> {
        let invalid = |reason: &str| FieldCssError::InvalidTemplate {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let (rest, selector) =
            parse_selector_text(source).map_err(|_| invalid("missing selector"))?;
        let selector = selector.trim();
        if selector.tokens.is_empty() {
            return Err(invalid("missing selector"));
        }

        let rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(Self {
                source: source.to_string(),
                selector,
                body: None,
            });
        }

        let (rest, body) = parse_body(rest).map_err(|_| invalid("malformed declaration body"))?;
        if !rest.trim().is_empty() {
            return Err(invalid("unexpected text after declaration body"));
        }

        Ok(Self {
            source: source.to_string(),
            selector,
            body: Some(body),
        })
    }

    /// Every slot used anywhere in the template.
    pub fn slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self.selector.slots().collect();
        for decl in self.body.iter().flatten() {
            slots.extend(decl.value.slots());
        }
        slots
    }

    /// Names of unknown placeholders, in order of appearance.
    pub fn unknown_placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = self.selector.unknown().map(str::to_string).collect();
        for decl in self.body.iter().flatten() {
            names.extend(decl.value.unknown().map(str::to_string));
        }
        names
    }

    /// Expands the template. `generated` supplies the declarations of a
    /// bare selector template.
    pub fn expand(&self, values: &SlotValues<'_>, generated: &[Property]) -> ExpandedRule {
        let selector = self.selector.expand(values);
        let properties = match &self.body {
            None => generated.to_vec(),
            Some(body) => body
                .iter()
                .map(|decl| Property::new(decl.property.clone(), decl.value.expand(values)))
                .filter(|p| !p.value.trim().is_empty())
                .collect(),
        };
        ExpandedRule {
            selector,
            properties,
        }
    }
}

/// Parses a `{{NAME}}` placeholder.
fn parse_placeholder(input: &str) -> IResult<&str, Token> {
    map(
        delimited(tag("{{"), take_until("}}"), tag("}}")),
        |name: &str| {
            let name = name.trim();
            SLOTS
                .get(name)
                .map_or_else(|| Token::Unknown(name.to_string()), |slot| Token::Slot(*slot))
        },
    )(input)
}

/// Selector text runs until the opening brace of the body.
fn parse_selector_text(input: &str) -> IResult<&str, TemplateText> {
    map(
        many1(alt((
            parse_placeholder,
            map(take_while1(|c: char| c != '{' && c != '}'), |s: &str| {
                Token::Literal(s.to_string())
            }),
        ))),
        |tokens| TemplateText { tokens },
    )(input)
}

/// A declaration value runs until `;` or the closing brace.
fn parse_value_text(input: &str) -> IResult<&str, TemplateText> {
    map(
        many1(alt((
            parse_placeholder,
            map(take_while1(|c: char| !matches!(c, '{' | '}' | ';')), |s: &str| {
                Token::Literal(s.to_string())
            }),
        ))),
        |tokens| TemplateText { tokens }.trim(),
    )(input)
}

fn parse_template_declaration(input: &str) -> IResult<&str, TemplateDeclaration> {
    let (input, (_, property, _, _, _, value, _, _)) = tuple((
        multispace0,
        parse_property_name,
        multispace0,
        char(':'),
        multispace0,
        parse_value_text,
        multispace0,
        opt(char(';')),
    ))(input)?;
    Ok((
        input,
        TemplateDeclaration {
            property: property.to_ascii_lowercase(),
            value,
        },
    ))
}

fn parse_body(input: &str) -> IResult<&str, Vec<TemplateDeclaration>> {
    delimited(
        char('{'),
        many0(parse_template_declaration),
        preceded(multispace0, char('}')),
    )(input)
}
