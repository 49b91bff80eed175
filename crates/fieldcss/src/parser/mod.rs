//! Parsing for selector templates, lengths and custom CSS.
//!
//! ## Submodules
//!
//! - [`template`]: selector templates with `{{PLACEHOLDER}}` slots
//! - [`units`]: numeric value and unit parsing
//! - [`custom`]: comment stripping and brace-balanced tokenizing of raw CSS
//! - [`values`]: identifiers and quote-aware splitting

pub mod custom;
pub mod template;
pub mod units;
pub mod values;

pub use crate::parser::template::{
    ExpandedRule, SelectorTemplate, Slot, SlotValues, TemplateDeclaration, TemplateText, Token,
};
