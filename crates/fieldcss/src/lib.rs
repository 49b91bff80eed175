//! # fieldcss - field-driven CSS compiler
//!
//! Turns a declarative field schema plus a user's settings into scoped CSS
//! text for one content block. The pipeline is a small compiler:
//!
//! ```text
//! settings ──resolve──▶ resolved values ──lower──▶ declarations
//!          ──responsive──▶ base + breakpoint overrides ──emit──▶ CSS text
//! ```
//!
//! with user-written CSS passing through the [`sanitizer`] on the side.
//!
//! This crate holds the pure stages. Caching, configuration and assembly of
//! complete stylesheets live in the `blockstyle` runtime crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldcss::emit::{Block, CssWriter, RuleSet};
//! use fieldcss::error::Diagnostics;
//! use fieldcss::generate::expand_field;
//! use fieldcss::resolver::resolve;
//! use fieldcss::schema::{FieldDescriptor, SchemaRegistry};
//! use fieldcss::types::Breakpoints;
//! use serde_json::json;
//!
//! let mut builder = SchemaRegistry::builder();
//! builder
//!     .register(
//!         "heading",
//!         vec![FieldDescriptor::text("color")
//!             .selector("{{WRAPPER}} h2 { color: {{VALUE}}; }")
//!             .default_value(json!("#222"))],
//!     )
//!     .unwrap();
//! let registry = builder.build();
//! let schema = registry.lookup("heading").unwrap();
//!
//! let mut diag = Diagnostics::new();
//! let fields = resolve(schema, &Default::default(), &Breakpoints::default(), &mut diag);
//! let rules: RuleSet = expand_field(fields[0].field, fields[0].base(), ".block-1", &mut Vec::new())
//!     .into_iter()
//!     .collect();
//!
//! assert_eq!(CssWriter::default().write(&[Block::Rules(rules)]), ".block-1 h2{color:#222}");
//! ```
//!
//! ## Placeholders
//!
//! Selector templates understand `{{WRAPPER}}`, `{{VALUE}}`, `{{UNIT}}` and
//! `{{VALUE.TOP}}`, `{{VALUE.RIGHT}}`, `{{VALUE.BOTTOM}}`, `{{VALUE.LEFT}}`.
//! Anything else in double braces is kept verbatim.
//!
//! ## Modules
//!
//! - [`schema`]: field descriptors, conditions and the registry
//! - [`resolver`]: settings validation, defaults and visibility
//! - [`generate`]: composite generators and template expansion
//! - [`responsive`]: base rule and breakpoint overrides
//! - [`sanitizer`]: custom CSS validation and scoping
//! - [`emit`]: rule grouping, compact/expanded output and minification
//! - [`parser`]: templates, lengths and the custom CSS tokenizer
//! - [`types`]: normalized value types
//! - [`error`]: fatal errors and recoverable diagnostics

pub mod emit;
pub mod error;
pub mod generate;
pub mod parser;
pub mod resolver;
pub mod responsive;
pub mod sanitizer;
pub mod schema;
pub mod settings;
pub mod types;

pub use error::{
    Diagnostics, FieldCssError, FieldError, FieldErrorKind, SanitizeError, Warning, WarningKind,
};
pub use schema::{FieldDescriptor, SchemaRegistry};
pub use settings::SettingsTree;
