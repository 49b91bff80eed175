//! Error and diagnostic types for field resolution and CSS lowering.
//!
//! Two families live here:
//!
//! - [`FieldCssError`]: fatal failures. Schema registration problems, unknown
//!   block types and broken configuration abort the operation.
//! - [`FieldError`] and [`Warning`]: recoverable diagnostics. They are
//!   collected into [`Diagnostics`] while a stylesheet is generated and
//!   returned next to the CSS text, so a caller always gets usable output.

use thiserror::Error;

/// Fatal errors raised while registering schemas or generating CSS.
///
/// # Examples
///
/// ```rust
/// use fieldcss::schema::SchemaRegistry;
/// use fieldcss::FieldCssError;
///
/// let registry = SchemaRegistry::builder().build();
/// let result = registry.lookup("heading");
/// assert!(matches!(result, Err(FieldCssError::SchemaNotFound(_))));
/// ```
#[derive(Error, Debug)]
pub enum FieldCssError {
    /// No schema was registered for the requested block type.
    #[error("no field schema registered for block type `{0}`")]
    SchemaNotFound(String),

    /// A schema for this block type was already registered.
    #[error("field schema for block type `{0}` is already registered")]
    DuplicateSchema(String),

    /// A field descriptor failed registration checks.
    #[error("invalid field `{field}` in schema `{block_type}`: {reason}")]
    InvalidSchema {
        block_type: String,
        field: String,
        reason: String,
    },

    /// A selector template could not be parsed.
    #[error("invalid selector template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Breakpoint or engine configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A JSON document (schema or configuration) could not be decoded.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred while reading a schema or configuration file.
    #[error("I/O error reading schema or configuration")]
    Io(#[from] std::io::Error),

    /// An internal invariant did not hold.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The recoverable failure attached to a [`FieldError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// The supplied value did not satisfy the field's constraints. The field
    /// fell back to its default.
    #[error("invalid value: {0}")]
    Validation(String),

    /// The field's visibility condition could not be evaluated and was
    /// treated as false.
    #[error("condition could not be evaluated: {0}")]
    ConditionEvaluation(String),

    /// A custom CSS block could not be tokenized and was skipped entirely.
    #[error("malformed custom CSS: {0}")]
    MalformedCustomCss(#[from] SanitizeError),
}

/// Why custom CSS text could not be tokenized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("unbalanced braces")]
    UnbalancedBraces,

    /// Text after the last complete item that never reaches `{` or `;`.
    #[error("unexpected end of input after `{0}`")]
    UnexpectedEnd(String),

    #[error("`{0}` is not a declaration")]
    NotADeclaration(String),

    #[error("`{0}` has no value")]
    MissingValue(String),
}

/// A field-scoped recoverable error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field `{field}`{}: {kind}", breakpoint_suffix(.breakpoint.as_deref()))]
pub struct FieldError {
    pub field: String,
    pub breakpoint: Option<String>,
    pub kind: FieldErrorKind,
}

fn breakpoint_suffix(breakpoint: Option<&str>) -> String {
    breakpoint
        .map(|b| format!(" at breakpoint `{b}`"))
        .unwrap_or_default()
}

/// What a [`Warning`] is about.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A custom CSS rule was dropped by the sanitizer.
    #[error("custom CSS rule `{selector}` dropped: {reason}")]
    SanitizerRejection { selector: String, reason: String },

    /// An at-rule passed through the sanitizer unscoped.
    #[error("at-rule `{0}` kept without scoping")]
    AtRuleAllowed(String),

    /// A composite value carried a discriminant the generator does not know.
    #[error("unrecognized `{name}` value `{value}`")]
    UnknownDiscriminant { name: String, value: String },

    /// A selector template used a placeholder that is not recognized.
    #[error("unknown placeholder `{{{{{0}}}}}` left verbatim")]
    UnknownPlaceholder(String),

    /// A gradient had fewer than two color stops.
    #[error("gradient needs at least two color stops, found {0}")]
    IncompleteGradient(usize),
}

/// A field-scoped warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field `{field}`: {kind}")]
pub struct Warning {
    pub field: String,
    pub kind: WarningKind,
}

/// Collector for recoverable errors and warnings produced during generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: Vec<FieldError>,
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field error, optionally scoped to a breakpoint.
    pub fn error(&mut self, field: &str, breakpoint: Option<&str>, kind: FieldErrorKind) {
        log::trace!("field error on `{}`: {}", field, kind);
        self.errors.push(FieldError {
            field: field.to_string(),
            breakpoint: breakpoint.map(str::to_string),
            kind,
        });
    }

    /// Records a warning for a field.
    pub fn warn(&mut self, field: &str, kind: WarningKind) {
        self.warnings.push(Warning {
            field: field.to_string(),
            kind,
        });
    }

    /// Records a batch of warnings for the same field.
    pub fn warn_all(&mut self, field: &str, kinds: impl IntoIterator<Item = WarningKind>) {
        for kind in kinds {
            self.warn(field, kind);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_display_includes_breakpoint() {
        let err = FieldError {
            field: "fontSize".into(),
            breakpoint: Some("narrow".into()),
            kind: FieldErrorKind::Validation("24 is above the maximum 20".into()),
        };
        assert_eq!(
            err.to_string(),
            "field `fontSize` at breakpoint `narrow`: invalid value: 24 is above the maximum 20"
        );
    }

    #[test]
    fn unknown_placeholder_display_keeps_braces() {
        let kind = WarningKind::UnknownPlaceholder("SIZE".into());
        assert_eq!(kind.to_string(), "unknown placeholder `{{SIZE}}` left verbatim");
    }
}
