//! Settings resolution.
//!
//! Resolution merges a caller's [`SettingsTree`] with the schema:
//!
//! 1. every field gets one [`ResolvedValue`] per breakpoint it applies to
//!    (one for plain fields, one per configured breakpoint for responsive
//!    fields), falling back to the descriptor default when a value is
//!    absent or invalid
//! 2. visibility conditions are evaluated against the resolved values of
//!    all fields, hidden ones included
//! 3. fields are returned in emission order, group members right after
//!    their group
//!
//! Invalid values never abort resolution. They are recorded as
//! [`FieldErrorKind::Validation`] and replaced by the default.

use crate::error::{Diagnostics, FieldErrorKind};
use crate::schema::condition::ConditionScope;
use crate::schema::descriptor::{CompositeKind, Field, FieldKind};
use crate::schema::registry::Schema;
use crate::settings::SettingsTree;
use crate::types::{
    Background, Border, BoxSides, Breakpoints, FlexLayout, Length, ResolvedValue, Typography,
};
use crate::types::length::scalar_text;
use serde_json::{Map, Value};

/// Substrings that may not appear in a value written into CSS text.
/// Comment markers are here too: an opened comment swallows the rest of the
/// stylesheet.
const INJECTION_MARKERS: [&str; 5] = ["javascript:", "expression(", "@import", "/*", "*/"];
/// A backslash escapes whatever follows it, including the `}` that closes
/// the rule.
const INJECTION_CHARS: [char; 5] = ['{', '}', ';', '<', '\\'];

static EMPTY: ResolvedValue = ResolvedValue::Empty;

/// One field after resolution.
#[derive(Debug, Clone)]
pub struct ResolvedField<'s> {
    pub field: &'s Field,
    /// Values widest breakpoint first. Plain fields carry exactly one.
    pub values: Vec<ResolvedValue>,
    /// False when the field's condition (or its group's) does not hold.
    pub visible: bool,
}

impl ResolvedField<'_> {
    /// The value of the widest breakpoint, which forms the base rule.
    pub fn base(&self) -> &ResolvedValue {
        self.values.first().unwrap_or(&EMPTY)
    }
}

/// Resolves `settings` against `schema`.
pub fn resolve<'s>(
    schema: &'s Schema,
    settings: &SettingsTree,
    breakpoints: &Breakpoints,
    diag: &mut Diagnostics,
) -> Vec<ResolvedField<'s>> {
    for key in settings.keys() {
        if schema.field(key).is_none() {
            log::trace!("{}: ignoring unknown setting `{}`", schema.block_type(), key);
        }
    }

    let mut scope = ConditionScope::new();
    let mut resolved: Vec<Vec<ResolvedValue>> = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let raw = settings.get(field.key()).filter(|v| !v.is_null());
        let (values, scope_value) = if field.is_responsive() {
            resolve_responsive(field, raw, breakpoints, diag)
        } else {
            resolve_single(field, raw, diag)
        };
        log::trace!(
            "{}.{}: resolved {} value(s)",
            schema.block_type(),
            field.key(),
            values.len()
        );
        scope.insert(field.key(), scope_value);
        resolved.push(values);
    }

    // Hidden fields still sit in `scope`, so siblings can read them.
    let own_visible: Vec<bool> = schema
        .fields()
        .iter()
        .map(|field| match field.condition() {
            None => true,
            Some(condition) => match condition.evaluate(&scope) {
                Ok(visible) => visible,
                Err(reason) => {
                    diag.error(field.key(), None, FieldErrorKind::ConditionEvaluation(reason));
                    false
                }
            },
        })
        .collect();

    let mut resolved: Vec<Option<Vec<ResolvedValue>>> = resolved.into_iter().map(Some).collect();
    schema
        .emission_order()
        .iter()
        .map(|&index| {
            let field = &schema.fields()[index];
            let group_visible = field
                .group()
                .and_then(|group| schema.index_of(group))
                .is_none_or(|group| own_visible[group]);
            ResolvedField {
                field,
                values: resolved[index].take().unwrap_or_default(),
                visible: own_visible[index] && group_visible,
            }
        })
        .collect()
}

fn resolve_single(
    field: &Field,
    raw: Option<&Value>,
    diag: &mut Diagnostics,
) -> (Vec<ResolvedValue>, Value) {
    let default = &field.descriptor().default;
    if let Some(raw) = raw {
        match normalize(field.kind(), raw) {
            Ok(value) => return (vec![value], raw.clone()),
            Err(reason) => diag.error(field.key(), None, FieldErrorKind::Validation(reason)),
        }
    }
    (vec![normalize_or_empty(field.kind(), default)], default.clone())
}

fn resolve_responsive(
    field: &Field,
    raw: Option<&Value>,
    breakpoints: &Breakpoints,
    diag: &mut Diagnostics,
) -> (Vec<ResolvedValue>, Value) {
    let default = &field.descriptor().default;
    let default_map = breakpoint_map(default, breakpoints);
    let user_map = raw.and_then(|r| breakpoint_map(r, breakpoints));

    // A scalar applies to every breakpoint alike.
    if let (Some(raw), None) = (raw, user_map) {
        match normalize(field.kind(), raw) {
            Ok(value) => return (vec![value; breakpoints.len()], raw.clone()),
            Err(reason) => diag.error(field.key(), None, FieldErrorKind::Validation(reason)),
        }
    }

    let mut values: Vec<ResolvedValue> = Vec::with_capacity(breakpoints.len());
    let mut widest_json = Value::Null;
    let mut previous_json = Value::Null;
    for (i, bp) in breakpoints.iter().enumerate() {
        let user = user_map
            .and_then(|map| map.get(&bp.name))
            .filter(|v| !v.is_null());
        let accepted = match user.map(|v| (v, normalize(field.kind(), v))) {
            Some((json, Ok(value))) => Some((value, json.clone())),
            Some((_, Err(reason))) => {
                diag.error(field.key(), Some(&bp.name), FieldErrorKind::Validation(reason));
                None
            }
            None => None,
        };

        let (value, json) = match accepted {
            Some(found) => found,
            None => {
                let explicit = default_map
                    .and_then(|map| map.get(&bp.name))
                    .filter(|v| !v.is_null());
                match (explicit, values.last()) {
                    (Some(json), _) => (normalize_or_empty(field.kind(), json), json.clone()),
                    (None, Some(wider)) => (wider.clone(), previous_json.clone()),
                    (None, None) if default_map.is_some() => {
                        (normalize_or_empty(field.kind(), &Value::Null), Value::Null)
                    }
                    (None, None) => (normalize_or_empty(field.kind(), default), default.clone()),
                }
            }
        };

        if i == 0 {
            widest_json = json.clone();
        }
        previous_json = json;
        values.push(value);
    }
    (values, widest_json)
}

/// Returns the object when `value` is a per-breakpoint map: a non-empty
/// object whose keys all name configured breakpoints.
pub fn breakpoint_map<'v>(
    value: &'v Value,
    breakpoints: &Breakpoints,
) -> Option<&'v Map<String, Value>> {
    match value {
        Value::Object(map) if !map.is_empty() && map.keys().all(|k| breakpoints.contains(k)) => {
            Some(map)
        }
        _ => None,
    }
}

/// Defaults were validated at registration; a failure here means the
/// default is simply unusable, which resolves to nothing.
fn normalize_or_empty(kind: &FieldKind, value: &Value) -> ResolvedValue {
    normalize(kind, value).unwrap_or(ResolvedValue::Empty)
}

/// Validates a raw value against a field kind and normalizes its shape.
///
/// `null` resolves to [`ResolvedValue::Empty`] (or `false` for toggles).
pub fn normalize(kind: &FieldKind, value: &Value) -> Result<ResolvedValue, String> {
    if value.is_null() {
        return Ok(match kind {
            FieldKind::Toggle => ResolvedValue::Toggle(false),
            _ => ResolvedValue::Empty,
        });
    }
    if !matches!(kind, FieldKind::CustomCss) {
        check_injection(value)?;
    }

    match kind {
        FieldKind::Text => scalar_text(value)
            .map(ResolvedValue::Text)
            .ok_or_else(|| format!("expected text, found `{value}`")),
        FieldKind::Number {
            min,
            max,
            step,
            unit,
        } => normalize_number(value, *min, *max, *step, unit.as_deref().unwrap_or_default()),
        FieldKind::Choice { options } => {
            let text =
                scalar_text(value).ok_or_else(|| format!("expected a choice, found `{value}`"))?;
            if text.is_empty() {
                Ok(ResolvedValue::Empty)
            } else if options.iter().any(|o| *o == text) {
                Ok(ResolvedValue::Choice(text))
            } else {
                Err(format!("`{text}` is not one of {}", options.join(", ")))
            }
        }
        FieldKind::Toggle => normalize_toggle(value).map(ResolvedValue::Toggle),
        FieldKind::Composite { kind } => normalize_composite(*kind, value),
        FieldKind::CustomCss => match value {
            Value::String(s) => Ok(ResolvedValue::CustomCss(s.clone())),
            other => Err(format!("expected CSS text, found `{other}`")),
        },
    }
}

fn normalize_number(
    value: &Value,
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    default_unit: &str,
) -> Result<ResolvedValue, String> {
    let (number, unit) = match Length::from_json(value, default_unit)? {
        Length::Dimension { value, unit } => (value, unit),
        Length::Keyword(k) => return Err(format!("`{k}` is not a number")),
    };
    check_unit(&unit)?;
    if let Some(min) = min.filter(|min| number < *min) {
        return Err(format!("{number} is below the minimum {min}"));
    }
    if let Some(max) = max.filter(|max| number > *max) {
        return Err(format!("{number} is above the maximum {max}"));
    }
    if let Some(step) = step.filter(|s| *s > 0.0) {
        let steps = (number - min.unwrap_or(0.0)) / step;
        if (steps - steps.round()).abs() > 1e-6 {
            return Err(format!("{number} is not a multiple of the step {step}"));
        }
    }
    Ok(ResolvedValue::Number {
        value: number,
        unit,
    })
}

fn normalize_toggle(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_f64() == Some(1.0) => Ok(true),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(false),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" | "" => Ok(false),
            _ => Err(format!("`{s}` is not a toggle value")),
        },
        other => Err(format!("expected a toggle, found `{other}`")),
    }
}

fn normalize_composite(kind: CompositeKind, value: &Value) -> Result<ResolvedValue, String> {
    Ok(match kind {
        CompositeKind::Spacing => {
            let sides = BoxSides::from_json(value)?;
            check_unit(&sides.unit)?;
            ResolvedValue::Spacing(sides)
        }
        CompositeKind::BorderRadius => {
            let sides = BoxSides::from_json(value)?;
            check_unit(&sides.unit)?;
            ResolvedValue::BorderRadius(sides)
        }
        CompositeKind::Background => ResolvedValue::Background(Background::from_json(value)?),
        CompositeKind::Typography => ResolvedValue::Typography(Typography::from_json(value)?),
        CompositeKind::Border => {
            let border = Border::from_json(value)?;
            check_unit(&border.unit)?;
            ResolvedValue::Border(border)
        }
        CompositeKind::Flex => ResolvedValue::Flex(FlexLayout::from_json(value)?),
    })
}

fn check_unit(unit: &str) -> Result<(), String> {
    if unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
        Ok(())
    } else {
        Err(format!("`{unit}` is not a unit"))
    }
}

/// Rejects strings that could break out of a declaration value.
fn check_injection(value: &Value) -> Result<(), String> {
    match value {
        Value::String(s) => {
            if let Some(c) = s.chars().find(|c| INJECTION_CHARS.contains(c)) {
                return Err(format!("`{s}` contains `{c}`"));
            }
            let lowered = s.to_ascii_lowercase();
            if let Some(marker) = INJECTION_MARKERS.iter().find(|m| lowered.contains(*m)) {
                return Err(format!("`{s}` contains `{marker}`"));
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(check_injection),
        Value::Object(map) => map.values().try_for_each(check_injection),
        _ => Ok(()),
    }
}
