//! Visibility conditions.
//!
//! A condition is a predicate over sibling field values. Fields whose
//! condition evaluates to false emit no CSS.
//!
//! ```json
//! { "op": "all", "conditions": [
//!     { "op": "equals", "field": "showBorder", "value": true },
//!     { "op": "greater_than", "field": "border.width", "value": 0 }
//! ] }
//! ```
//!
//! `field` is a dotted path: the first segment names a field, further
//! segments descend into its object value (`background.type`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    GreaterThan { field: String, value: f64 },
    LessThan { field: String, value: f64 },
    In { field: String, values: Vec<Value> },
    Truthy { field: String },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

/// Effective sibling values a condition is evaluated against.
#[derive(Debug, Clone, Default)]
pub struct ConditionScope {
    values: Map<String, Value>,
}

impl ConditionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    /// Looks up a dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl Condition {
    pub fn equals(field: &str, value: Value) -> Self {
        Self::Equals {
            field: field.to_string(),
            value,
        }
    }

    pub fn greater_than(field: &str, value: f64) -> Self {
        Self::GreaterThan {
            field: field.to_string(),
            value,
        }
    }

    pub fn truthy(field: &str) -> Self {
        Self::Truthy {
            field: field.to_string(),
        }
    }

    /// Root field keys this condition refers to.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::Equals { field, .. }
            | Self::NotEquals { field, .. }
            | Self::GreaterThan { field, .. }
            | Self::LessThan { field, .. }
            | Self::In { field, .. }
            | Self::Truthy { field } => vec![root_field(field)],
            Self::All { conditions } | Self::Any { conditions } => {
                conditions.iter().flat_map(Condition::fields).collect()
            }
            Self::Not { condition } => condition.fields(),
        }
    }

    /// Evaluates the condition. An `Err` describes why evaluation was not
    /// possible; callers treat that as false.
    pub fn evaluate(&self, scope: &ConditionScope) -> Result<bool, String> {
        let lookup = |field: &str| scope.get(field).unwrap_or(&Value::Null);
        match self {
            Self::Equals { field, value } => Ok(loosely_equal(lookup(field), value)),
            Self::NotEquals { field, value } => Ok(!loosely_equal(lookup(field), value)),
            Self::GreaterThan { field, value } => Ok(numeric(field, lookup(field))? > *value),
            Self::LessThan { field, value } => Ok(numeric(field, lookup(field))? < *value),
            Self::In { field, values } => {
                let actual = lookup(field);
                Ok(values.iter().any(|v| loosely_equal(actual, v)))
            }
            Self::Truthy { field } => Ok(truthy(lookup(field))),
            Self::All { conditions } => {
                for c in conditions {
                    if !c.evaluate(scope)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Any { conditions } => {
                for c in conditions {
                    if c.evaluate(scope)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not { condition } => Ok(!condition.evaluate(scope)?),
        }
    }
}

fn root_field(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

/// Equality that compares numbers by value (`24` equals `24.0`) and
/// numeric strings against numbers (`"24"` equals `24`).
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) if actual.is_number() || expected.is_number() => a == b,
        _ => actual == expected,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map.get("size").and_then(as_number),
        _ => None,
    }
}

fn numeric(field: &str, value: &Value) -> Result<f64, String> {
    as_number(value).ok_or_else(|| format!("`{field}` is not numeric (found `{value}`)"))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope() -> ConditionScope {
        let mut scope = ConditionScope::new();
        scope.insert("show", json!(true));
        scope.insert("size", json!(24));
        scope.insert("label", json!("hello"));
        scope.insert("background", json!({"type": "color", "color": "red"}));
        scope
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(Condition::equals("size", json!(24.0)).evaluate(&scope()), Ok(true));
        assert_eq!(Condition::greater_than("size", 0.0).evaluate(&scope()), Ok(true));
    }

    #[test]
    fn dotted_paths_reach_into_objects() {
        let cond = Condition::equals("background.type", json!("color"));
        assert_eq!(cond.evaluate(&scope()), Ok(true));
        assert_eq!(cond.fields(), vec!["background"]);
    }

    #[test]
    fn ordering_against_text_is_an_error() {
        assert!(Condition::greater_than("label", 1.0).evaluate(&scope()).is_err());
    }

    #[test]
    fn combinators_short_circuit() {
        let cond: Condition = serde_json::from_value(json!({
            "op": "any",
            "conditions": [
                {"op": "truthy", "field": "show"},
                {"op": "greater_than", "field": "label", "value": 1}
            ]
        }))
        .unwrap();
        assert_eq!(cond.evaluate(&scope()), Ok(true));

        let negated = Condition::Not {
            condition: Box::new(cond),
        };
        assert_eq!(negated.evaluate(&scope()), Ok(false));
    }

    #[test]
    fn missing_fields_are_null() {
        assert_eq!(Condition::truthy("nope").evaluate(&scope()), Ok(false));
    }
}
