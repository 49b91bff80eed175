//! Four-sided box values used by spacing (margin/padding) and border-radius
//! fields.

use crate::parser::units::{lengths_from_str, number_from_str};
use crate::types::length::{Length, format_number};
use serde_json::Value;

/// A normalized four-sided value. Every side is present and all sides share
/// one unit, whatever shape the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub unit: String,
}

impl Default for BoxSides {
    fn default() -> Self {
        Self::all(0.0, "px")
    }
}

impl BoxSides {
    pub fn all(value: f64, unit: &str) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
            unit: unit.to_string(),
        }
    }

    pub fn vertical_horizontal(vertical: f64, horizontal: f64, unit: &str) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
            unit: unit.to_string(),
        }
    }

    /// Sides in CSS order: top, right, bottom, left.
    pub fn sides(&self) -> [f64; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Renders `"{top}{unit} {right}{unit} {bottom}{unit} {left}{unit}"`.
    pub fn shorthand(&self) -> String {
        self.sides()
            .iter()
            .map(|side| format!("{}{}", format_number(*side), self.unit))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalizes a settings value into four sides.
    ///
    /// Accepted shapes:
    /// - a number: all four sides
    /// - a shorthand string of one to four lengths (`"10px 20px"`)
    /// - an object with any of `top`, `right`, `bottom`, `left`, `unit`;
    ///   missing sides are `0`, a missing unit is `px`
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(|v| Self::all(v, "px"))
                .ok_or_else(|| format!("`{n}` is not a finite number")),
            Value::String(s) => Self::from_shorthand(s),
            Value::Object(map) => {
                let unit = match map.get("unit") {
                    Some(Value::String(u)) if !u.is_empty() => u.clone(),
                    Some(Value::String(_)) | Some(Value::Null) | None => "px".to_string(),
                    Some(other) => return Err(format!("`{other}` is not a unit")),
                };
                let side = |name: &str| -> Result<f64, String> {
                    match map.get(name) {
                        None | Some(Value::Null) => Ok(0.0),
                        Some(Value::String(s)) if s.trim().is_empty() => Ok(0.0),
                        Some(Value::Number(n)) => n
                            .as_f64()
                            .ok_or_else(|| format!("`{name}` is not a finite number")),
                        Some(Value::String(s)) => number_from_str(s)
                            .ok_or_else(|| format!("`{name}` value `{s}` is not a number")),
                        Some(other) => Err(format!("`{name}` value `{other}` is not a number")),
                    }
                };
                Ok(Self {
                    top: side("top")?,
                    right: side("right")?,
                    bottom: side("bottom")?,
                    left: side("left")?,
                    unit,
                })
            }
            other => Err(format!("expected a spacing value, found `{other}`")),
        }
    }

    /// Parses CSS shorthand with one to four values.
    fn from_shorthand(source: &str) -> Result<Self, String> {
        let lengths = lengths_from_str(source, "")
            .ok_or_else(|| format!("`{source}` is not a spacing shorthand"))?;

        let mut unit = String::new();
        let mut values = Vec::with_capacity(lengths.len());
        for length in &lengths {
            match length {
                Length::Dimension { value, unit: u } => {
                    if !u.is_empty() {
                        if !unit.is_empty() && unit != *u {
                            return Err(format!("`{source}` mixes units `{unit}` and `{u}`"));
                        }
                        unit = u.clone();
                    }
                    values.push(*value);
                }
                Length::Keyword(k) => {
                    return Err(format!("keyword `{k}` is not allowed in a spacing value"));
                }
            }
        }
        if unit.is_empty() {
            unit = "px".to_string();
        }

        match values.as_slice() {
            [all] => Ok(Self::all(*all, &unit)),
            [v, h] => Ok(Self::vertical_horizontal(*v, *h, &unit)),
            [top, h, bottom] => Ok(Self {
                top: *top,
                right: *h,
                bottom: *bottom,
                left: *h,
                unit,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
                unit,
            }),
            _ => Err(format!("`{source}` has more than four values")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shorthand_expands_to_four_sides() {
        let sides = BoxSides::from_json(&json!("10px 20px")).unwrap();
        assert_eq!(sides, BoxSides::vertical_horizontal(10.0, 20.0, "px"));
    }

    #[test]
    fn single_number_applies_to_all_sides() {
        let sides = BoxSides::from_json(&json!(8)).unwrap();
        assert_eq!(sides.shorthand(), "8px 8px 8px 8px");
    }

    #[test]
    fn partial_object_fills_missing_sides() {
        let sides = BoxSides::from_json(&json!({"top": "5", "unit": "em"})).unwrap();
        assert_eq!(sides.shorthand(), "5em 0em 0em 0em");
    }

    #[test]
    fn non_finite_sides_are_rejected() {
        for bad in [
            json!({"top": "inf", "left": "NaN"}),
            json!({"right": "1e400"}),
            json!({"bottom": "9".repeat(400)}),
        ] {
            assert!(BoxSides::from_json(&bad).is_err(), "{bad}");
        }
        assert!(BoxSides::from_json(&json!("infpx")).is_err());
    }

    #[test]
    fn mixed_units_are_rejected() {
        assert!(BoxSides::from_json(&json!("10px 2em")).is_err());
    }
}
