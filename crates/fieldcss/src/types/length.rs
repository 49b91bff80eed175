use crate::parser::units::length_from_str;
use serde_json::Value;
use std::fmt;

/// A CSS length or keyword as it appears in a declaration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Length {
    /// A number with a unit. The unit is empty for unitless numbers such as
    /// a `line-height` of `1.5`.
    Dimension { value: f64, unit: String },
    /// A keyword such as `auto`, `normal` or `inherit`.
    Keyword(String),
}

impl Length {
    pub fn dimension(value: f64, unit: &str) -> Self {
        Self::Dimension {
            value,
            unit: unit.to_string(),
        }
    }

    pub fn px(value: f64) -> Self {
        Self::dimension(value, "px")
    }

    /// Fills in `unit` when this is a dimension without one.
    pub fn with_default_unit(self, unit: &str) -> Self {
        match self {
            Self::Dimension { value, unit: u } if u.is_empty() => Self::dimension(value, unit),
            other => other,
        }
    }

    /// The numeric part, if this is a dimension.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Dimension { value, .. } => Some(*value),
            Self::Keyword(_) => None,
        }
    }

    /// Reads a length from a settings value.
    ///
    /// Accepts a JSON number (`24`), a string (`"24px"`, `"auto"`), or an
    /// object of the form `{ "size": 24, "unit": "px" }`. Numbers without a
    /// unit take `default_unit`.
    pub fn from_json(value: &Value, default_unit: &str) -> Result<Self, String> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(|v| Self::dimension(v, default_unit))
                .ok_or_else(|| format!("`{n}` is not a finite number")),
            Value::String(s) => {
                length_from_str(s, default_unit).ok_or_else(|| format!("`{s}` is not a length"))
            }
            Value::Object(map) => {
                let size = map
                    .get("size")
                    .ok_or_else(|| "length object is missing `size`".to_string())?;
                let unit = match map.get("unit") {
                    Some(Value::String(u)) => u.as_str(),
                    Some(Value::Null) | None => default_unit,
                    Some(other) => return Err(format!("`{other}` is not a unit")),
                };
                Self::from_json(size, unit)
            }
            other => Err(format!("expected a length, found `{other}`")),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension { value, unit } => write!(f, "{}{}", format_number(*value), unit),
            Self::Keyword(k) => f.write_str(k),
        }
    }
}

/// Formats a number the way it should appear in CSS: integral values drop
/// their fractional part (`10.0` becomes `10`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Reads a scalar settings value as CSS text. Strings pass through,
/// numbers are formatted with [`format_number`].
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(format_number),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_integral_values_without_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(Length::dimension(0.25, "rem").to_string(), "0.25rem");
    }

    #[test]
    fn reads_all_json_forms() {
        assert_eq!(Length::from_json(&json!(24), "px"), Ok(Length::px(24.0)));
        assert_eq!(Length::from_json(&json!("2em"), "px"), Ok(Length::dimension(2.0, "em")));
        assert_eq!(
            Length::from_json(&json!({"size": 3, "unit": "rem"}), "px"),
            Ok(Length::dimension(3.0, "rem"))
        );
        assert!(Length::from_json(&json!(true), "px").is_err());
    }
}
