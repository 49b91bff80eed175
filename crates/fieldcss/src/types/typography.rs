use crate::types::length::{Length, scalar_text};
use serde_json::{Map, Value};

/// A normalized typography set. Every member is optional; absent members
/// produce no declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Typography {
    pub family: Option<String>,
    pub size: Option<Length>,
    pub weight: Option<String>,
    pub line_height: Option<Length>,
    pub letter_spacing: Option<Length>,
    pub transform: Option<String>,
    pub align: Option<String>,
    pub decoration: Option<String>,
}

impl Typography {
    /// Normalizes a settings object. Keys are accepted in snake_case or
    /// camelCase (`line_height` / `lineHeight`).
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err(format!("expected a typography object, found `{value}`"));
        };

        Ok(Self {
            family: text(map, &["family", "font_family", "fontFamily"])?,
            size: length(map, &["size", "font_size", "fontSize"], "px")?,
            weight: text(map, &["weight", "font_weight", "fontWeight"])?,
            line_height: length(map, &["line_height", "lineHeight"], "")?,
            letter_spacing: length(map, &["letter_spacing", "letterSpacing"], "px")?,
            transform: text(map, &["transform", "text_transform", "textTransform"])?,
            align: text(map, &["align", "text_align", "textAlign"])?,
            decoration: text(map, &["decoration", "text_decoration", "textDecoration"])?,
        })
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null() && v.as_str().is_none_or(|s| !s.trim().is_empty()))
}

fn text(map: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>, String> {
    lookup(map, keys)
        .map(|v| scalar_text(v).ok_or_else(|| format!("`{}` must be text, found `{v}`", keys[0])))
        .transpose()
}

fn length(
    map: &Map<String, Value>,
    keys: &[&str],
    default_unit: &str,
) -> Result<Option<Length>, String> {
    lookup(map, keys)
        .map(|v| Length::from_json(v, default_unit).map_err(|e| format!("`{}`: {e}", keys[0])))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_members_stay_absent() {
        let t = Typography::from_json(&json!({"size": 18, "weight": 700})).unwrap();
        assert_eq!(t.size, Some(Length::px(18.0)));
        assert_eq!(t.weight.as_deref(), Some("700"));
        assert_eq!(t.family, None);
        assert_eq!(t.decoration, None);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let t = Typography::from_json(&json!({"family": "", "lineHeight": 1.4})).unwrap();
        assert_eq!(t.family, None);
        assert_eq!(t.line_height, Some(Length::dimension(1.4, "")));
    }
}
