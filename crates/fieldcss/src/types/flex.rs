use crate::types::length::{Length, scalar_text};
use serde_json::Value;

/// Gap between flex items: one value for both axes, or separate row and
/// column gaps.
#[derive(Debug, Clone, PartialEq)]
pub enum Gap {
    Uniform(Length),
    Axes {
        row: Option<Length>,
        column: Option<Length>,
    },
}

/// A normalized flex layout. Sub-values stay raw strings here; the generator
/// checks them against the CSS keyword sets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlexLayout {
    pub direction: Option<String>,
    pub justify: Option<String>,
    pub align: Option<String>,
    pub wrap: Option<String>,
    pub gap: Option<Gap>,
}

impl FlexLayout {
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err(format!("expected a flex layout object, found `{value}`"));
        };

        let keyword = |name: &str| -> Result<Option<String>, String> {
            match map.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(v) => scalar_text(v)
                    .map(|s| Some(s).filter(|s| !s.trim().is_empty()))
                    .ok_or_else(|| format!("`{name}` must be text, found `{v}`")),
            }
        };

        let gap = match map.get("gap") {
            None | Some(Value::Null) => None,
            Some(Value::Object(axes)) if !axes.contains_key("size") => {
                let axis = |name: &str| -> Result<Option<Length>, String> {
                    match axes.get(name) {
                        None | Some(Value::Null) => Ok(None),
                        Some(v) => Length::from_json(v, "px")
                            .map(Some)
                            .map_err(|e| format!("gap `{name}`: {e}")),
                    }
                };
                Some(Gap::Axes {
                    row: axis("row")?,
                    column: axis("column")?,
                })
            }
            Some(v) => Some(Gap::Uniform(
                Length::from_json(v, "px").map_err(|e| format!("gap: {e}"))?,
            )),
        };

        Ok(Self {
            direction: keyword("direction")?,
            justify: keyword("justify")?,
            align: keyword("align")?,
            wrap: keyword("wrap")?,
            gap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_gap_becomes_axes() {
        let flex = FlexLayout::from_json(&json!({"gap": {"row": 8, "column": "1rem"}})).unwrap();
        assert_eq!(
            flex.gap,
            Some(Gap::Axes {
                row: Some(Length::px(8.0)),
                column: Some(Length::dimension(1.0, "rem")),
            })
        );
    }

    #[test]
    fn sized_object_gap_is_uniform() {
        let flex = FlexLayout::from_json(&json!({"gap": {"size": 4, "unit": "px"}})).unwrap();
        assert_eq!(flex.gap, Some(Gap::Uniform(Length::px(4.0))));
    }
}
