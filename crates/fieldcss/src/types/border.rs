//! Border and box-shadow values.
//!
//! ```json
//! {
//!   "width": 2, "unit": "px", "style": "dashed", "color": "#333",
//!   "shadow": { "enabled": true, "x": 0, "y": 4, "blur": 12, "color": "rgba(0,0,0,.2)" }
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Shadow {
    pub enabled: bool,
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
    pub inset: bool,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            x: 0.0,
            y: 0.0,
            blur: 10.0,
            spread: 0.0,
            color: "rgba(0,0,0,0.5)".to_string(),
            inset: false,
        }
    }
}

/// A normalized border plus optional shadow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Border {
    pub width: f64,
    pub unit: String,
    pub style: String,
    pub color: Option<String>,
    pub shadow: Shadow,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: 0.0,
            unit: "px".to_string(),
            style: "solid".to_string(),
            color: None,
            shadow: Shadow::default(),
        }
    }
}

impl Border {
    pub fn from_json(value: &Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err(format!("expected a border object, found `{value}`"));
        }
        let mut border: Self =
            serde_json::from_value(value.clone()).map_err(|e| format!("border: {e}"))?;
        if border.width < 0.0 {
            return Err(format!("border width {} is negative", border.width));
        }
        if border.unit.is_empty() {
            border.unit = "px".to_string();
        }
        border.color = border.color.filter(|c| !c.trim().is_empty());
        Ok(border)
    }
}
