//! Background values: none, flat color, gradient or image.
//!
//! ## Settings shape
//!
//! ```json
//! {
//!   "type": "gradient",
//!   "gradient": {
//!     "type": "linear",
//!     "angle": 90,
//!     "stops": [
//!       { "color": "#fff", "position": 0 },
//!       { "color": "#000", "position": 100 }
//!     ]
//!   }
//! }
//! ```
//!
//! A value without `type` normalizes to [`BackgroundKind::None`]. A `type`
//! the generator does not know survives normalization as
//! [`BackgroundKind::Unknown`] so the generator can report it.

use serde::Deserialize;
use serde_json::Value;

/// The background discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackgroundKind {
    #[default]
    None,
    Color,
    Gradient,
    Image,
    Unknown(String),
}

impl BackgroundKind {
    fn parse(name: &str) -> Self {
        match name {
            "" | "none" => Self::None,
            "color" | "classic" => Self::Color,
            "gradient" => Self::Gradient,
            "image" => Self::Image,
            other => Self::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// One color stop. Stops without a position are spread evenly before
/// sorting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorStop {
    pub color: String,
    #[serde(default)]
    pub position: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Angle in degrees for linear gradients.
    pub angle: f64,
    /// Shape for radial gradients (`circle` or `ellipse`).
    pub shape: String,
    /// Center position for radial gradients.
    pub position: String,
    pub stops: Vec<ColorStop>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle: 180.0,
            shape: "circle".to_string(),
            position: "center".to_string(),
            stops: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackgroundImage {
    pub url: String,
    pub size: String,
    pub position: String,
    pub repeat: String,
}

impl Default for BackgroundImage {
    fn default() -> Self {
        Self {
            url: String::new(),
            size: "cover".to_string(),
            position: "center center".to_string(),
            repeat: "no-repeat".to_string(),
        }
    }
}

/// A normalized background value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Background {
    pub kind: BackgroundKind,
    pub color: Option<String>,
    pub gradient: Gradient,
    pub image: BackgroundImage,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawBackground {
    #[serde(rename = "type")]
    kind: Option<String>,
    color: Option<String>,
    gradient: Option<Gradient>,
    image: Option<BackgroundImage>,
}

impl Background {
    /// Normalizes a settings value into a background.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err(format!("expected a background object, found `{value}`"));
        }
        let raw: RawBackground =
            serde_json::from_value(value.clone()).map_err(|e| format!("background: {e}"))?;

        Ok(Self {
            kind: BackgroundKind::parse(raw.kind.as_deref().unwrap_or_default()),
            color: raw.color.filter(|c| !c.trim().is_empty()),
            gradient: raw.gradient.unwrap_or_default(),
            image: raw.image.unwrap_or_default(),
        })
    }
}
