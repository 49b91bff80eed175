//! Border and box-shadow lowering.

use crate::error::WarningKind;
use crate::types::{Border, Property, Shadow, format_number};
use phf::phf_set;

static BORDER_STYLES: phf::Set<&'static str> = phf_set! {
    "none", "hidden", "dotted", "dashed", "solid", "double",
    "groove", "ridge", "inset", "outset",
};

/// Border declarations are only emitted for a positive width; a zero width
/// suppresses them entirely, whatever the style and color.
pub fn border(b: &Border, warnings: &mut Vec<WarningKind>) -> Vec<Property> {
    let mut props = Vec::new();
    if b.width > 0.0 {
        if BORDER_STYLES.contains(b.style.as_str()) {
            props.push(Property::new(
                "border-width",
                format!("{}{}", format_number(b.width), b.unit),
            ));
            props.push(Property::new("border-style", b.style.as_str()));
            if let Some(color) = &b.color {
                props.push(Property::new("border-color", color.as_str()));
            }
        } else {
            warnings.push(WarningKind::UnknownDiscriminant {
                name: "style".into(),
                value: b.style.clone(),
            });
        }
    }
    if b.shadow.enabled {
        props.push(Property::new("box-shadow", shadow(&b.shadow)));
    }
    props
}

fn shadow(s: &Shadow) -> String {
    let offsets = [s.x, s.y, s.blur, s.spread]
        .iter()
        .map(|v| format!("{}px", format_number(*v)))
        .collect::<Vec<_>>()
        .join(" ");
    let inset = if s.inset { "inset " } else { "" };
    format!("{inset}{offsets} {}", s.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lower(value: serde_json::Value) -> (Vec<Property>, Vec<WarningKind>) {
        let b = Border::from_json(&value).unwrap();
        let mut warnings = Vec::new();
        (border(&b, &mut warnings), warnings)
    }

    #[test]
    fn zero_width_suppresses_border() {
        let (props, _) = lower(json!({"width": 0, "style": "dashed", "color": "red"}));
        assert!(props.is_empty());
    }

    #[test]
    fn border_with_color() {
        let (props, _) = lower(json!({"width": 2, "style": "dashed", "color": "#333"}));
        assert_eq!(
            props,
            vec![
                Property::new("border-width", "2px"),
                Property::new("border-style", "dashed"),
                Property::new("border-color", "#333"),
            ]
        );
    }

    #[test]
    fn inset_shadow_without_border() {
        let (props, _) = lower(json!({
            "shadow": {"enabled": true, "y": 4, "blur": 12, "color": "rgba(0,0,0,.2)", "inset": true}
        }));
        assert_eq!(
            props,
            vec![Property::new("box-shadow", "inset 0px 4px 12px 0px rgba(0,0,0,.2)")]
        );
    }

    #[test]
    fn disabled_shadow_is_skipped() {
        let (props, _) = lower(json!({"shadow": {"enabled": false, "blur": 3}}));
        assert!(props.is_empty());
    }

    #[test]
    fn unknown_style_warns() {
        let (props, warnings) = lower(json!({"width": 1, "style": "wavy"}));
        assert!(props.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
