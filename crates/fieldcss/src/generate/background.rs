//! Background lowering: flat color, gradient or image.

use crate::error::WarningKind;
use crate::types::{Background, BackgroundImage, BackgroundKind, Gradient, GradientKind, Property};
use crate::types::format_number;

pub fn background(bg: &Background, warnings: &mut Vec<WarningKind>) -> Vec<Property> {
    match &bg.kind {
        BackgroundKind::None => Vec::new(),
        BackgroundKind::Color => bg
            .color
            .iter()
            .map(|color| Property::new("background-color", color.as_str()))
            .collect(),
        BackgroundKind::Gradient => gradient(&bg.gradient, warnings)
            .map(|text| vec![Property::new("background-image", text)])
            .unwrap_or_default(),
        BackgroundKind::Image => image(&bg.image),
        BackgroundKind::Unknown(value) => {
            warnings.push(WarningKind::UnknownDiscriminant {
                name: "type".into(),
                value: value.clone(),
            });
            Vec::new()
        }
    }
}

/// Builds a `linear-gradient(...)` or `radial-gradient(...)` value.
///
/// Stops without a position are spread evenly by index, then all stops are
/// sorted by position. The sort is stable, so equal positions keep their
/// input order.
pub fn gradient(g: &Gradient, warnings: &mut Vec<WarningKind>) -> Option<String> {
    let count = g.stops.len();
    if count < 2 {
        warnings.push(WarningKind::IncompleteGradient(count));
        return None;
    }

    let mut stops: Vec<(f64, &str)> = g
        .stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let spread = i as f64 * 100.0 / (count - 1) as f64;
            (stop.position.unwrap_or(spread), stop.color.as_str())
        })
        .collect();
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));

    let stops = stops
        .iter()
        .map(|(position, color)| format!("{color} {}%", format_number(*position)))
        .collect::<Vec<_>>()
        .join(", ");

    Some(match g.kind {
        GradientKind::Linear => format!("linear-gradient({}deg, {stops})", format_number(g.angle)),
        GradientKind::Radial => format!("radial-gradient({} at {}, {stops})", g.shape, g.position),
    })
}

fn image(img: &BackgroundImage) -> Vec<Property> {
    if img.url.trim().is_empty() {
        return Vec::new();
    }
    let url = img.url.replace('\\', "\\\\").replace('"', "\\\"");
    vec![
        Property::new("background-image", format!("url(\"{url}\")")),
        Property::new("background-size", img.size.as_str()),
        Property::new("background-position", img.position.as_str()),
        Property::new("background-repeat", img.repeat.as_str()),
    ]
}
