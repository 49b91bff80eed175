//! Four-sided values: margin, padding and border-radius.

use crate::types::{BoxSides, Property, format_number};

/// Emits one shorthand declaration, `"{top}{unit} {right}{unit} ..."`.
pub fn box_sides(property: &str, sides: &BoxSides) -> Vec<Property> {
    vec![Property::new(property, sides.shorthand())]
}

/// Side values without unit, for `{{VALUE.TOP}}` and friends.
pub fn side_texts(sides: &BoxSides) -> [String; 4] {
    sides.sides().map(format_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_round_trips() {
        let sides = BoxSides {
            top: 10.0,
            right: 20.0,
            bottom: 10.0,
            left: 20.0,
            unit: "px".into(),
        };
        let props = box_sides("padding", &sides);
        assert_eq!(props, vec![Property::new("padding", "10px 20px 10px 20px")]);

        let recovered: Vec<f64> = props[0]
            .value
            .split_whitespace()
            .map(|part| part.trim_end_matches("px").parse().unwrap())
            .collect();
        assert_eq!(recovered, vec![10.0, 20.0, 10.0, 20.0]);
    }

    #[test]
    fn side_texts_drop_fraction_and_unit() {
        let sides = BoxSides::vertical_horizontal(1.5, 2.0, "em");
        assert_eq!(side_texts(&sides), ["1.5", "2", "1.5", "2"]);
    }
}
