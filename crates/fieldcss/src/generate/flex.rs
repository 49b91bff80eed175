//! Flex layout lowering.

use crate::error::WarningKind;
use crate::types::{FlexLayout, Gap, Property};
use phf::phf_set;

static DIRECTIONS: phf::Set<&'static str> = phf_set! {
    "row", "row-reverse", "column", "column-reverse",
};

static JUSTIFY: phf::Set<&'static str> = phf_set! {
    "flex-start", "flex-end", "center", "space-between", "space-around",
    "space-evenly", "start", "end", "left", "right", "stretch", "normal",
};

static ALIGN: phf::Set<&'static str> = phf_set! {
    "flex-start", "flex-end", "center", "baseline", "stretch", "start", "end", "normal",
};

static WRAP: phf::Set<&'static str> = phf_set! {
    "nowrap", "wrap", "wrap-reverse",
};

pub fn flex(layout: &FlexLayout, warnings: &mut Vec<WarningKind>) -> Vec<Property> {
    let mut props = Vec::new();
    let members = [
        ("direction", "flex-direction", &layout.direction, &DIRECTIONS),
        ("justify", "justify-content", &layout.justify, &JUSTIFY),
        ("align", "align-items", &layout.align, &ALIGN),
        ("wrap", "flex-wrap", &layout.wrap, &WRAP),
    ];
    for (name, property, value, allowed) in members {
        let Some(value) = value else { continue };
        if allowed.contains(value.as_str()) {
            props.push(Property::new(property, value.as_str()));
        } else {
            warnings.push(WarningKind::UnknownDiscriminant {
                name: name.into(),
                value: value.clone(),
            });
        }
    }

    match &layout.gap {
        Some(Gap::Uniform(gap)) => props.push(Property::new("gap", gap.to_string())),
        Some(Gap::Axes { row, column }) => {
            if let Some(row) = row {
                props.push(Property::new("row-gap", row.to_string()));
            }
            if let Some(column) = column {
                props.push(Property::new("column-gap", column.to_string()));
            }
        }
        None => {}
    }
    props
}
