use crate::types::{Property, Typography};

/// Emits up to eight declarations; absent members are skipped.
pub fn typography(t: &Typography) -> Vec<Property> {
    let mut props = Vec::new();
    if let Some(family) = &t.family {
        props.push(Property::new("font-family", quote_families(family)));
    }
    if let Some(size) = &t.size {
        props.push(Property::new("font-size", size.to_string()));
    }
    if let Some(weight) = &t.weight {
        props.push(Property::new("font-weight", weight.as_str()));
    }
    if let Some(line_height) = &t.line_height {
        props.push(Property::new("line-height", line_height.to_string()));
    }
    if let Some(spacing) = &t.letter_spacing {
        props.push(Property::new("letter-spacing", spacing.to_string()));
    }
    if let Some(transform) = &t.transform {
        props.push(Property::new("text-transform", transform.as_str()));
    }
    if let Some(align) = &t.align {
        props.push(Property::new("text-align", align.as_str()));
    }
    if let Some(decoration) = &t.decoration {
        props.push(Property::new("text-decoration", decoration.as_str()));
    }
    props
}

/// Quotes family names containing whitespace (`Open Sans` becomes
/// `"Open Sans"`); already quoted names and generic families are kept.
fn quote_families(list: &str) -> String {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let quoted = name.starts_with('"') || name.starts_with('\'');
            if !quoted && name.contains(char::is_whitespace) {
                format!("\"{name}\"")
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
