//! Shared lexical helpers for templates and custom CSS.

use nom::{IResult, bytes::complete::take_while1};

/// Parses a CSS identifier (alphanumeric characters, dashes, and underscores).
///
/// Identifiers are used for property names, type selectors, class names, etc.
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parses a property name, including vendor prefixes (`-webkit-mask`) and
/// custom properties (`--accent`).
pub fn parse_property_name(input: &str) -> IResult<&str, &str> {
    parse_ident(input)
}

/// Splits `input` on `separator` where it appears outside of quotes,
/// parentheses and brackets. Empty pieces are kept.
///
/// ```rust
/// use fieldcss::parser::values::split_top_level;
///
/// let parts = split_top_level("url(a;b); color: red", ';');
/// assert_eq!(parts, vec!["url(a;b)", " color: red"]);
/// ```
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_quotes_and_parens() {
        assert_eq!(
            split_top_level("a, b[title=\"x,y\"], :is(c, d)", ','),
            vec!["a", " b[title=\"x,y\"]", " :is(c, d)"]
        );
    }

    #[test]
    fn property_names_allow_custom_properties() {
        assert_eq!(parse_property_name("--accent: red").unwrap(), (": red", "--accent"));
        assert_eq!(parse_property_name("-webkit-mask:x").unwrap().1, "-webkit-mask");
    }
}
