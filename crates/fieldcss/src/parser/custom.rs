//! Tokenizer for user-supplied custom CSS.
//!
//! This is deliberately not a full CSS parser. It performs a comment pass,
//! then splits the text into top-level items by matching balanced braces:
//!
//! - blocks: `prelude { body }` (style rules and block at-rules)
//! - statements: `prelude;` (statement at-rules such as `@import`)
//!
//! Quotes and parentheses are respected so that `content: "}"` or
//! `url(data:...;base64,...)` do not end an item early.

use crate::error::SanitizeError;
use crate::parser::values::{parse_property_name, split_top_level};
use crate::types::declaration::Property;
use nom::{
    character::complete::{char, multispace0},
    sequence::tuple,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawItem<'a> {
    Block { prelude: &'a str, body: &'a str },
    Statement(&'a str),
}

/// Removes `/* ... */` comments. An unterminated comment is an error.
pub fn strip_comments(source: &str) -> Result<String, SanitizeError> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut closed = false;
            while let Some(inner) = chars.next() {
                if inner == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    closed = true;
                    break;
                }
            }
            if !closed {
                return Err(SanitizeError::UnterminatedComment);
            }
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    Ok(out)
}

/// Finds the first top-level occurrence of any of `targets`.
fn find_top_level(input: &str, targets: &[char]) -> Option<(usize, char)> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut escaped = false;
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
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && targets.contains(&c) => return Some((i, c)),
            _ => {}
        }
    }
    None
}

/// Takes a `{ ... }` block from the start of `input`, returning the inner
/// body and the remaining input.
fn take_balanced_braces(input: &str) -> Result<(&str, &str), SanitizeError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
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
            (None, '{') => depth += 1,
            (None, '}') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok((&input[1..i], &input[i + 1..]));
                }
            }
            _ => {}
        }
    }
    Err(SanitizeError::UnbalancedBraces)
}

/// Splits comment-free CSS into top-level items.
pub fn tokenize(source: &str) -> Result<Vec<RawItem<'_>>, SanitizeError> {
    let mut items = Vec::new();
    let mut rest = source;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let Some((idx, found)) = find_top_level(rest, &['{', '}', ';']) else {
            return Err(SanitizeError::UnexpectedEnd(rest.trim().to_string()));
        };
        match found {
            '}' => return Err(SanitizeError::UnbalancedBraces),
            ';' => {
                items.push(RawItem::Statement(rest[..idx].trim()));
                rest = &rest[idx + 1..];
            }
            _ => {
                let prelude = rest[..idx].trim();
                let (body, after) = take_balanced_braces(&rest[idx..])?;
                items.push(RawItem::Block { prelude, body });
                rest = after;
            }
        }
    }
    Ok(items)
}

/// Returns true when a block body contains nested blocks.
pub fn has_nested_block(body: &str) -> bool {
    find_top_level(body, &['{']).is_some()
}

/// Parses the declarations of a style rule body.
pub fn parse_declarations(body: &str) -> Result<Vec<Property>, SanitizeError> {
    let mut properties = Vec::new();
    for piece in split_top_level(body, ';') {
        if piece.trim().is_empty() {
            continue;
        }
        let parsed: nom::IResult<&str, _> =
            tuple((multispace0, parse_property_name, multispace0, char(':')))(piece);
        let Ok((value, (_, name, _, _))) = parsed else {
            return Err(SanitizeError::NotADeclaration(piece.trim().to_string()));
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(SanitizeError::MissingValue(name.to_string()));
        }
        properties.push(Property::new(name.to_ascii_lowercase(), value));
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_rules_and_statements() {
        let items = tokenize("@import url(x.css); a { color: red } b{}").unwrap();
        assert_eq!(
            items,
            vec![
                RawItem::Statement("@import url(x.css)"),
                RawItem::Block {
                    prelude: "a",
                    body: " color: red "
                },
                RawItem::Block {
                    prelude: "b",
                    body: ""
                },
            ]
        );
    }

    #[test]
    fn braces_inside_strings_do_not_count() {
        let items = tokenize("a::after { content: \"}\" }").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        assert_eq!(
            tokenize("a { color: red").unwrap_err(),
            SanitizeError::UnbalancedBraces
        );
        assert_eq!(
            tokenize("a { color: red } }").unwrap_err(),
            SanitizeError::UnbalancedBraces
        );
        assert_eq!(
            tokenize("color: red").unwrap_err(),
            SanitizeError::UnexpectedEnd("color: red".into())
        );
    }

    #[test]
    fn strips_comments_but_not_inside_strings() {
        assert_eq!(
            strip_comments("a{/* x */color:red}").unwrap(),
            "a{color:red}"
        );
        assert_eq!(
            strip_comments("a{content:\"/* keep */\"}").unwrap(),
            "a{content:\"/* keep */\"}"
        );
        assert_eq!(
            strip_comments("a{color:red} /* open").unwrap_err(),
            SanitizeError::UnterminatedComment
        );
    }

    #[test]
    fn parses_declarations_with_semicolons_in_urls() {
        let props =
            parse_declarations("background: url(data:image/png;base64,AAA); color: red;").unwrap();
        assert_eq!(
            props,
            vec![
                Property::new("background", "url(data:image/png;base64,AAA)"),
                Property::new("color", "red"),
            ]
        );
    }

    #[test]
    fn rejects_declaration_without_colon() {
        assert_eq!(
            parse_declarations("color red").unwrap_err(),
            SanitizeError::NotADeclaration("color red".into())
        );
        assert_eq!(
            parse_declarations("color:").unwrap_err(),
            SanitizeError::MissingValue("color".into())
        );
    }
}
