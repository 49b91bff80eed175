use crate::types::length::Length;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{pair, terminated, tuple},
};
use phf::phf_set;

/// Units accepted after a number. Anything else is rejected so that a
/// value like `10abc` cannot reach the stylesheet.
static KNOWN_UNITS: phf::Set<&'static str> = phf_set! {
    "px", "em", "rem", "%", "vw", "vh", "vmin", "vmax", "ch", "ex",
    "pt", "pc", "cm", "mm", "in", "fr", "deg", "rad", "turn", "s", "ms",
};

/// Parse a floating point or integer number (`10`, `-2.5`, `.5`). Digit
/// runs too long for an `f64` are rejected rather than becoming infinite.
pub fn parse_number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(alt((char('-'), char('+')))),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        |s: &str| match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(()),
        },
    )(input)
}

/// Parses a whole string (surrounding whitespace allowed) as one number.
///
/// ```rust
/// use fieldcss::parser::units::number_from_str;
///
/// assert_eq!(number_from_str(" 2.5 "), Some(2.5));
/// assert_eq!(number_from_str("inf"), None);
/// ```
pub fn number_from_str(source: &str) -> Option<f64> {
    all_consuming(parse_number)(source.trim())
        .ok()
        .map(|(_, n)| n)
}

/// Parse the unit suffix (e.g., px, %, rem). An absent suffix yields "".
fn parse_unit_suffix(input: &str) -> IResult<&str, &str> {
    alt((
        tag("%"),
        map_res(take_while(|c: char| c.is_ascii_alphabetic()), |unit: &str| {
            if unit.is_empty() || KNOWN_UNITS.contains(unit.to_ascii_lowercase().as_str()) {
                Ok(unit)
            } else {
                Err(())
            }
        }),
    ))(input)
}

/// Parse a keyword value such as `auto`, `normal` or `inherit`.
fn parse_keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || c == '-')(input)
}

/// Parse a single length (e.g., "10", "1.5rem", "50%", "auto").
pub fn parse_length(input: &str) -> IResult<&str, Length> {
    let (input, _) = multispace0(input)?;
    alt((
        map(pair(parse_number, parse_unit_suffix), |(value, unit)| {
            Length::Dimension {
                value,
                unit: unit.to_ascii_lowercase(),
            }
        }),
        map(parse_keyword, |k| Length::Keyword(k.to_ascii_lowercase())),
    ))(input)
}

/// Parse a whitespace separated list of lengths ("10px 20px").
pub fn parse_length_list(input: &str) -> IResult<&str, Vec<Length>> {
    let (input, _) = multispace0(input)?;
    terminated(
        separated_list1(take_while1(char::is_whitespace), parse_length),
        multispace0,
    )(input)
}

/// Parses a complete length string. Trailing input is an error.
///
/// A bare number takes `default_unit`.
pub fn length_from_str(source: &str, default_unit: &str) -> Option<Length> {
    let (_, length) = all_consuming(terminated(parse_length, multispace0))(source).ok()?;
    Some(length.with_default_unit(default_unit))
}

/// Parses a complete whitespace separated list of lengths.
pub fn lengths_from_str(source: &str, default_unit: &str) -> Option<Vec<Length>> {
    let (_, lengths) = all_consuming(parse_length_list)(source).ok()?;
    Some(
        lengths
            .into_iter()
            .map(|l| l.with_default_unit(default_unit))
            .collect(),
    )
}
