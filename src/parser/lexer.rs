// Shared token parsers

use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{char, multispace0},
    combinator::map,
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it skips surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Double-quoted string without escapes: "# epochs"
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_till(|c| c == '"'), char('"')),
        |s: &str| s.to_string(),
    )(input)
}

/// Bare column name: everything up to the next separator, trimmed
pub fn bare_name(input: &str) -> IResult<&str, String> {
    map(
        take_till1(|c| c == '=' || c == ',' || c == ':' || c == '"'),
        |s: &str| s.trim().to_string(),
    )(input)
}

pub fn number_literal(input: &str) -> IResult<&str, f64> {
    ws(double)(input)
}
