// Parsers for --scale, --y-limits and --color-field values

use super::lexer::{bare_name, number_literal, string_literal, ws};
use crate::data::ColumnSelector;
use crate::scale::{ScaleKind, ScaleSpec};
use nom::{
    branch::alt,
    character::complete::{alpha1, char},
    combinator::{all_consuming, map, map_res},
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};

/// Parse a scale name: linear, log, symlog or logit
pub fn scale_kind(input: &str) -> IResult<&str, ScaleKind> {
    map_res(alpha1, |s: &str| s.parse::<ScaleKind>())(input)
}

/// Parse a column selector: an index, a quoted label or a bare label
pub fn selector(input: &str) -> IResult<&str, ColumnSelector> {
    alt((
        map(string_literal, ColumnSelector::Label),
        map(bare_name, |name| match name.parse::<usize>() {
            Ok(idx) => ColumnSelector::Index(idx),
            Err(_) => ColumnSelector::Label(name),
        }),
    ))(input)
}

/// Parse targeted scales: lr=log, 2=symlog
fn targeted(input: &str) -> IResult<&str, ScaleSpec> {
    map(
        separated_list1(
            ws(char(',')),
            separated_pair(ws(selector), char('='), ws(scale_kind)),
        ),
        ScaleSpec::Targeted,
    )(input)
}

/// Parse one scale for every axis (log) or one per axis (log,linear,log)
fn positional(input: &str) -> IResult<&str, ScaleSpec> {
    map(separated_list1(ws(char(',')), ws(scale_kind)), |mut kinds| {
        if kinds.len() == 1 {
            ScaleSpec::Uniform(kinds.remove(0))
        } else {
            ScaleSpec::Positional(kinds)
        }
    })(input)
}

pub fn scale_spec(input: &str) -> IResult<&str, ScaleSpec> {
    alt((targeted, positional))(input)
}

/// Parse a --scale argument. Input outside the grammar is kept as
/// `ScaleSpec::Unrecognized` so the renderer can warn about it.
pub fn parse_scale_arg(input: &str) -> ScaleSpec {
    match all_consuming(ws(scale_spec))(input) {
        Ok((_, spec)) => spec,
        Err(_) => ScaleSpec::Unrecognized(input.to_string()),
    }
}

fn limits_pair(input: &str) -> IResult<&str, (f64, f64)> {
    separated_pair(number_literal, char(':'), number_literal)(input)
}

/// Parse a --y-limits argument: 0:1,10:20
pub fn parse_limits_arg(input: &str) -> Result<Vec<(f64, f64)>, String> {
    all_consuming(separated_list1(char(','), limits_pair))(input)
        .map(|(_, limits)| limits)
        .map_err(|e| format!("invalid y-limits '{}': {:?}", input, e))
}

/// Parse a --color-field argument
pub fn parse_selector_arg(input: &str) -> Result<ColumnSelector, String> {
    all_consuming(ws(selector))(input)
        .map(|(_, selector)| selector)
        .map_err(|e| format!("invalid column selector '{}': {:?}", input, e))
}
