// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

mod basics;

use basics::{parse_number, parse_separator, parse_string};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::char;
use nom::combinator::opt;
use nom::sequence::{delimited, preceded, separated_pair, tuple};
use nom::IResult;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Recommend(String, Option<usize>),
    Similarity(String, String),
    Search(String),
}

fn parse_recommend(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag("recommend")(input)?;
    let (input, (title, n)) = delimited(
        char('('),
        tuple((parse_string, opt(preceded(parse_separator, parse_number)))),
        char(')'),
    )(input)?;

    Ok((input, Statement::Recommend(title.into(), n)))
}

fn parse_similarity(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag("similarity")(input)?;
    let (input, (a, b)) = delimited(
        char('('),
        separated_pair(parse_string, parse_separator, parse_string),
        char(')'),
    )(input)?;

    Ok((input, Statement::Similarity(a.into(), b.into())))
}

fn parse_search(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag("search")(input)?;
    let (input, fragment) = delimited(char('('), parse_string, char(')'))(input)?;

    Ok((input, Statement::Search(fragment.into())))
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    alt((parse_recommend, parse_similarity, parse_search))(input)
}

/// Anything that isn't a well formed statement is taken as a title to
/// recommend from.
pub fn parse_line(input: &str) -> Statement {
    let input = input.trim();

    match parse_statement(input) {
        Ok((rest, statement)) if rest.trim().is_empty() => statement,
        _ => Statement::Recommend(input.into(), None),
    }
}
