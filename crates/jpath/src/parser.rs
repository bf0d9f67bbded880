//! A `nom`-based parser for record paths.
use super::ast::{PathExpr, PathSegment};
use crate::error::JPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while, take_while1},
    character::complete::{char, multispace0, u64 as nom_u64},
    combinator::{map, recognize, value},
    multi::{many0, many1},
    sequence::{delimited, pair, preceded},
};

// --- Main Public Parser ---

pub fn parse_path(input: &str) -> Result<PathExpr, JPathError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(JPathError::Empty(input.to_string()));
    }
    match path(trimmed) {
        Ok(("", segments)) => Ok(PathExpr::new(segments)),
        Ok((rem, _)) => Err(JPathError::Parse {
            input: input.to_string(),
            message: format!("Parser did not consume all input. Remainder: '{}'", rem),
        }),
        Err(e) => Err(JPathError::Parse {
            input: input.to_string(),
            message: e.to_string(),
        }),
    }
}

// --- Combinators ---

fn path(input: &str) -> IResult<&str, Vec<PathSegment>> {
    alt((
        preceded(char('$'), many0(segment)),
        map(pair(identifier, many0(segment)), |(start, mut rest)| {
            let mut segments = vec![PathSegment::Key(start.to_string())];
            segments.append(&mut rest);
            segments
        }),
        many1(bracket_segment),
    ))
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    ))
    .parse(input)
}

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(preceded(char('.'), identifier), |s| {
        PathSegment::Key(s.to_string())
    })
    .parse(input)
}

fn index_segment(input: &str) -> IResult<&str, PathSegment> {
    map(delimited(char('['), ws(nom_u64), char(']')), |i| {
        PathSegment::Index(i as usize)
    })
    .parse(input)
}

fn wildcard_segment(input: &str) -> IResult<&str, PathSegment> {
    value(
        PathSegment::Wildcard,
        alt((
            delimited(char('['), ws(tag("*")), char(']')),
            recognize(pair(char('['), preceded(multispace0, char(']')))),
        )),
    )
    .parse(input)
}

fn quoted_key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(
        delimited(
            pair(char('['), char('\'')),
            is_not("'"),
            pair(char('\''), char(']')),
        ),
        |s: &str| PathSegment::Key(s.to_string()),
    )
    .parse(input)
}

fn bracket_segment(input: &str) -> IResult<&str, PathSegment> {
    alt((wildcard_segment, index_segment, quoted_key_segment)).parse(input)
}

fn segment(input: &str) -> IResult<&str, PathSegment> {
    alt((key_segment, bracket_segment)).parse(input)
}

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}
