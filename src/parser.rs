//! Strict field-reference grammar, using nom.
//!
//! ```text
//! field_ref  := "*" | ident ( "." ( ident | "*" ) )?
//! ident      := [A-Za-z_] [A-Za-z0-9_$]*
//! ```
//!
//! The resolver itself accepts any string; this grammar backs strict mode.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{map, opt, recognize, value},
    sequence::{pair, preceded},
    IResult,
};

/// A syntactically valid field reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    pub table: Option<&'a str>,
    pub name: &'a str,
}

/// Parse a complete field reference, or describe why it is not one.
pub fn parse_field_ref(input: &str) -> Result<FieldRef<'_>, String> {
    if input.is_empty() {
        return Err("empty reference".to_string());
    }
    match field_ref(input) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((remaining, _)) => Err(format!(
            "unexpected '{}' at position {}",
            remaining.chars().next().unwrap_or_default(),
            input.len() - remaining.len()
        )),
        Err(_) => Err(format!(
            "expected an identifier or '*', found '{}'",
            input.chars().next().unwrap_or_default()
        )),
    }
}

fn field_ref(input: &str) -> IResult<&str, FieldRef<'_>> {
    alt((
        value(
            FieldRef {
                table: None,
                name: "*",
            },
            char('*'),
        ),
        qualified_or_bare,
    ))(input)
}

fn qualified_or_bare(input: &str) -> IResult<&str, FieldRef<'_>> {
    let (input, first) = identifier(input)?;
    let (input, rest) = opt(preceded(char('.'), alt((identifier, map(char('*'), |_| "*")))))(input)?;

    let parsed = match rest {
        Some(name) => FieldRef {
            table: Some(first),
            name,
        },
        None => FieldRef {
            table: None,
            name: first,
        },
    };
    Ok((input, parsed))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    ))(input)
}
