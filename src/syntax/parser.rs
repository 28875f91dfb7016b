//! Parser for syntax selector strings.
//!
//! A selector is a comma separated list of preset names and inline syntax
//! definitions, scanned once from left to right:
//!
//! ```text
//! Makefile
//! Makefile,Dot
//! m,{"","","",":"," ","","",true}
//! ```
//!
//! Inline definitions list the seven string fields of [`Syntax`] in
//! declaration order, double quoted, followed by the unquoted
//! `strip_whitespace` flag.

use super::types::Syntax;

/// Characters that split the selector into tokens.
const DELIMITERS: &[char] = &[',', '{', '}', '"', '\''];

/// Number of quoted string fields in an inline definition.
const STRING_FIELDS: usize = 7;

/// Errors that can occur while parsing a syntax selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// The name is neither a preset nor an abbreviation of one.
    #[error("Invalid syntax name: '{0}'")]
    InvalidName(String),

    /// An inline definition did not hold exactly seven quoted fields.
    #[error("Brackets must contain the 7 quoted syntax elements before the flag, found {0}")]
    FieldCount(usize),

    /// Text showed up where only a separator or an opening bracket may appear.
    #[error("Unexpected character(s): '{0}'")]
    UnexpectedCharacters(String),

    /// The seven quoted fields are not followed by the `strip_whitespace` flag.
    #[error("Missing whitespace flag after the 7 quoted syntax elements")]
    MissingFlag,

    /// The trailing `strip_whitespace` flag is not a boolean.
    #[error("Invalid whitespace flag: '{0}' (expected true or false)")]
    InvalidBool(String),

    /// A double quoted field was never closed.
    #[error("Unterminated string in syntax definition")]
    UnterminatedString,

    /// An inline definition was never closed.
    #[error("Unterminated syntax definition, missing '}}'")]
    UnterminatedBlock,

    /// Single quoted fields are reserved.
    #[error("Single quotes are not supported in syntax definitions")]
    SingleQuote,
}

/// Result type alias for selector parsing.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Parses a syntax selector into an ordered list of syntaxes.
///
/// Preset names are matched case-insensitively (see [`Syntax::preset`]).
/// Composite presets contribute all of their syntaxes in order.
///
/// # Example
///
/// ```rust
/// use depgrapher::syntax::{parse, Syntax};
///
/// let syntaxes = parse("Makefile,Dot").unwrap();
/// assert_eq!(syntaxes, vec![Syntax::makefile(), Syntax::dot()]);
///
/// assert!(parse("Ninja").is_err());
/// ```
pub fn parse(selector: &str) -> ParseResult<Vec<Syntax>> {
    let mut result = Vec::new();
    let mut rest = selector;

    loop {
        if let Some(block) = rest.strip_prefix('{') {
            let (syntax, remainder) = parse_definition(block)?;
            result.push(syntax);
            match remainder.strip_prefix(',') {
                Some(next) => rest = next,
                None if remainder.is_empty() => break,
                None => return Err(SyntaxError::UnexpectedCharacters(remainder.to_string())),
            }
            continue;
        }

        let end = rest.find(DELIMITERS).unwrap_or(rest.len());
        let name = &rest[..end];
        match rest[end..].chars().next() {
            None | Some(',') => {
                let presets =
                    Syntax::preset(name).ok_or_else(|| SyntaxError::InvalidName(name.to_string()))?;
                result.extend(presets);
                if end == rest.len() {
                    break;
                }
                rest = &rest[end + 1..];
            }
            Some('\'') => return Err(SyntaxError::SingleQuote),
            Some(_) => {
                return Err(SyntaxError::UnexpectedCharacters(
                    rest[..=end].to_string(),
                ))
            }
        }
    }

    Ok(result)
}

/// Parses the inside of an inline definition, starting right after `{`.
///
/// Returns the syntax and whatever follows the closing `}`.
fn parse_definition(mut rest: &str) -> ParseResult<(Syntax, &str)> {
    let mut fields: Vec<&str> = Vec::with_capacity(STRING_FIELDS);

    loop {
        match rest.chars().next() {
            Some('"') => {
                let body = &rest[1..];
                let close = body.find('"').ok_or(SyntaxError::UnterminatedString)?;
                fields.push(&body[..close]);
                rest = &body[close + 1..];
                match rest.chars().next() {
                    Some(',') => rest = &rest[1..],
                    Some('}') if fields.len() == STRING_FIELDS => {
                        return Err(SyntaxError::MissingFlag);
                    }
                    Some('}') => return Err(SyntaxError::FieldCount(fields.len())),
                    Some(_) => {
                        return Err(SyntaxError::UnexpectedCharacters(rest.to_string()));
                    }
                    None => return Err(SyntaxError::UnterminatedBlock),
                }
            }
            Some('\'') => return Err(SyntaxError::SingleQuote),
            Some(_) => {
                let end = rest.find(DELIMITERS).ok_or(SyntaxError::UnterminatedBlock)?;
                match rest[end..].chars().next() {
                    Some('}') => {}
                    Some('\'') => return Err(SyntaxError::SingleQuote),
                    _ => return Err(SyntaxError::UnexpectedCharacters(rest.to_string())),
                }
                if fields.len() != STRING_FIELDS {
                    return Err(SyntaxError::FieldCount(fields.len()));
                }
                let flag = rest[..end].trim();
                let strip_whitespace = match flag {
                    "true" => true,
                    "false" => false,
                    "" => return Err(SyntaxError::MissingFlag),
                    other => return Err(SyntaxError::InvalidBool(other.to_string())),
                };
                let syntax = Syntax::new(
                    fields[0],
                    fields[1],
                    fields[2],
                    fields[3],
                    fields[4],
                    fields[5],
                    fields[6],
                    strip_whitespace,
                );
                return Ok((syntax, &rest[end + 1..]));
            }
            None => return Err(SyntaxError::UnterminatedBlock),
        }
    }
}
