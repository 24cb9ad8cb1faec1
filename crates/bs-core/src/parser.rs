//! Parser for blade style expressions → [`Style`] tree.
//!
//! The lexer splits the text into a name and raw parameter substrings; this
//! module resolves the name through a [`Registry`], checks the parameter count
//! against the kind's declared shape and recursively parses composite
//! parameters. Literal parameters are read leniently with `winnow`.
//!
//! The result is not required to pass [`Style::validate_params`]; callers
//! decide whether incomplete trees are acceptable.

use crate::lexer::{self, LexError};
use crate::model::{ParamError, ParamValue, Style};
use crate::registry::{self, Registry};
use winnow::combinator::{alt, opt, preceded};
use winnow::Parser as _;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

/// Why a style expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("style not recognized: {name}")]
    UnknownStyle { name: String },
    #[error("incorrect number of parameters for style: {name} (expected {expected}, got {given})")]
    Arity {
        name: String,
        expected: usize,
        given: usize,
        variadic: bool,
    },
    #[error("failure while parsing parameter {index} in style {parent}")]
    Nested {
        parent: String,
        /// 1-based.
        index: usize,
        #[source]
        source: Box<ParseError>,
    },
    #[error("cannot bind parameter {index} in style {parent}")]
    Bind {
        parent: String,
        /// 1-based.
        index: usize,
        #[source]
        source: ParamError,
    },
    #[error("styles nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}

impl ParseError {
    /// Whether the text named a known style at all. `false` means the input is
    /// not a style expression; `true` means a known style was malformed.
    pub fn found_style(&self) -> bool {
        !matches!(self, ParseError::Lex(_) | ParseError::UnknownStyle { .. })
    }

    /// The innermost error of a chain of nested failures.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Deepest nesting of child styles a parse will follow.
pub const MAX_NESTING: usize = 64;

/// Parse `text` against the built-in registry.
#[must_use = "parsing result should be used"]
pub fn parse_style(text: &str) -> Result<Style, ParseError> {
    Parser::new(registry::builtin()).parse(text)
}

/// A parser bound to one registry.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r Registry,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    #[must_use = "parsing result should be used"]
    pub fn parse(&self, text: &str) -> Result<Style, ParseError> {
        self.parse_at(text, 0)
    }

    fn parse_at(&self, text: &str, depth: usize) -> Result<Style, ParseError> {
        if depth > MAX_NESTING {
            log::error!("styles nested deeper than {MAX_NESTING} levels");
            return Err(ParseError::TooDeep { limit: MAX_NESTING });
        }
        let tokens = lexer::tokenize(text)?;
        let name = tokens.name;

        let Some(factory) = self.registry.lookup(name) else {
            log::error!("style not recognized: {name}");
            return Err(ParseError::UnknownStyle { name: name.to_string() });
        };

        let mut style = factory.construct();
        let declared = style.params().len();
        let given = tokens.params.len();
        let variadic = style.is_variadic();
        if given < declared || (given > declared && !variadic) {
            log::error!("incorrect number of parameters for style: {name} (expected {declared}, got {given})");
            return Err(ParseError::Arity {
                name: name.to_string(),
                expected: declared,
                given,
                variadic,
            });
        }

        for (idx, token) in tokens.params.iter().enumerate() {
            // Past the declared list every parameter repeats the variadic tail.
            let template = idx.min(declared - 1);
            let literal = style.params()[template].is_literal();

            let value = if literal {
                ParamValue::Int(parse_literal(&token.literal))
            } else {
                let child = self.parse_at(token.raw, depth + 1).map_err(|err| {
                    if let ParseError::TooDeep { .. } = err {
                        return err;
                    }
                    log::error!("failure while parsing parameter {} in style {name}", idx + 1);
                    ParseError::Nested {
                        parent: name.to_string(),
                        index: idx + 1,
                        source: Box::new(err),
                    }
                })?;
                ParamValue::Style(Box::new(child))
            };

            let bound = if idx < declared {
                style.set_param(idx, value)
            } else {
                style.add_param(value)
            };
            bound.map_err(|err| {
                log::error!("cannot bind parameter {} in style {name}: {err}", idx + 1);
                ParseError::Bind {
                    parent: name.to_string(),
                    index: idx + 1,
                    source: err,
                }
            })?;

            if literal
                && !token.comment.is_empty()
                && let Some(param) = style.param_mut(idx)
            {
                param.set_comment(token.comment.clone());
            }
        }

        style.comment = tokens.comment;
        log::trace!("parsed {name} with {given} parameters");
        Ok(style)
    }
}

// ─── Literals ───────────────────────────────────────────────────────────

/// Read a Number, Bits or Bool literal.
///
/// `true`/`false` anywhere in the text (any case) read as 1/0. Otherwise the
/// text is a C integer: `0x` hex, leading-`0` octal or decimal, with an
/// optional sign. `0b` followed by binary digits reads bits least significant
/// first, matching how the emitter writes them. Unreadable text reads as 0.
pub fn parse_literal(text: &str) -> i32 {
    let lower = text.to_ascii_lowercase();
    if lower.contains("true") {
        return 1;
    }
    if lower.contains("false") {
        return 0;
    }

    let mut input = text;
    match c_integer.parse_next(&mut input) {
        Ok(value) => value,
        Err(_) => {
            log::warn!("could not read literal {text:?}, using 0");
            0
        }
    }
}

fn c_integer(input: &mut &str) -> ModalResult<i32> {
    let sign = opt(one_of(['+', '-'])).parse_next(input)?;
    let magnitude = alt((binary_lsb_first, hexadecimal, octal, decimal)).parse_next(input)?;
    let value = if sign == Some('-') { -magnitude } else { magnitude };
    Ok(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

fn binary_lsb_first(input: &mut &str) -> ModalResult<i64> {
    preceded("0b", take_while(1.., ('0', '1')))
        .map(|bits: &str| {
            bits.chars()
                .take(32)
                .enumerate()
                .filter(|(_, c)| *c == '1')
                .fold(0i64, |acc, (i, _)| acc | (1i64 << i))
        })
        .parse_next(input)
}

fn hexadecimal(input: &mut &str) -> ModalResult<i64> {
    preceded(alt(("0x", "0X")), take_while(1.., |c: char| c.is_ascii_hexdigit()))
        .map(|digits: &str| fold_digits(digits, 16))
        .parse_next(input)
}

fn octal(input: &mut &str) -> ModalResult<i64> {
    preceded('0', take_while(0.., '0'..='7'))
        .map(|digits: &str| fold_digits(digits, 8))
        .parse_next(input)
}

fn decimal(input: &mut &str) -> ModalResult<i64> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .map(|digits: &str| fold_digits(digits, 10))
        .parse_next(input)
}

fn fold_digits(digits: &str, radix: u32) -> i64 {
    digits.chars().fold(0i64, |acc, c| {
        acc.saturating_mul(i64::from(radix))
            .saturating_add(i64::from(c.to_digit(radix).unwrap_or(0)))
    })
}
