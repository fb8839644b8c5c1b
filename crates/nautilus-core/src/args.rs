//! Argument string tokenizer and parameter binding

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ShellError, ShellResult};

/// One token of an argument string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Text after a leading `-`, e.g. `p` for `-p`.
    Flag(String),
    /// A bare word or the inside of a double-quoted string.
    Text(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Ready,
    Flag(usize),
    Bare(usize),
    Quoted(usize),
    ExpectSpace,
}

/// Splits `input` on spaces. Double quotes group a string that may contain
/// spaces; a closing quote must be followed by a space or the end of input.
pub fn tokenize(input: &str) -> ShellResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut state = State::Ready;

    for (i, c) in input.char_indices() {
        state = match (state, c) {
            (State::Ready, ' ') => State::Ready,
            (State::Ready, '-') => State::Flag(i + 1),
            (State::Ready, '"') => State::Quoted(i + 1),
            (State::Ready, _) => State::Bare(i),
            (State::Flag(start), ' ') => {
                tokens.push(Token::Flag(input[start..i].to_string()));
                State::Ready
            }
            (State::Bare(start), ' ') => {
                tokens.push(Token::Text(input[start..i].to_string()));
                State::Ready
            }
            (State::Quoted(start), '"') => {
                tokens.push(Token::Text(input[start..i].to_string()));
                State::ExpectSpace
            }
            (State::ExpectSpace, ' ') => State::Ready,
            (State::ExpectSpace, _) => return Err(ShellError::InvalidSyntax),
            (state, _) => state,
        };
    }

    match state {
        State::Ready | State::ExpectSpace => {}
        State::Flag(start) => tokens.push(Token::Flag(input[start..].to_string())),
        State::Bare(start) => tokens.push(Token::Text(input[start..].to_string())),
        State::Quoted(_) => return Err(ShellError::InvalidSyntax),
    }
    Ok(tokens)
}

/// A declared command parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    /// Boolean switch set by `-<indicator>`.
    Flag {
        name: &'static str,
        indicator: &'static str,
    },
    /// Positional string, filled in declaration order.
    Text { name: &'static str, optional: bool },
}

impl Param {
    pub const fn flag(name: &'static str, indicator: &'static str) -> Self {
        Param::Flag { name, indicator }
    }

    pub const fn text(name: &'static str) -> Self {
        Param::Text {
            name,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Param::Text {
            name,
            optional: true,
        }
    }
}

/// Validated argument record handed to a command handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    flags: BTreeSet<&'static str>,
    values: BTreeMap<&'static str, String>,
}

impl Args {
    /// Tokenizes `input` and binds it against `params`.
    pub fn parse(params: &[Param], input: &str) -> ShellResult<Self> {
        Self::bind(params, tokenize(input)?)
    }

    /// Unknown flags, surplus strings and missing required strings are all
    /// `Invalid syntax`.
    pub fn bind(params: &[Param], tokens: Vec<Token>) -> ShellResult<Self> {
        let mut args = Args::default();
        let mut positional = params.iter().filter_map(|param| match param {
            Param::Text { name, optional } => Some((*name, *optional)),
            Param::Flag { .. } => None,
        });

        for token in tokens {
            match token {
                Token::Flag(text) => {
                    let name = params
                        .iter()
                        .find_map(|param| match param {
                            Param::Flag { name, indicator } if *indicator == text => Some(*name),
                            _ => None,
                        })
                        .ok_or(ShellError::InvalidSyntax)?;
                    args.flags.insert(name);
                }
                Token::Text(text) => {
                    let (name, _) = positional.next().ok_or(ShellError::InvalidSyntax)?;
                    args.values.insert(name, text);
                }
            }
        }

        if positional.any(|(_, optional)| !optional) {
            return Err(ShellError::InvalidSyntax);
        }
        Ok(args)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> ShellResult<&str> {
        self.value(name).ok_or(ShellError::InvalidSyntax)
    }
}
