//! Diagnostics shared by the lexer, parser and both execution backends.
//!
//! Three kinds of failure are distinguishable by variant, matching the
//! lex/parse/runtime split a host embedding the language needs to report
//! errors sensibly.
use std::{error::Error, fmt::Display};

/// A `(line, column)` source position, 1-indexed.
pub type Position = (usize, usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    Lex { message: String, position: Position },
    Parse { message: String, position: Position },
    Runtime {
        message: String,
        position: Option<Position>,
    },
}

impl Diagnostic {
    pub fn lex(message: impl Into<String>, position: Position) -> Self {
        Self::Lex {
            message: message.into(),
            position,
        }
    }

    pub fn parse(message: impl Into<String>, position: Position) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
            position: None,
        }
    }

    pub fn runtime_at(message: impl Into<String>, position: Position) -> Self {
        Self::Runtime {
            message: message.into(),
            position: Some(position),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex { message, position } => {
                write!(f, "Lex error at {}:{}: {message}", position.0, position.1)
            }
            Self::Parse { message, position } => {
                write!(
                    f,
                    "Parse error at {}:{}: {message}",
                    position.0, position.1
                )
            }
            Self::Runtime { message, position } => match position {
                Some((line, col)) => write!(f, "Runtime error at {line}:{col}: {message}"),
                None => write!(f, "Runtime error: {message}"),
            },
        }
    }
}

impl Error for Diagnostic {}
