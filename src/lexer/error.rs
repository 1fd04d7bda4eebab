use std::{error::Error, fmt};

use crate::position::Position;

/// A lexical error: always fatal to the token it was raised from, but never
/// fatal to the lexer — `next()` advances past the offending byte(s) so a
/// caller that ignores the error still makes progress.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl Error for LexError {}
