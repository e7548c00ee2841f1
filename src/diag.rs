use std::fmt;

use thiserror::Error;

/// Source location, line and column both starting at one.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A syntax error reported by an authoritative grammar rule.
#[derive(Debug, PartialEq, Error)]
#[error("{pos}: {kind}")]
pub struct SyntaxError {
    pub pos: Position,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, PartialEq, Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("unsupported operator '{0}'")]
    InvalidOperator(String),

    #[error("expected top-level declaration, found '{0}'")]
    TopLevelDeclarationExpected(String),
}
