//! API to run the whole pipeline.

use thiserror::Error;

use crate::eval::{interpret, InterpretError};
use crate::lexer::{lex, LexError};
use crate::parser::{parse, ParseError};

/// Errors the interpreter can raise, by pipeline stage.
#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    /// Error occurring during syntactic analysis.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurring during evaluation.
    #[error("runtime error: {0}")]
    Interpret(#[from] InterpretError),
}

impl Error {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Lex(_) => 2,
            Error::Parse(_) => 3,
            Error::Interpret(_) => 4,
        }
    }
}

/// Lexes, parses and evaluates `source`, returning what its `main` function returns.
///
/// # Example
///
/// ```
/// # use minijs::interpreter::{run, render, Error};
/// let source = r#"
///     function square(x) { return x * x; }
///     function main() { return square(3) + 1; }
/// "#;
/// let result = run(source)?;
/// assert_eq!(result, 10.0);
/// assert_eq!(render(result), "10.000000");
/// # Ok::<(), Error>(())
/// ```
pub fn run(source: &str) -> Result<f64, Error> {
    let tokens = lex(source)?;
    let program = parse(&tokens)?;
    Ok(interpret(&program)?)
}

/// Renders a result with six decimals.
pub fn render(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.6}", value)
    }
}
