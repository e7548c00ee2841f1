//! Lexical analyzer
//!
//! The lexer is permissive: it never rejects a character sequence.  Whatever is not whitespace,
//! a comment or one of the fixed symbols accumulates into a word that the parser validates later.

use std::collections::TryReserveError;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;
use tracing::debug;

use crate::diag::Position;
use crate::token::{Token, SYMBOLS};

#[derive(Debug, PartialEq, Error)]
pub enum LexError {
    #[error("out of memory while lexing near {pos}")]
    OutOfMemory {
        pos: Position,
        #[source]
        source: TryReserveError,
    },
}

/// Turns source text into the sequence of tokens it contains.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(source).run()?;
    debug!(count = tokens.len(), "lexed source");
    Ok(tokens)
}

struct Lexer<'s> {
    input: Peekable<Chars<'s>>,
    line: u32,
    column: u32,
    tokens: Vec<Token>,

    // Word being accumulated and where it started.
    buf: String,
    buf_start: Position,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Lexer<'s> {
        Lexer {
            input: source.chars().peekable(),
            line: 1,
            column: 0,
            tokens: vec![],
            buf: String::new(),
            buf_start: Position::default(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.input.next() {
            let pos = self.advance(ch);
            match ch {
                '\n' | ' ' | '\t' | '\r' => self.flush()?,
                '/' if self.input.peek() == Some(&'/') => {
                    self.flush()?;
                    self.skip_comment();
                }
                _ if SYMBOLS.contains(&ch) => {
                    self.flush()?;
                    self.push(Token::symbol(ch, pos))?;
                }
                _ => {
                    if self.buf.is_empty() {
                        self.buf_start = pos;
                    }
                    self.buf.push(ch);
                }
            }
        }
        self.flush()?;
        Ok(self.tokens)
    }

    /// Updates line and column for `ch` and returns its position.
    fn advance(&mut self, ch: char) -> Position {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Skips everything up to, but not including, the next newline.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.input.next_if(|&ch| ch != '\n') {
            self.advance(ch);
        }
    }

    fn flush(&mut self) -> Result<(), LexError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut self.buf);
        self.push(Token::word(text, self.buf_start))
    }

    fn push(&mut self, token: Token) -> Result<(), LexError> {
        self.tokens
            .try_reserve(1)
            .map_err(|source| LexError::OutOfMemory {
                pos: token.pos(),
                source,
            })?;
        self.tokens.push(token);
        Ok(())
    }
}
