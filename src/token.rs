use std::fmt;

use crate::diag::Position;

/// Words recognized as keywords rather than identifiers.
pub const KEYWORDS: [&str; 5] = ["function", "return", "var", "let", "const"];

/// Characters that always form a token on their own.
pub const SYMBOLS: [char; 15] = [
    '{', '}', '(', ')', '[', ']', ';', '+', '-', '/', '*', '&', ',', '.', ':',
];

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Symbol,
    Number,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Keyword => write!(f, "keyword"),
            TokenKind::Symbol => write!(f, "symbol"),
            TokenKind::Number => write!(f, "number"),
        }
    }
}

/// "Words" produced by the lexer.
///
/// The raw text is kept as written: numbers are only converted by the parser.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Classifies a word accumulated by the lexer.
    ///
    /// Words that start like neither an identifier nor a number (`=`, `<=`, ...) are kept as
    /// symbols and left for the parser to reject or accept.
    pub fn word(text: String, pos: Position) -> Token {
        let kind = match text.chars().next() {
            Some(c) if c.is_ascii_digit() => TokenKind::Number,
            Some(c) if c.is_ascii_alphabetic() || c == '$' || c == '_' => {
                if KEYWORDS.contains(&text.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            _ => TokenKind::Symbol,
        };
        Token {
            kind,
            text,
            line: pos.line,
            column: pos.column,
        }
    }

    pub fn symbol(ch: char, pos: Position) -> Token {
        Token {
            kind: TokenKind::Symbol,
            text: ch.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }

    pub fn pos(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Position right after the last character of the token.
    pub fn end(&self) -> Position {
        Position {
            line: self.line,
            column: self.column + self.text.chars().count() as u32,
        }
    }

    /// True if this is the keyword or symbol spelled `text`.
    pub fn is(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Symbol) && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
