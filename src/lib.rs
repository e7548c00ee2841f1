//! A tree-walking interpreter for a small JavaScript-like language.
//!
//! Source text goes through three stages: [`lexer::lex`] produces tokens, [`parser::parse`]
//! builds a [`ast::Program`] by backtracking recursive descent, and [`eval::interpret`] binds the
//! top-level declarations and calls `main`.
//!
//! # Examples
//!
//! See [`crate::interpreter::run`].
//!
//! # Limitations
//!
//! - Only numbers and functions exist at run time: no strings, booleans, objects or control flow.
//! - Binary operators share one precedence level and fold to the left: `1 + 2 * 3` is `9`.
//! - `.` always splits tokens, so there are no fractional literals (write `3 / 2`).
//! - Unbounded recursion overflows the native stack.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod diag;
pub mod eval;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;

pub use interpreter::{render, run, Error};
