//! Lexical analysis module for the front end.
//!
//! This module contains the scanner that converts source code into a
//! stream of positioned tokens. It handles:
//!
//! - The full Go operator and keyword set
//! - Integer literals in bases 2, 8, 10 and 16, decimal and hexadecimal
//!   floats and imaginary literals (decoded by [`crate::numeric`])
//! - Rune and string literals with escape decoding
//! - Comments, returned as COMMENT tokens
//! - Line/column tracking with a pushback buffer for lookahead

pub mod buffer;
pub mod lexer;
pub mod tokens;
