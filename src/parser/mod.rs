//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with Go operator precedence and handles:
//!
//! - Top-level declarations (imports, constants, variables, types, functions)
//! - Statement parsing (assignments, blocks, control flow)
//! - Expression parsing (binary ops, calls, selectors, composite literals)
//! - Type parsing, including generic type parameters
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.
//! Parsing stops at the first syntax error.

pub mod decl;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
