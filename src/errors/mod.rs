//! Error types and error handling for the front end.
//!
//! This module defines the errors produced by every stage:
//!
//! - Lexical errors, carried by ILLEGAL tokens
//! - Syntax errors, returned by the parser
//! - Declaration errors, reported through the resolver callback
//!
//! Each error carries the source position it refers to and a tip used
//! when rendering diagnostics.

pub mod errors;
