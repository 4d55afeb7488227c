//! Debug renderers for tokens, syntax trees and resolver output.
//!
//! - tree: indented `├──`/`└──` text rendering of declarations
//! - json: pretty printed JSON of anything serializable (tokens, AST)
//! - listing: one line per token, and the resolver summary

pub mod json;
pub mod listing;
pub mod tree;

#[cfg(test)]
mod tests;
