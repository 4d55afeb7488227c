//! AST (Abstract Syntax Tree) module.
//!
//! Contains all definitions related to the AST structure. Every syntactic
//! category is a closed enum; nodes own their children and record a span.
//!
//! Submodules:
//! - ast: identifiers, their binding slot and the borrowed [`ast::Node`] view
//! - expressions: expression nodes
//! - statements: statement nodes
//! - types: array, struct and function types, fields
//! - declarations: specs and top-level declarations
//! - visitor: generic depth-first walk over [`ast::Node`]
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod statements;
pub mod types;
pub mod visitor;
