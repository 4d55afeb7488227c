//! Name resolution over the AST.
//!
//! [`resolver::resolve`] binds identifiers to [`scope::Object`]s held in
//! an arena alongside the [`scope::Scope`] tree.

pub mod resolver;
pub mod scope;

#[cfg(test)]
mod tests;
