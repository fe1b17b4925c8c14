//! AST visitor implementations for kissify
//!
//! This module contains the read-only passes over JavaScript ASTs that feed
//! the scope table: binding-pattern name collection and the scope builder.

mod binding_names;
mod scope_builder;

pub use binding_names::BindingNames;
pub use scope_builder::ScopeBuilder;
