//! Rewrites CommonJS-lowered JavaScript modules into `KISSY.add` registrations.
//!
//! The pipeline for one module is linear: build the lexical scope table,
//! collect the top-level `require` declarations, partition them into script
//! and stylesheet dependencies, and synthesize the registration envelope.
//! [`transform::ModuleTransform`] drives it and guards against re-entry.

pub mod ast_builder;
pub mod classifier;
pub mod cli;
pub mod collector;
pub mod config;
pub mod module_name;
pub mod naming;
pub mod partition;
pub mod scope;
pub mod source;
pub mod synthesizer;
pub mod transform;
pub mod types;
pub mod visitors;

pub use config::Config;
pub use module_name::{
    FixedModuleName, ModuleNameResolver, ModuleSource, NoModuleName, RelativePathModuleName,
};
pub use transform::{DependencySummary, ModuleTransform, TransformOutcome};
