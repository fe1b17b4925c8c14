//! Shared type definitions for the kissify crate
//!
//! This module contains the dependency records that flow from the collector
//! through the partitioner into the synthesizer, plus the ordered-set alias
//! used by the scope table.

use std::hash::BuildHasherDefault;

use indexmap::IndexSet;
use rustc_hash::FxHasher;
use swc_core::ecma::atoms::Atom;

/// Insertion-ordered set with the Fx hasher
pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// One recognized dependency-loading call
///
/// Entries are produced in source order by the collector and consumed by the
/// partitioner within the same module transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Name the factory body uses to refer to the dependency
    pub binding: Atom,
    /// Dependency path exactly as written in the `require` call
    pub path: Atom,
    /// True when the call was a free-standing statement with no binding
    pub is_bare: bool,
}

impl DependencyEntry {
    /// Entry for a free-standing `require("...")` statement
    pub fn bare(binding: Atom, path: Atom) -> Self {
        Self {
            binding,
            path,
            is_bare: true,
        }
    }

    /// Entry for `var name = require("...")`
    pub fn bound(binding: Atom, path: Atom) -> Self {
        Self {
            binding,
            path,
            is_bare: false,
        }
    }
}

/// A script dependency paired with the factory parameter that receives it
///
/// The synthesizer derives both the `requires` array and the factory
/// parameter list from one sequence of these, so the two can never drift
/// out of positional alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDependency {
    pub path: Atom,
    pub binding: Atom,
}

/// Output of the partitioner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedDependencies {
    /// Script dependencies in source order
    pub scripts: Vec<ScriptDependency>,
    /// Stylesheet paths in source order, reserved prefix already stripped
    pub stylesheets: Vec<Atom>,
}

impl PartitionedDependencies {
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.stylesheets.is_empty()
    }
}
