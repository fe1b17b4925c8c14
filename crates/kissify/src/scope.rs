//! Lexical scope table for a single JavaScript program
//!
//! The table is built once per module by
//! [`ScopeBuilder`](crate::visitors::ScopeBuilder) before any node is removed,
//! so every lookup answers against the original tree. It records which names
//! each scope declares (with `var` and function-level hoisting already
//! applied) and every identifier name that occurs anywhere in the program.
//! Block-like statements can be mapped back to the scope they opened through
//! their source span.

use rustc_hash::{FxHashMap, FxHashSet};
use swc_core::{common::Span, ecma::ast::Program};

use crate::{types::FxIndexSet, visitors::ScopeBuilder};

/// Index of a scope inside a [`ScopeTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The program's top-level scope, always the first one created
    pub const MODULE: Self = Self(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What introduced a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Program top level
    Module,
    /// Function, arrow, method, getter, setter or constructor body
    Function,
    /// Block statement, loop head or switch body
    Block,
    /// Catch clause parameter scope
    Catch,
    /// Name scope of a named class expression
    Class,
}

impl ScopeKind {
    /// Whether `var` declarations hoist to a scope of this kind
    pub fn is_var_target(self) -> bool {
        matches!(self, Self::Module | Self::Function)
    }
}

#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    bindings: FxIndexSet<String>,
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    #[cfg(test)]
    pub(crate) fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Whether this scope itself declares `name`
    pub fn declares(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

}

/// Scope tree plus the set of identifier names used anywhere in the program
#[derive(Debug)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    names_in_use: FxHashSet<String>,
    /// Scope opened by the statement at a span; `None` once two statements
    /// claimed the same span
    by_span: FxHashMap<Span, Option<ScopeId>>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    /// Create a table holding only the empty module scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Module,
                parent: None,
                bindings: FxIndexSet::default(),
            }],
            names_in_use: FxHashSet::default(),
            by_span: FxHashMap::default(),
        }
    }

    /// Build the table for a whole program in a single pass
    pub fn build(program: &Program) -> Self {
        ScopeBuilder::build(program)
    }

    pub(crate) fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            bindings: FxIndexSet::default(),
        });
        id
    }

    /// Remember that the statement at `span` opened `scope`
    pub(crate) fn attach(&mut self, span: Span, scope: ScopeId) {
        if span.is_dummy() {
            return;
        }
        self.by_span
            .entry(span)
            .and_modify(|slot| *slot = None)
            .or_insert(Some(scope));
    }

    pub(crate) fn declare(&mut self, scope: ScopeId, name: &str) {
        self.mark_used(name);
        let bindings = &mut self.scopes[scope.index()].bindings;
        if !bindings.contains(name) {
            bindings.insert(name.to_owned());
        }
    }

    pub(crate) fn mark_used(&mut self, name: &str) {
        if !self.names_in_use.contains(name) {
            self.names_in_use.insert(name.to_owned());
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    /// Scope opened by the block, loop, switch or catch clause at `span`
    ///
    /// Synthetic spans and spans shared by several statements have no entry.
    pub fn scope_at(&self, span: Span) -> Option<ScopeId> {
        self.by_span.get(&span).copied().flatten()
    }

    #[cfg(test)]
    pub(crate) fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(index, scope)| (ScopeId(index as u32), scope))
    }

    pub(crate) fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Find the nearest scope, starting at `scope` and walking outwards,
    /// that declares `name`
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let candidate = self.scope(id);
            if candidate.declares(name) {
                return Some(id);
            }
            current = candidate.parent;
        }
        None
    }

    /// Whether `name` has a local declaration visible from `scope`
    #[cfg(test)]
    pub(crate) fn is_bound(&self, scope: ScopeId, name: &str) -> bool {
        self.resolve(scope, name).is_some()
    }

    /// Whether `name` occurs anywhere in the program, declared or referenced
    pub fn is_name_in_use(&self, name: &str) -> bool {
        self.names_in_use.contains(name)
    }
}
