//! Recognition of dependency-loading calls
//!
//! Only `require("literal")` with the global, unshadowed `require` is
//! eligible. Every other shape is reported with the reason it was rejected so
//! the collector can log why a call stays in the output.

use log::trace;
use swc_core::ecma::ast::{Callee, Expr, Lit, Str};

use crate::scope::{ScopeId, ScopeTable};

/// Result of inspecting one expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallClass<'e> {
    /// Rewritable call; carries the dependency path literal
    Eligible(&'e Str),
    /// Not a call to the loader name at all
    NotLoaderCall,
    /// Loader name resolves to a local declaration
    Shadowed,
    /// Loader call whose arguments are not a single string literal
    UnsupportedArguments,
}

impl CallClass<'_> {
    /// Whether the expression calls the loader name, eligible or not
    pub fn is_loader_call(self) -> bool {
        !matches!(self, Self::NotLoaderCall)
    }
}

/// Decides whether an expression is a genuine dependency-loading call
#[derive(Debug, Clone, Copy)]
pub struct CallClassifier<'a> {
    loader: &'a str,
    scopes: &'a ScopeTable,
}

impl<'a> CallClassifier<'a> {
    pub fn new(loader: &'a str, scopes: &'a ScopeTable) -> Self {
        Self { loader, scopes }
    }

    /// Classify `expr`, which occurs in `scope`
    pub fn classify<'e>(&self, expr: &'e Expr, scope: ScopeId) -> CallClass<'e> {
        let Expr::Call(call) = expr else {
            return CallClass::NotLoaderCall;
        };
        let Callee::Expr(callee) = &call.callee else {
            return CallClass::NotLoaderCall;
        };
        let Expr::Ident(ident) = &**callee else {
            return CallClass::NotLoaderCall;
        };
        if &*ident.sym != self.loader {
            return CallClass::NotLoaderCall;
        }

        if let Some(declared_in) = self.scopes.resolve(scope, self.loader) {
            trace!(
                "`{}` call in {scope:?} resolves to a declaration in {declared_in:?}",
                self.loader
            );
            return CallClass::Shadowed;
        }

        let [argument] = call.args.as_slice() else {
            return CallClass::UnsupportedArguments;
        };
        if argument.spread.is_some() {
            return CallClass::UnsupportedArguments;
        }
        match &*argument.expr {
            Expr::Lit(Lit::Str(path)) => CallClass::Eligible(path),
            _ => CallClass::UnsupportedArguments,
        }
    }
}
