//! Registration envelope synthesis
//!
//! Builds `KISSY.add(name, function (S, ...bindings) { ... }, { requires,
//! cssRequires })` around what is left of a module body once its dependency
//! statements have been removed.
//!
//! A dependency bound to the namespace or exports name is still emitted as
//! written. The parameter then shadows the namespace, or the `var exports`
//! declaration overwrites the dependency, so such modules are reported at
//! `warn` level.

use log::{debug, warn};
use swc_core::ecma::ast::{Expr, Stmt};

use crate::{
    ast_builder::{expressions, ident, statements},
    config::NamesConfig,
    types::{PartitionedDependencies, ScriptDependency},
};

/// Everything the envelope is assembled from
#[derive(Debug)]
pub struct Envelope<'a> {
    pub module_name: Option<&'a str>,
    pub dependencies: &'a PartitionedDependencies,
    /// Leading directive prologue, moved to the top of the factory
    pub directives: Vec<Stmt>,
    /// Remaining module body
    pub body: Vec<Stmt>,
}

/// Produce the single registration statement that replaces the module body
pub fn synthesize(names: &NamesConfig, envelope: Envelope<'_>) -> Stmt {
    let Envelope {
        module_name,
        dependencies,
        directives,
        body,
    } = envelope;

    for script in reserved_bindings(names, dependencies) {
        warn!(
            "Dependency {:?} is bound to `{}`, which the {} factory also declares",
            &*script.path,
            &*script.binding,
            names.register
        );
    }

    let mut args = Vec::with_capacity(3);
    if let Some(name) = module_name {
        args.push(expressions::string_literal(name));
    }
    args.push(factory(names, dependencies, directives, body));
    args.push(options(dependencies));

    debug!(
        "Synthesized {} registration for {} with {} script and {} stylesheet dependencies",
        names.register,
        module_name.unwrap_or("<anonymous>"),
        dependencies.scripts.len(),
        dependencies.stylesheets.len()
    );
    statements::expr_stmt(expressions::call(
        expressions::member_path(&names.register),
        args,
    ))
}

/// Script dependencies whose binding clashes with the namespace or exports name
fn reserved_bindings<'d>(
    names: &'d NamesConfig,
    dependencies: &'d PartitionedDependencies,
) -> impl Iterator<Item = &'d ScriptDependency> {
    dependencies.scripts.iter().filter(|script| {
        *script.binding == *names.namespace || *script.binding == *names.exports
    })
}

/// `function (S, A, _c) { directives; var exports = {}; body; return exports.default; }`
fn factory(
    names: &NamesConfig,
    dependencies: &PartitionedDependencies,
    directives: Vec<Stmt>,
    body: Vec<Stmt>,
) -> Expr {
    let params = std::iter::once(ident(names.namespace.as_str()))
        .chain(
            dependencies
                .scripts
                .iter()
                .map(|script| ident(script.binding.clone())),
        )
        .collect();

    let mut stmts = Vec::with_capacity(directives.len() + body.len() + 2);
    stmts.extend(directives);
    stmts.push(statements::var_decl(
        &names.exports,
        expressions::object(vec![]),
    ));
    stmts.extend(body);
    stmts.push(statements::return_stmt(Some(expressions::member_path(
        &format!("{}.default", names.exports),
    ))));

    expressions::function(params, stmts)
}

/// `{ requires: [...], cssRequires: [...] }`
fn options(dependencies: &PartitionedDependencies) -> Expr {
    let requires = dependencies
        .scripts
        .iter()
        .map(|script| expressions::string_literal(&script.path))
        .collect();
    let css_requires = dependencies
        .stylesheets
        .iter()
        .map(|path| expressions::string_literal(path))
        .collect();

    expressions::object(vec![
        ("requires", expressions::array(requires)),
        ("cssRequires", expressions::array(css_requires)),
    ])
}
