//! Per-module driver for the registration rewrite
//!
//! A [`ModuleTransform`] owns the state of one module's rewrite and runs the
//! pipeline at most once: scope table, dependency plan, deletion, partition,
//! envelope. Hosts either call [`ModuleTransform::run`] directly or hand the
//! transform to `visit_mut_with` as a [`VisitMut`].

use std::fmt;

use anyhow::{Result, bail};
use log::{debug, warn};
use swc_core::ecma::{
    ast::{Expr, ExprStmt, Lit, ModuleDecl, ModuleItem, Program, Stmt},
    atoms::Atom,
    visit::VisitMut,
};

use crate::{
    collector::DependencyCollector,
    config::Config,
    module_name::{ModuleNameResolver, ModuleSource},
    naming::UidGenerator,
    partition::partition,
    scope::ScopeTable,
    synthesizer::{Envelope, synthesize},
    types::ScriptDependency,
};

/// What a transformed module registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySummary {
    pub module_name: Option<String>,
    /// Script dependencies in `requires` order, paired with their parameters
    pub scripts: Vec<ScriptDependency>,
    /// Stylesheet paths in `cssRequires` order
    pub stylesheets: Vec<Atom>,
}

impl DependencySummary {
    /// Paths of the `requires` array
    pub fn requires(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|script| &*script.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Transformed(DependencySummary),
    /// This transform already rewrote a program; nothing was touched
    AlreadyTransformed,
}

/// Rewrites one lowered module into a registration call
pub struct ModuleTransform<'a> {
    config: &'a Config,
    resolver: &'a dyn ModuleNameResolver,
    source: ModuleSource<'a>,
    ran: bool,
}

impl fmt::Debug for ModuleTransform<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleTransform")
            .field("config", &self.config)
            .field("source", &self.source)
            .field("ran", &self.ran)
            .finish_non_exhaustive()
    }
}

impl<'a> ModuleTransform<'a> {
    pub fn new(
        config: &'a Config,
        resolver: &'a dyn ModuleNameResolver,
        source: ModuleSource<'a>,
    ) -> Self {
        Self {
            config,
            resolver,
            source,
            ran: false,
        }
    }

    pub fn has_run(&self) -> bool {
        self.ran
    }

    /// Rewrite `program` in place
    ///
    /// Fails without touching the tree when the program still contains
    /// `import` or `export` declarations.
    pub fn run(&mut self, program: &mut Program) -> Result<TransformOutcome> {
        if self.ran {
            debug!("Registration already synthesized, skipping");
            return Ok(TransformOutcome::AlreadyTransformed);
        }
        ensure_lowered(program)?;
        self.ran = true;

        let names = &self.config.names;
        let scopes = ScopeTable::build(program);
        let mut body = take_body(program);
        let directives = split_directives(&mut body);

        let uids = UidGenerator::new(&scopes)
            .with_reserved([names.namespace.as_str(), names.exports.as_str()]);
        let plan = DependencyCollector::new(&names.loader, &scopes, uids).plan(&body);
        let entries = plan.apply(&mut body);
        let dependencies = partition(entries, &names.stylesheet_prefix);
        if dependencies.is_empty() {
            debug!("No dependency declarations recognized");
        }

        let module_name = self.resolver.module_name(&self.source);
        let registration = synthesize(
            names,
            Envelope {
                module_name: module_name.as_deref(),
                dependencies: &dependencies,
                directives,
                body,
            },
        );
        replace_body(program, registration);

        Ok(TransformOutcome::Transformed(DependencySummary {
            module_name,
            scripts: dependencies.scripts,
            stylesheets: dependencies.stylesheets,
        }))
    }
}

impl VisitMut for ModuleTransform<'_> {
    fn visit_mut_program(&mut self, program: &mut Program) {
        if let Err(err) = self.run(program) {
            warn!("Leaving module untouched: {err:#}");
        }
    }
}

fn ensure_lowered(program: &Program) -> Result<()> {
    let Program::Module(module) = program else {
        return Ok(());
    };
    let Some(decl) = module.body.iter().find_map(|item| match item {
        ModuleItem::ModuleDecl(decl) => Some(decl),
        ModuleItem::Stmt(_) => None,
    }) else {
        return Ok(());
    };

    let kind = match decl {
        ModuleDecl::Import(_) => "an `import` declaration",
        ModuleDecl::TsImportEquals(_)
        | ModuleDecl::TsExportAssignment(_)
        | ModuleDecl::TsNamespaceExport(_) => "a TypeScript module declaration",
        _ => "an `export` declaration",
    };
    bail!("Module still contains {kind}; lower it to CommonJS first")
}

fn take_body(program: &mut Program) -> Vec<Stmt> {
    match program {
        Program::Module(module) => std::mem::take(&mut module.body)
            .into_iter()
            .filter_map(|item| match item {
                ModuleItem::Stmt(stmt) => Some(stmt),
                ModuleItem::ModuleDecl(_) => None,
            })
            .collect(),
        Program::Script(script) => std::mem::take(&mut script.body),
    }
}

/// Remove and return the leading directive prologue of `body`
fn split_directives(body: &mut Vec<Stmt>) -> Vec<Stmt> {
    let count = body
        .iter()
        .take_while(|stmt| {
            matches!(stmt, Stmt::Expr(ExprStmt { expr, .. }) if matches!(&**expr, Expr::Lit(Lit::Str(_))))
        })
        .count();
    body.drain(..count).collect()
}

fn replace_body(program: &mut Program, registration: Stmt) {
    match program {
        Program::Module(module) => module.body = vec![ModuleItem::Stmt(registration)],
        Program::Script(script) => script.body = vec![registration],
    }
}
