//! Single-pass builder for the lexical [`ScopeTable`]
//!
//! Declarations are attached to the scope JavaScript puts them in: `var` goes
//! to the nearest function or module scope, `let`/`const`/`class` and block
//! level functions go to the enclosing block. Because lookups only happen
//! after the whole program has been walked, hoisting needs no extra pass.
//! Blocks, loops, switch bodies and catch clauses attach the scope they open
//! to their span so later passes can find it again.

use log::trace;
use swc_core::{
    common::Span,
    ecma::{
        ast::{
            ArrowExpr, BlockStmt, BlockStmtOrExpr, CatchClause, ClassDecl, ClassExpr,
            Constructor, FnDecl, FnExpr, ForInStmt, ForOfStmt, ForStmt, Function, GetterProp,
            Ident, ImportDecl, ImportSpecifier, Program, SetterProp, SwitchStmt, VarDecl,
            VarDeclKind,
        },
        visit::{Visit, VisitWith},
    },
};

use crate::{
    scope::{ScopeId, ScopeKind, ScopeTable},
    visitors::BindingNames,
};

/// Visitor that records declarations per scope and every identifier name
#[derive(Debug)]
pub struct ScopeBuilder {
    table: ScopeTable,
    stack: Vec<ScopeId>,
}

impl Default for ScopeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeBuilder {
    pub fn new() -> Self {
        Self {
            table: ScopeTable::new(),
            stack: vec![ScopeId::MODULE],
        }
    }

    /// Walk `program` once and return the finished table
    pub fn build(program: &Program) -> ScopeTable {
        let mut builder = Self::new();
        program.visit_with(&mut builder);
        trace!("Built scope table with {} scopes", builder.table.len());
        builder.table
    }

    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::MODULE)
    }

    /// Nearest enclosing scope that receives `var` declarations
    fn var_scope(&self) -> ScopeId {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|id| self.table.scope(*id).kind().is_var_target())
            .unwrap_or(ScopeId::MODULE)
    }

    fn enter(&mut self, kind: ScopeKind) -> ScopeId {
        let id = self.table.push_scope(kind, self.current());
        self.stack.push(id);
        id
    }

    fn enter_at(&mut self, kind: ScopeKind, span: Span) -> ScopeId {
        let id = self.enter(kind);
        self.table.attach(span, id);
        id
    }

    fn leave(&mut self) {
        // The module scope is never popped
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn declare_all(&mut self, scope: ScopeId, names: Vec<String>) {
        for name in names {
            self.table.declare(scope, &name);
        }
    }
}

impl Visit for ScopeBuilder {
    fn visit_ident(&mut self, node: &Ident) {
        self.table.mark_used(&node.sym);
    }

    fn visit_var_decl(&mut self, node: &VarDecl) {
        let target = match node.kind {
            VarDeclKind::Var => self.var_scope(),
            VarDeclKind::Let | VarDeclKind::Const => self.current(),
        };
        self.declare_all(target, BindingNames::collect(&node.decls));
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.table.declare(self.current(), &node.ident.sym);
        node.visit_children_with(self);
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        match &node.ident {
            Some(ident) => {
                // The name of a function expression is only visible inside it
                let scope = self.enter(ScopeKind::Block);
                self.table.declare(scope, &ident.sym);
                node.function.visit_with(self);
                self.leave();
            }
            None => node.function.visit_with(self),
        }
    }

    fn visit_function(&mut self, node: &Function) {
        let scope = self.enter(ScopeKind::Function);
        self.declare_all(scope, BindingNames::collect(&node.params));
        node.decorators.visit_with(self);
        node.params.visit_with(self);
        if let Some(body) = &node.body {
            body.stmts.visit_with(self);
        }
        self.leave();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let scope = self.enter(ScopeKind::Function);
        self.declare_all(scope, BindingNames::collect(&node.params));
        node.params.visit_with(self);
        match &*node.body {
            BlockStmtOrExpr::BlockStmt(block) => block.stmts.visit_with(self),
            BlockStmtOrExpr::Expr(expr) => expr.visit_with(self),
        }
        self.leave();
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        node.key.visit_with(self);
        let scope = self.enter(ScopeKind::Function);
        self.declare_all(scope, BindingNames::collect(&node.params));
        node.params.visit_with(self);
        if let Some(body) = &node.body {
            body.stmts.visit_with(self);
        }
        self.leave();
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        node.key.visit_with(self);
        self.enter(ScopeKind::Function);
        if let Some(body) = &node.body {
            body.stmts.visit_with(self);
        }
        self.leave();
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        node.key.visit_with(self);
        let scope = self.enter(ScopeKind::Function);
        self.declare_all(scope, BindingNames::collect(&*node.param));
        node.param.visit_with(self);
        if let Some(body) = &node.body {
            body.stmts.visit_with(self);
        }
        self.leave();
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.enter_at(ScopeKind::Block, node.span);
        node.visit_children_with(self);
        self.leave();
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        self.enter_at(ScopeKind::Block, node.span);
        node.visit_children_with(self);
        self.leave();
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        self.enter_at(ScopeKind::Block, node.span);
        node.visit_children_with(self);
        self.leave();
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        self.enter_at(ScopeKind::Block, node.span);
        node.visit_children_with(self);
        self.leave();
    }

    fn visit_switch_stmt(&mut self, node: &SwitchStmt) {
        node.discriminant.visit_with(self);
        self.enter_at(ScopeKind::Block, node.span);
        node.cases.visit_with(self);
        self.leave();
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let scope = self.enter_at(ScopeKind::Catch, node.span);
        if let Some(param) = &node.param {
            self.declare_all(scope, BindingNames::collect(param));
            param.visit_with(self);
        }
        node.body.stmts.visit_with(self);
        self.leave();
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.table.declare(self.current(), &node.ident.sym);
        node.visit_children_with(self);
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        match &node.ident {
            Some(ident) => {
                let scope = self.enter(ScopeKind::Class);
                self.table.declare(scope, &ident.sym);
                node.class.visit_with(self);
                self.leave();
            }
            None => node.class.visit_with(self),
        }
    }

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        for specifier in &node.specifiers {
            let local = match specifier {
                ImportSpecifier::Named(named) => &named.local,
                ImportSpecifier::Default(default) => &default.local,
                ImportSpecifier::Namespace(namespace) => &namespace.local,
            };
            self.table.declare(ScopeId::MODULE, &local.sym);
        }
        node.visit_children_with(self);
    }
}
