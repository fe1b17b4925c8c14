//! Statement AST node factory functions
//!
//! This module provides factory functions for the statements the envelope
//! synthesizer emits. All statements are created with a synthetic span.

use swc_core::ecma::ast::{
    Decl, Expr, ExprStmt, ReturnStmt, Stmt, VarDecl, VarDeclKind, VarDeclarator,
};

use super::{ident, synthetic_span};

/// Creates an expression statement node.
///
/// # Example
/// ```rust,ignore
/// // Creates: `init();`
/// let stmt = expr_stmt(expressions::call(expressions::ident_expr("init"), vec![]));
/// ```
pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: synthetic_span(),
        expr: Box::new(expr),
    })
}

/// Creates a single-declarator `var` statement: `var name = init;`
pub fn var_decl(name: &str, init: Expr) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: synthetic_span(),
        kind: VarDeclKind::Var,
        decls: vec![VarDeclarator {
            span: synthetic_span(),
            name: ident(name).into(),
            init: Some(Box::new(init)),
            definite: false,
        }],
        ..Default::default()
    })))
}

/// Creates a return statement, with or without an argument
pub fn return_stmt(arg: Option<Expr>) -> Stmt {
    Stmt::Return(ReturnStmt {
        span: synthetic_span(),
        arg: arg.map(Box::new),
    })
}
