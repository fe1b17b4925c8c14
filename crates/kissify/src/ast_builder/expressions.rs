//! Expression AST node factory functions
//!
//! Every node is created with a synthetic span and an empty syntax context.

use swc_core::ecma::ast::{
    ArrayLit, BlockStmt, CallExpr, Callee, Expr, ExprOrSpread, FnExpr, Function, Ident,
    IdentName, KeyValueProp, Lit, MemberExpr, MemberProp, ObjectLit, Param, Pat, Prop, PropName,
    PropOrSpread, Stmt, Str,
};

use super::{ident, synthetic_span};

/// Creates an identifier reference: `name`
pub fn ident_expr(name: &str) -> Expr {
    Expr::Ident(ident(name))
}

/// Creates a string literal: `"value"`
pub fn string_literal(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
        span: synthetic_span(),
        value: value.into(),
        raw: None,
    }))
}

/// Creates an array literal with no holes or spreads
pub fn array(elements: Vec<Expr>) -> Expr {
    Expr::Array(ArrayLit {
        span: synthetic_span(),
        elems: elements
            .into_iter()
            .map(|expr| {
                Some(ExprOrSpread {
                    spread: None,
                    expr: Box::new(expr),
                })
            })
            .collect(),
    })
}

/// Creates an object literal with identifier keys, in the given order
pub fn object(properties: Vec<(&str, Expr)>) -> Expr {
    Expr::Object(ObjectLit {
        span: synthetic_span(),
        props: properties
            .into_iter()
            .map(|(key, value)| {
                PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new(key.into(), synthetic_span())),
                    value: Box::new(value),
                })))
            })
            .collect(),
    })
}

/// Creates a dotted member chain from a path such as `KISSY.add`
///
/// A path without dots yields a plain identifier.
pub fn member_path(path: &str) -> Expr {
    let mut segments = path.split('.');
    let root = ident_expr(segments.next().unwrap_or(path));
    segments.fold(root, |object, segment| {
        Expr::Member(MemberExpr {
            span: synthetic_span(),
            obj: Box::new(object),
            prop: MemberProp::Ident(IdentName::new(segment.into(), synthetic_span())),
        })
    })
}

/// Creates a call expression: `callee(args...)`
pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        span: synthetic_span(),
        callee: Callee::Expr(Box::new(callee)),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        ..Default::default()
    })
}

/// Creates an anonymous function expression: `function (params...) { body }`
pub fn function(params: Vec<Ident>, body: Vec<Stmt>) -> Expr {
    Expr::Fn(FnExpr {
        ident: None,
        function: Box::new(Function {
            params: params
                .into_iter()
                .map(|param| Param {
                    span: synthetic_span(),
                    decorators: Vec::new(),
                    pat: Pat::Ident(param.into()),
                })
                .collect(),
            body: Some(BlockStmt {
                span: synthetic_span(),
                stmts: body,
                ..Default::default()
            }),
            span: synthetic_span(),
            ..Default::default()
        }),
    })
}
