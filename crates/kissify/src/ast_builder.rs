//! AST builder module for creating synthetic AST nodes
//!
//! This module provides factory functions for creating JavaScript AST nodes
//! that don't originate from source files. All synthetic nodes use
//! `DUMMY_SP` and an empty syntax context to clearly indicate they are
//! generated.

use swc_core::{
    common::{DUMMY_SP, Span, SyntaxContext},
    ecma::{ast::Ident, atoms::Atom},
};

pub mod expressions;
pub mod statements;

/// Create a synthetic span for generated nodes
fn synthetic_span() -> Span {
    DUMMY_SP
}

/// Create an identifier with no hygiene information: `name`
pub fn ident(name: impl Into<Atom>) -> Ident {
    Ident::new(name.into(), synthetic_span(), SyntaxContext::empty())
}

#[cfg(test)]
mod tests {
    use swc_core::ecma::ast::{
        Callee, Decl, Expr, Lit, MemberProp, Pat, Prop, PropName, PropOrSpread, Stmt,
    };

    use super::*;

    #[test]
    fn test_member_path() {
        let expr = expressions::member_path("KISSY.add");
        match expr {
            Expr::Member(member) => {
                match &*member.obj {
                    Expr::Ident(obj) => assert_eq!(&*obj.sym, "KISSY"),
                    other => panic!("Expected Ident object, got {other:?}"),
                }
                match &member.prop {
                    MemberProp::Ident(prop) => assert_eq!(&*prop.sym, "add"),
                    other => panic!("Expected Ident property, got {other:?}"),
                }
            }
            other => panic!("Expected Member expression, got {other:?}"),
        }
    }

    #[test]
    fn test_member_path_single_segment() {
        match expressions::member_path("define") {
            Expr::Ident(ident) => assert_eq!(&*ident.sym, "define"),
            other => panic!("Expected Ident, got {other:?}"),
        }
    }

    #[test]
    fn test_call() {
        let expr = expressions::call(
            expressions::ident_expr("register"),
            vec![expressions::string_literal("name")],
        );
        match expr {
            Expr::Call(call) => {
                assert!(matches!(call.callee, Callee::Expr(_)));
                assert_eq!(call.args.len(), 1);
                match &*call.args[0].expr {
                    Expr::Lit(Lit::Str(s)) => assert_eq!(&*s.value, "name"),
                    other => panic!("Expected string literal, got {other:?}"),
                }
            }
            other => panic!("Expected Call expression, got {other:?}"),
        }
    }

    #[test]
    fn test_object_keeps_key_order() {
        let expr = expressions::object(vec![
            ("requires", expressions::array(vec![])),
            ("cssRequires", expressions::array(vec![])),
        ]);
        let Expr::Object(object) = expr else {
            panic!("Expected object literal");
        };
        let keys: Vec<_> = object
            .props
            .iter()
            .map(|prop| match prop {
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::KeyValue(kv) => match &kv.key {
                        PropName::Ident(key) => Some(key.sym.to_string()),
                        _ => None,
                    },
                    _ => None,
                },
                PropOrSpread::Spread(_) => None,
            })
            .collect();
        assert_eq!(
            keys,
            vec![Some("requires".to_owned()), Some("cssRequires".to_owned())]
        );
    }

    #[test]
    fn test_var_decl() {
        match statements::var_decl("exports", expressions::object(vec![])) {
            Stmt::Decl(Decl::Var(var)) => {
                assert_eq!(var.decls.len(), 1);
                match &var.decls[0].name {
                    Pat::Ident(binding) => assert_eq!(&*binding.id.sym, "exports"),
                    other => panic!("Expected identifier pattern, got {other:?}"),
                }
                assert!(var.decls[0].init.is_some());
            }
            other => panic!("Expected var declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_function_expression_params() {
        let expr = expressions::function(
            vec![ident("S"), ident("A"), ident("_c")],
            vec![statements::return_stmt(None)],
        );
        let Expr::Fn(function) = expr else {
            panic!("Expected function expression");
        };
        assert!(function.ident.is_none());
        let params: Vec<_> = function
            .function
            .params
            .iter()
            .map(|param| match &param.pat {
                Pat::Ident(binding) => binding.id.sym.to_string(),
                other => panic!("Expected identifier parameter, got {other:?}"),
            })
            .collect();
        assert_eq!(params, vec!["S", "A", "_c"]);
        assert_eq!(
            function.function.body.as_ref().map(|body| body.stmts.len()),
            Some(1)
        );
    }
}
