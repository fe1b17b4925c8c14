//! Collects the identifiers a binding pattern introduces
//!
//! Default values and computed keys are expressions, not bindings, so the
//! collector never descends into them.

use swc_core::ecma::{
    ast::{BindingIdent, Decorator, Expr, PropName},
    visit::{Visit, VisitWith},
};

/// Visitor returning binding names in pattern order
#[derive(Debug, Default)]
pub struct BindingNames {
    names: Vec<String>,
}

impl BindingNames {
    /// Collect the names bound by a pattern, parameter list or declarator
    pub fn collect<N>(node: &N) -> Vec<String>
    where
        N: VisitWith<Self> + ?Sized,
    {
        let mut collector = Self::default();
        node.visit_with(&mut collector);
        collector.names
    }
}

impl Visit for BindingNames {
    fn visit_binding_ident(&mut self, node: &BindingIdent) {
        self.names.push(node.id.sym.to_string());
    }

    fn visit_expr(&mut self, _node: &Expr) {}

    fn visit_prop_name(&mut self, _node: &PropName) {}

    fn visit_decorator(&mut self, _node: &Decorator) {}
}
