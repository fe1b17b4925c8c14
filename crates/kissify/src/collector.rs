//! Dependency collection over a module's statements
//!
//! Collection is split in two phases. [`DependencyCollector::plan`] inspects
//! the untouched tree and records every recognized declaration together with
//! the statement list and index that hold it. [`CollectionPlan::apply`] then
//! removes those statements. Scope lookups therefore always run against the
//! tree as written, never against a partially rewritten one.
//!
//! Both phases walk the same statement lists in the same order: the module
//! body and the lists nested in its blocks, branches, loops, `try` and
//! `switch` statements. Functions, classes and expressions are not entered.
//! Bound declarations are recognized in every such list, bare calls only in
//! the module body.

use log::debug;
use rustc_hash::FxHashSet;
use swc_core::{
    common::Span,
    ecma::{
        ast::{
            BlockStmt, CatchClause, Class, Decl, Expr, ExprStmt, ForInStmt, ForOfStmt, ForStmt,
            Function, Pat, Stmt, Str, SwitchStmt, VarDecl,
        },
        visit::{Visit, VisitMut, VisitMutWith, VisitWith},
    },
};

use crate::{
    classifier::{CallClass, CallClassifier},
    naming::{UidGenerator, file_stem},
    scope::{ScopeId, ScopeTable},
    types::DependencyEntry,
};

/// Position of a statement: which walked list, then which index in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Slot {
    list: usize,
    index: usize,
}

/// Recognized dependencies plus the statements that declared them
#[derive(Debug, Default)]
pub struct CollectionPlan {
    entries: Vec<DependencyEntry>,
    removals: FxHashSet<Slot>,
}

impl CollectionPlan {
    /// Entries in source order
    pub fn entries(&self) -> &[DependencyEntry] {
        &self.entries
    }

    fn removes(&self, slot: Slot) -> bool {
        self.removals.contains(&slot)
    }

    fn record(&mut self, slot: Slot, entry: DependencyEntry) {
        self.entries.push(entry);
        self.removals.insert(slot);
    }

    /// Delete the planned statements from `body` and hand back the entries
    ///
    /// `body` must be the same statement list the plan was made from.
    pub fn apply(self, body: &mut Vec<Stmt>) -> Vec<DependencyEntry> {
        let mut remover = Remover {
            plan: &self,
            next_list: 0,
        };
        remover.visit_mut_stmts(body);
        self.entries
    }
}

/// Finds bare and bound `require` declarations at module level
#[derive(Debug)]
pub struct DependencyCollector<'a> {
    classifier: CallClassifier<'a>,
    scopes: &'a ScopeTable,
    uids: UidGenerator<'a>,
    plan: CollectionPlan,
    next_list: usize,
    /// Scope of the list being walked; `None` when it could not be found
    scope: Option<ScopeId>,
}

impl<'a> DependencyCollector<'a> {
    pub fn new(loader: &'a str, scopes: &'a ScopeTable, uids: UidGenerator<'a>) -> Self {
        Self {
            classifier: CallClassifier::new(loader, scopes),
            scopes,
            uids,
            plan: CollectionPlan::default(),
            next_list: 0,
            scope: Some(ScopeId::MODULE),
        }
    }

    /// Inspect `body` without modifying it
    pub fn plan(mut self, body: &[Stmt]) -> CollectionPlan {
        self.visit_stmts(body);
        self.plan
    }

    /// Walk a nested construct inside the scope it opened at `span`
    fn within(&mut self, span: Span, walk: impl FnOnce(&mut Self)) {
        let outer = self.scope;
        self.scope = outer.and_then(|_| self.scopes.scope_at(span));
        if outer.is_some() && self.scope.is_none() {
            debug!("No scope recorded at {span:?}, leaving nested declarations untouched");
        }
        walk(self);
        self.scope = outer;
    }

    fn recognize(
        &mut self,
        stmt: &Stmt,
        top_level: bool,
        scope: ScopeId,
    ) -> Option<DependencyEntry> {
        match stmt {
            Stmt::Expr(ExprStmt { expr, .. }) if top_level => self.recognize_bare(expr, scope),
            Stmt::Decl(Decl::Var(var)) => self.recognize_bound(var, scope),
            _ => None,
        }
    }

    fn recognize_bare(&mut self, expr: &Expr, scope: ScopeId) -> Option<DependencyEntry> {
        let path = self.eligible(expr, scope)?;
        let binding = self.uids.generate(file_stem(&path.value));
        Some(DependencyEntry::bare(binding, path.value.clone()))
    }

    fn recognize_bound(&mut self, var: &VarDecl, scope: ScopeId) -> Option<DependencyEntry> {
        let [declarator] = var.decls.as_slice() else {
            if var.decls.iter().any(|declarator| {
                declarator
                    .init
                    .as_deref()
                    .is_some_and(|init| self.classifier.classify(init, scope).is_loader_call())
            }) {
                debug!("Leaving multi-declarator statement with a loader call untouched");
            }
            return None;
        };

        let init = declarator.init.as_deref()?;
        let Pat::Ident(binding) = &declarator.name else {
            if self.classifier.classify(init, scope).is_loader_call() {
                debug!("Leaving destructured loader call untouched");
            }
            return None;
        };

        let path = self.eligible(init, scope)?;
        Some(DependencyEntry::bound(
            binding.id.sym.clone(),
            path.value.clone(),
        ))
    }

    fn eligible<'e>(&self, expr: &'e Expr, scope: ScopeId) -> Option<&'e Str> {
        match self.classifier.classify(expr, scope) {
            CallClass::Eligible(path) => Some(path),
            CallClass::NotLoaderCall => None,
            rejected => {
                debug!("Leaving loader call untouched: {rejected:?}");
                None
            }
        }
    }
}

impl Visit for DependencyCollector<'_> {
    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        let list = self.next_list;
        self.next_list += 1;

        for (index, stmt) in stmts.iter().enumerate() {
            let entry = match self.scope {
                Some(scope) => self.recognize(stmt, list == 0, scope),
                None => None,
            };
            match entry {
                Some(entry) => {
                    debug!(
                        "Collected {} dependency {:?} as `{}`",
                        if entry.is_bare { "bare" } else { "bound" },
                        &*entry.path,
                        &*entry.binding
                    );
                    self.plan.record(Slot { list, index }, entry);
                }
                None => stmt.visit_with(self),
            }
        }
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.within(node.span, |this| node.visit_children_with(this));
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        self.within(node.span, |this| node.visit_children_with(this));
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        self.within(node.span, |this| node.visit_children_with(this));
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        self.within(node.span, |this| node.visit_children_with(this));
    }

    fn visit_switch_stmt(&mut self, node: &SwitchStmt) {
        self.within(node.span, |this| node.visit_children_with(this));
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        // The clause body shares the scope of the catch parameter
        self.within(node.span, |this| this.visit_stmts(&node.body.stmts));
    }

    fn visit_expr(&mut self, _: &Expr) {}

    fn visit_function(&mut self, _: &Function) {}

    fn visit_class(&mut self, _: &Class) {}
}

/// Deletes planned statements, numbering lists exactly as the collector does
struct Remover<'p> {
    plan: &'p CollectionPlan,
    next_list: usize,
}

impl VisitMut for Remover<'_> {
    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        let list = self.next_list;
        self.next_list += 1;

        for stmt in stmts.iter_mut() {
            stmt.visit_mut_with(self);
        }

        let mut index = 0;
        stmts.retain(|_| {
            let keep = !self.plan.removes(Slot { list, index });
            index += 1;
            keep
        });
    }

    fn visit_mut_expr(&mut self, _: &mut Expr) {}

    fn visit_mut_function(&mut self, _: &mut Function) {}

    fn visit_mut_class(&mut self, _: &mut Class) {}
}

#[cfg(test)]
mod tests {
    use swc_core::ecma::ast::{ModuleItem, Program};

    use super::*;
    use crate::source;

    fn statements(code: &str) -> (Vec<Stmt>, ScopeTable) {
        let parsed = source::parse(code, "collect.js").expect("Failed to parse");
        let scopes = ScopeTable::build(&parsed.program);
        let Program::Module(module) = parsed.program else {
            panic!("Expected module");
        };
        let body = module
            .body
            .into_iter()
            .map(|item| match item {
                ModuleItem::Stmt(stmt) => stmt,
                ModuleItem::ModuleDecl(decl) => panic!("Unexpected module declaration {decl:?}"),
            })
            .collect();
        (body, scopes)
    }

    fn collect(code: &str) -> (Vec<DependencyEntry>, Vec<Stmt>) {
        let (mut body, scopes) = statements(code);
        let plan = DependencyCollector::new("require", &scopes, UidGenerator::new(&scopes))
            .plan(&body);
        let entries = plan.apply(&mut body);
        (entries, body)
    }

    fn summary(entries: &[DependencyEntry]) -> Vec<(String, String, bool)> {
        entries
            .iter()
            .map(|entry| (entry.binding.to_string(), entry.path.to_string(), entry.is_bare))
            .collect()
    }

    #[test]
    fn test_bare_and_bound_in_source_order() {
        let (entries, body) = collect(
            r#"
var A = require("./a");
require("css!./b.css");
require("./c");
A.init();
"#,
        );
        assert_eq!(
            summary(&entries),
            vec![
                ("A".to_owned(), "./a".to_owned(), false),
                ("_b".to_owned(), "css!./b.css".to_owned(), true),
                ("_c".to_owned(), "./c".to_owned(), true),
            ]
        );
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_let_and_const_bindings() {
        let (entries, body) = collect(
            r#"
let a = require("./a");
const b = require("./b");
"#,
        );
        assert_eq!(
            summary(&entries),
            vec![
                ("a".to_owned(), "./a".to_owned(), false),
                ("b".to_owned(), "./b".to_owned(), false),
            ]
        );
        assert!(body.is_empty());
    }

    #[test]
    fn test_unsupported_shapes_stay() {
        let code = r#"
var a = require("./a"), b = require("./b");
var { c } = require("./c");
use(require("./d"));
var e = require("./e").default;
function lazy() { return require("./f"); }
"#;
        let (entries, body) = collect(code);
        assert!(entries.is_empty());
        assert_eq!(body.len(), 5);
    }

    #[test]
    fn test_shadowed_loader_stays() {
        let (entries, body) = collect(
            r#"
function require(path) { return path; }
var a = require("./a");
require("./b");
"#,
        );
        assert!(entries.is_empty());
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn test_synthesized_names_avoid_collisions() {
        let (entries, _) = collect(
            r#"
var _c = 1;
require("./c");
require("../other/c.js");
"#,
        );
        let names: Vec<_> = entries.iter().map(|entry| entry.binding.to_string()).collect();
        assert_eq!(names, vec!["_c2", "_c3"]);
    }

    #[test]
    fn test_plan_does_not_touch_body() {
        let (body, scopes) = statements(
            r#"
require("./a");
foo();
var b = require("./b");
"#,
        );
        let plan = DependencyCollector::new("require", &scopes, UidGenerator::new(&scopes))
            .plan(&body);
        assert_eq!(body.len(), 3);
        assert!(plan.removes(Slot { list: 0, index: 0 }));
        assert!(!plan.removes(Slot { list: 0, index: 1 }));
        assert!(plan.removes(Slot { list: 0, index: 2 }));
        assert_eq!(plan.entries().len(), 2);
    }

    #[test]
    fn test_bound_declarations_in_nested_blocks() {
        let (entries, body) = collect(
            r#"
if (debug) {
    var log = require("./log");
} else {
    log = null;
}
try {
    var a = require("./a");
} catch (e) {
    const fallback = require("./fallback");
} finally {
    done();
}
for (let i = 0; i < 1; i++) {
    let step = require("./step");
}
switch (mode) {
    case 1:
        var one = require("./one");
        break;
}
label: {
    var b = require("./b");
}
"#,
        );
        let names: Vec<_> = summary(&entries)
            .into_iter()
            .map(|(binding, path, is_bare)| {
                assert!(!is_bare);
                (binding, path)
            })
            .collect();
        assert_eq!(
            names,
            vec![
                ("log".to_owned(), "./log".to_owned()),
                ("a".to_owned(), "./a".to_owned()),
                ("fallback".to_owned(), "./fallback".to_owned()),
                ("step".to_owned(), "./step".to_owned()),
                ("one".to_owned(), "./one".to_owned()),
                ("b".to_owned(), "./b".to_owned()),
            ]
        );
        assert_eq!(body.len(), 5);

        let Stmt::Try(attempt) = &body[1] else {
            panic!("Expected try statement");
        };
        assert!(attempt.block.stmts.is_empty());
        let handler = attempt.handler.as_ref().expect("catch clause");
        assert!(handler.body.stmts.is_empty());
        let finalizer = attempt.finalizer.as_ref().expect("finally block");
        assert_eq!(finalizer.stmts.len(), 1);

        let Stmt::Switch(switch) = &body[3] else {
            panic!("Expected switch statement");
        };
        assert_eq!(switch.cases[0].cons.len(), 1);
    }

    #[test]
    fn test_nested_bare_calls_and_functions_stay() {
        let (entries, body) = collect(
            r#"
if (debug) {
    require("./debug");
}
function lazy() {
    var a = require("./a");
}
var run = () => {
    var b = require("./b");
};
class Widget {
    init() {
        var c = require("./c");
    }
}
"#,
        );
        assert!(entries.is_empty());
        assert_eq!(body.len(), 4);
        let Stmt::If(branch) = &body[0] else {
            panic!("Expected if statement");
        };
        let Stmt::Block(block) = &*branch.cons else {
            panic!("Expected block");
        };
        assert_eq!(block.stmts.len(), 1);
    }

    #[test]
    fn test_block_scoped_loader_shadows_in_its_block() {
        let (entries, body) = collect(
            r#"
{
    let require = load;
    var a = require("./a");
}
var b = require("./b");
"#,
        );
        assert_eq!(
            summary(&entries),
            vec![("b".to_owned(), "./b".to_owned(), false)]
        );
        let Stmt::Block(block) = &body[0] else {
            panic!("Expected block");
        };
        assert_eq!(block.stmts.len(), 2);
    }

    #[test]
    fn test_catch_parameter_shadows_loader() {
        let (entries, body) = collect(
            r#"
try {
    var a = require("./a");
} catch (require) {
    var b = require("./b");
}
"#,
        );
        assert_eq!(
            summary(&entries),
            vec![("a".to_owned(), "./a".to_owned(), false)]
        );
        let Stmt::Try(attempt) = &body[0] else {
            panic!("Expected try statement");
        };
        assert!(attempt.block.stmts.is_empty());
        let handler = attempt.handler.as_ref().expect("catch clause");
        assert_eq!(handler.body.stmts.len(), 1);
    }
}
