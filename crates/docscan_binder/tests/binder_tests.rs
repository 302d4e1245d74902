//! Binder integration tests.

use bumpalo::Bump;
use docscan_binder::{Binder, ScopeId, ScopeKind, ScopeTree, SymbolKind};
use docscan_parser::parse;

fn bind(source: &str) -> ScopeTree {
    let arena = Bump::new();
    let program = parse(&arena, source).expect("parse failed");
    Binder::bind(&program)
}

fn local_names(tree: &ScopeTree, scope: ScopeId) -> Vec<String> {
    tree.symbols_in(scope)
        .map(|symbol| format!("{} {}", symbol.kind, symbol.name_text))
        .collect()
}

#[test]
fn test_empty_program() {
    let tree = bind("");
    assert_eq!(tree.scopes().len(), 1);
    assert_eq!(tree.root().kind, ScopeKind::Program);
    assert!(tree.symbols().is_empty());
}

#[test]
fn test_program_symbols_in_declaration_order() {
    let tree = bind("var b = 1; var a; var b;");
    assert_eq!(local_names(&tree, ScopeId(0)), vec!["var b", "var a"]);
    let b = tree.lookup(ScopeId(0), "b").unwrap();
    assert_eq!(b.declarations, 2);
    assert_eq!(b.assignments.len(), 1);
    assert_eq!(b.assignments[0].value_kind, "Primitive");
}

#[test]
fn test_function_scope_with_parameters() {
    let tree = bind("function foo(a, b) { var c = a; return c; }");
    assert_eq!(local_names(&tree, ScopeId(0)), vec!["var foo"]);

    let function = tree.scope(ScopeId(1));
    assert_eq!(function.kind, ScopeKind::Function);
    assert_eq!(function.name.as_deref(), Some("foo"));
    assert_eq!(function.parent, Some(ScopeId(0)));
    assert_eq!(
        local_names(&tree, ScopeId(1)),
        vec!["param a", "param b", "var c"]
    );
    // The function's own name is not bound inside it.
    assert_eq!(tree.lookup(ScopeId(1), "foo").unwrap().scope, ScopeId(0));
}

#[test]
fn test_var_inside_block_is_function_scoped() {
    let tree = bind("function f() { { var x = 1; } }");
    assert_eq!(local_names(&tree, ScopeId(1)), vec!["var x"]);
    let block = tree.scope(ScopeId(2));
    assert_eq!(block.kind, ScopeKind::Block);
    assert!(block.locals.is_empty());
}

#[test]
fn test_assignment_before_declaration_resolves_to_hoisted_var() {
    let tree = bind("y = 1; var y;");
    let y = tree.lookup(ScopeId(0), "y").unwrap();
    assert_eq!(y.kind, SymbolKind::Var);
    assert_eq!(y.assignments.len(), 1);
    assert_eq!(tree.symbols().len(), 1);
}

#[test]
fn test_let_is_block_scoped() {
    let tree = bind("{ let a = 1; } a = 2;");
    let block = ScopeId(1);
    assert_eq!(local_names(&tree, block), vec!["let a"]);
    assert_eq!(tree.lookup(block, "a").unwrap().assignments.len(), 1);

    // Outside the block the assignment creates an implicit global.
    let global = tree.lookup(ScopeId(0), "a").unwrap();
    assert_eq!(global.kind, SymbolKind::ImplicitGlobal);
    assert_eq!(global.declarations, 0);
    assert_eq!(global.assignments.len(), 1);
}

#[test]
fn test_shadowing_resolves_to_nearest_scope() {
    let tree = bind("var x; function f(x) { x = 1; } x = 2;");
    let outer = tree.lookup(ScopeId(0), "x").unwrap();
    let inner = tree.lookup(ScopeId(1), "x").unwrap();
    assert_eq!(inner.kind, SymbolKind::Parameter);
    assert_eq!(inner.assignments.len(), 1);
    assert_eq!(outer.assignments.len(), 1);
    assert_ne!(outer.id, inner.id);
}

#[test]
fn test_implicit_globals_from_nested_functions() {
    let tree = bind("function f() { counter = 1; }");
    let counter = tree.lookup(ScopeId(0), "counter").unwrap();
    assert_eq!(counter.kind, SymbolKind::ImplicitGlobal);
    assert_eq!(counter.scope, ScopeId(0));
}

#[test]
fn test_member_assignments_are_not_symbols() {
    let tree = bind("var a = {}; a.b = 1; a['c'] = 2;");
    let a = tree.lookup(ScopeId(0), "a").unwrap();
    assert_eq!(a.assignments.len(), 1);
    assert_eq!(tree.symbols().len(), 1);
}

#[test]
fn test_anonymous_function_scopes() {
    let tree = bind("(function (dojo) { var d = dojo; })(window); x = function () {};");
    let names: Vec<Option<&str>> = tree
        .root()
        .children
        .iter()
        .map(|id| tree.scope(*id).name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("*anon1"), Some("*anon2")]);
    assert_eq!(
        local_names(&tree, ScopeId(1)),
        vec!["param dojo", "var d"]
    );
}

#[test]
fn test_compound_assignment_operator_recorded() {
    let tree = bind("var n = 0; n += 2;");
    let n = tree.lookup(ScopeId(0), "n").unwrap();
    let operators: Vec<&str> = n.assignments.iter().map(|a| a.operator.as_str()).collect();
    assert_eq!(operators, vec!["=", "+="]);
}

#[test]
fn test_display_outline() {
    let tree = bind("var f = function (a) { let b; };");
    let outline = tree.to_string();
    assert_eq!(
        outline,
        "program\n  var f =FunctionLiteral @1:5\n  function *anon1\n    param a\n    let b\n"
    );
}

#[test]
fn test_shared_interner() {
    let interner = docscan_core::intern::NameInterner::new();
    let arena = Bump::new();
    let program = parse(&arena, "var shared;").unwrap();
    let tree = Binder::with_interner(interner.clone()).bind_program(&program);
    assert!(interner.get("shared").is_some());
    assert_eq!(tree.interner().len(), interner.len());
}
