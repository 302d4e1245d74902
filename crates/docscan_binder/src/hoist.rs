//! Declaration hoisting.

use crate::binder::VarCollector;
use bumpalo::Bump;
use docscan_ast::visitor::Visitor;
use docscan_ast::{Function, Node, NodeKind, ScopeKind};
use rustc_hash::FxHashSet;

/// Return a copy of `body` with its function-scoped `var` declarations moved
/// to the front.
///
/// Hoisted declarations keep their first-occurrence order and duplicates are
/// dropped. All other nodes stay in their original order, with `var`
/// declarations removed from nested blocks and every nested function body
/// hoisted the same way.
pub fn hoist<'a>(arena: &'a Bump, body: &'a [Node<'a>]) -> &'a [Node<'a>] {
    let mut collector = VarCollector::default();
    collector.visit_nodes(body);

    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(body.len());
    for node in collector.names {
        if let NodeKind::VarDecl { name, .. } = node.kind {
            if seen.insert(name.value) {
                out.push(*node);
            }
        }
    }
    strip_into(arena, body, &mut out);
    arena.alloc_slice_copy(&out)
}

fn hoist_function<'a>(arena: &'a Bump, function: &'a Function<'a>) -> &'a Function<'a> {
    arena.alloc(Function {
        name: function.name,
        parameters: function.parameters,
        body: hoist(arena, function.body),
    })
}

fn strip<'a>(arena: &'a Bump, nodes: &'a [Node<'a>]) -> &'a [Node<'a>] {
    let mut out = Vec::with_capacity(nodes.len());
    strip_into(arena, nodes, &mut out);
    arena.alloc_slice_copy(&out)
}

fn strip_into<'a>(arena: &'a Bump, nodes: &'a [Node<'a>], out: &mut Vec<Node<'a>>) {
    for node in nodes {
        if let NodeKind::VarDecl {
            scope: ScopeKind::Var,
            ..
        } = node.kind
        {
            continue;
        }
        out.push(rebuild(arena, node));
    }
}

fn rebuild_all<'a>(arena: &'a Bump, nodes: &'a [Node<'a>]) -> &'a [Node<'a>] {
    let rebuilt: Vec<Node<'a>> = nodes.iter().map(|node| rebuild(arena, node)).collect();
    arena.alloc_slice_copy(&rebuilt)
}

fn rebuild<'a>(arena: &'a Bump, node: &'a Node<'a>) -> Node<'a> {
    let kind = match node.kind {
        NodeKind::Block(body) => NodeKind::Block(strip(arena, body)),
        NodeKind::Assign {
            target,
            operator,
            value,
        } => NodeKind::Assign {
            target,
            operator,
            value: arena.alloc(rebuild(arena, value)),
        },
        NodeKind::FunctionLiteral(function) => {
            NodeKind::FunctionLiteral(hoist_function(arena, function))
        }
        NodeKind::Iife {
            function,
            arguments,
        } => NodeKind::Iife {
            function: hoist_function(arena, function),
            arguments: rebuild_all(arena, arguments),
        },
        NodeKind::Return(Some(value)) => {
            let value: &'a Node<'a> = arena.alloc(rebuild(arena, value));
            NodeKind::Return(Some(value))
        }
        NodeKind::Call { callee, arguments } => NodeKind::Call {
            callee,
            arguments: rebuild_all(arena, arguments),
        },
        NodeKind::CallReference {
            path,
            arguments,
            chain,
            incomplete,
        } => NodeKind::CallReference {
            path,
            arguments: rebuild_all(arena, arguments),
            chain: rebuild_all(arena, chain),
            incomplete,
        },
        NodeKind::Instance(inner) => NodeKind::Instance(arena.alloc(rebuild(arena, inner))),
        NodeKind::ArrayLiteral(elements) => NodeKind::ArrayLiteral(rebuild_all(arena, elements)),
        other => other,
    };
    Node::with_comments(kind, node.comments_before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_parser::parse;

    fn names<'a>(nodes: &'a [Node<'a>]) -> Vec<String> {
        nodes
            .iter()
            .map(|node| match node.kind {
                NodeKind::VarDecl { scope, name } => format!("{} {}", scope, name.value),
                NodeKind::Assign { target, .. } => format!("{} =", target),
                NodeKind::Block(body) => format!("{{{}}}", names(body).join(", ")),
                NodeKind::CallReference { path: Some(path), .. } => format!("{}()", path),
                other => other.name().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_vars_move_to_front() {
        let arena = Bump::new();
        let program = parse(&arena, "a(); var x = 1; { var y; b(); } var x;").unwrap();
        let hoisted = hoist(&arena, program.body);
        assert_eq!(
            names(hoisted),
            vec!["var x", "var y", "a()", "x =", "{b()}"]
        );
    }

    #[test]
    fn test_let_stays_in_place() {
        let arena = Bump::new();
        let program = parse(&arena, "f(); { let a = 1; }").unwrap();
        let hoisted = hoist(&arena, program.body);
        assert_eq!(names(hoisted), vec!["f()", "{let a, a =}"]);
    }

    #[test]
    fn test_nested_function_bodies_are_hoisted() {
        let arena = Bump::new();
        let program = parse(&arena, "var f = function () { g(); var z = 2; };").unwrap();
        let hoisted = hoist(&arena, program.body);
        assert_eq!(names(hoisted), vec!["var f", "f ="]);
        let NodeKind::Assign { value, .. } = hoisted[1].kind else {
            panic!("expected an assignment");
        };
        let NodeKind::FunctionLiteral(function) = value.kind else {
            panic!("expected a function literal");
        };
        assert_eq!(names(function.body), vec!["var z", "g()", "z ="]);
    }

    #[test]
    fn test_empty_body() {
        let arena = Bump::new();
        assert!(hoist(&arena, &[]).is_empty());
    }
}
