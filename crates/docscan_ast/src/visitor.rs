//! AST visitor trait for traversing the syntax tree.
//!
//! Default implementations walk into every child, so an implementor only
//! overrides the nodes it cares about. Token trees are not descended into.

use crate::node::*;
use crate::tree::SymbolPath;

/// A read-only visitor over a node sequence.
pub trait Visitor<'a> {
    fn visit_program(&mut self, program: &Program<'a>) {
        self.visit_nodes(program.body);
    }

    fn visit_nodes(&mut self, nodes: &'a [Node<'a>]) {
        for node in nodes {
            self.visit_node(node);
        }
    }

    fn visit_node(&mut self, node: &'a Node<'a>) {
        walk_node(self, node);
    }

    fn visit_function(&mut self, function: &'a Function<'a>) {
        self.visit_nodes(function.body);
    }

    fn visit_symbol_path(&mut self, _path: &SymbolPath<'a>) {}
}

/// Visit the children of `node`.
pub fn walk_node<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, node: &'a Node<'a>) {
    match node.kind {
        NodeKind::Block(body) => visitor.visit_nodes(body),
        NodeKind::VarDecl { .. } => {}
        NodeKind::Assign { target, value, .. } => {
            visitor.visit_symbol_path(&target);
            visitor.visit_node(value);
        }
        NodeKind::FunctionLiteral(function) => visitor.visit_function(function),
        NodeKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_node(value);
            }
        }
        NodeKind::Call { callee, arguments } => {
            visitor.visit_symbol_path(&callee);
            visitor.visit_nodes(arguments);
        }
        NodeKind::Reference { path, .. } => {
            if let Some(path) = path {
                visitor.visit_symbol_path(&path);
            }
        }
        NodeKind::CallReference {
            path,
            arguments,
            chain,
            ..
        } => {
            if let Some(path) = path {
                visitor.visit_symbol_path(&path);
            }
            visitor.visit_nodes(arguments);
            visitor.visit_nodes(chain);
        }
        NodeKind::Instance(inner) => visitor.visit_node(inner),
        NodeKind::ArrayLiteral(elements) => visitor.visit_nodes(elements),
        NodeKind::ObjectLiteral(_) | NodeKind::Expression(_) => {}
        NodeKind::Primitive { .. } => {}
        NodeKind::Iife {
            function,
            arguments,
        } => {
            visitor.visit_function(function);
            visitor.visit_nodes(arguments);
        }
        NodeKind::Skipped { .. } => {}
    }
}

/// Counts every node reachable from a sequence, nested ones included.
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub count: usize,
}

impl<'a> Visitor<'a> for NodeCounter {
    fn visit_node(&mut self, node: &'a Node<'a>) {
        self.count += 1;
        walk_node(self, node);
    }
}

/// Count all nodes in `nodes`, including nested ones.
pub fn count_nodes<'a>(nodes: &'a [Node<'a>]) -> usize {
    let mut counter = NodeCounter::default();
    counter.visit_nodes(nodes);
    counter.count
}
