//! The binder implementation.
//!
//! Each function body is bound in two steps: its `var` declarations are
//! hoisted into the function scope first, then the body is walked in order,
//! opening block scopes for `{ … }`, binding `let` at the top of each block,
//! and resolving single-name assignment targets from the innermost scope out.

use crate::scope::{ScopeId, ScopeKind, ScopeTree};
use crate::symbol::{Assignment, Symbol, SymbolId, SymbolKind};
use docscan_ast::visitor::{walk_node, Visitor};
use docscan_ast::{Function, Node, NodeKind, Program, SymbolPath, Token};
use docscan_core::intern::NameInterner;

/// Collects the `var` declarations of one function body, looking into
/// nested blocks but not into nested functions.
#[derive(Default)]
pub(crate) struct VarCollector<'a> {
    pub(crate) names: Vec<&'a Node<'a>>,
}

impl<'a> Visitor<'a> for VarCollector<'a> {
    fn visit_node(&mut self, node: &'a Node<'a>) {
        if let NodeKind::VarDecl {
            scope: docscan_ast::ScopeKind::Var,
            ..
        } = node.kind
        {
            self.names.push(node);
        }
        walk_node(self, node);
    }

    fn visit_function(&mut self, _function: &'a Function<'a>) {}
}

/// Builds a `ScopeTree` for one program.
pub struct Binder {
    tree: ScopeTree,
}

impl Binder {
    /// Bind `program` with a fresh interner.
    pub fn bind(program: &Program<'_>) -> ScopeTree {
        Self::with_interner(NameInterner::new()).bind_program(program)
    }

    /// A binder interning names into a shared interner.
    pub fn with_interner(interner: NameInterner) -> Self {
        Self {
            tree: ScopeTree::new(interner),
        }
    }

    pub fn bind_program(mut self, program: &Program<'_>) -> ScopeTree {
        let root = ScopeId(0);
        self.bind_body(program.body, root);
        tracing::debug!(
            scopes = self.tree.scopes.len(),
            symbols = self.tree.symbols.len(),
            "bound program"
        );
        self.tree
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn declare(&mut self, scope: ScopeId, token: &Token<'_>, kind: SymbolKind) -> SymbolId {
        let name = self.tree.interner.intern(token.value);
        if let Some(existing) = self.tree.scopes[scope.index()].locals.get(name) {
            self.tree.symbol_mut(existing).declarations += 1;
            return existing;
        }
        self.new_symbol(scope, token.value, Some(token), kind, 1)
    }

    fn new_symbol(
        &mut self,
        scope: ScopeId,
        text: &str,
        token: Option<&Token<'_>>,
        kind: SymbolKind,
        declarations: u32,
    ) -> SymbolId {
        let name = self.tree.interner.intern(text);
        let id = SymbolId(self.tree.symbols.len() as u32);
        self.tree.symbols.push(Symbol {
            id,
            name,
            name_text: text.to_string(),
            kind,
            scope,
            position: token.map(|t| t.position),
            declarations,
            assignments: Vec::new(),
        });
        self.tree.scopes[scope.index()].locals.set(name, id);
        id
    }

    /// Hoist the `var`s of a function body into `scope`, then bind the body.
    fn bind_body<'a>(&mut self, body: &'a [Node<'a>], scope: ScopeId) {
        let mut vars = VarCollector::default();
        vars.visit_nodes(body);
        for node in vars.names {
            if let NodeKind::VarDecl { name, .. } = node.kind {
                self.declare(scope, name, SymbolKind::Var);
            }
        }
        self.bind_block(body, scope);
    }

    /// Bind the `let`s declared directly in `nodes`, then walk them.
    fn bind_block<'a>(&mut self, nodes: &'a [Node<'a>], scope: ScopeId) {
        for node in nodes {
            if let NodeKind::VarDecl {
                scope: docscan_ast::ScopeKind::Let,
                name,
            } = node.kind
            {
                self.declare(scope, name, SymbolKind::Let);
            }
        }
        for node in nodes {
            self.bind_node(node, scope);
        }
    }

    fn bind_function(&mut self, function: &Function<'_>, parent: ScopeId) {
        let scope = self
            .tree
            .add_scope(ScopeKind::Function, Some(function.name.to_string()), parent);
        for parameter in function.parameters {
            self.declare(scope, parameter, SymbolKind::Parameter);
        }
        self.bind_body(function.body, scope);
    }

    // ========================================================================
    // Walk
    // ========================================================================

    fn bind_nodes(&mut self, nodes: &[Node<'_>], scope: ScopeId) {
        for node in nodes {
            self.bind_node(node, scope);
        }
    }

    fn bind_node(&mut self, node: &Node<'_>, scope: ScopeId) {
        match node.kind {
            NodeKind::Block(body) => {
                let block = self.tree.add_scope(ScopeKind::Block, None, scope);
                self.bind_block(body, block);
            }
            NodeKind::Assign {
                target,
                operator,
                value,
            } => {
                self.record_assignment(scope, &target, operator, value);
                self.bind_node(value, scope);
            }
            NodeKind::FunctionLiteral(function) => self.bind_function(function, scope),
            NodeKind::Iife {
                function,
                arguments,
            } => {
                self.bind_nodes(arguments, scope);
                self.bind_function(function, scope);
            }
            NodeKind::Return(Some(value)) | NodeKind::Instance(value) => {
                self.bind_node(value, scope)
            }
            NodeKind::Call { arguments, .. } => self.bind_nodes(arguments, scope),
            NodeKind::CallReference {
                arguments, chain, ..
            } => {
                self.bind_nodes(arguments, scope);
                self.bind_nodes(chain, scope);
            }
            NodeKind::ArrayLiteral(elements) => self.bind_nodes(elements, scope),
            NodeKind::VarDecl { .. }
            | NodeKind::Return(None)
            | NodeKind::Reference { .. }
            | NodeKind::ObjectLiteral(_)
            | NodeKind::Primitive { .. }
            | NodeKind::Expression(_)
            | NodeKind::Skipped { .. } => {}
        }
    }

    /// Attach an assignment to the symbol its single-name target resolves
    /// to. Undeclared targets become implicit globals.
    fn record_assignment(
        &mut self,
        scope: ScopeId,
        target: &SymbolPath<'_>,
        operator: &str,
        value: &Node<'_>,
    ) {
        if target.as_single_name().is_none() {
            return;
        }
        let root = target.root();
        let name = self.tree.interner.intern(root.value);

        let mut current = Some(scope);
        let mut resolved = None;
        while let Some(id) = current {
            let scope = &self.tree.scopes[id.index()];
            if let Some(symbol) = scope.locals.get(name) {
                resolved = Some(symbol);
                break;
            }
            current = scope.parent;
        }

        let symbol = match resolved {
            Some(symbol) => symbol,
            None => {
                tracing::debug!(name = root.value, "implicit global");
                self.new_symbol(ScopeId(0), root.value, Some(root), SymbolKind::ImplicitGlobal, 0)
            }
        };
        self.tree.symbol_mut(symbol).assignments.push(Assignment {
            position: root.position,
            operator: operator.to_string(),
            value_kind: value.kind.name(),
        });
    }
}
