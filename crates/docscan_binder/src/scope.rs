//! Scopes and the scope tree produced by binding.

use crate::symbol::{Symbol, SymbolId, SymbolTable};
use docscan_core::intern::NameInterner;
use std::fmt;

/// Index of a scope in its `ScopeTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The top level of a source unit.
    Program,
    Function,
    Block,
}

/// A scope in the binding phase. Scopes form a chain from inner to outer.
#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// The function name (or `*anon<N>`) for function scopes.
    pub name: Option<String>,
    /// The symbols declared in this scope.
    pub locals: SymbolTable,
    /// The enclosing scope (None for the program scope).
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
}

/// All scopes and symbols of one program.
#[derive(Debug)]
pub struct ScopeTree {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) interner: NameInterner,
}

impl ScopeTree {
    pub(crate) fn new(interner: NameInterner) -> Self {
        let root = Scope {
            id: ScopeId(0),
            kind: ScopeKind::Program,
            name: None,
            locals: SymbolTable::new(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            scopes: vec![root],
            symbols: Vec::new(),
            interner,
        }
    }

    pub(crate) fn add_scope(
        &mut self,
        kind: ScopeKind,
        name: Option<String>,
        parent: ScopeId,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            kind,
            name,
            locals: SymbolTable::new(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.scopes[parent.index()].children.push(id);
        id
    }

    /// The program scope.
    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn interner(&self) -> &NameInterner {
        &self.interner
    }

    /// Symbols declared directly in `scope`, in declaration order.
    pub fn symbols_in(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> + '_ {
        self.scopes[scope.index()]
            .locals
            .iter()
            .map(move |(_, id)| &self.symbols[id.index()])
    }

    /// Resolve `name` from `scope` outwards.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let name = self.interner.get(name)?;
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(symbol) = scope.locals.get(name) {
                return Some(&self.symbols[symbol.index()]);
            }
            current = scope.parent;
        }
        None
    }

    fn fmt_scope(&self, f: &mut fmt::Formatter<'_>, id: ScopeId, depth: usize) -> fmt::Result {
        let scope = self.scope(id);
        let indent = "  ".repeat(depth);
        match (scope.kind, &scope.name) {
            (ScopeKind::Program, _) => writeln!(f, "{}program", indent)?,
            (ScopeKind::Function, Some(name)) => writeln!(f, "{}function {}", indent, name)?,
            (ScopeKind::Function, None) => writeln!(f, "{}function", indent)?,
            (ScopeKind::Block, _) => writeln!(f, "{}block", indent)?,
        }
        for symbol in self.symbols_in(id) {
            write!(f, "{}  {} {}", indent, symbol.kind, symbol.name_text)?;
            if symbol.declarations > 1 {
                write!(f, " (declared {} times)", symbol.declarations)?;
            }
            for assignment in &symbol.assignments {
                write!(
                    f,
                    " {}{} @{}",
                    assignment.operator, assignment.value_kind, assignment.position
                )?;
            }
            writeln!(f)?;
        }
        for child in &scope.children {
            self.fmt_scope(f, *child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ScopeTree {
    /// An indented outline of scopes and their symbols.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_scope(f, ScopeId(0), 0)
    }
}
