//! Symbol and symbol table definitions.

use crate::scope::ScopeId;
use docscan_core::intern::Name;
use docscan_core::text::Position;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;

/// Index of a symbol in its `ScopeTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a symbol came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `var` or a function declaration; function scoped.
    Var,
    /// `let`; block scoped.
    Let,
    Parameter,
    /// Assigned somewhere without any visible declaration.
    ImplicitGlobal,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Var => "var",
            SymbolKind::Let => "let",
            SymbolKind::Parameter => "param",
            SymbolKind::ImplicitGlobal => "global",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assignment whose target resolved to a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Position of the assignment target.
    pub position: Position,
    pub operator: String,
    /// Node kind of the assigned value, e.g. `FunctionLiteral`.
    pub value_kind: &'static str,
}

/// A named entity declared in a scope.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    /// The interned name.
    pub name: Name,
    /// The name text, kept for display.
    pub name_text: String,
    pub kind: SymbolKind,
    /// The scope this symbol is declared in.
    pub scope: ScopeId,
    /// Position of the first declaration, if there was one.
    pub position: Option<Position>,
    /// Number of declarations that bound this name in its scope.
    pub declarations: u32,
    /// Assignments targeting this symbol, in source order.
    pub assignments: Vec<Assignment>,
}

/// Symbols of one scope in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    table: IndexMap<Name, SymbolId, FxBuildHasher>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: Name) -> Option<SymbolId> {
        self.table.get(&name).copied()
    }

    pub fn set(&mut self, name: Name, symbol: SymbolId) {
        self.table.insert(name, symbol);
    }

    pub fn has(&self, name: Name) -> bool {
        self.table.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Symbols in the order they were first declared.
    pub fn iter(&self) -> impl Iterator<Item = (Name, SymbolId)> + '_ {
        self.table.iter().map(|(name, id)| (*name, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::intern::NameInterner;

    #[test]
    fn test_symbol_table_keeps_declaration_order() {
        let interner = NameInterner::new();
        let mut table = SymbolTable::new();
        for (i, name) in ["zeta", "alpha", "mid"].iter().enumerate() {
            table.set(interner.intern(name), SymbolId(i as u32));
        }
        let names: Vec<&str> = table.iter().map(|(n, _)| interner.resolve(n)).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(table.has(interner.intern("alpha")));
        assert_eq!(table.get(interner.intern("mid")), Some(SymbolId(2)));
        assert_eq!(table.get(interner.intern("missing")), None);
    }
}
