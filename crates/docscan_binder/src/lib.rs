//! docscan_binder: Scope analysis and declaration hoisting.
//!
//! The binder walks a parsed program and builds a tree of scopes holding
//! every declared symbol together with the assignments that target it.
//! `hoist` rewrites a node sequence so that `var` declarations come first,
//! the way the language evaluates them.

mod binder;
mod hoist;
mod scope;
mod symbol;

pub use binder::Binder;
pub use hoist::hoist;
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbol::{Assignment, Symbol, SymbolId, SymbolKind, SymbolTable};
