//! docscan_ast: Token and syntax tree definitions for the docscan analyzer.
//!
//! Tokens, comments, skipped token trees and AST nodes are all allocated in
//! a per-parse arena and borrowed for the arena lifetime `'a`.

pub mod node;
pub mod token;
pub mod tree;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use token::{Comment, CommentKind, Token, TokenFlags, TokenKind, TokenPredicate};
pub use tree::{SymbolPath, TokenTree};
pub use visitor::Visitor;
