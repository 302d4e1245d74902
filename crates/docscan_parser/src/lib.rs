//! docscan_parser: Builds the documentation-oriented AST of a JavaScript
//! source unit.
//!
//! The parser is a single-pass recursive descent over a [`TokenStream`],
//! which wraps any [`docscan_scanner::TokenSource`] and applies the
//! automatic semicolon insertion heuristic. Expressions are only decomposed
//! as far as documentation extraction needs; control flow and anything
//! else that does not declare or assign a symbol is kept as opaque token
//! trees.

mod error;
mod parser;
mod stream;

pub use error::ParseError;
pub use parser::{parse, Parser, MAX_NESTING_DEPTH};
pub use stream::TokenStream;
