//! docscan_scanner: Tokenizer for JavaScript source text.
//!
//! Produces the coarse token kinds the parser consumes (names, keywords,
//! atoms, punctuation, operators and literals), with positions, the
//! preceding-line-break flag and the comments between tokens. Any type
//! implementing [`TokenSource`] can feed the parser; [`Scanner`] lexes text
//! and [`TokenList`] replays a pre-built token vector.

mod char_codes;
mod error;
mod scanner;
mod source;

pub use error::LexError;
pub use scanner::Scanner;
pub use source::{TokenList, TokenSource};
