//! docscan_core: Core utilities for the docscan source analyzer.
//!
//! Provides source positions, line maps and name interning used throughout
//! the scanner, parser and binder.

pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{Name, NameInterner};
pub use text::{LineMap, Position, TextSpan};
