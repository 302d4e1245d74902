//! Token trees for skipped spans, and static symbol paths.

use crate::token::{Token, TokenKind};
use std::fmt;

/// A run of skipped tokens with bracket nesting preserved.
///
/// Every `{…}`, `[…]` and `(…)` span becomes a `Group` holding its
/// delimiters, so a consumer can re-descend into a skipped region later.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TokenTree<'a> {
    Token(&'a Token<'a>),
    Group {
        open: &'a Token<'a>,
        trees: &'a [TokenTree<'a>],
        close: &'a Token<'a>,
    },
}

impl<'a> TokenTree<'a> {
    /// The first token of this tree.
    pub fn first_token(&self) -> &'a Token<'a> {
        match *self {
            TokenTree::Token(token) => token,
            TokenTree::Group { open, .. } => open,
        }
    }

    /// Visit every token in source order, delimiters included.
    pub fn for_each_token(&self, f: &mut impl FnMut(&'a Token<'a>)) {
        match *self {
            TokenTree::Token(token) => f(token),
            TokenTree::Group { open, trees, close } => {
                f(open);
                for tree in trees {
                    tree.for_each_token(f);
                }
                f(close);
            }
        }
    }

    /// Total number of tokens in this tree.
    pub fn token_count(&self) -> usize {
        let mut count = 0;
        self.for_each_token(&mut |_| count += 1);
        count
    }
}

impl fmt::Debug for TokenTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenTree::Token(token) => write!(f, "{:?}", token),
            TokenTree::Group { open, trees, close } => {
                write!(f, "{}", open.value)?;
                f.debug_list().entries(trees.iter()).finish()?;
                write!(f, "{}", close.value)
            }
        }
    }
}

/// A statically resolved property-access chain such as `a.b['c'].d`.
///
/// The first segment is a `Name` token; later segments are `Name` tokens
/// (from `.name`) or `String` tokens (from `['literal']`). A chain whose
/// computed key cannot be resolved is represented as `None` by callers, never
/// as a partial path.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SymbolPath<'a> {
    segments: &'a [&'a Token<'a>],
}

impl<'a> SymbolPath<'a> {
    /// Build a path from its segments. `segments` must not be empty.
    pub fn new(segments: &'a [&'a Token<'a>]) -> Self {
        debug_assert!(!segments.is_empty());
        Self { segments }
    }

    pub fn segments(&self) -> &'a [&'a Token<'a>] {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The leading name token.
    pub fn root(&self) -> &'a Token<'a> {
        self.segments[0]
    }

    /// The name of a single-segment path (`foo`), if it is one.
    pub fn as_single_name(&self) -> Option<&'a str> {
        match self.segments {
            [only] => Some(only.value),
            _ => None,
        }
    }

    /// The segment values, e.g. `["a", "b", "c"]` for `a.b['c']`.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.segments.iter().map(|token| token.value)
    }
}

impl fmt::Display for SymbolPath<'_> {
    /// Renders as JavaScript: name segments joined by `.`, string segments as
    /// `["…"]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment.kind {
                TokenKind::String => write!(f, "[{}]", quote_string(segment.value))?,
                _ if i == 0 => write!(f, "{}", segment.value)?,
                _ => write!(f, ".{}", segment.value)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Quote a decoded string value as a double-quoted JavaScript literal.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '\0' => out.push_str("\\0"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
