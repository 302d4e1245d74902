//! Tokens and comments as produced by a tokenizer and consumed by the parser.

use docscan_core::text::{Position, TextSpan};
use std::cell::OnceCell;
use std::fmt;

/// The coarse classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An identifier, including `this`.
    Name,
    /// A reserved statement keyword such as `var` or `function`.
    Keyword,
    /// `true`, `false`, `null` or `undefined`.
    Atom,
    /// One of `[ ] { } ( ) , ; : .`
    Punc,
    /// Operator punctuation, plus the word operators
    /// `in instanceof typeof new void delete`.
    Operator,
    /// A string literal; the value is the decoded string.
    String,
    /// A numeric literal; the value is its source text.
    Number,
    /// A regular expression literal; the value is `/body/flags`.
    RegExp,
    Eof,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Name => "name",
            TokenKind::Keyword => "keyword",
            TokenKind::Atom => "atom",
            TokenKind::Punc => "punc",
            TokenKind::Operator => "operator",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::RegExp => "regexp",
            TokenKind::Eof => "eof",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Flags describing how a token was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        const NONE                 = 0;
        /// A line terminator appears between this token and the previous one.
        const PRECEDING_LINE_BREAK = 1 << 0;
        /// Synthesized by automatic semicolon insertion rather than lexed.
        const INSERTED             = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A source comment. `text` excludes the comment delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'a> {
    pub kind: CommentKind,
    pub text: &'a str,
    pub span: TextSpan,
    pub position: Position,
}

impl Comment<'_> {
    /// Whether this is a `/** ... */` documentation comment.
    pub fn is_doc(&self) -> bool {
        self.kind == CommentKind::Block && self.text.starts_with('*')
    }
}

/// A single token.
///
/// Equality compares only kind and value: positions, flags and attached
/// comments are ignored.
#[derive(Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    /// Byte span in the source text.
    pub span: TextSpan,
    /// 0-based line and character column of the token start.
    pub position: Position,
    pub flags: TokenFlags,
    /// Comments between the previous token and this one.
    pub comments_before: &'a [Comment<'a>],
    /// Comments between this token and the next one. Filled in by the token
    /// stream when the next token is fetched, and only once.
    pub comments_after: OnceCell<&'a [Comment<'a>]>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, value: &'a str, span: TextSpan, position: Position) -> Self {
        Self {
            kind,
            value,
            span,
            position,
            flags: TokenFlags::NONE,
            comments_before: &[],
            comments_after: OnceCell::new(),
        }
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_comments(mut self, comments: &'a [Comment<'a>]) -> Self {
        self.comments_before = comments;
        self
    }

    /// An inserted `;` placed in front of `next`.
    ///
    /// It takes the position of `next`, is never preceded by a line break and
    /// carries no comments.
    pub fn inserted_semicolon(next: &Token<'_>) -> Self {
        Self::new(
            TokenKind::Punc,
            ";",
            TextSpan::empty(next.span.start),
            next.position,
        )
        .with_flags(TokenFlags::INSERTED)
    }

    /// Test this token against a predicate.
    #[inline]
    pub fn is(&self, predicate: impl TokenPredicate) -> bool {
        predicate.matches(self)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    #[inline]
    pub fn is_punc(&self, value: &str) -> bool {
        self.kind == TokenKind::Punc && self.value == value
    }

    #[inline]
    pub fn is_operator(&self, value: &str) -> bool {
        self.kind == TokenKind::Operator && self.value == value
    }

    #[inline]
    pub fn is_keyword(&self, value: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value == value
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    #[inline]
    pub fn is_inserted(&self) -> bool {
        self.flags.contains(TokenFlags::INSERTED)
    }

    /// Comments after this token, or an empty slice if not yet known.
    pub fn comments_after(&self) -> &'a [Comment<'a>] {
        self.comments_after.get().copied().unwrap_or(&[])
    }

    /// Describe this token for error messages, e.g. `punc ';'`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::String => format!("string {:?}", self.value),
            kind => format!("{} '{}'", kind, self.value),
        }
    }
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Token<'_> {}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.value)?;
        if self.is_inserted() {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ============================================================================
// Token predicates
// ============================================================================

/// Something a token can be matched against.
///
/// Implemented for a bare [`TokenKind`], for `(kind, value)` and for
/// `(kind, &[values])` set membership.
pub trait TokenPredicate {
    fn matches(&self, token: &Token<'_>) -> bool;

    /// Human readable form used in "Expected ..." messages.
    fn describe(&self) -> String;
}

impl TokenPredicate for TokenKind {
    fn matches(&self, token: &Token<'_>) -> bool {
        token.kind == *self
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl TokenPredicate for (TokenKind, &str) {
    fn matches(&self, token: &Token<'_>) -> bool {
        token.kind == self.0 && token.value == self.1
    }

    fn describe(&self) -> String {
        format!("{} '{}'", self.0, self.1)
    }
}

impl TokenPredicate for (TokenKind, &[&str]) {
    fn matches(&self, token: &Token<'_>) -> bool {
        token.kind == self.0 && self.1.iter().any(|v| *v == token.value)
    }

    fn describe(&self) -> String {
        let values: Vec<String> = self.1.iter().map(|v| format!("'{}'", v)).collect();
        format!("{} {}", self.0, values.join(" or "))
    }
}

impl<P: TokenPredicate + ?Sized> TokenPredicate for &P {
    fn matches(&self, token: &Token<'_>) -> bool {
        (**self).matches(token)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
