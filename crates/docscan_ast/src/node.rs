//! AST node definitions.
//!
//! Nodes reference child nodes, tokens and comments through arena-allocated
//! slices. Tokens are shared read-only; no node mutates a token.

use crate::token::{Comment, Token};
use crate::tree::{SymbolPath, TokenTree};
use docscan_diagnostics::DiagnosticCollection;
use std::fmt;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// A single AST node with its leading comments.
///
/// Equality compares `kind` only; comments are metadata.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    pub kind: NodeKind<'a>,
    pub comments_before: &'a [Comment<'a>],
}

impl<'a> Node<'a> {
    pub fn new(kind: NodeKind<'a>) -> Self {
        Self {
            kind,
            comments_before: &[],
        }
    }

    pub fn with_comments(kind: NodeKind<'a>, comments_before: &'a [Comment<'a>]) -> Self {
        Self {
            kind,
            comments_before,
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind, f)
    }
}

// ============================================================================
// Node kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    /// `{ … }`
    Block(&'a [Node<'a>]),
    /// A single declared name. Always followed by an `Assign` when the
    /// declarator had an initializer.
    VarDecl {
        scope: ScopeKind,
        name: &'a Token<'a>,
    },
    /// `target op value`, where `op` is `=` or a compound assignment.
    Assign {
        target: SymbolPath<'a>,
        operator: &'a str,
        value: &'a Node<'a>,
    },
    FunctionLiteral(&'a Function<'a>),
    /// `return` with an optional value.
    Return(Option<&'a Node<'a>>),
    /// A call on a static callee path whose receiver is the preceding link of
    /// a fluent chain.
    Call {
        callee: SymbolPath<'a>,
        arguments: &'a [Node<'a>],
    },
    /// A bare reference. `path` is `None` when a computed key could not be
    /// resolved. `incomplete` holds the tokens skipped when the reference
    /// was only the head of a larger expression.
    Reference {
        path: Option<SymbolPath<'a>>,
        incomplete: Option<&'a [TokenTree<'a>]>,
    },
    /// A reference that is immediately invoked, plus any fluent chain.
    CallReference {
        path: Option<SymbolPath<'a>>,
        arguments: &'a [Node<'a>],
        chain: &'a [Node<'a>],
        incomplete: Option<&'a [TokenTree<'a>]>,
    },
    /// `new …`
    Instance(&'a Node<'a>),
    ArrayLiteral(&'a [Node<'a>]),
    /// An object literal kept as raw tokens: a single `{…}` group.
    ObjectLiteral(&'a [TokenTree<'a>]),
    Primitive {
        kind: PrimitiveKind,
        token: &'a Token<'a>,
    },
    /// A parenthesized or otherwise undecomposed expression kept as raw tokens.
    Expression(&'a [TokenTree<'a>]),
    /// `(function () { … })(args)` and its prefix-operator forms.
    Iife {
        function: &'a Function<'a>,
        arguments: &'a [Node<'a>],
    },
    /// A control-flow construct captured as an opaque unit.
    Skipped {
        keyword: &'a Token<'a>,
        trees: &'a [TokenTree<'a>],
    },
}

impl NodeKind<'_> {
    /// Short name of this node kind, used in logs and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Block(_) => "Block",
            NodeKind::VarDecl { .. } => "VarDecl",
            NodeKind::Assign { .. } => "Assign",
            NodeKind::FunctionLiteral(_) => "FunctionLiteral",
            NodeKind::Return(_) => "Return",
            NodeKind::Call { .. } => "Call",
            NodeKind::Reference { .. } => "Reference",
            NodeKind::CallReference { .. } => "CallReference",
            NodeKind::Instance(_) => "Instance",
            NodeKind::ArrayLiteral(_) => "ArrayLiteral",
            NodeKind::ObjectLiteral(_) => "ObjectLiteral",
            NodeKind::Primitive { .. } => "Primitive",
            NodeKind::Expression(_) => "Expression",
            NodeKind::Iife { .. } => "Iife",
            NodeKind::Skipped { .. } => "Skipped",
        }
    }
}

/// Declaration keyword of a `VarDecl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Var,
    Let,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Var => "var",
            ScopeKind::Let => "let",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    RegExp,
    Boolean,
    Null,
    Undefined,
}

// ============================================================================
// Functions
// ============================================================================

/// A function literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Function<'a> {
    pub name: FunctionName<'a>,
    pub parameters: &'a [&'a Token<'a>],
    pub body: &'a [Node<'a>],
}

/// A function's own name, or the generated `*anon<N>` identifier of an
/// anonymous function.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FunctionName<'a> {
    Named(&'a Token<'a>),
    Anonymous(u32),
}

impl FunctionName<'_> {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, FunctionName::Anonymous(_))
    }
}

impl fmt::Display for FunctionName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionName::Named(token) => f.write_str(token.value),
            FunctionName::Anonymous(n) => write!(f, "*anon{}", n),
        }
    }
}

impl fmt::Debug for FunctionName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ============================================================================
// Program
// ============================================================================

/// The parse result for one source unit: the flat top-level node sequence
/// plus any non-fatal warnings raised while reading it.
#[derive(Debug)]
pub struct Program<'a> {
    pub body: &'a [Node<'a>],
    pub warnings: DiagnosticCollection,
}

impl<'a> Program<'a> {
    pub fn new(body: &'a [Node<'a>], warnings: DiagnosticCollection) -> Self {
        Self { body, warnings }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
