//! The recursive descent readers.
//!
//! Statements are read into a flat node list per block. Only the parts of an
//! expression that name or assign a symbol are decomposed; anything else is
//! kept as token trees (`Expression`, `ObjectLiteral`, `Skipped`) or, when it
//! trails a value that was decomposed, recorded as an incomplete tail.

use bumpalo::Bump;
use docscan_ast::node::*;
use docscan_ast::{Comment, SymbolPath, Token, TokenKind, TokenTree};
use docscan_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use docscan_scanner::{Scanner, TokenSource};

use crate::error::ParseError;
use crate::stream::TokenStream;

/// Maximum reader nesting before the parse is abandoned.
pub const MAX_NESTING_DEPTH: u32 = 256;

const OPENERS: &[&str] = &["(", "[", "{"];
const CLOSERS: &[&str] = &[")", "]", "}"];
const EXPRESSION_TERMINATORS: &[&str] = &[",", ")", "]", "}", ":"];
const IIFE_PREFIXES: &[&str] = &["!", "~", "+", "-", "typeof", "void", "delete"];
const PREFIX_OPERATORS: &[&str] = &["!", "~", "+", "-", "++", "--", "typeof", "void", "delete"];
/// Operators that cannot start an expression, so a line starting with one
/// continues the expression on the line before.
const CONTINUATION_OPERATORS: &[&str] = &[
    "||", "&&", "==", "===", "!=", "!==", "<", "<=", ">", ">=", "*", "/", "%", "|", "&", "^",
    "<<", ">>", ">>>", "in", "instanceof", "?",
];
const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "&=", "|=", "^=",
];
const SKIPPED_KEYWORDS: &[&str] = &[
    "if", "for", "while", "do", "switch", "try", "with", "throw", "continue", "break",
];

/// Parse one source text with the built-in scanner.
pub fn parse<'a>(arena: &'a Bump, text: &'a str) -> Result<Program<'a>, ParseError> {
    Parser::new(arena, text).parse_program()
}

/// Property names after `.` may be any identifier-like word.
fn is_property_name(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Name | TokenKind::Keyword | TokenKind::Atom => true,
        TokenKind::Operator => token.value.bytes().all(|b| b.is_ascii_alphabetic()),
        _ => false,
    }
}

/// Whether `token` starts a new line that does not continue the expression
/// before it.
fn starts_new_line(token: &Token<'_>) -> bool {
    token.has_preceding_line_break() && !token.is((TokenKind::Operator, CONTINUATION_OPERATORS))
}

/// Whether `token` ends the expression before it.
fn ends_expression(token: &Token<'_>) -> bool {
    token.is_eof()
        || token.is_punc(";")
        || starts_new_line(token)
        || token.is((TokenKind::Punc, EXPRESSION_TERMINATORS))
}

/// The parser for a single source unit.
///
/// Owns the token stream and the anonymous function counter, so parses of
/// different units never share state.
pub struct Parser<'a, S> {
    arena: &'a Bump,
    tokens: TokenStream<'a, S>,
    anonymous_functions: u32,
    depth: u32,
    warnings: DiagnosticCollection,
}

impl<'a> Parser<'a, Scanner<'a>> {
    pub fn new(arena: &'a Bump, text: &'a str) -> Self {
        Self::with_source(arena, Scanner::new(arena, text))
    }
}

impl<'a, S: TokenSource<'a>> Parser<'a, S> {
    /// A parser over any token source.
    pub fn with_source(arena: &'a Bump, source: S) -> Self {
        Self {
            arena,
            tokens: TokenStream::new(arena, source),
            anonymous_functions: 0,
            depth: 0,
            warnings: DiagnosticCollection::new(),
        }
    }

    /// Read the whole unit as one top-level block.
    pub fn parse_program(mut self) -> Result<Program<'a>, ParseError> {
        let body = self.read_block()?;
        let end = self.tokens.current()?;
        if !end.is_eof() {
            return Err(ParseError::InvalidStatement {
                found: end.describe(),
                span: end.span,
                position: end.position,
            });
        }
        tracing::debug!(
            nodes = body.len(),
            warnings = self.warnings.len(),
            anonymous_functions = self.anonymous_functions,
            "parsed program"
        );
        Ok(Program::new(body, self.warnings))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn alloc_node(&self, node: Node<'a>) -> &'a Node<'a> {
        self.arena.alloc(node)
    }

    fn alloc_trees(&self, trees: &[TokenTree<'a>]) -> &'a [TokenTree<'a>] {
        self.arena.alloc_slice_copy(trees)
    }

    fn single_name_path(&self, name: &'a Token<'a>) -> SymbolPath<'a> {
        SymbolPath::new(self.arena.alloc_slice_copy(&[name]))
    }

    fn merge_comments(
        &self,
        first: &'a [Comment<'a>],
        second: &'a [Comment<'a>],
    ) -> &'a [Comment<'a>] {
        if first.is_empty() {
            return second;
        }
        if second.is_empty() {
            return first;
        }
        let mut merged = Vec::with_capacity(first.len() + second.len());
        merged.extend_from_slice(first);
        merged.extend_from_slice(second);
        self.arena.alloc_slice_copy(&merged)
    }

    fn warn(&mut self, token: &Token<'_>, message: &DiagnosticMessage, args: &[&str]) {
        self.warnings
            .add(Diagnostic::at(token.span, token.position, message, args));
    }

    /// Run a reader one nesting level deeper.
    fn nested<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            let token = self.tokens.current()?;
            return Err(ParseError::NestingTooDeep {
                span: token.span,
                position: token.position,
            });
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn expect_punc(&mut self, value: &str) -> Result<&'a Token<'a>, ParseError> {
        self.tokens.expect((TokenKind::Punc, value))
    }

    // ========================================================================
    // Blocks and statements
    // ========================================================================

    /// Read statements until `}` or end of input. The terminator is left for
    /// the caller that opened the block.
    fn read_block(&mut self) -> Result<&'a [Node<'a>], ParseError> {
        let mut nodes = Vec::new();
        loop {
            let token = self.tokens.current()?;
            if token.is_eof() || token.is_punc("}") {
                break;
            }
            self.nested(|p| p.read_statement(&mut nodes))?;
        }
        Ok(self.arena.alloc_slice_copy(&nodes))
    }

    /// Read one statement, appending zero or more nodes to `out`.
    fn read_statement(&mut self, out: &mut Vec<Node<'a>>) -> Result<(), ParseError> {
        let token = self.tokens.current()?;
        let labelled = token.kind == TokenKind::Name && self.tokens.peek()?.is_punc(":");

        match token.kind {
            TokenKind::Punc if token.value == "{" => {
                self.tokens.advance()?;
                let body = self.read_block()?;
                self.expect_punc("}")?;
                self.tokens.advance()?;
                out.push(Node::with_comments(NodeKind::Block(body), token.comments_before));
            }
            TokenKind::Punc if token.value == ";" => {
                self.tokens.advance()?;
            }
            TokenKind::Keyword => match token.value {
                "function" => self.read_function_declaration(out)?,
                "var" | "let" => self.read_declarations(out)?,
                "return" => self.read_return(out)?,
                "debugger" => {
                    self.tokens.advance()?;
                    self.read_terminator()?;
                }
                value if SKIPPED_KEYWORDS.iter().any(|k| *k == value) => {
                    let node = self.read_skipped()?;
                    out.push(node);
                }
                _ => return Err(Self::invalid_statement(token)),
            },
            TokenKind::Name if labelled => {
                let node = self.read_skipped()?;
                out.push(node);
            }
            TokenKind::Name
            | TokenKind::Atom
            | TokenKind::String
            | TokenKind::Number
            | TokenKind::RegExp
            | TokenKind::Operator => self.read_expression_statement(out)?,
            TokenKind::Punc if token.value == "(" || token.value == "[" => {
                self.read_expression_statement(out)?
            }
            _ => return Err(Self::invalid_statement(token)),
        }
        Ok(())
    }

    fn invalid_statement(token: &Token<'_>) -> ParseError {
        ParseError::InvalidStatement {
            found: token.describe(),
            span: token.span,
            position: token.position,
        }
    }

    /// Consume the `;` ending a statement. It may be left out before `}`, at
    /// end of input, or when the next token starts a new line.
    fn read_terminator(&mut self) -> Result<(), ParseError> {
        let token = self.tokens.current()?;
        if token.is_punc(";") {
            self.tokens.advance()?;
            return Ok(());
        }
        if token.is_punc("}") || token.is_eof() || starts_new_line(token) {
            return Ok(());
        }
        self.expect_punc(";").map(|_| ())
    }

    /// `a(), b = 1;` yields one node per comma-separated expression.
    fn read_expression_statement(&mut self, out: &mut Vec<Node<'a>>) -> Result<(), ParseError> {
        loop {
            let node = self.read_expression()?;
            out.push(node);
            if !self.tokens.current()?.is_punc(",") {
                break;
            }
            self.tokens.advance()?;
        }
        self.read_terminator()
    }

    /// `function name(…) { … }` becomes `var name;` plus `name = function name(…) { … }`.
    fn read_function_declaration(&mut self, out: &mut Vec<Node<'a>>) -> Result<(), ParseError> {
        let keyword = self.tokens.current()?;
        let name = self.tokens.peek()?;
        if name.kind != TokenKind::Name {
            return Err(ParseError::unexpected(TokenKind::Name, name));
        }
        let function = self.read_function()?;
        let comments = keyword.comments_before;
        let value = self.alloc_node(Node::with_comments(
            NodeKind::FunctionLiteral(function),
            comments,
        ));
        out.push(Node::with_comments(
            NodeKind::VarDecl {
                scope: ScopeKind::Var,
                name,
            },
            comments,
        ));
        out.push(Node::with_comments(
            NodeKind::Assign {
                target: self.single_name_path(name),
                operator: "=",
                value,
            },
            comments,
        ));
        Ok(())
    }

    /// `var a = 1, b;` yields `VarDecl(a)`, `Assign(a, 1)`, `VarDecl(b)`.
    fn read_declarations(&mut self, out: &mut Vec<Node<'a>>) -> Result<(), ParseError> {
        let keyword = self.tokens.current()?;
        let scope = if keyword.value == "let" {
            ScopeKind::Let
        } else {
            ScopeKind::Var
        };
        self.tokens.advance()?;

        let mut first = true;
        loop {
            let name = self.tokens.expect(TokenKind::Name)?;
            let comments = if first {
                self.merge_comments(keyword.comments_before, name.comments_before)
            } else {
                name.comments_before
            };
            first = false;
            out.push(Node::with_comments(NodeKind::VarDecl { scope, name }, comments));

            if self.tokens.advance()?.is_operator("=") {
                self.tokens.advance()?;
                let value = self.read_expression()?;
                out.push(Node::with_comments(
                    NodeKind::Assign {
                        target: self.single_name_path(name),
                        operator: "=",
                        value: self.alloc_node(value),
                    },
                    comments,
                ));
            }

            if !self.tokens.current()?.is_punc(",") {
                break;
            }
            self.tokens.advance()?;
        }
        self.read_terminator()
    }

    /// `return a, b;` evaluates `a` for its effect, so it yields the
    /// statement `a` followed by `return b`.
    fn read_return(&mut self, out: &mut Vec<Node<'a>>) -> Result<(), ParseError> {
        let keyword = self.tokens.current()?;
        let next = self.tokens.advance()?;
        let mut comments = keyword.comments_before;
        let mut value = None;
        if !(next.is_punc(";") || next.is_punc("}") || next.is_eof()) {
            let mut last = self.read_expression()?;
            while self.tokens.current()?.is_punc(",") {
                self.tokens.advance()?;
                let leading = if comments.is_empty() {
                    last.comments_before
                } else {
                    comments
                };
                out.push(Node::with_comments(last.kind, leading));
                comments = &[];
                last = self.read_expression()?;
            }
            value = Some(self.alloc_node(last));
        }
        self.read_terminator()?;
        out.push(Node::with_comments(NodeKind::Return(value), comments));
        Ok(())
    }

    // ========================================================================
    // Skipped control flow
    // ========================================================================

    /// Capture a control-flow construct or labelled statement as one opaque
    /// node. `keyword` is the construct keyword or the label.
    fn read_skipped(&mut self) -> Result<Node<'a>, ParseError> {
        let keyword = self.tokens.current()?;
        let mut trees = Vec::new();
        self.capture_construct(&mut trees)?;

        tracing::warn!(
            construct = keyword.value,
            line = keyword.position.line + 1,
            column = keyword.position.column + 1,
            "skipped control flow construct"
        );
        self.warn(keyword, &messages::CONSTRUCT_0_SKIPPED, &[keyword.value]);

        Ok(Node::with_comments(
            NodeKind::Skipped {
                keyword,
                trees: self.alloc_trees(&trees),
            },
            keyword.comments_before,
        ))
    }

    /// Consume the construct starting at the current token. Everything after
    /// its first token is appended to `trees`.
    fn capture_construct(&mut self, trees: &mut Vec<TokenTree<'a>>) -> Result<(), ParseError> {
        let keyword = self.tokens.current()?;
        self.tokens.advance()?;

        if keyword.kind == TokenKind::Name {
            let colon = self.expect_punc(":")?;
            trees.push(TokenTree::Token(colon));
            self.tokens.advance()?;
            return self.capture_body(trees);
        }

        match keyword.value {
            "if" => {
                self.capture_group("(", trees)?;
                self.capture_body(trees)?;
                let next = self.tokens.current()?;
                if next.is_keyword("else") {
                    trees.push(TokenTree::Token(next));
                    self.tokens.advance()?;
                    self.capture_body(trees)?;
                }
            }
            "for" | "while" | "with" => {
                self.capture_group("(", trees)?;
                self.capture_body(trees)?;
            }
            "do" => {
                self.capture_body(trees)?;
                let while_keyword = self.tokens.expect((TokenKind::Keyword, "while"))?;
                trees.push(TokenTree::Token(while_keyword));
                self.tokens.advance()?;
                self.capture_group("(", trees)?;
                self.capture_semicolon(trees)?;
            }
            "switch" => {
                self.capture_group("(", trees)?;
                self.capture_group("{", trees)?;
            }
            "try" => {
                self.capture_group("{", trees)?;
                while self.tokens.current()?.is_keyword("catch") {
                    trees.push(TokenTree::Token(self.tokens.current()?));
                    self.tokens.advance()?;
                    self.capture_group("(", trees)?;
                    self.capture_group("{", trees)?;
                }
                let next = self.tokens.current()?;
                if next.is_keyword("finally") {
                    trees.push(TokenTree::Token(next));
                    self.tokens.advance()?;
                    self.capture_group("{", trees)?;
                }
            }
            "continue" | "break" => {
                let label = self.tokens.current()?;
                if label.kind == TokenKind::Name && !label.has_preceding_line_break() {
                    trees.push(TokenTree::Token(label));
                    self.tokens.advance()?;
                }
                self.capture_semicolon(trees)?;
            }
            // throw
            _ => self.capture_statement_rest(trees)?,
        }
        Ok(())
    }

    fn capture_group(&mut self, open: &str, trees: &mut Vec<TokenTree<'a>>) -> Result<(), ParseError> {
        self.expect_punc(open)?;
        trees.push(self.tokens.read_group()?);
        Ok(())
    }

    /// Consume a closing `;`. Inserted semicolons are not kept, since they
    /// depend on where the statement ends its line.
    fn capture_semicolon(&mut self, trees: &mut Vec<TokenTree<'a>>) -> Result<(), ParseError> {
        let token = self.tokens.current()?;
        if token.is_punc(";") {
            if !token.is_inserted() {
                trees.push(TokenTree::Token(token));
            }
            self.tokens.advance()?;
        }
        Ok(())
    }

    /// A statement body: a braced block, a nested construct, or a single
    /// statement through its `;`.
    fn capture_body(&mut self, trees: &mut Vec<TokenTree<'a>>) -> Result<(), ParseError> {
        let token = self.tokens.current()?;
        if token.is_punc("{") {
            trees.push(self.tokens.read_group()?);
            return Ok(());
        }
        let labelled = token.kind == TokenKind::Name && self.tokens.peek()?.is_punc(":");
        if labelled || token.is((TokenKind::Keyword, SKIPPED_KEYWORDS)) {
            trees.push(TokenTree::Token(token));
            return self.nested(|p| p.capture_construct(trees));
        }
        self.capture_statement_rest(trees)
    }

    /// Collect tokens through the next `;` outside brackets, stopping early
    /// before an unmatched closing bracket or at end of input.
    fn capture_statement_rest(&mut self, trees: &mut Vec<TokenTree<'a>>) -> Result<(), ParseError> {
        loop {
            let token = self.tokens.current()?;
            if token.is_eof() || token.is((TokenKind::Punc, CLOSERS)) {
                break;
            }
            if token.is((TokenKind::Punc, OPENERS)) {
                trees.push(self.tokens.read_group()?);
                continue;
            }
            if token.is_punc(";") {
                return self.capture_semicolon(trees);
            }
            trees.push(TokenTree::Token(token));
            self.tokens.advance()?;
        }
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Read one expression: an immediately invoked function, an assignment,
    /// a prefix-operator expression, or a single structure.
    fn read_expression(&mut self) -> Result<Node<'a>, ParseError> {
        self.nested(|p| p.read_expression_inner())
    }

    fn read_expression_inner(&mut self) -> Result<Node<'a>, ParseError> {
        let token = self.tokens.current()?;
        let may_open_iife = token.is_punc("(") || token.is((TokenKind::Operator, IIFE_PREFIXES));
        if may_open_iife && self.tokens.peek()?.is_keyword("function") {
            return self.read_iife();
        }

        match token.kind {
            TokenKind::Name => {
                let path = self.read_symbol()?;
                let next = self.tokens.current()?;
                if let Some(target) = path {
                    if next.is((TokenKind::Operator, ASSIGNMENT_OPERATORS)) {
                        self.tokens.advance()?;
                        let value = self.read_expression()?;
                        return Ok(Node::with_comments(
                            NodeKind::Assign {
                                target,
                                operator: next.value,
                                value: self.alloc_node(value),
                            },
                            token.comments_before,
                        ));
                    }
                }
                self.read_reference(token, path)
            }
            TokenKind::Operator if token.is((TokenKind::Operator, PREFIX_OPERATORS)) => {
                self.tokens.advance()?;
                let trees = self.read_expression_rest(vec![TokenTree::Token(token)])?;
                tracing::debug!(
                    line = token.position.line + 1,
                    column = token.position.column + 1,
                    operator = token.value,
                    "captured unary expression"
                );
                Ok(Node::with_comments(
                    NodeKind::Expression(self.alloc_trees(&trees)),
                    token.comments_before,
                ))
            }
            _ => self.read_structure(),
        }
    }

    /// `(function () { … })(…)`, `(function () { … }(…))` and the
    /// `!function () { … }(…)` family.
    fn read_iife(&mut self) -> Result<Node<'a>, ParseError> {
        let lead = self.tokens.current()?;
        let keyword = self.tokens.advance()?;
        let comments = self.merge_comments(lead.comments_before, keyword.comments_before);
        let function = self.read_function()?;

        let parenthesized = lead.is_punc("(");
        let mut closed = false;
        if parenthesized && self.tokens.current()?.is_punc(")") {
            self.tokens.advance()?;
            closed = true;
        }

        // `(function () { … }).call(this)` and `-function () {}` are not
        // invocations we decompose; the function is kept on its own.
        if !self.tokens.current()?.is_punc("(") {
            self.discard_rest()?;
            if parenthesized && !closed {
                self.expect_punc(")")?;
                self.tokens.advance()?;
                self.discard_rest()?;
            }
            return Ok(Node::with_comments(NodeKind::FunctionLiteral(function), comments));
        }

        let arguments = self.read_arguments()?;
        if parenthesized && !closed {
            self.expect_punc(")")?;
            self.tokens.advance()?;
        }
        self.discard_rest()?;
        Ok(Node::with_comments(
            NodeKind::Iife {
                function,
                arguments,
            },
            comments,
        ))
    }

    /// Read a single value.
    fn read_structure(&mut self) -> Result<Node<'a>, ParseError> {
        self.nested(|p| p.read_structure_inner())
    }

    fn read_structure_inner(&mut self) -> Result<Node<'a>, ParseError> {
        let token = self.tokens.current()?;
        let comments = token.comments_before;
        let kind = match token.kind {
            TokenKind::Keyword if token.value == "function" => {
                let function = self.read_function()?;
                self.discard_rest()?;
                NodeKind::FunctionLiteral(function)
            }
            TokenKind::Punc if token.value == "(" => {
                let group = self.tokens.read_group()?;
                let trees = self.read_opaque(group)?;
                tracing::debug!(
                    line = token.position.line + 1,
                    column = token.position.column + 1,
                    trees = trees.len(),
                    "captured opaque expression"
                );
                NodeKind::Expression(trees)
            }
            TokenKind::Punc if token.value == "[" => {
                let elements = self.read_array()?;
                self.discard_rest()?;
                NodeKind::ArrayLiteral(elements)
            }
            TokenKind::Punc if token.value == "{" => {
                let group = self.tokens.read_group()?;
                let trees = self.read_opaque(group)?;
                tracing::debug!(
                    line = token.position.line + 1,
                    column = token.position.column + 1,
                    "captured object literal"
                );
                if trees.len() == 1 {
                    NodeKind::ObjectLiteral(trees)
                } else {
                    NodeKind::Expression(trees)
                }
            }
            TokenKind::Atom => {
                let kind = match token.value {
                    "true" | "false" => PrimitiveKind::Boolean,
                    "null" => PrimitiveKind::Null,
                    _ => PrimitiveKind::Undefined,
                };
                self.read_primitive(kind, token)?
            }
            TokenKind::Name => {
                let path = self.read_symbol()?;
                return self.read_reference(token, path);
            }
            TokenKind::String => self.read_primitive(PrimitiveKind::String, token)?,
            TokenKind::Number => self.read_primitive(PrimitiveKind::Number, token)?,
            TokenKind::RegExp => self.read_primitive(PrimitiveKind::RegExp, token)?,
            TokenKind::Operator if token.value == "new" => {
                self.tokens.advance()?;
                let constructor = self.read_expression()?;
                NodeKind::Instance(self.alloc_node(constructor))
            }
            TokenKind::Eof => {
                return Err(ParseError::UnexpectedEndOfInput {
                    span: token.span,
                    position: token.position,
                })
            }
            _ => {
                return Err(ParseError::UnknownStructureKind {
                    found: token.describe(),
                    span: token.span,
                    position: token.position,
                })
            }
        };
        Ok(Node::with_comments(kind, comments))
    }

    /// A literal token, widened to an opaque expression when an operator
    /// follows it (`1 + 2`).
    fn read_primitive(
        &mut self,
        kind: PrimitiveKind,
        token: &'a Token<'a>,
    ) -> Result<NodeKind<'a>, ParseError> {
        self.tokens.advance()?;
        if ends_expression(self.tokens.current()?) {
            return Ok(NodeKind::Primitive { kind, token });
        }
        let trees = self.read_expression_rest(vec![TokenTree::Token(token)])?;
        Ok(NodeKind::Expression(self.alloc_trees(&trees)))
    }

    /// `head` plus whatever continues the expression after it.
    fn read_opaque(&mut self, head: TokenTree<'a>) -> Result<&'a [TokenTree<'a>], ParseError> {
        if ends_expression(self.tokens.current()?) {
            return Ok(self.alloc_trees(&[head]));
        }
        let trees = self.read_expression_rest(vec![head])?;
        Ok(self.alloc_trees(&trees))
    }

    fn read_array(&mut self) -> Result<&'a [Node<'a>], ParseError> {
        self.tokens.advance()?;
        let mut elements = Vec::new();
        while !self.tokens.current()?.is_punc("]") {
            // A hole, as in `[1, , 2]`, is an empty opaque element.
            if self.tokens.current()?.is_punc(",") {
                elements.push(Node::new(NodeKind::Expression(&[])));
                self.tokens.advance()?;
                continue;
            }
            let element = self.read_expression()?;
            elements.push(element);
            if self.tokens.current()?.is_punc(",") {
                self.tokens.advance()?;
            } else {
                self.expect_punc("]")?;
            }
        }
        self.tokens.advance()?;
        Ok(self.arena.alloc_slice_copy(&elements))
    }

    /// `( a, b )` at the current token.
    fn read_arguments(&mut self) -> Result<&'a [Node<'a>], ParseError> {
        self.expect_punc("(")?;
        self.tokens.advance()?;
        let mut arguments = Vec::new();
        while !self.tokens.current()?.is_punc(")") {
            let argument = self.read_expression()?;
            arguments.push(argument);
            if self.tokens.current()?.is_punc(",") {
                self.tokens.advance()?;
            } else {
                self.expect_punc(")")?;
            }
        }
        self.tokens.advance()?;
        Ok(self.arena.alloc_slice_copy(&arguments))
    }

    /// A function literal at the `function` keyword. The closing `}` of the
    /// body is consumed here.
    fn read_function(&mut self) -> Result<&'a Function<'a>, ParseError> {
        self.tokens.expect((TokenKind::Keyword, "function"))?;
        let token = self.tokens.advance()?;
        let name = if token.kind == TokenKind::Name {
            self.tokens.advance()?;
            FunctionName::Named(token)
        } else {
            self.anonymous_functions += 1;
            FunctionName::Anonymous(self.anonymous_functions)
        };

        self.expect_punc("(")?;
        self.tokens.advance()?;
        let mut parameters = Vec::new();
        while !self.tokens.current()?.is_punc(")") {
            parameters.push(self.tokens.expect(TokenKind::Name)?);
            if self.tokens.advance()?.is_punc(",") {
                self.tokens.advance()?;
            } else {
                self.expect_punc(")")?;
            }
        }
        self.tokens.advance()?;

        self.expect_punc("{")?;
        self.tokens.advance()?;
        let body = self.read_block()?;
        self.expect_punc("}")?;
        self.tokens.advance()?;

        Ok(self.arena.alloc(Function {
            name,
            parameters: self.arena.alloc_slice_copy(&parameters),
            body,
        }))
    }

    // ========================================================================
    // References
    // ========================================================================

    /// Read `a.b["c"]` at a name token.
    ///
    /// Returns `None` when a bracketed key is not a lone string literal. The
    /// brackets are consumed either way.
    fn read_symbol(&mut self) -> Result<Option<SymbolPath<'a>>, ParseError> {
        self.tokens.expect(TokenKind::Name)?;
        self.read_path()
    }

    /// Like `read_symbol`, for any identifier-like first segment.
    fn read_path(&mut self) -> Result<Option<SymbolPath<'a>>, ParseError> {
        let first = self.tokens.current()?;
        let mut segments = vec![first];
        let mut token = self.tokens.advance()?;
        loop {
            if token.is_punc(".") {
                let segment = self.tokens.advance()?;
                if !is_property_name(segment) {
                    return Err(ParseError::unexpected(TokenKind::Name, segment));
                }
                segments.push(segment);
                token = self.tokens.advance()?;
            } else if token.is_punc("[") {
                match self.tokens.read_group()? {
                    TokenTree::Group {
                        trees: &[TokenTree::Token(key)],
                        ..
                    } if key.kind == TokenKind::String => {
                        segments.push(key);
                        token = self.tokens.current()?;
                    }
                    _ => {
                        tracing::debug!(
                            line = token.position.line + 1,
                            column = token.position.column + 1,
                            "unresolved computed member access"
                        );
                        self.warn(token, &messages::UNRESOLVED_COMPUTED_ACCESS, &[]);
                        return Ok(None);
                    }
                }
            } else {
                break;
            }
        }
        Ok(Some(SymbolPath::new(self.arena.alloc_slice_copy(&segments))))
    }

    /// The rest of a reference whose path has been read: an optional call
    /// with its fluent chain, then any undecomposed tail.
    fn read_reference(
        &mut self,
        first: &'a Token<'a>,
        path: Option<SymbolPath<'a>>,
    ) -> Result<Node<'a>, ParseError> {
        let kind = if self.tokens.current()?.is_punc("(") {
            let arguments = self.read_arguments()?;
            let chain = self.read_chain()?;
            let incomplete = self.read_incomplete()?;
            NodeKind::CallReference {
                path,
                arguments,
                chain,
                incomplete,
            }
        } else {
            let incomplete = self.read_incomplete()?;
            NodeKind::Reference { path, incomplete }
        };
        Ok(Node::with_comments(kind, first.comments_before))
    }

    /// `.b(1).c` after a call: one `Call` or `Reference` per link.
    fn read_chain(&mut self) -> Result<&'a [Node<'a>], ParseError> {
        let mut chain = Vec::new();
        while self.tokens.current()?.is_punc(".") {
            let first = self.tokens.advance()?;
            if !is_property_name(first) {
                return Err(ParseError::unexpected(TokenKind::Name, first));
            }
            let path = self.read_path()?;
            let kind = if self.tokens.current()?.is_punc("(") {
                let arguments = self.read_arguments()?;
                match path {
                    Some(callee) => NodeKind::Call { callee, arguments },
                    None => NodeKind::CallReference {
                        path: None,
                        arguments,
                        chain: &[],
                        incomplete: None,
                    },
                }
            } else {
                NodeKind::Reference {
                    path,
                    incomplete: None,
                }
            };
            chain.push(Node::with_comments(kind, first.comments_before));
        }
        Ok(self.arena.alloc_slice_copy(&chain))
    }

    /// If more expression follows the value just read, skip it and return
    /// the skipped trees.
    fn read_incomplete(&mut self) -> Result<Option<&'a [TokenTree<'a>]>, ParseError> {
        let token = self.tokens.current()?;
        if ends_expression(token) {
            return Ok(None);
        }
        let trees = self.read_expression_rest(Vec::new())?;
        tracing::debug!(
            line = token.position.line + 1,
            column = token.position.column + 1,
            trees = trees.len(),
            "incomplete expression"
        );
        self.warn(token, &messages::INCOMPLETE_EXPRESSION, &[]);
        Ok(Some(self.alloc_trees(&trees)))
    }

    /// Like `read_incomplete`, for values that have no place to keep a tail.
    fn discard_rest(&mut self) -> Result<(), ParseError> {
        self.read_incomplete().map(|_| ())
    }

    /// Append tokens to `trees` up to, not including, the next `;` or an
    /// unmatched `, ) ] }`. A `:` ends the expression unless it closes a
    /// `?` conditional.
    fn read_expression_rest(
        &mut self,
        mut trees: Vec<TokenTree<'a>>,
    ) -> Result<Vec<TokenTree<'a>>, ParseError> {
        let mut open_conditionals = 0u32;
        loop {
            let token = self.tokens.current()?;
            if token.is_eof() || token.is_punc(";") {
                break;
            }
            if token.is((TokenKind::Punc, OPENERS)) {
                trees.push(self.tokens.read_group()?);
                continue;
            }
            if token.is_operator("?") {
                open_conditionals += 1;
            } else if token.is_punc(":") {
                if open_conditionals == 0 {
                    break;
                }
                open_conditionals -= 1;
            } else if token.is((TokenKind::Punc, EXPRESSION_TERMINATORS)) {
                break;
            }
            trees.push(TokenTree::Token(token));
            self.tokens.advance()?;
        }
        Ok(trees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names() {
        let make = |kind, value| Token::new(kind, value, Default::default(), Default::default());
        assert!(is_property_name(&make(TokenKind::Name, "foo")));
        assert!(is_property_name(&make(TokenKind::Keyword, "catch")));
        assert!(is_property_name(&make(TokenKind::Operator, "delete")));
        assert!(!is_property_name(&make(TokenKind::Operator, "+")));
        assert!(!is_property_name(&make(TokenKind::Punc, "(")));
    }

    #[test]
    fn test_anonymous_counter_is_per_parser() {
        let arena = Bump::new();
        let first = parse(&arena, "x = function () {}; y = function () {};").unwrap();
        let second = parse(&arena, "z = function () {};").unwrap();
        let name_of = |node: &Node<'_>| match node.kind {
            NodeKind::Assign { value, .. } => match value.kind {
                NodeKind::FunctionLiteral(function) => function.name.to_string(),
                other => panic!("expected a function, got {:?}", other),
            },
            other => panic!("expected an assignment, got {:?}", other),
        };
        assert_eq!(name_of(&first.body[1]), "*anon2");
        assert_eq!(name_of(&second.body[0]), "*anon1");
    }

    #[test]
    fn test_nesting_limit() {
        let arena = Bump::new();
        let text = "[".repeat(400) + &"]".repeat(400);
        let text = arena.alloc_str(&text);
        let err = parse(&arena, text).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }
}
