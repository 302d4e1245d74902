//! docscan_printer: AST to JavaScript text.
//!
//! Renders a parsed `Program` back to source. Parsing the output again yields
//! a structurally equal program: nodes are printed in order, token trees are
//! re-emitted token by token, and line breaks inside token trees are kept so
//! that semicolon insertion sees the same input.

use docscan_ast::tree::quote_string;
use docscan_ast::{
    Comment, CommentKind, Function, FunctionName, Node, NodeKind, PrimitiveKind, Program,
    ScopeKind, SymbolPath, Token, TokenKind, TokenTree,
};

/// Printed in place of a path whose computed key could not be resolved.
/// It parses back to an unresolved reference.
pub const UNRESOLVED_PATH: &str = "__unresolved__[0]";

/// Options for the printer.
#[derive(Debug, Clone)]
pub struct PrinterOptions {
    /// Whether to emit the comments leading each statement.
    pub comments: bool,
    /// Indentation string.
    pub indent: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            comments: true,
            indent: "    ".to_string(),
        }
    }
}

/// Print `program` with default options.
pub fn print_program(program: &Program<'_>) -> String {
    Printer::new().print_program(program)
}

/// The printer converts nodes to text.
pub struct Printer {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::with_options(PrinterOptions::default())
    }

    pub fn with_options(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent_level: 0,
            options,
        }
    }

    /// Print a program, one statement per line.
    pub fn print_program(&mut self, program: &Program<'_>) -> String {
        self.print_nodes(program.body)
    }

    /// Print a statement sequence at the top level.
    pub fn print_nodes(&mut self, nodes: &[Node<'_>]) -> String {
        self.output.clear();
        self.indent_level = 0;
        self.print_statements(nodes);
        std::mem::take(&mut self.output)
    }

    // ========================================================================
    // Statement printing
    // ========================================================================

    fn print_statements(&mut self, nodes: &[Node<'_>]) {
        let mut i = 0;
        while i < nodes.len() {
            let node = &nodes[i];
            self.print_comments(node.comments_before);
            self.write_indent();
            match nodes.get(i + 1) {
                Some(next) if initializes(node, next) => {
                    self.print_declaration(node, next);
                    i += 2;
                }
                _ => {
                    self.print_statement(node);
                    i += 1;
                }
            }
            self.write_newline();
        }
    }

    fn print_statement(&mut self, node: &Node<'_>) {
        match node.kind {
            NodeKind::Block(body) => self.print_block(body),
            NodeKind::VarDecl { scope, name } => {
                self.write(scope.as_str());
                self.write(" ");
                self.write(name.value);
                self.write(";");
            }
            NodeKind::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.print_expression(value);
                }
                self.write(";");
            }
            NodeKind::Skipped { keyword, trees } => self.print_skipped(keyword, trees),
            NodeKind::FunctionLiteral(function) => {
                // Parenthesized so it is not read back as a declaration.
                self.write("(");
                self.print_function(function);
                self.write(");");
            }
            _ => {
                self.print_expression(node);
                self.write(";");
            }
        }
    }

    /// `VarDecl(x)` directly followed by `Assign(x = …)`.
    fn print_declaration(&mut self, decl: &Node<'_>, assign: &Node<'_>) {
        let (NodeKind::VarDecl { scope, name }, NodeKind::Assign { value, .. }) =
            (decl.kind, assign.kind)
        else {
            return;
        };
        if let NodeKind::FunctionLiteral(function) = value.kind {
            let same_name =
                matches!(function.name, FunctionName::Named(own) if own.value == name.value);
            if scope == ScopeKind::Var && same_name {
                self.print_function(function);
                return;
            }
        }
        self.write(scope.as_str());
        self.write(" ");
        self.write(name.value);
        self.write(" = ");
        self.print_expression(value);
        self.write(";");
    }

    fn print_block(&mut self, body: &[Node<'_>]) {
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_newline();
        self.increase_indent();
        self.print_statements(body);
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn print_skipped<'t>(&mut self, keyword: &'t Token<'t>, trees: &[TokenTree<'t>]) {
        let mut prev = None;
        self.write_token(keyword, &mut prev, 0);
        self.write_trees(trees, &mut prev, 0);
    }

    fn print_comments(&mut self, comments: &[Comment<'_>]) {
        if !self.options.comments {
            return;
        }
        for comment in comments {
            self.write_indent();
            match comment.kind {
                CommentKind::Line => {
                    self.write("//");
                    self.write(comment.text);
                }
                CommentKind::Block => {
                    self.write("/*");
                    self.write(comment.text);
                    self.write("*/");
                }
            }
            self.write_newline();
        }
    }

    // ========================================================================
    // Expression printing
    // ========================================================================

    fn print_expression(&mut self, node: &Node<'_>) {
        match node.kind {
            NodeKind::Block(body) => self.print_block(body),
            NodeKind::VarDecl { name, .. } => self.write(name.value),
            NodeKind::Assign {
                target,
                operator,
                value,
            } => {
                self.write_owned(target.to_string());
                self.write(" ");
                self.write(operator);
                self.write(" ");
                self.print_expression(value);
            }
            NodeKind::FunctionLiteral(function) => self.print_function(function),
            NodeKind::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.print_expression(value);
                }
            }
            NodeKind::Call { callee, arguments } => {
                self.write_owned(callee.to_string());
                self.print_arguments(arguments);
            }
            NodeKind::Reference { path, incomplete } => {
                self.print_path(path);
                self.print_tail(incomplete);
            }
            NodeKind::CallReference {
                path,
                arguments,
                chain,
                incomplete,
            } => {
                self.print_path(path);
                self.print_arguments(arguments);
                for link in chain {
                    self.write(".");
                    self.print_expression(link);
                }
                self.print_tail(incomplete);
            }
            NodeKind::Instance(inner) => {
                self.write("new ");
                self.print_expression(inner);
            }
            NodeKind::ArrayLiteral(elements) => {
                self.write("[");
                self.print_list(elements);
                // A trailing hole needs its own comma to survive.
                if elements.last().is_some_and(is_hole) {
                    self.write(",");
                }
                self.write("]");
            }
            NodeKind::ObjectLiteral(trees) | NodeKind::Expression(trees) => {
                self.write_trees(trees, &mut None, 0);
            }
            NodeKind::Primitive { kind, token } => match kind {
                PrimitiveKind::String => self.write_owned(quote_string(token.value)),
                _ => self.write(token.value),
            },
            NodeKind::Iife {
                function,
                arguments,
            } => {
                self.write("(");
                self.print_function(function);
                self.write(")");
                self.print_arguments(arguments);
            }
            NodeKind::Skipped { keyword, trees } => self.print_skipped(keyword, trees),
        }
    }

    fn print_function(&mut self, function: &Function<'_>) {
        match function.name {
            FunctionName::Named(name) => {
                self.write("function ");
                self.write(name.value);
            }
            // Generated names are not printed.
            FunctionName::Anonymous(_) => self.write("function "),
        }
        self.write("(");
        for (i, parameter) in function.parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(parameter.value);
        }
        self.write(") ");
        self.print_block(function.body);
    }

    fn print_path(&mut self, path: Option<SymbolPath<'_>>) {
        match path {
            Some(path) => self.write_owned(path.to_string()),
            None => self.write(UNRESOLVED_PATH),
        }
    }

    fn print_arguments(&mut self, arguments: &[Node<'_>]) {
        self.write("(");
        self.print_list(arguments);
        self.write(")");
    }

    fn print_list(&mut self, nodes: &[Node<'_>]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expression(node);
        }
    }

    /// The skipped remainder of an incomplete expression.
    fn print_tail(&mut self, incomplete: Option<&[TokenTree<'_>]>) {
        let Some(trees) = incomplete else {
            return;
        };
        if let Some(first) = trees.first() {
            if !first.first_token().is_punc(".") {
                self.write(" ");
            }
        }
        self.write_trees(trees, &mut None, 0);
    }

    // ========================================================================
    // Token trees
    // ========================================================================

    fn write_trees<'t>(
        &mut self,
        trees: &[TokenTree<'t>],
        prev: &mut Option<&'t Token<'t>>,
        depth: u32,
    ) {
        for tree in trees {
            match *tree {
                TokenTree::Token(token) => self.write_token(token, prev, depth),
                TokenTree::Group { open, trees, close } => {
                    self.write_token(open, prev, depth);
                    let inner = if open.is_punc("{") { depth + 1 } else { depth };
                    self.write_trees(trees, prev, inner);
                    self.write_token(close, prev, depth);
                }
            }
        }
    }

    /// Write one token, separated from `prev` by a line break when the
    /// source had one, else by a space where the two would otherwise merge
    /// or read badly.
    fn write_token<'t>(&mut self, token: &'t Token<'t>, prev: &mut Option<&'t Token<'t>>, depth: u32) {
        if let Some(before) = *prev {
            if token.has_preceding_line_break() {
                self.write_newline();
                self.indent_level += depth;
                self.write_indent();
                self.indent_level -= depth;
            } else if needs_space(before, token) {
                self.write(" ");
            }
        }
        match token.kind {
            TokenKind::String => self.write_owned(quote_string(token.value)),
            _ => self.write(token.value),
        }
        *prev = Some(token);
    }

    // ========================================================================
    // Output helpers
    // ========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_owned(&mut self, s: String) {
        self.output.push_str(&s);
    }

    fn write_newline(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent);
        }
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

/// Whether `decl` is a `VarDecl` that `next` initializes with a plain `=`.
fn initializes(decl: &Node<'_>, next: &Node<'_>) -> bool {
    match (decl.kind, next.kind) {
        (
            NodeKind::VarDecl { name, .. },
            NodeKind::Assign {
                target, operator, ..
            },
        ) => operator == "=" && target.as_single_name() == Some(name.value),
        _ => false,
    }
}

/// An array hole is read as an empty opaque element.
fn is_hole(node: &Node<'_>) -> bool {
    matches!(node.kind, NodeKind::Expression(trees) if trees.is_empty())
}

fn needs_space(prev: &Token<'_>, next: &Token<'_>) -> bool {
    if prev.kind == TokenKind::Punc && matches!(prev.value, "(" | "[" | ".") {
        return false;
    }
    if next.kind == TokenKind::Punc {
        match next.value {
            ")" | "]" | "," | ";" | ":" => return false,
            "." => return prev.kind == TokenKind::Number,
            "(" | "[" => {
                return !(prev.kind == TokenKind::Name || prev.is_punc(")") || prev.is_punc("]"))
            }
            _ => {}
        }
    }
    // `!x`, `~x`, but never `! =`.
    if prev.kind == TokenKind::Operator && matches!(prev.value, "!" | "~") {
        return next.kind == TokenKind::Operator;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, value: &'static str) -> Token<'static> {
        Token::new(kind, value, Default::default(), Default::default())
    }

    #[test]
    fn test_needs_space() {
        let name = token(TokenKind::Name, "foo");
        let open = token(TokenKind::Punc, "(");
        let close = token(TokenKind::Punc, ")");
        let dot = token(TokenKind::Punc, ".");
        let number = token(TokenKind::Number, "1");
        let not = token(TokenKind::Operator, "!");
        let typeof_ = token(TokenKind::Operator, "typeof");

        assert!(!needs_space(&name, &open));
        assert!(!needs_space(&open, &name));
        assert!(!needs_space(&name, &close));
        assert!(!needs_space(&name, &dot));
        assert!(needs_space(&number, &dot));
        assert!(!needs_space(&not, &name));
        assert!(needs_space(&typeof_, &name));
        assert!(needs_space(&name, &name));
    }
}
