//! The token stream: one-token lookahead over a [`TokenSource`], comment
//! hand-off between neighbouring tokens, and semicolon insertion.

use crate::error::ParseError;
use crate::parser::MAX_NESTING_DEPTH;
use bumpalo::Bump;
use docscan_ast::{Token, TokenKind, TokenPredicate, TokenTree};
use docscan_scanner::TokenSource;

const OPENERS: &[&str] = &["(", "[", "{"];
const CHAIN_PUNC: &[&str] = &["(", "[", "."];
const JUMP_KEYWORDS: &[&str] = &["continue", "break", "return", "throw"];

fn closer_of(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

/// A cursor over arena-allocated tokens.
///
/// Tokens are pulled from the source lazily. Each fetched token hands its
/// `comments_before` to the previously fetched token's `comments_after`.
pub struct TokenStream<'a, S> {
    arena: &'a Bump,
    source: S,
    current: Option<&'a Token<'a>>,
    peeked: Option<&'a Token<'a>>,
    previous: Option<&'a Token<'a>>,
    /// The real token held back behind an inserted semicolon.
    held: Option<&'a Token<'a>>,
    /// The last token handed out by `fetch`, inserted or not.
    last: Option<&'a Token<'a>>,
    in_for_header: bool,
    paren_depth: u32,
    group_depth: u32,
}

impl<'a, S: TokenSource<'a>> TokenStream<'a, S> {
    pub fn new(arena: &'a Bump, source: S) -> Self {
        Self {
            arena,
            source,
            current: None,
            peeked: None,
            previous: None,
            held: None,
            last: None,
            in_for_header: false,
            paren_depth: 0,
            group_depth: 0,
        }
    }

    pub fn arena(&self) -> &'a Bump {
        self.arena
    }

    /// The current token. The first call fetches the first token.
    pub fn current(&mut self) -> Result<&'a Token<'a>, ParseError> {
        match self.current {
            Some(token) => Ok(token),
            None => {
                let token = self.fetch()?;
                self.current = Some(token);
                Ok(token)
            }
        }
    }

    /// The token after the current one, without advancing.
    pub fn peek(&mut self) -> Result<&'a Token<'a>, ParseError> {
        self.current()?;
        match self.peeked {
            Some(token) => Ok(token),
            None => {
                let token = self.fetch()?;
                self.peeked = Some(token);
                Ok(token)
            }
        }
    }

    /// The last consumed token, `None` before the first `advance`.
    pub fn previous(&self) -> Option<&'a Token<'a>> {
        self.previous
    }

    /// Move to the next token and return it.
    pub fn advance(&mut self) -> Result<&'a Token<'a>, ParseError> {
        let consumed = self.current()?;
        let next = match self.peeked.take() {
            Some(token) => token,
            None => self.fetch()?,
        };
        self.previous = Some(consumed);
        self.current = Some(next);
        Ok(next)
    }

    /// Whether the last fetched token lies inside a `for ( … )` header.
    pub fn in_for_header(&self) -> bool {
        self.in_for_header
    }

    /// Return the current token if it matches `predicate`, without advancing.
    pub fn expect(&mut self, predicate: impl TokenPredicate) -> Result<&'a Token<'a>, ParseError> {
        let token = self.current()?;
        if token.is(&predicate) {
            Ok(token)
        } else {
            Err(ParseError::unexpected(predicate, token))
        }
    }

    /// Move past the current token and collect everything up to the first
    /// token matching `predicate` outside nested brackets.
    ///
    /// Nested `( … )`, `[ … ]` and `{ … }` spans are collected as groups.
    /// The matching token is not part of the result; the stream is left on
    /// it when `stop_before_match` is set and just past it otherwise.
    pub fn skip_until(
        &mut self,
        predicate: impl TokenPredicate,
        stop_before_match: bool,
    ) -> Result<Vec<TokenTree<'a>>, ParseError> {
        self.advance()?;
        let mut trees = Vec::new();
        loop {
            let token = self.current()?;
            if token.is(&predicate) {
                break;
            }
            if token.is_eof() {
                return Err(ParseError::UnexpectedEndOfInput {
                    span: token.span,
                    position: token.position,
                });
            }
            if token.is((TokenKind::Punc, OPENERS)) {
                trees.push(self.read_group()?);
                continue;
            }
            trees.push(TokenTree::Token(token));
            self.advance()?;
        }
        if !stop_before_match {
            self.advance()?;
        }
        Ok(trees)
    }

    /// Read the bracketed group opened by the current token, leaving the
    /// stream just past its closing delimiter.
    pub fn read_group(&mut self) -> Result<TokenTree<'a>, ParseError> {
        let open = self.expect((TokenKind::Punc, OPENERS))?;
        if self.group_depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                span: open.span,
                position: open.position,
            });
        }
        self.group_depth += 1;
        let trees = self.skip_until((TokenKind::Punc, closer_of(open.value)), true);
        self.group_depth -= 1;
        let trees = trees?;
        let close = self.current()?;
        self.advance()?;
        Ok(TokenTree::Group {
            open,
            trees: self.arena.alloc_slice_copy(&trees),
            close,
        })
    }

    // ========================================================================
    // Low-level fetch
    // ========================================================================

    fn fetch(&mut self) -> Result<&'a Token<'a>, ParseError> {
        if let Some(token) = self.held.take() {
            self.last = Some(token);
            return Ok(token);
        }

        let next: &'a Token<'a> = self.arena.alloc(self.source.next_token()?);
        if let Some(last) = self.last {
            let _ = last.comments_after.set(next.comments_before);
        }

        let insert = match self.last {
            Some(last) => !self.in_for_header && Self::needs_semicolon(last, next),
            None => false,
        };
        self.track_for_header(next);

        if insert {
            let semicolon: &'a Token<'a> = self.arena.alloc(Token::inserted_semicolon(next));
            tracing::trace!(
                line = next.position.line + 1,
                column = next.position.column + 1,
                "inserted semicolon"
            );
            self.held = Some(next);
            self.last = Some(semicolon);
            return Ok(semicolon);
        }
        self.last = Some(next);
        Ok(next)
    }

    /// The insertion rule between the last token handed out and `next`.
    fn needs_semicolon(current: &Token<'_>, next: &Token<'_>) -> bool {
        let line_break = next.has_preceding_line_break();
        if !line_break && !next.is_punc("}") {
            return false;
        }
        // Never next to an explicit semicolon.
        if current.is_punc(";") || next.is_punc(";") {
            return false;
        }
        if !(line_break
            && (next.is_operator("++") || current.is((TokenKind::Keyword, JUMP_KEYWORDS))))
        {
            return false;
        }
        // An operator or `( [ .` on either side means the expression goes on.
        let continues = |token: &Token<'_>| {
            token.kind == TokenKind::Operator || token.is((TokenKind::Punc, CHAIN_PUNC))
        };
        !continues(current) && !continues(next)
    }

    fn track_for_header(&mut self, token: &Token<'_>) {
        if token.is_keyword("for") {
            self.in_for_header = true;
            self.paren_depth = 0;
        } else if self.in_for_header {
            if token.is_punc("(") {
                self.paren_depth += 1;
            } else if token.is_punc(")") {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                if self.paren_depth == 0 {
                    self.in_for_header = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_scanner::Scanner;

    fn stream<'a>(arena: &'a Bump, text: &'a str) -> TokenStream<'a, Scanner<'a>> {
        TokenStream::new(arena, Scanner::new(arena, text))
    }

    fn values(text: &str) -> Vec<String> {
        let arena = Bump::new();
        let mut tokens = stream(&arena, text);
        let mut out = Vec::new();
        let mut token = tokens.current().unwrap();
        while !token.is_eof() {
            out.push(if token.is_inserted() {
                "<;>".to_string()
            } else {
                token.value.to_string()
            });
            token = tokens.advance().unwrap();
        }
        out
    }

    #[test]
    fn test_current_is_lazy_and_previous_starts_empty() {
        let arena = Bump::new();
        let mut tokens = stream(&arena, "a b");
        assert!(tokens.previous().is_none());
        assert_eq!(tokens.current().unwrap().value, "a");
        assert_eq!(tokens.peek().unwrap().value, "b");
        assert_eq!(tokens.current().unwrap().value, "a");
        assert_eq!(tokens.advance().unwrap().value, "b");
        assert_eq!(tokens.previous().unwrap().value, "a");
    }

    #[test]
    fn test_comments_after_are_set_on_fetch() {
        let arena = Bump::new();
        let mut tokens = stream(&arena, "a /* one */ b");
        let a = tokens.current().unwrap();
        assert!(a.comments_after().is_empty());
        tokens.peek().unwrap();
        assert_eq!(a.comments_after().len(), 1);
        assert_eq!(a.comments_after()[0].text, " one ");
    }

    #[test]
    fn test_jump_keywords_insert_on_line_break() {
        assert_eq!(values("return\nx"), vec!["return", "<;>", "x"]);
        assert_eq!(values("break\nfoo"), vec!["break", "<;>", "foo"]);
        assert_eq!(values("return x"), vec!["return", "x"]);
    }

    #[test]
    fn test_no_insertion_between_ordinary_lines() {
        assert_eq!(values("a\nb"), vec!["a", "b"]);
        assert_eq!(values("a.b()\n.c()"), vec!["a", ".", "b", "(", ")", ".", "c", "(", ")"]);
    }

    #[test]
    fn test_no_insertion_before_explicit_semicolon() {
        assert_eq!(values("return\n;"), vec!["return", ";"]);
    }

    #[test]
    fn test_no_insertion_in_for_header() {
        assert_eq!(
            values("for (x in\nreturn\ny) z"),
            vec!["for", "(", "x", "in", "return", "y", ")", "z"]
        );
        assert!(values("for (;;) {}\ncontinue\nx").contains(&"<;>".to_string()));
    }

    #[test]
    fn test_expect_reports_found_token() {
        let arena = Bump::new();
        let mut tokens = stream(&arena, "var ;");
        tokens.advance().unwrap();
        let err = tokens.expect(TokenKind::Name).unwrap_err();
        match err {
            ParseError::UnexpectedToken {
                found_kind,
                found_value,
                position,
                ..
            } => {
                assert_eq!(found_kind, TokenKind::Punc);
                assert_eq!(found_value, ";");
                assert_eq!(position.column, 4);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_skip_until_collects_nested_groups() {
        let arena = Bump::new();
        let mut tokens = stream(&arena, "[a, (b, [c]), {d: e}] ; f");
        let trees = tokens.skip_until((TokenKind::Punc, ";"), false).unwrap();
        // `[` was the starting token and is skipped.
        assert_eq!(trees.len(), 6);
        assert!(matches!(trees[2], TokenTree::Group { .. }));
        assert_eq!(trees[2].token_count(), 7);
        assert_eq!(tokens.current().unwrap().value, "f");
    }

    #[test]
    fn test_skip_until_at_end_of_input() {
        let arena = Bump::new();
        let mut tokens = stream(&arena, "( a b");
        let err = tokens.skip_until((TokenKind::Punc, ")"), true).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn test_deep_groups_are_rejected() {
        let arena = Bump::new();
        let text = arena.alloc_str(&"(".repeat(1000));
        let mut tokens = stream(&arena, text);
        let err = tokens.read_group().unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }

    #[test]
    fn test_read_group() {
        let arena = Bump::new();
        let mut tokens = stream(&arena, "(a, (b)) c");
        let group = tokens.read_group().unwrap();
        match group {
            TokenTree::Group { open, trees, close } => {
                assert_eq!(open.value, "(");
                assert_eq!(close.value, ")");
                assert_eq!(trees.len(), 3);
            }
            other => panic!("expected a group, got {:?}", other),
        }
        assert_eq!(tokens.current().unwrap().value, "c");
    }
}
