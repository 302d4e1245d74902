//! The tokenizer boundary consumed by the parser.

use crate::error::LexError;
use docscan_ast::token::{Token, TokenKind};
use docscan_core::text::{Position, TextSpan};

/// A producer of raw tokens.
///
/// After the input is exhausted every call returns an `Eof` token.
pub trait TokenSource<'a> {
    fn next_token(&mut self) -> Result<Token<'a>, LexError>;
}

impl<'a, S: TokenSource<'a> + ?Sized> TokenSource<'a> for &mut S {
    fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        (**self).next_token()
    }
}

impl<'a, S: TokenSource<'a> + ?Sized> TokenSource<'a> for Box<S> {
    fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        (**self).next_token()
    }
}

/// A token source replaying a pre-built token vector.
pub struct TokenList<'a> {
    tokens: std::vec::IntoIter<Token<'a>>,
    end: TextSpan,
    end_position: Position,
}

impl<'a> TokenList<'a> {
    /// Replay `tokens` in order. A trailing `Eof` token is optional.
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        let (end, end_position) = tokens
            .last()
            .map(|last| (TextSpan::empty(last.span.end()), last.position))
            .unwrap_or_default();
        Self {
            tokens: tokens.into_iter(),
            end,
            end_position,
        }
    }
}

impl<'a> TokenSource<'a> for TokenList<'a> {
    fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        Ok(self
            .tokens
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", self.end, self.end_position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_list_replays_then_eof() {
        let tokens = vec![
            Token::new(TokenKind::Name, "a", TextSpan::new(0, 1), Position::new(0, 0)),
            Token::new(TokenKind::Punc, ";", TextSpan::new(1, 1), Position::new(0, 1)),
        ];
        let mut list = TokenList::new(tokens);
        assert_eq!(list.next_token().unwrap().value, "a");
        assert_eq!(list.next_token().unwrap().value, ";");
        let eof = list.next_token().unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.span.start, 2);
        assert!(list.next_token().unwrap().is_eof());
    }

    #[test]
    fn test_empty_token_list() {
        let mut list = TokenList::new(Vec::new());
        assert!(list.next_token().unwrap().is_eof());
    }
}
