use docscan_ast::{Token, TokenKind, TokenPredicate};
use docscan_core::text::{Position, TextSpan};
use docscan_diagnostics::{messages, Diagnostic};
use docscan_scanner::LexError;

/// A fatal parse error. The parse of the current unit stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected}, got {found_kind} '{found_value}' at {position}")]
    UnexpectedToken {
        expected: String,
        found_kind: TokenKind,
        found_value: String,
        span: TextSpan,
        position: Position,
    },

    #[error("Unexpected end of input at {position}")]
    UnexpectedEndOfInput { span: TextSpan, position: Position },

    #[error("Invalid statement starting with {found} at {position}")]
    InvalidStatement {
        found: String,
        span: TextSpan,
        position: Position,
    },

    #[error("Unknown structure kind {found} at {position}")]
    UnknownStructureKind {
        found: String,
        span: TextSpan,
        position: Position,
    },

    #[error("Nesting too deep at {position}")]
    NestingTooDeep { span: TextSpan, position: Position },
}

impl ParseError {
    /// The error for finding `token` where `expected` was required.
    pub(crate) fn unexpected(expected: impl TokenPredicate, token: &Token<'_>) -> Self {
        if token.is_eof() {
            return ParseError::UnexpectedEndOfInput {
                span: token.span,
                position: token.position,
            };
        }
        ParseError::UnexpectedToken {
            expected: expected.describe(),
            found_kind: token.kind,
            found_value: token.value.to_string(),
            span: token.span,
            position: token.position,
        }
    }

    pub fn span(&self) -> TextSpan {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEndOfInput { span, .. }
            | ParseError::InvalidStatement { span, .. }
            | ParseError::UnknownStructureKind { span, .. }
            | ParseError::NestingTooDeep { span, .. } => *span,
        }
    }

    /// 0-based line and column of the offending token.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(err) => err.position(),
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEndOfInput { position, .. }
            | ParseError::InvalidStatement { position, .. }
            | ParseError::UnknownStructureKind { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::Lex(err) => err.to_diagnostic(),
            ParseError::UnexpectedToken {
                expected,
                found_kind,
                found_value,
                span,
                position,
            } => {
                let found = if *found_kind == TokenKind::Eof {
                    "end of input".to_string()
                } else {
                    format!("{} '{}'", found_kind, found_value)
                };
                Diagnostic::at(
                    *span,
                    *position,
                    &messages::EXPECTED_0_GOT_1,
                    &[expected, &found],
                )
            }
            ParseError::UnexpectedEndOfInput { span, position } => {
                Diagnostic::at(*span, *position, &messages::UNEXPECTED_END_OF_INPUT, &[])
            }
            ParseError::InvalidStatement {
                found,
                span,
                position,
            } => Diagnostic::at(*span, *position, &messages::INVALID_STATEMENT_0, &[found]),
            ParseError::UnknownStructureKind {
                found,
                span,
                position,
            } => Diagnostic::at(
                *span,
                *position,
                &messages::UNKNOWN_STRUCTURE_KIND_0,
                &[found],
            ),
            ParseError::NestingTooDeep { span, position } => Diagnostic::at(
                *span,
                *position,
                &messages::NESTING_TOO_DEEP,
                &[&crate::parser::MAX_NESTING_DEPTH.to_string()],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message_is_one_based() {
        let err = ParseError::UnexpectedToken {
            expected: "name".to_string(),
            found_kind: TokenKind::Punc,
            found_value: ";".to_string(),
            span: TextSpan::new(4, 1),
            position: Position::new(0, 4),
        };
        assert_eq!(err.to_string(), "Expected name, got punc ';' at 1:5");
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, 1100);
        assert_eq!(diag.message_text, "Expected name, got punc ';'.");
    }

    #[test]
    fn test_lex_error_passes_through() {
        let lex = LexError::UnterminatedComment {
            span: TextSpan::new(0, 2),
            position: Position::new(2, 0),
        };
        let err = ParseError::from(lex.clone());
        assert_eq!(err.to_string(), lex.to_string());
        assert_eq!(err.position(), Position::new(2, 0));
        assert_eq!(err.to_diagnostic().code, 1002);
    }
}
