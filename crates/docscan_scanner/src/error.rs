use docscan_core::text::{Position, TextSpan};
use docscan_diagnostics::{messages, Diagnostic};

/// A fatal tokenizer error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Unterminated string literal at {position}")]
    UnterminatedString { span: TextSpan, position: Position },

    #[error("Unterminated comment at {position}")]
    UnterminatedComment { span: TextSpan, position: Position },

    #[error("Unterminated regular expression literal at {position}")]
    UnterminatedRegExp { span: TextSpan, position: Position },

    #[error("Invalid character {ch:?} at {position}")]
    InvalidCharacter {
        ch: char,
        span: TextSpan,
        position: Position,
    },
}

impl LexError {
    pub fn span(&self) -> TextSpan {
        match *self {
            LexError::UnterminatedString { span, .. }
            | LexError::UnterminatedComment { span, .. }
            | LexError::UnterminatedRegExp { span, .. }
            | LexError::InvalidCharacter { span, .. } => span,
        }
    }

    pub fn position(&self) -> Position {
        match *self {
            LexError::UnterminatedString { position, .. }
            | LexError::UnterminatedComment { position, .. }
            | LexError::UnterminatedRegExp { position, .. }
            | LexError::InvalidCharacter { position, .. } => position,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LexError::UnterminatedString { span, position } => {
                Diagnostic::at(*span, *position, &messages::UNTERMINATED_STRING_LITERAL, &[])
            }
            LexError::UnterminatedComment { span, position } => {
                Diagnostic::at(*span, *position, &messages::UNTERMINATED_COMMENT, &[])
            }
            LexError::UnterminatedRegExp { span, position } => {
                Diagnostic::at(*span, *position, &messages::UNTERMINATED_REGEXP_LITERAL, &[])
            }
            LexError::InvalidCharacter { ch, span, position } => Diagnostic::at(
                *span,
                *position,
                &messages::INVALID_CHARACTER_0,
                &[&ch.to_string()],
            ),
        }
    }
}
