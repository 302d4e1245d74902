//! docscan_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every fatal error and every non-fatal warning produced while scanning,
//! parsing or loading a source unit is reported as a [`Diagnostic`] with a
//! stable `DS####` code drawn from the [`messages`] catalogue.

use docscan_core::text::{Position, TextSpan};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1100 renders as `DS1100`).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if any.
    pub file: Option<String>,
    /// The source byte span where this diagnostic occurred, if any.
    pub span: Option<TextSpan>,
    /// 0-based line and column of the span start, if known.
    pub position: Option<Position>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            position: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic anchored at a span and position.
    pub fn at(
        span: TextSpan,
        position: Position,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            span: Some(span),
            position: Some(position),
            ..Self::new(message, args)
        }
    }

    /// Attach the file this diagnostic belongs to.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// The code as rendered to users, e.g. `DS1100`.
    pub fn code_string(&self) -> String {
        format!("DS{}", self.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(position) = self.position {
                write!(f, ":{}", position)?;
            }
            write!(f, ": ")?;
        }
        write!(
            f,
            "{} DS{}: {}",
            self.category, self.code, self.message_text
        )?;
        if self.file.is_none() {
            if let Some(position) = self.position {
                write!(f, " at {}", position)?;
            }
        }
        Ok(())
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated while processing a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Attach a file name to every diagnostic that does not have one yet.
    pub fn set_file(&mut self, file: &str) {
        for diagnostic in &mut self.diagnostics {
            if diagnostic.file.is_none() {
                diagnostic.file = Some(file.to_string());
            }
        }
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1001, Error, "Unterminated string literal.");
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1002, Error, "Unterminated comment.");
    pub const UNTERMINATED_REGEXP_LITERAL: DiagnosticMessage = diag!(1003, Error, "Unterminated regular expression literal.");
    pub const INVALID_CHARACTER_0: DiagnosticMessage = diag!(1004, Error, "Invalid character '{0}'.");

    // ========================================================================
    // Parser errors (1100-1199)
    // ========================================================================
    pub const EXPECTED_0_GOT_1: DiagnosticMessage = diag!(1100, Error, "Expected {0}, got {1}.");
    pub const UNEXPECTED_END_OF_INPUT: DiagnosticMessage = diag!(1101, Error, "Unexpected end of input.");
    pub const INVALID_STATEMENT_0: DiagnosticMessage = diag!(1102, Error, "Invalid statement starting with {0}.");
    pub const UNKNOWN_STRUCTURE_KIND_0: DiagnosticMessage = diag!(1103, Error, "Unknown structure kind {0}.");
    pub const NESTING_TOO_DEEP: DiagnosticMessage = diag!(1104, Error, "Nesting too deep; maximum depth is {0}.");

    // ========================================================================
    // Parser warnings (2000-2099)
    // ========================================================================
    pub const UNRESOLVED_COMPUTED_ACCESS: DiagnosticMessage = diag!(2001, Warning, "Computed member access cannot be resolved statically.");
    pub const CONSTRUCT_0_SKIPPED: DiagnosticMessage = diag!(2002, Warning, "'{0}' construct skipped.");
    pub const INCOMPLETE_EXPRESSION: DiagnosticMessage = diag!(2003, Warning, "Expression is part of a larger expression and was not decomposed.");

    // ========================================================================
    // Input and configuration errors (3000-3099)
    // ========================================================================
    pub const COULD_NOT_READ_FILE_0_1: DiagnosticMessage = diag!(3001, Error, "Could not read file '{0}': {1}.");
    pub const INVALID_CONFIGURATION_0: DiagnosticMessage = diag!(3002, Error, "Invalid configuration: {0}.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("Expected {0}, got {1}.", &["name", "punc ';'"]);
        assert_eq!(msg, "Expected name, got punc ';'.");
    }

    #[test]
    fn test_format_message_no_args() {
        let msg = format_message("Unexpected end of input.", &[]);
        assert_eq!(msg, "Unexpected end of input.");
    }

    #[test]
    fn test_diagnostic_display_with_file() {
        let diag = Diagnostic::at(
            TextSpan::new(4, 1),
            Position::new(0, 4),
            &messages::EXPECTED_0_GOT_1,
            &["name", "punc ';'"],
        )
        .with_file("a.js");
        assert_eq!(
            diag.to_string(),
            "a.js:1:5: error DS1100: Expected name, got punc ';'."
        );
    }

    #[test]
    fn test_diagnostic_display_without_file() {
        let diag = Diagnostic::at(
            TextSpan::new(0, 1),
            Position::new(2, 0),
            &messages::INVALID_CHARACTER_0,
            &["#"],
        );
        assert_eq!(
            diag.to_string(),
            "error DS1004: Invalid character '#'. at 3:1"
        );
    }

    #[test]
    fn test_diagnostic_without_location() {
        let diag = Diagnostic::new(&messages::UNEXPECTED_END_OF_INPUT, &[]);
        assert!(diag.file.is_none());
        assert!(diag.span.is_none());
        assert_eq!(diag.code, 1101);
        assert_eq!(diag.code_string(), "DS1101");
        assert!(diag.is_error());
    }

    #[test]
    fn test_diagnostic_collection() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());

        collection.add(Diagnostic::new(&messages::CONSTRUCT_0_SKIPPED, &["if"]));
        assert!(!collection.has_errors());
        assert_eq!(collection.warning_count(), 1);

        collection.add(Diagnostic::new(&messages::UNEXPECTED_END_OF_INPUT, &[]));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_diagnostic_collection_set_file_and_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::at(
            TextSpan::new(10, 1),
            Position::new(1, 0),
            &messages::INCOMPLETE_EXPRESSION,
            &[],
        ));
        collection.add(
            Diagnostic::at(
                TextSpan::new(5, 1),
                Position::new(0, 5),
                &messages::UNRESOLVED_COMPUTED_ACCESS,
                &[],
            )
            .with_file("a.js"),
        );
        collection.set_file("b.js");
        collection.sort();
        assert_eq!(collection.diagnostics()[0].file.as_deref(), Some("a.js"));
        assert_eq!(collection.diagnostics()[1].file.as_deref(), Some("b.js"));
    }
}
