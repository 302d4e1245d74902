//! Diagnostic rendering with miette.

use docscan_diagnostics::{Diagnostic, DiagnosticCategory};
use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};

/// Convert a diagnostic into its miette form, labelling the span if any.
pub fn to_miette(diagnostic: &Diagnostic) -> MietteDiagnostic {
    let severity = match diagnostic.category {
        DiagnosticCategory::Error => Severity::Error,
        DiagnosticCategory::Warning => Severity::Warning,
    };
    let mut report = MietteDiagnostic::new(diagnostic.message_text.clone())
        .with_code(diagnostic.code_string())
        .with_severity(severity);
    if let Some(span) = diagnostic.span {
        let label = match diagnostic.position {
            Some(position) => format!("at {}", position),
            None => "here".to_string(),
        };
        report = report.with_label(LabeledSpan::at(span.to_range(), label));
    } else if let Some(file) = &diagnostic.file {
        report = report.with_help(format!("in {}", file));
    }
    report
}

/// Build a report, attaching the source text when the diagnostic points
/// into it.
pub fn report(diagnostic: &Diagnostic, source: Option<&str>) -> Report {
    let report = Report::new(to_miette(diagnostic));
    match (&diagnostic.file, source, diagnostic.span) {
        (Some(file), Some(text), Some(_)) => {
            report.with_source_code(NamedSource::new(file, text.to_string()))
        }
        _ => report,
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, source: Option<&str>) {
    eprintln!("{:?}", report(diagnostic, source));
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_diagnostics::messages;

    #[test]
    fn test_error_without_span() {
        let diagnostic = Diagnostic::new(&messages::COULD_NOT_READ_FILE_0_1, &["a.js", "denied"])
            .with_file("a.js");
        let converted = to_miette(&diagnostic);
        assert_eq!(converted.code.as_deref(), Some("DS3001"));
        assert_eq!(converted.severity, Some(Severity::Error));
        assert!(converted.labels.is_none());
        assert_eq!(converted.help.as_deref(), Some("in a.js"));
    }

    #[test]
    fn test_warning_is_labelled() {
        let warnings = warnings_of("x[y];");
        let converted = to_miette(&warnings[0]);
        assert_eq!(converted.code.as_deref(), Some("DS2001"));
        assert_eq!(converted.severity, Some(Severity::Warning));
        let labels = converted.labels.unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 1);
    }

    fn warnings_of(text: &str) -> Vec<Diagnostic> {
        let mut project = docscan_project::Project::new(Default::default())
            .with_emit(docscan_project::EmitKind::None);
        project.add_source("w.js", text);
        project
            .parse_all()
            .remove(0)
            .outcome
            .unwrap()
            .warnings
    }
}
