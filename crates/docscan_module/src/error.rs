//! Errors raised while discovering source files.

use docscan_diagnostics::{messages, Diagnostic};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ModuleError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ModuleError::Io { path, source } => {
                let file = path.display().to_string();
                let diagnostic = Diagnostic::new(
                    &messages::COULD_NOT_READ_FILE_0_1,
                    &[&file, &source.to_string()],
                );
                diagnostic.with_file(file)
            }
            ModuleError::Walk(err) => {
                let file = err
                    .path()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                let diagnostic = Diagnostic::new(
                    &messages::COULD_NOT_READ_FILE_0_1,
                    &[&file, &err.to_string()],
                );
                diagnostic.with_file(file)
            }
        }
    }
}
