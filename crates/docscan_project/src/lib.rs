//! docscan_project: Multi-unit orchestration.
//!
//! A `Project` holds the configuration and the source units of one run.
//! Units are parsed in parallel, each with its own arena and parser, and a
//! failure in one unit never affects the others.

use bumpalo::Bump;
use docscan_ast::visitor::count_nodes;
use docscan_ast::Program;
use docscan_binder::Binder;
use docscan_diagnostics::{messages, Diagnostic};
use docscan_module::{module_id_from_path, ModuleId};
use docscan_options::DocscanConfig;
use docscan_parser::parse;
use docscan_printer::print_program;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What to render for each parsed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitKind {
    /// A pretty `Debug` dump of the node sequence.
    #[default]
    Ast,
    /// The program printed back as JavaScript.
    Js,
    /// The scope and symbol outline.
    Symbols,
    None,
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ProjectError::Read { path, source } => {
                let file = path.display().to_string();
                let diagnostic = Diagnostic::new(
                    &messages::COULD_NOT_READ_FILE_0_1,
                    &[&file, &source.to_string()],
                );
                diagnostic.with_file(file)
            }
        }
    }
}

/// One source text and the file it came from.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub file: String,
    pub text: String,
}

/// The result of parsing a unit successfully.
#[derive(Debug, Clone)]
pub struct UnitSummary {
    /// Nodes in the program, nested ones included.
    pub node_count: usize,
    pub warnings: Vec<Diagnostic>,
    /// The rendered program, unless `EmitKind::None`.
    pub output: Option<String>,
}

/// The outcome for one unit, in input order.
#[derive(Debug, Clone)]
pub struct UnitReport {
    pub file: String,
    pub module_id: Option<ModuleId>,
    pub outcome: Result<UnitSummary, Diagnostic>,
    pub elapsed: Duration,
}

impl UnitReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Totals over a set of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub units: usize,
    pub parsed: usize,
    pub failed: usize,
    pub nodes: usize,
    pub warnings: usize,
}

impl ProjectStats {
    pub fn from_reports(reports: &[UnitReport]) -> Self {
        let mut stats = Self {
            units: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match &report.outcome {
                Ok(summary) => {
                    stats.parsed += 1;
                    stats.nodes += summary.node_count;
                    stats.warnings += summary.warnings.len();
                }
                Err(_) => stats.failed += 1,
            }
        }
        stats
    }
}

pub struct Project {
    config: DocscanConfig,
    emit: EmitKind,
    units: Vec<SourceUnit>,
}

impl Project {
    pub fn new(config: DocscanConfig) -> Self {
        Self {
            config,
            emit: EmitKind::default(),
            units: Vec::new(),
        }
    }

    pub fn with_emit(mut self, emit: EmitKind) -> Self {
        self.emit = emit;
        self
    }

    pub fn config(&self) -> &DocscanConfig {
        &self.config
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    /// Add an in-memory source unit.
    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        self.units.push(SourceUnit {
            file: file.into(),
            text: text.into(),
        });
    }

    /// Read a file from disk and add it as a unit.
    pub fn add_file(&mut self, path: &Path) -> Result<(), ProjectError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_source(path.display().to_string(), text);
        Ok(())
    }

    /// Parse every unit on the rayon thread pool.
    pub fn parse_all(&self) -> Vec<UnitReport> {
        self.units
            .par_iter()
            .map(|unit| self.parse_unit(unit))
            .collect()
    }

    /// Parse a single unit.
    pub fn parse_unit(&self, unit: &SourceUnit) -> UnitReport {
        let start = Instant::now();
        let module_id = module_id_from_path(&unit.file, &self.config);

        let arena = Bump::new();
        let outcome = match parse(&arena, &unit.text) {
            Ok(program) => Ok(self.summarize(&unit.file, &program)),
            Err(err) => Err(err.to_diagnostic().with_file(unit.file.as_str())),
        };
        let elapsed = start.elapsed();

        let module = module_id.as_ref().map(ModuleId::as_str).unwrap_or("-");
        match &outcome {
            Ok(summary) => tracing::info!(
                file = %unit.file,
                module,
                nodes = summary.node_count,
                warnings = summary.warnings.len(),
                elapsed_us = elapsed.as_micros() as u64,
                "processed unit"
            ),
            Err(diagnostic) => tracing::info!(
                file = %unit.file,
                module,
                error = %diagnostic.message_text,
                elapsed_us = elapsed.as_micros() as u64,
                "unit failed to parse"
            ),
        }

        UnitReport {
            file: unit.file.clone(),
            module_id,
            outcome,
            elapsed,
        }
    }

    fn summarize(&self, file: &str, program: &Program<'_>) -> UnitSummary {
        let mut warnings = program.warnings.clone();
        warnings.set_file(file);
        let output = match self.emit {
            EmitKind::Ast => Some(format!("{:#?}", program.body)),
            EmitKind::Js => Some(print_program(program)),
            EmitKind::Symbols => Some(Binder::bind(program).to_string()),
            EmitKind::None => None,
        };
        UnitSummary {
            node_count: count_nodes(program.body),
            warnings: warnings.into_diagnostics(),
            output,
        }
    }
}
