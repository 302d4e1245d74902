//! docscan: Scan JavaScript sources for documentation structure.
//!
//! Usage:
//!   docscan [options] <path>...
//!
//! Directories are walked recursively and every `.js` file found is parsed.

mod logging;
mod report;

use clap::{Parser as ClapParser, ValueEnum};
use docscan_module::discover_source_files;
use docscan_options::load_config;
use docscan_project::{EmitKind, Project, ProjectStats};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

/// All units parsed.
const EXIT_SUCCESS: i32 = 0;
/// At least one unit could not be read or parsed.
const EXIT_UNIT_FAILED: i32 = 1;
/// Bad configuration, bad input paths, or nothing to do.
const EXIT_USAGE: i32 = 2;

#[derive(ClapParser, Debug)]
#[command(name = "docscan", version, about = "Scan JavaScript sources for documentation structure")]
struct Cli {
    /// Files or directories to scan.
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// Path to a docscan.json configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// What to print for each parsed file.
    #[arg(long, value_enum, default_value_t = EmitArg::Ast)]
    emit: EmitArg,

    /// Increase logging verbosity (-v INFO, -vv DEBUG, -vvv TRACE).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write log events to stderr as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum EmitArg {
    /// Debug dump of the node sequence.
    Ast,
    /// The program printed back as JavaScript.
    Js,
    /// Scope and symbol outline.
    Symbols,
    /// Parse only.
    None,
}

impl From<EmitArg> for EmitKind {
    fn from(emit: EmitArg) -> Self {
        match emit {
            EmitArg::Ast => EmitKind::Ast,
            EmitArg::Js => EmitKind::Js,
            EmitArg::Symbols => EmitKind::Symbols,
            EmitArg::None => EmitKind::None,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let start = Instant::now();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("error: cannot determine the working directory: {}", err);
            return EXIT_USAGE;
        }
    };
    let config = match load_config(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(err) => {
            report::emit(&err.to_diagnostic(), None);
            return EXIT_USAGE;
        }
    };

    let files = match discover_source_files(&cli.paths, &config.exclude) {
        Ok(files) => files,
        Err(err) => {
            report::emit(&err.to_diagnostic(), None);
            return EXIT_USAGE;
        }
    };
    if files.is_empty() {
        eprintln!("error: no input files found");
        return EXIT_USAGE;
    }

    let mut project = Project::new(config).with_emit(cli.emit.into());
    let mut unreadable = 0;
    for file in &files {
        if let Err(err) = project.add_file(file) {
            report::emit(&err.to_diagnostic(), None);
            unreadable += 1;
        }
    }

    let reports = project.parse_all();
    for (unit_report, unit) in reports.iter().zip(project.units()) {
        match &unit_report.outcome {
            Ok(summary) => {
                for warning in &summary.warnings {
                    report::emit(warning, Some(&unit.text));
                }
                if let Some(output) = &summary.output {
                    print_output(&unit_report.file, output);
                }
            }
            Err(diagnostic) => report::emit(diagnostic, Some(&unit.text)),
        }
    }

    let stats = ProjectStats::from_reports(&reports);
    tracing::info!(
        units = stats.units,
        parsed = stats.parsed,
        failed = stats.failed + unreadable,
        nodes = stats.nodes,
        warnings = stats.warnings,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan complete"
    );

    exit_code(&stats, unreadable)
}

fn print_output(file: &str, output: &str) {
    println!("// {}", file);
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}

fn exit_code(stats: &ProjectStats, unreadable: usize) -> i32 {
    if stats.failed > 0 || unreadable > 0 {
        EXIT_UNIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}
