//! Command implementations for tokens-cli

pub mod diff;
pub mod import;
pub mod inspect;

pub use diff::run_diff;
pub use import::run_import;
pub use inspect::run_inspect;

use colored::Colorize;
use tokens_core::{ImportReport, ImportSource, OperationResult, ResultKind};

use crate::cli::SourceArgs;
use crate::error::Result;

/// Read the documents and manifest named on the command line.
async fn load_source(args: &SourceArgs) -> Result<ImportSource> {
    Ok(ImportSource::load(&args.files, args.manifest.as_deref()).await?)
}

/// Print every result on its own line, tagged by severity.
fn print_report(report: &ImportReport) {
    for result in report.results() {
        print_result(result);
    }
}

fn print_result(result: &OperationResult) {
    let tag = format!("{:>7}", result.kind.to_string());
    match result.kind {
        ResultKind::Error => println!("{} {}", tag.red().bold(), result.text),
        ResultKind::Warning => println!("{} {}", tag.yellow().bold(), result.text),
        ResultKind::Info => println!("{} {}", tag.blue().bold(), result.text),
        ResultKind::Log => println!("{} {}", tag.dimmed(), result.text.dimmed()),
    }
}
