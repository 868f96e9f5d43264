//! Diff command implementation
//!
//! Previews what an import would do without writing the store.

use std::path::Path;

use colored::Colorize;
use serde_json::json;
use tokens_core::{ImportOptions, Importer, NameDiff, OperationResult, ResultKind};

use super::{load_source, print_result};
use crate::cli::SourceArgs;
use crate::config::Config;
use crate::error::Result;

/// Run the diff command
///
/// A dry-run import, printed as a diff of variable names.
pub async fn run_diff(cwd: &Path, config: &Config, args: &SourceArgs) -> Result<()> {
    let source = load_source(args).await?;
    let store_path = config.store_path(cwd, args.store.as_deref());
    let mut store = config.open_store(&store_path)?;

    let outcome = Importer::new(&mut store)
        .import(&source.documents, source.manifest, ImportOptions { dry_run: true })
        .await;
    let local_diff = outcome.local_diff.unwrap_or_default();

    // Counts and per-name logs are already shown as the diff itself.
    let notes: Vec<&OperationResult> = outcome
        .report
        .results()
        .iter()
        .filter(|r| matches!(r.kind, ResultKind::Error | ResultKind::Warning))
        .filter(|r| !is_removed_summary(r))
        .collect();

    if args.json {
        let output = json!({
            "has_changes": !outcome.diff.is_empty(),
            "added": outcome.diff.added,
            "updated": outcome.diff.updated,
            "removed": local_diff.removed,
            "results": outcome.report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_diff_output(&outcome.diff, &local_diff, &notes, &store_path);
    }

    Ok(())
}

fn is_removed_summary(result: &OperationResult) -> bool {
    result.text.starts_with("Variables in the local library")
}

/// Print human-readable diff-style output
fn print_diff_output(
    diff: &NameDiff,
    local_diff: &NameDiff,
    notes: &[&OperationResult],
    store_path: &Path,
) {
    if diff.is_empty() && local_diff.removed.is_empty() && notes.is_empty() {
        println!(
            "{} No changes needed. Store is in sync with these tokens.",
            "OK".green().bold()
        );
        return;
    }

    println!(
        "{} {}",
        "Diff".blue().bold(),
        store_path.display().to_string().yellow()
    );
    println!();

    for name in &diff.added {
        println!("  {} {}", "+".green(), name.green());
    }
    for name in &diff.updated {
        println!("  {} {}", "~".yellow(), name.yellow());
    }
    for name in &local_diff.removed {
        println!("  {} {}", "-".red(), name.red());
    }

    if !notes.is_empty() {
        println!();
        for note in notes {
            print_result(note);
        }
    }

    println!();
    println!(
        "{} to add, {} to update, {} not in this import. Run {} to apply.",
        diff.added.len(),
        diff.updated.len(),
        local_diff.removed.len(),
        "tokens import".cyan()
    );
}
