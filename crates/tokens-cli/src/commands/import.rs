//! Import command implementation

use std::path::Path;

use tokens_core::{ImportOptions, Importer, ResultKind};

use super::{load_source, print_report};
use crate::cli::SourceArgs;
use crate::config::{Config, save_store};
use crate::error::{CliError, Result};

/// Run the import command
///
/// The store is written back only for real imports. Any error result makes
/// the command fail after everything has been printed and saved.
pub async fn run_import(
    cwd: &Path,
    config: &Config,
    args: &SourceArgs,
    dry_run: bool,
) -> Result<()> {
    let source = load_source(args).await?;
    let store_path = config.store_path(cwd, args.store.as_deref());
    let mut store = config.open_store(&store_path)?;

    let outcome = Importer::new(&mut store)
        .import(&source.documents, source.manifest, ImportOptions { dry_run })
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print_report(&outcome.report);
    }

    if !dry_run {
        save_store(&store, &store_path)?;
    }

    let errors = outcome.report.count(ResultKind::Error);
    if errors > 0 {
        return Err(CliError::user(format!(
            "Import reported {} error{}",
            errors,
            if errors == 1 { "" } else { "s" }
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokens_core::MemoryStore;

    fn args(files: Vec<std::path::PathBuf>) -> SourceArgs {
        SourceArgs {
            files,
            manifest: None,
            store: None,
            json: true,
        }
    }

    #[tokio::test]
    async fn test_import_writes_store() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("tokens.json");
        std::fs::write(&doc, r#"{ "space": { "$type": "number", "$value": 4 } }"#).unwrap();

        run_import(dir.path(), &Config::default(), &args(vec![doc]), false)
            .await
            .unwrap();

        let content = std::fs::read_to_string(dir.path().join(".tokens-store.json")).unwrap();
        let store = MemoryStore::from_json(&content).unwrap();
        assert!(store.variable_by_name("space").is_some());
    }

    #[tokio::test]
    async fn test_dry_run_leaves_no_store() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("tokens.json");
        std::fs::write(&doc, r#"{ "space": { "$type": "number", "$value": 4 } }"#).unwrap();

        run_import(dir.path(), &Config::default(), &args(vec![doc]), true)
            .await
            .unwrap();

        assert!(!dir.path().join(".tokens-store.json").exists());
    }

    #[tokio::test]
    async fn test_errors_fail_the_command() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("tokens.json");
        std::fs::write(&doc, r#"{ "flag": { "$type": "boolean", "$value": "yes" } }"#).unwrap();

        let err = run_import(dir.path(), &Config::default(), &args(vec![doc]), false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Import reported 1 error");
    }
}
