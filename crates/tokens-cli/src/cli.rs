//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Import design token documents into a variable store
#[derive(Parser, Debug)]
#[command(name = "tokens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./tokens.toml when present)
    #[arg(long, global = true, env = "TOKENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Inputs shared by `import` and `diff`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SourceArgs {
    /// Token documents; a manifest among them is detected automatically
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Manifest mapping collections and modes to documents
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Variable store file
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create and update variables from token documents
    ///
    /// Examples:
    ///   tokens import tokens.json
    ///   tokens import light.json dark.json manifest.json
    ///   tokens import *.json --manifest set.json --dry-run
    Import {
        #[command(flatten)]
        source: SourceArgs,

        /// Report what would change without writing the store
        #[arg(long)]
        dry_run: bool,
    },

    /// Preview which variables an import would add, update or leave behind
    Diff {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the collections and variables in a store
    Inspect {
        /// Variable store file
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::parse_from([
            "tokens",
            "-v",
            "import",
            "a.json",
            "b.json",
            "--manifest",
            "m.json",
            "--dry-run",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Import { source, dry_run }) => {
                assert!(dry_run);
                assert_eq!(source.files.len(), 2);
                assert_eq!(source.manifest, Some(PathBuf::from("m.json")));
                assert!(!source.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_files() {
        assert!(Cli::try_parse_from(["tokens", "import"]).is_err());
    }

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::parse_from(["tokens", "inspect", "--store", "s.json", "--json"]);
        assert_eq!(
            cli.command,
            Some(Commands::Inspect {
                store: Some(PathBuf::from("s.json")),
                json: true
            })
        );
    }
}
