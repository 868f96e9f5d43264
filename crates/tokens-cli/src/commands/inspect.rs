//! Inspect command implementation

use std::path::Path;

use colored::Colorize;
use tokens_core::{MemoryStore, VariableValue};

use crate::config::Config;
use crate::error::Result;

/// Run the inspect command
pub fn run_inspect(cwd: &Path, config: &Config, store: Option<&Path>, json: bool) -> Result<()> {
    let store_path = config.store_path(cwd, store);
    let store = config.open_store(&store_path)?;

    if json {
        println!("{}", store.to_json()?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Store".blue().bold(),
        store_path.display().to_string().yellow()
    );

    if store.collections().is_empty() && store.library().next().is_none() {
        println!();
        println!("No collections yet. Run {} to create some.", "tokens import".cyan());
        return Ok(());
    }

    for collection in store.collections() {
        let modes: Vec<&str> = collection.modes.iter().map(|m| m.name.as_str()).collect();
        println!();
        println!("{} ({})", collection.name.bold(), modes.join(", ").cyan());

        for variable in store
            .variables()
            .iter()
            .filter(|v| v.collection_id == collection.id)
        {
            println!(
                "  {} {}",
                variable.name,
                format!("[{}]", variable.resolved_type).dimmed()
            );
            for mode in &collection.modes {
                if let Some(value) = variable.values.get(&mode.id) {
                    println!("    {}: {}", mode.name, format_value(&store, value));
                }
            }
        }
    }

    for (collection, variables) in store.library() {
        println!();
        println!(
            "{} {} / {}",
            "Library".magenta().bold(),
            collection.library_name,
            collection.name.bold()
        );
        for variable in variables {
            println!(
                "  {} {}",
                variable.name,
                format!("[{}]", variable.resolved_type).dimmed()
            );
        }
    }

    Ok(())
}

/// Render a value the way it reads in token documents.
fn format_value(store: &MemoryStore, value: &VariableValue) -> String {
    match value {
        VariableValue::Color(color) => color.to_hex(),
        VariableValue::Float(n) => n.to_string(),
        VariableValue::Boolean(b) => b.to_string(),
        VariableValue::String(s) => format!("{:?}", s),
        VariableValue::Alias(id) => match store.variable_by_id(id) {
            Some(target) => format!("-> {}", target.name),
            None => format!("-> {} (missing)", id),
        },
    }
}
