//! The `plan` command.

use std::path::PathBuf;

use colored::Colorize;
use forge_modules::resolve_order;

use super::manifests::{describe_dependencies, load_batch};
use crate::error::Result;

/// Print the installation order of a batch without installing it.
pub fn run_plan(paths: &[PathBuf], json: bool) -> Result<()> {
    let ordered = resolve_order(load_batch(paths)?)?;

    if json {
        let order: Vec<&str> = ordered.iter().map(|m| m.name()).collect();
        println!("{}", serde_json::to_string_pretty(&order)?);
        return Ok(());
    }

    println!("{}", "Installation order".bold());
    for (position, manifest) in ordered.iter().enumerate() {
        let after = if manifest.dependencies.is_empty() {
            String::new()
        } else {
            format!("(after {})", describe_dependencies(manifest))
        };
        println!(
            "  {:>2}. {} {} {}",
            position + 1,
            manifest.name().green(),
            manifest.version(),
            after.dimmed()
        );
    }
    Ok(())
}
