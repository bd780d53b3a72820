//! The `validate` command.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use super::manifests::{describe_dependencies, load_batch};
use crate::error::Result;

/// Validate every manifest and print a summary per module.
pub fn run_validate(paths: &[PathBuf], json: bool) -> Result<()> {
    let manifests = load_batch(paths)?;

    if json {
        let summary: Vec<_> = manifests
            .iter()
            .map(|m| {
                json!({
                    "name": m.name(),
                    "version": m.version(),
                    "models": m.models.iter().map(|model| model.name.as_str()).collect::<Vec<_>>(),
                    "impacts": m.impacts.iter().map(|i| i.describe()).collect::<Vec<_>>(),
                    "dependsOn": m.dependencies.iter().map(ToString::to_string).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for manifest in &manifests {
        println!(
            "{} {:<16} {:<10} {} models, {} impacts, depends on {}",
            "ok".green().bold(),
            manifest.name(),
            manifest.version().dimmed(),
            manifest.models.len(),
            manifest.impacts.len(),
            describe_dependencies(manifest)
        );
    }
    println!();
    println!("{} {} manifests valid.", "Total:".dimmed(), manifests.len());
    Ok(())
}
