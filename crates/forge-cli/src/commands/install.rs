//! The `install` command.

use std::path::PathBuf;

use colored::Colorize;
use forge_core::{InstallReport, InstallSession, InstallerConfig};
use forge_store::{ImpactOutcome, MemoryBackend};
use serde_json::json;

use super::manifests::load_batch;
use crate::error::Result;

/// Arguments of `forge install`.
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub strict: bool,
    pub json: bool,
}

impl InstallArgs {
    /// The config file's settings with command-line overrides applied.
    pub fn installer_config(&self) -> Result<InstallerConfig> {
        let mut config = match &self.config {
            Some(path) => InstallerConfig::load(path)?,
            None => InstallerConfig::default(),
        };
        config.dry_run |= self.dry_run;
        config.strict_bookkeeping |= self.strict;
        Ok(config)
    }
}

/// Install a batch into a fresh in-memory backend and report the outcome.
pub fn run_install(args: &InstallArgs) -> Result<()> {
    let config = args.installer_config()?;
    let manifests = load_batch(&args.paths)?;

    let mut session = InstallSession::new(Box::new(MemoryBackend::new()), config);
    let report = session.install(manifests)?;

    if args.json {
        let mut models = Vec::new();
        for module in &report.modules {
            for name in &module.models {
                if let Some(model) = session.model(name)? {
                    models.push(model);
                }
            }
        }
        let output = json!({ "report": report, "models": models });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &InstallReport) {
    if report.dry_run {
        println!(
            "{} would install: {}",
            "Dry run".yellow().bold(),
            report.order.join(" -> ")
        );
        return;
    }

    for module in &report.modules {
        println!(
            "{} {} {}",
            "installed".green().bold(),
            module.module.name,
            module.module.version.dimmed()
        );
        for model in &module.models {
            println!("    model  {model}");
        }
        for impact in &module.impacts {
            let marker = match impact.outcome {
                ImpactOutcome::Applied => "applied".cyan(),
                ImpactOutcome::Unchanged => "unchanged".dimmed(),
            };
            println!("    impact {} [{}]", impact.impact, marker);
        }
    }
    println!();
    println!(
        "{} {} modules, {} impacts applied, {} unchanged.",
        "Total:".dimmed(),
        report.modules.len(),
        report.applied_impacts(),
        report.unchanged_impacts()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_test_utils::ManifestDir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = ManifestDir::new();
        let path = dir.write("forge.toml", "[installer]\nlog_schema_changes = false\n");

        let args = InstallArgs {
            config: Some(path),
            dry_run: true,
            strict: true,
            ..InstallArgs::default()
        };
        let config = args.installer_config().unwrap();
        assert!(config.dry_run);
        assert!(config.strict_bookkeeping);
        assert!(!config.log_schema_changes);
        assert!(config.track_managed_schema);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = ManifestDir::new();
        let args = InstallArgs {
            config: Some(dir.root().join("absent.toml")),
            ..InstallArgs::default()
        };
        assert_eq!(args.installer_config().unwrap(), InstallerConfig::default());
    }
}
