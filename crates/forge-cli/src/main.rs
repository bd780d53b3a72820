//! Module Forge CLI
//!
//! Validates module manifests, plans their installation order, installs them
//! into an in-memory backend and queries record files.

mod cli;
mod commands;
mod error;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands};
use commands::{InstallArgs, QueryArgs};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} Module Forge CLI", "forge".green().bold());
            println!();
            println!("Run {} for available commands.", "forge --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Validate { paths, json } => commands::run_validate(&paths, json),
        Commands::Plan { paths, json } => commands::run_plan(&paths, json),
        Commands::Install {
            paths,
            config,
            dry_run,
            strict,
            json,
        } => commands::run_install(&InstallArgs {
            paths,
            config,
            dry_run,
            strict,
            json,
        }),
        Commands::Query {
            data,
            model,
            conditions,
            or,
            options,
            order_by,
            desc,
            limit,
            offset,
        } => commands::run_query(&QueryArgs {
            data,
            model,
            conditions,
            or,
            options,
            order_by,
            desc,
            limit,
            offset,
        }),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "forge", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_test_utils::{ManifestDir, crm_manifest};

    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_validate_rejects_unsafe_identifier() {
        let dir = ManifestDir::new();
        dir.write(
            "bad.json",
            r#"{"module": {"name": "drop;table", "version": "1.0.0"}}"#,
        );
        let result = execute_command(Commands::Validate {
            paths: vec![dir.root().to_path_buf()],
            json: false,
        });
        assert!(matches!(result, Err(crate::error::CliError::Modules(_))));
    }

    #[test]
    fn test_install_dry_run_with_temp_manifests() {
        let dir = ManifestDir::new();
        let document = serde_json::to_value(crm_manifest().module).unwrap();
        dir.write_json("crm.json", &serde_json::json!({ "module": document }));

        let result = execute_command(Commands::Install {
            paths: vec![dir.root().to_path_buf()],
            config: None,
            dry_run: true,
            strict: false,
            json: false,
        });
        assert!(result.is_ok());
    }
}
