//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Module Forge - validate, order and install schema modules
#[derive(Parser, Debug)]
#[command(name = "forge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Validate manifests without installing them
    ///
    /// Accepts manifest files (.json, .toml, .yaml) and directories, which
    /// are scanned for manifest files.
    ///
    /// Examples:
    ///   forge validate crm.json sales.toml
    ///   forge validate modules/
    Validate {
        /// Manifest files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the order in which a batch would be installed
    Plan {
        /// Manifest files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Install a batch into a fresh in-memory backend
    ///
    /// Examples:
    ///   forge install modules/
    ///   forge install crm.json sales.toml --dry-run
    ///   forge install modules/ --config forge.toml --json
    Install {
        /// Manifest files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Installer configuration file ([installer] table)
        #[arg(short, long, env = "FORGE_CONFIG")]
        config: Option<PathBuf>,

        /// Resolve the order without touching the backend
        #[arg(long)]
        dry_run: bool,

        /// Fail on bookkeeping errors instead of logging them
        #[arg(long)]
        strict: bool,

        /// Print the resulting model definitions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Query records from a JSON data file
    ///
    /// The data file maps model names to arrays of records. A record's
    /// "id" key becomes its identifier.
    ///
    /// Examples:
    ///   forge query --data records.json --model contact --where "stage=lead"
    ///   forge query --data records.json --model contact --where "age>30" --where "name~ada" --or
    ///   forge query --data records.json --model contact --order-by name --desc --limit 5
    Query {
        /// JSON file of records keyed by model name
        #[arg(short, long)]
        data: PathBuf,

        /// Model to query
        #[arg(short, long)]
        model: String,

        /// Condition in the form field<op>value (=, !=, >, >=, <, <=, ~)
        #[arg(short = 'w', long = "where")]
        conditions: Vec<String>,

        /// Combine conditions with OR instead of AND
        #[arg(long)]
        or: bool,

        /// Full query options (joins, includes) as a JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Field to order by
        #[arg(long)]
        order_by: Option<String>,

        /// Order descending
        #[arg(long, requires = "order_by")]
        desc: bool,

        /// Maximum number of rows
        #[arg(long)]
        limit: Option<usize>,

        /// Rows to skip
        #[arg(long)]
        offset: Option<usize>,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   forge completions bash > ~/.local/share/bash-completion/completions/forge
    ///   forge completions zsh > ~/.zfunc/_forge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
