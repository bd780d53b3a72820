//! Command implementations for forge-cli

pub mod install;
pub mod manifests;
pub mod plan;
pub mod query;
pub mod validate;

pub use install::{InstallArgs, run_install};
pub use plan::run_plan;
pub use query::{QueryArgs, run_query};
pub use validate::run_validate;
