//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use notetree_core::error::AppError;
use notetree_core::traits::RowGateway;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check connectivity and list migrations not yet applied
    Check,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::connect(&config).await?;

    match &args.command {
        MigrateCommand::Run => {
            let applied = pool.migrate().await?;
            output::print_success(&format!("Applied {applied} migration(s)"));
        }
        MigrateCommand::Check => {
            pool.gateway().health_check().await?;
            let pending = pool.pending_migrations().await?;
            match format {
                OutputFormat::Json => output::print_item(&pending, format),
                OutputFormat::Table if pending.is_empty() => {
                    output::print_success("Database is reachable and up to date");
                }
                OutputFormat::Table => {
                    output::print_warning(&format!("{} pending migration(s)", pending.len()));
                    for migration in &pending {
                        output::print_kv(&migration.version.to_string(), &migration.description);
                    }
                }
            }
        }
    }

    pool.close().await;
    Ok(())
}
