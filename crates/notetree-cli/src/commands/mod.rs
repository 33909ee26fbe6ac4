//! CLI command definitions and dispatch.

pub mod config;
pub mod folder;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use notetree_core::config::AppConfig;
use notetree_core::error::AppError;
use notetree_database::DatabasePool;
use notetree_service::FolderService;

/// NoteTree: folder hierarchy management
#[derive(Debug, Parser)]
#[command(name = "notetree", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder management
    Folder(folder::FolderArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Folder(args) => folder::execute(args, &self.config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect to the database described by the config
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: folder service backed by PostgreSQL
pub async fn folder_service(config: &AppConfig) -> Result<FolderService, AppError> {
    let pool = connect(config).await?;
    Ok(FolderService::from_gateway(
        Arc::new(pool.gateway()),
        config.hierarchy,
    ))
}
