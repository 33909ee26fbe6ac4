//! PostgreSQL pool setup.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use notetree_core::config::DatabaseConfig;
use notetree_core::error::{AppError, ErrorKind};
use notetree_core::result::AppResult;

use super::gateway::PgGateway;
use super::migration::{self, PendingMigration};

/// Reported to the server as `application_name`.
const APPLICATION_NAME: &str = "notetree";

/// A PostgreSQL pool together with the gateway and schema migrations that
/// run on it.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open a pool as described by the configuration.
    ///
    /// A malformed URL is a `Configuration` error; an unreachable server is
    /// a `Gateway` error.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let url = mask_password(&config.url);
        let options = connect_options(config)?;

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Gateway, format!("Cannot reach {url}"), e)
            })?;

        info!(
            url = %url,
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self { pool })
    }

    /// Row gateway sharing this pool.
    pub fn gateway(&self) -> PgGateway {
        PgGateway::new(self.pool.clone())
    }

    /// Apply pending migrations, returning how many ran.
    pub async fn migrate(&self) -> AppResult<usize> {
        migration::run_migrations(&self.pool).await
    }

    /// Migrations embedded in the binary that the database has not applied.
    pub async fn pending_migrations(&self) -> AppResult<Vec<PendingMigration>> {
        migration::pending_migrations(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

fn connect_options(config: &DatabaseConfig) -> AppResult<PgConnectOptions> {
    let options = PgConnectOptions::from_str(&config.url).map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Invalid database URL '{}'", mask_password(&config.url)),
            e,
        )
    })?;
    Ok(options.application_name(APPLICATION_NAME))
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

/// Replace the password in a connection URL with `****`.
pub fn mask_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}
