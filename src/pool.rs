use deadpool_postgres::{Config as PgConfig, Object, Pool};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio_postgres::NoTls;
use tracing::info;

use crate::config::DbSettings;
use crate::error::ShowcaseError;

/// Configuration and connection pool for the deadpool-backed flavors.
#[derive(Clone, Debug)]
pub struct ConfigAndPool {
    pub pool: Pool,
}

impl ConfigAndPool {
    /// Build a deadpool Postgres pool after checking the config is complete.
    ///
    /// # Errors
    /// Returns `ShowcaseError::ConfigError` if required config fields are missing or
    /// `ShowcaseError::ConnectionError` if pool creation fails.
    #[allow(clippy::unused_async)]
    pub async fn new_postgres(pg_config: PgConfig) -> Result<Self, ShowcaseError> {
        if pg_config.dbname.is_none() {
            return Err(ShowcaseError::ConfigError("dbname is required".to_string()));
        }
        if pg_config.host.is_none() {
            return Err(ShowcaseError::ConfigError("host is required".to_string()));
        }
        if pg_config.port.is_none() {
            return Err(ShowcaseError::ConfigError("port is required".to_string()));
        }
        if pg_config.user.is_none() {
            return Err(ShowcaseError::ConfigError("user is required".to_string()));
        }
        if pg_config.password.is_none() {
            return Err(ShowcaseError::ConfigError("password is required".to_string()));
        }

        let pool = pg_config
            .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
            .map_err(|e| {
                ShowcaseError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
            })?;

        Ok(ConfigAndPool { pool })
    }

    /// # Errors
    /// Propagates validation and pool creation errors from [`new_postgres`](Self::new_postgres).
    pub async fn from_settings(settings: &DbSettings) -> Result<Self, ShowcaseError> {
        info!(url = %settings.redacted_url(), "creating deadpool postgres pool");
        Self::new_postgres(settings.to_pg_config()).await
    }

    /// Check a connection out of the pool.
    ///
    /// # Errors
    /// Returns `ShowcaseError::PoolErrorPostgres` if the pool cannot provide a connection.
    pub async fn get_connection(&self) -> Result<Object, ShowcaseError> {
        Ok(self.pool.get().await?)
    }

    pub fn close(&self) {
        self.pool.close();
    }
}

/// Connect a sqlx pool for the sqlx flavor.
///
/// # Errors
/// Returns `ShowcaseError::SqlxError` if the initial connection fails.
pub async fn connect_sqlx(settings: &DbSettings) -> Result<PgPool, ShowcaseError> {
    info!(url = %settings.redacted_url(), "connecting sqlx pool");
    let max = u32::try_from(settings.max_connections).unwrap_or(u32::MAX);
    let pool = PgPoolOptions::new()
        .max_connections(max)
        .connect_with(settings.to_sqlx_options())
        .await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_fields_are_config_errors() {
        let mut cfg = DbSettings::default().to_pg_config();
        cfg.password = None;
        let err = ConfigAndPool::new_postgres(cfg).await.unwrap_err();
        assert!(matches!(err, ShowcaseError::ConfigError(msg) if msg == "password is required"));

        let mut cfg = DbSettings::default().to_pg_config();
        cfg.dbname = None;
        let err = ConfigAndPool::new_postgres(cfg).await.unwrap_err();
        assert!(matches!(err, ShowcaseError::ConfigError(msg) if msg == "dbname is required"));
    }

    #[tokio::test]
    async fn complete_config_builds_lazily() {
        // deadpool does not connect until the first checkout
        let cap = ConfigAndPool::new_postgres(DbSettings::default().to_pg_config())
            .await
            .unwrap();
        assert_eq!(cap.pool.status().size, 0);
        cap.close();
    }
}
