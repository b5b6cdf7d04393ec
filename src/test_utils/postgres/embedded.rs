use postgresql_embedded::PostgreSQL;
use tracing::{info, warn};

use super::super::SHARED_RUNTIME;
use crate::config::DbSettings;
use crate::error::ShowcaseError;
use crate::pool::ConfigAndPool;

/// A running embedded `PostgreSQL` instance and the settings that reach it.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    /// Host, port and credentials of the embedded server, with the requested database name
    pub settings: DbSettings,
}

fn embedded_error(context: &str, err: &postgresql_embedded::Error) -> ShowcaseError {
    ShowcaseError::ConnectionError(format!("embedded postgres {context}: {err}"))
}

/// Start an embedded server, create `requested.dbname` and check a connection works.
///
/// Host, port, user and password of `requested` are replaced by the embedded server's own.
///
/// # Errors
/// Returns `ShowcaseError::ConnectionError` if the server cannot be installed, started or
/// reached, and pool errors from the connectivity check.
pub async fn start_embedded(requested: &DbSettings) -> Result<EmbeddedPostgres, ShowcaseError> {
    let mut postgresql = PostgreSQL::default();
    postgresql
        .setup()
        .await
        .map_err(|e| embedded_error("setup", &e))?;
    postgresql
        .start()
        .await
        .map_err(|e| embedded_error("start", &e))?;
    postgresql
        .create_database(&requested.dbname)
        .await
        .map_err(|e| embedded_error("create database", &e))?;

    let embedded = postgresql.settings();
    let settings = DbSettings {
        host: embedded.host.clone(),
        port: embedded.port,
        user: embedded.username.clone(),
        password: embedded.password.clone(),
        ..requested.clone()
    };
    info!(url = %settings.redacted_url(), "embedded postgres started");

    let cap = ConfigAndPool::from_settings(&settings).await?;
    let conn = cap.get_connection().await?;
    conn.execute("SELECT 1", &[]).await?;
    drop(conn);
    cap.close();

    Ok(EmbeddedPostgres {
        postgresql,
        settings,
    })
}

impl EmbeddedPostgres {
    /// Stop the server and remove its data directory.
    pub async fn stop(self) {
        if let Err(e) = self.postgresql.stop().await {
            warn!(error = %e, "failed to stop embedded postgres");
        }
    }
}

fn shared_runtime() -> Result<&'static tokio::runtime::Runtime, ShowcaseError> {
    SHARED_RUNTIME
        .as_ref()
        .map_err(|e| ShowcaseError::ConnectionError(format!("test runtime: {e}")))
}

/// Blocking [`start_embedded`] for synchronous `#[test]` functions.
///
/// # Errors
/// Propagates any error returned by [`start_embedded`].
pub fn setup_postgres_embedded(requested: &DbSettings) -> Result<EmbeddedPostgres, ShowcaseError> {
    shared_runtime()?.block_on(start_embedded(requested))
}

/// Blocking [`EmbeddedPostgres::stop`].
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    match shared_runtime() {
        Ok(rt) => rt.block_on(postgres.stop()),
        Err(e) => warn!(error = %e, "leaking embedded postgres"),
    }
}
