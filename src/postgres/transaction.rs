use deadpool_postgres::{Object, Transaction as PgTransaction};
use tracing::warn;

use super::query::{execute_dml_on_client, execute_query_on_client};
use crate::error::ShowcaseError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Lightweight transaction wrapper for Postgres.
///
/// Dropping a `Tx` without `commit` rolls it back (tokio-postgres issues the ROLLBACK).
pub struct Tx<'a> {
    tx: PgTransaction<'a>,
}

/// Begin a new transaction on the provided Postgres connection.
///
/// # Errors
/// Returns an error if creating the transaction fails.
pub async fn begin_transaction(conn: &mut Object) -> Result<Tx<'_>, ShowcaseError> {
    let tx = conn.transaction().await?;
    Ok(Tx { tx })
}

impl Tx<'_> {
    /// Execute a parameterized DML statement and return the affected row count.
    ///
    /// # Errors
    /// Returns an error if execution or row-count conversion fails.
    pub async fn dml(&self, sql: &str, params: &[RowValues]) -> Result<usize, ShowcaseError> {
        execute_dml_on_client(&*self.tx, sql, params).await
    }

    /// Execute a parameterized SELECT (or `... RETURNING`) and return a `ResultSet`.
    ///
    /// # Errors
    /// Returns an error if preparation, execution, or result building fails.
    pub async fn select(
        &self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, ShowcaseError> {
        execute_query_on_client(&*self.tx, sql, params).await
    }

    /// Execute a batch of SQL statements inside the transaction.
    ///
    /// # Errors
    /// Returns an error if execution fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), ShowcaseError> {
        self.tx.batch_execute(sql).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if commit fails.
    pub async fn commit(self) -> Result<(), ShowcaseError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if rollback fails.
    pub async fn rollback(self) -> Result<(), ShowcaseError> {
        warn!("rolling back postgres transaction");
        self.tx.rollback().await?;
        Ok(())
    }
}
