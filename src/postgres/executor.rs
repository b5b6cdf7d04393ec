use deadpool_postgres::Object;

use super::transaction::{Tx, begin_transaction};
use crate::error::ShowcaseError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute a batch of SQL statements in one transaction
///
/// # Errors
/// Returns errors from transaction operations or batch execution.
pub async fn execute_batch(pg_client: &mut Object, query: &str) -> Result<(), ShowcaseError> {
    let tx: Tx<'_> = begin_transaction(pg_client).await?;
    tx.execute_batch(query).await?;
    tx.commit().await?;

    Ok(())
}

/// Execute a SELECT query with parameters (auto-commit)
///
/// # Errors
/// Returns errors from transaction operations, query preparation, or result set building.
pub async fn execute_select(
    pg_client: &mut Object,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, ShowcaseError> {
    let tx: Tx<'_> = begin_transaction(pg_client).await?;
    let result_set = tx.select(query, params).await?;
    tx.commit().await?;
    Ok(result_set)
}
