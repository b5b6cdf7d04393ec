use std::sync::Arc;

use tokio_postgres::{GenericClient, Row, Statement};
use tracing::debug;

use super::params::Params;
use crate::error::ShowcaseError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `ShowcaseError` if the column cannot be decoded.
pub fn postgres_extract_value(row: &Row, idx: usize) -> Result<RowValues, ShowcaseError> {
    let type_info = row.columns()[idx].type_();

    match type_info.name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v))))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "text" | "varchar" | "bpchar" | "name" => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
        other => Err(ShowcaseError::ExecutionError(format!(
            "unsupported column type `{other}` for column `{}`",
            row.columns()[idx].name()
        ))),
    }
}

/// Build a result set using statement metadata for column names, so empty results
/// still carry their columns.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set(stmt: &Statement, rows: &[Row]) -> Result<ResultSet, ShowcaseError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Prepare and run a SELECT on a client or open transaction without managing transactions.
///
/// # Errors
/// Returns errors from preparation, execution, or result building.
pub async fn execute_query_on_client<C: GenericClient + Sync>(
    client: &C,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, ShowcaseError> {
    debug!(sql = query, params = params.len(), "postgres select");
    let stmt = client.prepare(query).await?;
    let converted = Params::convert(params);
    let rows = client.query(&stmt, converted.as_refs()).await?;
    build_result_set(&stmt, &rows)
}

/// Run a DML statement on a client without managing transactions.
///
/// # Errors
/// Returns errors from execution or row-count conversion.
pub async fn execute_dml_on_client<C: GenericClient + Sync>(
    client: &C,
    query: &str,
    params: &[RowValues],
) -> Result<usize, ShowcaseError> {
    debug!(sql = query, params = params.len(), "postgres dml");
    let converted = Params::convert(params);
    let rows = client.execute(query, converted.as_refs()).await?;
    usize::try_from(rows).map_err(|e| {
        ShowcaseError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
    })
}
