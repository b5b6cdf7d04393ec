//! `tokio-postgres` through a deadpool pool, with hand-written SQL, `RowValues`
//! parameters and dynamic `ResultSet` rows decoded by column name.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::rows::{decode_all, decode_first, first_i64};
use super::sql;
use crate::catalogue::{MetroQueries, nesting::build_city_tree};
use crate::error::ShowcaseError;
use crate::model::{
    City, CityDensity, CityTree, CityTreeRow, LineDetails, MetroLine, NewCity, StationFilter,
    SystemStats, TxReport,
};
use crate::pool::ConfigAndPool;
use crate::postgres::{Tx, begin_transaction, execute_select};
use crate::results::ResultSet;
use crate::types::{Flavor, RowValues, SortOrder};

const FILTER_LINES: &str = "SELECT id, name, station_count, system_id FROM metro_line \
     WHERE ($1::int IS NULL OR station_count >= $1) \
       AND ($2::int IS NULL OR station_count <= $2) \
     ORDER BY station_count ";

pub struct MiddlewareQueries {
    pool: ConfigAndPool,
}

impl MiddlewareQueries {
    #[must_use]
    pub fn new(pool: ConfigAndPool) -> Self {
        Self { pool }
    }

    async fn select(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, ShowcaseError> {
        let mut conn = self.pool.get_connection().await?;
        execute_select(&mut conn, query, params).await
    }
}

fn new_city_params(city: &NewCity) -> Vec<RowValues> {
    vec![
        RowValues::Text(city.name.clone()),
        RowValues::from(city.population),
        RowValues::Float(city.area),
        RowValues::from(city.link.clone()),
    ]
}

/// Filter SQL with the sort direction spliced in; bounds stay bound parameters.
fn filter_lines_query(filter: StationFilter) -> (String, Vec<RowValues>) {
    let order = SortOrder::from_desc(filter.sort_desc);
    let query = format!("{FILTER_LINES}{}, id", order.as_sql());
    let params = vec![
        RowValues::from(filter.min_stations),
        RowValues::from(filter.max_stations),
    ];
    (query, params)
}

async fn insert_then_delete(tx: &Tx<'_>, city: &NewCity) -> Result<TxReport, ShowcaseError> {
    let inserted = tx.select(sql::INSERT_CITY, &new_city_params(city)).await?;
    let inserted_id = first_i64(&inserted, "id")?;
    debug!(inserted_id, "inserted inside transaction");
    let deleted = tx.dml(sql::DELETE_CITY, &[RowValues::Int(inserted_id)]).await?;
    let rows_deleted = u64::try_from(deleted)
        .map_err(|e| ShowcaseError::ExecutionError(format!("rows deleted: {e}")))?;
    Ok(TxReport {
        inserted_id,
        rows_deleted,
    })
}

#[async_trait]
impl MetroQueries for MiddlewareQueries {
    fn flavor(&self) -> Flavor {
        Flavor::Middleware
    }

    async fn insert_city(&self, city: &NewCity) -> Result<i64, ShowcaseError> {
        let rs = self.select(sql::INSERT_CITY, &new_city_params(city)).await?;
        first_i64(&rs, "id")
    }

    async fn city_by_id(&self, id: i64) -> Result<Option<City>, ShowcaseError> {
        let rs = self.select(sql::CITY_BY_ID, &[RowValues::Int(id)]).await?;
        decode_first(&rs)
    }

    async fn all_cities(&self) -> Result<Vec<City>, ShowcaseError> {
        let rs = self.select(sql::ALL_CITIES, &[]).await?;
        decode_all(&rs)
    }

    async fn large_cities(&self, min_population: i32) -> Result<Vec<City>, ShowcaseError> {
        let rs = self
            .select(sql::LARGE_CITIES, &[RowValues::from(min_population)])
            .await?;
        decode_all(&rs)
    }

    async fn line_details(&self) -> Result<Vec<LineDetails>, ShowcaseError> {
        let rs = self.select(sql::LINE_DETAILS, &[]).await?;
        decode_all(&rs)
    }

    async fn system_stats(&self) -> Result<Vec<SystemStats>, ShowcaseError> {
        let rs = self.select(sql::SYSTEM_STATS, &[]).await?;
        decode_all(&rs)
    }

    async fn city_tree(&self) -> Result<Vec<CityTree>, ShowcaseError> {
        let rs = self.select(sql::CITY_TREE_ROWS, &[]).await?;
        let rows: Vec<CityTreeRow> = decode_all(&rs)?;
        Ok(build_city_tree(rows))
    }

    async fn filter_lines(&self, filter: StationFilter) -> Result<Vec<MetroLine>, ShowcaseError> {
        let (query, params) = filter_lines_query(filter);
        let rs = self.select(&query, &params).await?;
        decode_all(&rs)
    }

    async fn densest_cities(&self) -> Result<Vec<CityDensity>, ShowcaseError> {
        let rs = self.select(sql::DENSEST_CITIES, &[]).await?;
        decode_all(&rs)
    }

    async fn insert_and_delete_city(&self, city: &NewCity) -> Result<TxReport, ShowcaseError> {
        let mut conn = self.pool.get_connection().await?;
        let tx = begin_transaction(&mut conn).await?;
        match insert_then_delete(&tx, city).await {
            Ok(report) => {
                tx.commit().await?;
                Ok(report)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn count_cities_named(&self, name: &str) -> Result<i64, ShowcaseError> {
        let rs = self
            .select(sql::COUNT_CITIES_NAMED, &[RowValues::from(name)])
            .await?;
        first_i64(&rs, "n")
    }

    async fn close(&self) {
        self.pool.close();
    }
}
