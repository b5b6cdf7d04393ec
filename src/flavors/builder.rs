//! Statements assembled from the typed schema constants in
//! [`query_builder::schema`](crate::query_builder::schema), rendered to `$N` SQL and
//! run through `tokio-postgres`.

use async_trait::async_trait;
use tokio_postgres::Client;

use super::rows::{decode_all, decode_first, first_i64};
use super::sql;
use crate::catalogue::{MetroQueries, nesting::build_city_tree};
use crate::error::ShowcaseError;
use crate::model::{
    City, CityDensity, CityTree, CityTreeRow, LineDetails, MetroLine, NewCity, StationFilter,
    SystemStats, TxReport,
};
use crate::pool::ConfigAndPool;
use crate::postgres::{begin_transaction, execute_query_on_client};
use crate::query_builder::schema::{city, metro_line, metro_system};
use crate::query_builder::{Delete, Expression, Insert, Select, Sql};
use crate::results::ResultSet;
use crate::types::{Flavor, SortOrder};

pub struct BuilderQueries {
    pool: ConfigAndPool,
}

impl BuilderQueries {
    #[must_use]
    pub fn new(pool: ConfigAndPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, statement: Sql) -> Result<ResultSet, ShowcaseError> {
        let conn = self.pool.get_connection().await?;
        let client: &Client = &conn;
        execute_query_on_client(client, &statement.sql, &statement.params).await
    }
}

fn insert_city_statement(new_city: &NewCity) -> Insert {
    Insert::into_table(city::TABLE)
        .value(city::NAME, new_city.name.as_str())
        .value(city::POPULATION, new_city.population)
        .value(city::AREA, new_city.area)
        .value(city::LINK, new_city.link.clone())
        .returning(city::ID)
}

fn line_details_select() -> Select {
    Select::from_table(metro_line::TABLE)
        .column_as(metro_line::NAME, "line_name")
        .column(metro_line::STATION_COUNT)
        .column_as(metro_system::NAME, "system_name")
        .column_as(city::NAME, "city_name")
        .inner_join(
            metro_system::TABLE,
            metro_system::ID.eq_column(metro_line::SYSTEM_ID),
        )
        .inner_join(city::TABLE, city::ID.eq_column(metro_system::CITY_ID))
        .order_by(city::NAME, SortOrder::Asc)
        .order_by(metro_system::NAME, SortOrder::Asc)
        .order_by(metro_line::NAME, SortOrder::Asc)
}

fn system_stats_select() -> Select {
    Select::from_table(metro_system::TABLE)
        .column_as(metro_system::NAME, "system_name")
        .column_as(metro_line::ID.count(), "line_count")
        .column_as(metro_line::STATION_COUNT.sum(), "total_stations")
        .inner_join(
            metro_line::TABLE,
            metro_line::SYSTEM_ID.eq_column(metro_system::ID),
        )
        .group_by(metro_system::ID)
        .group_by(metro_system::NAME)
        .order_by(metro_line::STATION_COUNT.sum(), SortOrder::Desc)
        .order_by(metro_system::NAME, SortOrder::Asc)
}

fn city_tree_select() -> Select {
    Select::from_table(city::TABLE)
        .column_as(city::ID, "city_id")
        .column_as(city::NAME, "city_name")
        .column_as(metro_system::ID, "system_id")
        .column_as(metro_system::NAME, "system_name")
        .column_as(metro_line::ID, "line_id")
        .column_as(metro_line::NAME, "line_name")
        .column(metro_line::STATION_COUNT)
        .left_join(
            metro_system::TABLE,
            metro_system::CITY_ID.eq_column(city::ID),
        )
        .left_join(
            metro_line::TABLE,
            metro_line::SYSTEM_ID.eq_column(metro_system::ID),
        )
        .order_by(city::ID, SortOrder::Asc)
        .order_by(metro_system::ID, SortOrder::Asc)
        .order_by(metro_line::ID, SortOrder::Asc)
}

/// Each present bound contributes one predicate; none at all leaves the select unfiltered.
fn filter_lines_select(filter: StationFilter) -> Select {
    let predicate = Expression::all([
        filter
            .min_stations
            .map(|min| metro_line::STATION_COUNT.ge(min)),
        filter
            .max_stations
            .map(|max| metro_line::STATION_COUNT.le(max)),
    ]);
    Select::from_table(metro_line::TABLE)
        .columns(metro_line::ALL)
        .filter(predicate)
        .order_by(
            metro_line::STATION_COUNT,
            SortOrder::from_desc(filter.sort_desc),
        )
        .order_by(metro_line::ID, SortOrder::Asc)
}

#[async_trait]
impl MetroQueries for BuilderQueries {
    fn flavor(&self) -> Flavor {
        Flavor::Builder
    }

    async fn insert_city(&self, new_city: &NewCity) -> Result<i64, ShowcaseError> {
        let rs = self.fetch(insert_city_statement(new_city).to_sql()).await?;
        first_i64(&rs, "id")
    }

    async fn city_by_id(&self, id: i64) -> Result<Option<City>, ShowcaseError> {
        let select = Select::from_table(city::TABLE)
            .columns(city::ALL)
            .filter(city::ID.eq(id));
        let rs = self.fetch(select.to_sql()).await?;
        decode_first(&rs)
    }

    async fn all_cities(&self) -> Result<Vec<City>, ShowcaseError> {
        let select = Select::from_table(city::TABLE)
            .columns(city::ALL)
            .order_by(city::ID, SortOrder::Asc);
        let rs = self.fetch(select.to_sql()).await?;
        decode_all(&rs)
    }

    async fn large_cities(&self, min_population: i32) -> Result<Vec<City>, ShowcaseError> {
        let select = Select::from_table(city::TABLE)
            .columns(city::ALL)
            .filter(city::POPULATION.ge(min_population))
            .order_by(city::POPULATION, SortOrder::Desc)
            .order_by(city::ID, SortOrder::Asc);
        let rs = self.fetch(select.to_sql()).await?;
        decode_all(&rs)
    }

    async fn line_details(&self) -> Result<Vec<LineDetails>, ShowcaseError> {
        let rs = self.fetch(line_details_select().to_sql()).await?;
        decode_all(&rs)
    }

    async fn system_stats(&self) -> Result<Vec<SystemStats>, ShowcaseError> {
        let rs = self.fetch(system_stats_select().to_sql()).await?;
        decode_all(&rs)
    }

    async fn city_tree(&self) -> Result<Vec<CityTree>, ShowcaseError> {
        let rs = self.fetch(city_tree_select().to_sql()).await?;
        let rows: Vec<CityTreeRow> = decode_all(&rs)?;
        Ok(build_city_tree(rows))
    }

    async fn filter_lines(&self, filter: StationFilter) -> Result<Vec<MetroLine>, ShowcaseError> {
        let rs = self.fetch(filter_lines_select(filter).to_sql()).await?;
        decode_all(&rs)
    }

    /// The builder has no raw-SQL node; hand-written text goes straight to the client.
    async fn densest_cities(&self) -> Result<Vec<CityDensity>, ShowcaseError> {
        let conn = self.pool.get_connection().await?;
        let client: &Client = &conn;
        let rs = execute_query_on_client(client, sql::DENSEST_CITIES, &[]).await?;
        decode_all(&rs)
    }

    async fn insert_and_delete_city(&self, new_city: &NewCity) -> Result<TxReport, ShowcaseError> {
        let mut conn = self.pool.get_connection().await?;
        // dropped without commit on any `?` below, which rolls back
        let tx = begin_transaction(&mut conn).await?;

        let insert = insert_city_statement(new_city).to_sql();
        let inserted = tx.select(&insert.sql, &insert.params).await?;
        let inserted_id = first_i64(&inserted, "id")?;

        let delete = Delete::from_table(city::TABLE)
            .filter(city::ID.eq(inserted_id))
            .to_sql();
        let deleted = tx.dml(&delete.sql, &delete.params).await?;
        tx.commit().await?;

        let rows_deleted = u64::try_from(deleted)
            .map_err(|e| ShowcaseError::ExecutionError(format!("rows deleted: {e}")))?;
        Ok(TxReport {
            inserted_id,
            rows_deleted,
        })
    }

    async fn count_cities_named(&self, name: &str) -> Result<i64, ShowcaseError> {
        let select = Select::from_table(city::TABLE)
            .column_as(city::ID.count(), "n")
            .filter(city::NAME.eq(name));
        let rs = self.fetch(select.to_sql()).await?;
        first_i64(&rs, "n")
    }

    async fn close(&self) {
        self.pool.close();
    }
}
