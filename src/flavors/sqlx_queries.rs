//! `sqlx` over a `PgPool`: rows map straight into `#[derive(FromRow)]` records.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::sql;
use crate::catalogue::{MetroQueries, nesting::build_city_tree};
use crate::error::ShowcaseError;
use crate::model::{
    City, CityDensity, CityTree, CityTreeRow, LineDetails, MetroLine, NewCity, StationFilter,
    SystemStats, TxReport,
};
use crate::types::{Flavor, SortOrder};

pub struct SqlxQueries {
    pool: PgPool,
}

impl SqlxQueries {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `WHERE`/`AND` fragments are pushed only for bounds that are present.
fn filter_lines_query(filter: StationFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT id, name, station_count, system_id FROM metro_line");
    let mut keyword = " WHERE ";
    if let Some(min) = filter.min_stations {
        qb.push(keyword).push("station_count >= ").push_bind(min);
        keyword = " AND ";
    }
    if let Some(max) = filter.max_stations {
        qb.push(keyword).push("station_count <= ").push_bind(max);
    }
    qb.push(" ORDER BY station_count ")
        .push(SortOrder::from_desc(filter.sort_desc).as_sql())
        .push(", id");
    qb
}

#[async_trait]
impl MetroQueries for SqlxQueries {
    fn flavor(&self) -> Flavor {
        Flavor::Sqlx
    }

    async fn insert_city(&self, city: &NewCity) -> Result<i64, ShowcaseError> {
        let id = sqlx::query_scalar::<_, i64>(sql::INSERT_CITY)
            .bind(&city.name)
            .bind(city.population)
            .bind(city.area)
            .bind(city.link.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn city_by_id(&self, id: i64) -> Result<Option<City>, ShowcaseError> {
        let city = sqlx::query_as::<_, City>(sql::CITY_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(city)
    }

    async fn all_cities(&self) -> Result<Vec<City>, ShowcaseError> {
        let cities = sqlx::query_as::<_, City>(sql::ALL_CITIES)
            .fetch_all(&self.pool)
            .await?;
        Ok(cities)
    }

    async fn large_cities(&self, min_population: i32) -> Result<Vec<City>, ShowcaseError> {
        let cities = sqlx::query_as::<_, City>(sql::LARGE_CITIES)
            .bind(min_population)
            .fetch_all(&self.pool)
            .await?;
        Ok(cities)
    }

    async fn line_details(&self) -> Result<Vec<LineDetails>, ShowcaseError> {
        let rows = sqlx::query_as::<_, LineDetails>(sql::LINE_DETAILS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn system_stats(&self) -> Result<Vec<SystemStats>, ShowcaseError> {
        let rows = sqlx::query_as::<_, SystemStats>(sql::SYSTEM_STATS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn city_tree(&self) -> Result<Vec<CityTree>, ShowcaseError> {
        let rows = sqlx::query_as::<_, CityTreeRow>(sql::CITY_TREE_ROWS)
            .fetch_all(&self.pool)
            .await?;
        Ok(build_city_tree(rows))
    }

    async fn filter_lines(&self, filter: StationFilter) -> Result<Vec<MetroLine>, ShowcaseError> {
        let mut qb = filter_lines_query(filter);
        let lines = qb
            .build_query_as::<MetroLine>()
            .fetch_all(&self.pool)
            .await?;
        Ok(lines)
    }

    async fn densest_cities(&self) -> Result<Vec<CityDensity>, ShowcaseError> {
        let rows = sqlx::query_as::<_, CityDensity>(sql::DENSEST_CITIES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_and_delete_city(&self, city: &NewCity) -> Result<TxReport, ShowcaseError> {
        // an uncommitted sqlx transaction rolls back when dropped
        let mut tx = self.pool.begin().await?;

        let inserted_id = sqlx::query_scalar::<_, i64>(sql::INSERT_CITY)
            .bind(&city.name)
            .bind(city.population)
            .bind(city.area)
            .bind(city.link.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let deleted = sqlx::query(sql::DELETE_CITY)
            .bind(inserted_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(TxReport {
            inserted_id,
            rows_deleted: deleted.rows_affected(),
        })
    }

    async fn count_cities_named(&self, name: &str) -> Result<i64, ShowcaseError> {
        let count = sqlx::query_scalar::<_, i64>(sql::COUNT_CITIES_NAMED)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_bound_only() {
        let qb = filter_lines_query(StationFilter {
            min_stations: Some(10),
            max_stations: None,
            sort_desc: true,
        });
        assert_eq!(
            qb.sql(),
            "SELECT id, name, station_count, system_id FROM metro_line \
             WHERE station_count >= $1 ORDER BY station_count DESC, id"
        );
    }

    #[test]
    fn both_bounds_are_joined_with_and() {
        let qb = filter_lines_query(StationFilter {
            min_stations: Some(5),
            max_stations: Some(20),
            sort_desc: false,
        });
        assert!(
            qb.sql()
                .contains("WHERE station_count >= $1 AND station_count <= $2 ORDER BY")
        );
        assert!(qb.sql().ends_with("ASC, id"));
    }

    #[test]
    fn max_bound_alone_starts_the_where_clause() {
        let qb = filter_lines_query(StationFilter {
            min_stations: None,
            max_stations: Some(8),
            sort_desc: false,
        });
        assert!(qb.sql().contains("FROM metro_line WHERE station_count <= $1"));
    }

    #[test]
    fn no_bounds_no_where() {
        let qb = filter_lines_query(StationFilter::default());
        assert!(!qb.sql().contains("WHERE"));
    }
}
