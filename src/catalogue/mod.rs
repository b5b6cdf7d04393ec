//! The query catalogue: one trait method per example operation, and the driver that
//! runs them in order against any flavor.

pub mod nesting;

use std::io::Write;

use async_trait::async_trait;
use tokio::time::{Instant, timeout_at};
use tracing::{info, warn};

use crate::error::ShowcaseError;
use crate::model::{
    City, CityDensity, CityTree, LineDetails, MetroLine, NewCity, StationFilter, SystemStats,
    TxReport,
};
use crate::report::Reporter;
use crate::types::Flavor;

/// Name the transaction example inserts and removes again.
pub const INVALID_CITY_NAME: &str = "Invalid";

/// The catalogue every flavor implements against the metro schema.
#[async_trait]
pub trait MetroQueries: Send + Sync {
    fn flavor(&self) -> Flavor;

    /// Insert a city and return its generated id.
    async fn insert_city(&self, city: &NewCity) -> Result<i64, ShowcaseError>;

    async fn city_by_id(&self, id: i64) -> Result<Option<City>, ShowcaseError>;

    /// Every city, by id.
    async fn all_cities(&self) -> Result<Vec<City>, ShowcaseError>;

    /// Cities with `population >= min_population`, most populous first.
    async fn large_cities(&self, min_population: i32) -> Result<Vec<City>, ShowcaseError>;

    /// Lines joined with their system and city, by city, system, line name.
    async fn line_details(&self) -> Result<Vec<LineDetails>, ShowcaseError>;

    /// Line count and station total per system, biggest first.
    async fn system_stats(&self) -> Result<Vec<SystemStats>, ShowcaseError>;

    /// Cities with their systems and lines nested underneath.
    async fn city_tree(&self) -> Result<Vec<CityTree>, ShowcaseError>;

    /// Lines within the optional station bounds, sorted by station count.
    async fn filter_lines(&self, filter: StationFilter) -> Result<Vec<MetroLine>, ShowcaseError>;

    /// Hand-written SQL: inhabitants per km², densest first.
    async fn densest_cities(&self) -> Result<Vec<CityDensity>, ShowcaseError>;

    /// Insert `city` and delete it again by id inside one transaction.
    async fn insert_and_delete_city(&self, city: &NewCity) -> Result<TxReport, ShowcaseError>;

    async fn count_cities_named(&self, name: &str) -> Result<i64, ShowcaseError>;

    /// Release the flavor's pool. Further queries fail.
    async fn close(&self);
}

/// Arguments the driver feeds to the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueInput {
    pub new_city: NewCity,
    pub min_population: i32,
    pub station_filter: StationFilter,
    pub tx_city: NewCity,
}

impl Default for CatalogueInput {
    fn default() -> Self {
        Self {
            new_city: NewCity::new("Vienna", 1_982_097, 414.87)
                .with_link("https://www.wien.gv.at"),
            min_population: 2_000_000,
            station_filter: StationFilter {
                min_stations: Some(10),
                max_stations: None,
                sort_desc: true,
            },
            tx_city: NewCity::new(INVALID_CITY_NAME, 0, 1.0),
        }
    }
}

/// Run the whole catalogue in order, each operation awaited before the next,
/// writing one labelled block per operation. The first error aborts the run.
///
/// # Errors
/// Returns the first query or output error.
pub async fn run_catalogue<W: Write + Send>(
    queries: &dyn MetroQueries,
    input: &CatalogueInput,
    reporter: &mut Reporter<W>,
) -> Result<(), ShowcaseError> {
    let flavor = queries.flavor();
    info!(%flavor, "running query catalogue");
    reporter.header(flavor.as_str())?;

    let id = queries.insert_city(&input.new_city).await?;
    let inserted = queries.city_by_id(id).await?;
    info!(%flavor, id, "inserted city");
    reporter.report(
        &format!("Inserted {} with id {id}, read back:", input.new_city.name),
        inserted.as_slice(),
    )?;

    let cities = queries.all_cities().await?;
    info!(%flavor, rows = cities.len(), "all cities");
    reporter.report("All cities:", &cities)?;

    let large = queries.large_cities(input.min_population).await?;
    info!(%flavor, rows = large.len(), "large cities");
    reporter.report(
        &format!("Cities with population >= {}:", input.min_population),
        &large,
    )?;

    let details = queries.line_details().await?;
    info!(%flavor, rows = details.len(), "line details");
    reporter.report("Lines with system and city (join):", &details)?;

    let stats = queries.system_stats().await?;
    info!(%flavor, rows = stats.len(), "system stats");
    reporter.report("Lines and stations per system (group by):", &stats)?;

    let tree = queries.city_tree().await?;
    info!(%flavor, rows = tree.len(), "city tree");
    reporter.report("Cities -> systems -> lines (nested):", &tree)?;

    let filter = input.station_filter;
    let lines = queries.filter_lines(filter).await?;
    info!(%flavor, rows = lines.len(), "filtered lines");
    reporter.report(&describe_filter(filter), &lines)?;

    let density = queries.densest_cities().await?;
    info!(%flavor, rows = density.len(), "densest cities");
    reporter.report("Population density (raw SQL):", &density)?;

    let tx = queries.insert_and_delete_city(&input.tx_city).await?;
    let remaining = queries.count_cities_named(&input.tx_city.name).await?;
    info!(%flavor, inserted_id = tx.inserted_id, remaining, "transaction example");
    reporter.report_one("Transaction (insert + delete):", &tx)?;
    reporter.report_one(
        &format!("Cities named {:?} afterwards:", input.tx_city.name),
        &remaining,
    )?;

    reporter.flush()?;
    Ok(())
}

/// [`run_catalogue`] bounded by `deadline`. The flavor's pool is closed whether the
/// run finished, failed or ran out of time.
///
/// # Errors
/// [`ShowcaseError::Timeout`] carrying `budget_secs` once `deadline` passes, otherwise
/// whatever [`run_catalogue`] returned.
pub async fn run_and_close<W: Write + Send>(
    queries: &dyn MetroQueries,
    input: &CatalogueInput,
    reporter: &mut Reporter<W>,
    deadline: Instant,
    budget_secs: u64,
) -> Result<(), ShowcaseError> {
    let outcome = timeout_at(deadline, run_catalogue(queries, input, reporter)).await;
    queries.close().await;
    match outcome {
        Ok(result) => result,
        Err(_) => {
            warn!(flavor = %queries.flavor(), budget_secs, "catalogue run timed out");
            Err(ShowcaseError::Timeout(budget_secs))
        }
    }
}

fn describe_filter(filter: StationFilter) -> String {
    let bound = |b: Option<i32>| b.map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(
        "Lines with stations in [{}, {}], {}:",
        bound(filter.min_stations),
        bound(filter.max_stations),
        if filter.sort_desc { "descending" } else { "ascending" }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    /// In-memory catalogue; `stall` makes the first query hang.
    #[derive(Default)]
    struct StubQueries {
        stall: bool,
        closed: AtomicBool,
    }

    #[async_trait]
    impl MetroQueries for StubQueries {
        fn flavor(&self) -> Flavor {
            Flavor::Middleware
        }

        async fn insert_city(&self, _city: &NewCity) -> Result<i64, ShowcaseError> {
            if self.stall {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(5)
        }

        async fn city_by_id(&self, _id: i64) -> Result<Option<City>, ShowcaseError> {
            Ok(None)
        }

        async fn all_cities(&self) -> Result<Vec<City>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn large_cities(&self, _min_population: i32) -> Result<Vec<City>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn line_details(&self) -> Result<Vec<LineDetails>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn system_stats(&self) -> Result<Vec<SystemStats>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn city_tree(&self) -> Result<Vec<CityTree>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn filter_lines(
            &self,
            _filter: StationFilter,
        ) -> Result<Vec<MetroLine>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn densest_cities(&self) -> Result<Vec<CityDensity>, ShowcaseError> {
            Ok(Vec::new())
        }

        async fn insert_and_delete_city(
            &self,
            _city: &NewCity,
        ) -> Result<TxReport, ShowcaseError> {
            Ok(TxReport {
                inserted_id: 6,
                rows_deleted: 1,
            })
        }

        async fn count_cities_named(&self, _name: &str) -> Result<i64, ShowcaseError> {
            Ok(0)
        }

        async fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn pool_is_closed_when_the_deadline_passes() {
        let queries = StubQueries {
            stall: true,
            ..StubQueries::default()
        };
        let mut reporter = Reporter::new(Vec::new());
        let deadline = Instant::now() + Duration::from_millis(20);

        let result = run_and_close(
            &queries,
            &CatalogueInput::default(),
            &mut reporter,
            deadline,
            3,
        )
        .await;

        assert!(matches!(result, Err(ShowcaseError::Timeout(3))));
        assert!(queries.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn finished_run_also_closes_the_pool() {
        let queries = StubQueries::default();
        let mut reporter = Reporter::new(Vec::new());
        let deadline = Instant::now() + Duration::from_secs(30);

        run_and_close(
            &queries,
            &CatalogueInput::default(),
            &mut reporter,
            deadline,
            30,
        )
        .await
        .unwrap();

        assert!(queries.closed.load(Ordering::SeqCst));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with("== middleware =="));
        assert!(text.contains("Inserted Vienna with id 5"));
    }

    #[test]
    fn filter_label_shows_open_bounds() {
        let filter = CatalogueInput::default().station_filter;
        assert_eq!(
            describe_filter(filter),
            "Lines with stations in [10, -], descending:"
        );
    }

    #[test]
    fn default_input_uses_invalid_city_for_the_transaction() {
        let input = CatalogueInput::default();
        assert_eq!(input.tx_city.name, INVALID_CITY_NAME);
        assert!(input.new_city.link.is_some());
    }
}
