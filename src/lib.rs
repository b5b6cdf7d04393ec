//! One metro-system schema (cities, metro systems, metro lines) queried three ways.
//!
//! Every [`Flavor`](types::Flavor) implements [`catalogue::MetroQueries`], and
//! [`catalogue::run_catalogue`] drives the same fixed sequence of examples through it:
//! insert and read-back, plain and filtered selects, a three-table join, grouping,
//! nested aggregation, a dynamic filter, raw SQL and a transaction.
//!
//! - `middleware`: `tokio-postgres` over deadpool, [`RowValues`](types::RowValues)
//!   parameters and [`ResultSet`](results::ResultSet) rows
//! - `builder`: the typed [`query_builder`] rendered to `$N` SQL
//! - `sqlx`: `query_as` into `#[derive(FromRow)]` records

pub mod catalogue;
pub mod config;
pub mod error;
pub mod flavors;
pub mod migrations;
pub mod model;
pub mod pool;
pub mod postgres;
pub mod prelude;
pub mod query_builder;
pub mod report;
pub mod results;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::ShowcaseError;
