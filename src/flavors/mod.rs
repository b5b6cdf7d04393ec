//! The three catalogue implementations and a constructor that picks one by [`Flavor`].

mod builder;
mod middleware;
mod rows;
pub(crate) mod sql;
mod sqlx_queries;

pub use builder::BuilderQueries;
pub use middleware::MiddlewareQueries;
pub use sqlx_queries::SqlxQueries;

use crate::catalogue::MetroQueries;
use crate::config::DbSettings;
use crate::error::ShowcaseError;
use crate::pool::{ConfigAndPool, connect_sqlx};
use crate::types::Flavor;

/// Open the pool `flavor` needs and wrap it in that flavor's catalogue.
///
/// # Errors
/// Returns configuration errors for the deadpool flavors, connection errors for sqlx.
pub async fn connect(
    flavor: Flavor,
    settings: &DbSettings,
) -> Result<Box<dyn MetroQueries>, ShowcaseError> {
    Ok(match flavor {
        Flavor::Middleware => Box::new(MiddlewareQueries::new(
            ConfigAndPool::from_settings(settings).await?,
        )),
        Flavor::Builder => Box::new(BuilderQueries::new(
            ConfigAndPool::from_settings(settings).await?,
        )),
        Flavor::Sqlx => Box::new(SqlxQueries::new(connect_sqlx(settings).await?)),
    })
}
