//! Convenient imports for running the catalogue.

pub use crate::catalogue::{CatalogueInput, MetroQueries, run_and_close, run_catalogue};
pub use crate::config::DbSettings;
pub use crate::error::ShowcaseError;
pub use crate::flavors::connect;
pub use crate::model::{City, NewCity, StationFilter};
pub use crate::pool::ConfigAndPool;
pub use crate::report::Reporter;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::types::{Flavor, RowValues, SortOrder};
