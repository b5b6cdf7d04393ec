// PostgreSQL plumbing shared by the middleware and builder flavors:
// - params: RowValues -> tokio-postgres parameters
// - query: row extraction and client-level select/dml
// - transaction: the `Tx` wrapper
// - executor: auto-commit helpers over a pooled connection

pub mod executor;
pub mod params;
pub mod query;
pub mod transaction;

pub use executor::{execute_batch, execute_select};
pub use params::Params;
pub use query::{build_result_set, execute_dml_on_client, execute_query_on_client};
pub use transaction::{Tx, begin_transaction};
