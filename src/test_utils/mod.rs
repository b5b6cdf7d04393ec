//! Embedded PostgreSQL for integration tests and the binary's `--embedded` mode.

use std::sync::LazyLock;

use tokio::runtime::Runtime;

/// Runtime the blocking helpers drive the embedded server on.
pub(crate) static SHARED_RUNTIME: LazyLock<std::io::Result<Runtime>> = LazyLock::new(Runtime::new);

pub mod postgres;

pub use postgres::*;
