/// Embedded `PostgreSQL` server lifecycle
pub mod embedded;

pub use embedded::*;
