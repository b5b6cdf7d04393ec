//! A small typed query builder for the metro schema.
//!
//! Tables and columns are constants (see [`schema`]); statements are plain data
//! ([`Select`], [`Insert`], [`Delete`]) rendered by `to_sql` into a [`Sql`] string with
//! `$N` placeholders and the matching [`RowValues`](crate::types::RowValues) parameters.
//!
//! ```rust
//! use metro_showcase::query_builder::{Select, schema::metro_line};
//! use metro_showcase::types::SortOrder;
//!
//! let sql = Select::from_table(metro_line::TABLE)
//!     .column(metro_line::NAME)
//!     .filter(metro_line::STATION_COUNT.ge(10))
//!     .order_by(metro_line::STATION_COUNT, SortOrder::Desc)
//!     .to_sql();
//! assert_eq!(
//!     sql.sql,
//!     r#"SELECT "l"."name" FROM "metro_line" AS "l" WHERE ("l"."station_count" >= $1) ORDER BY "l"."station_count" DESC"#
//! );
//! ```

mod ast;
mod convert;
pub mod schema;
mod sql;

pub use ast::{
    AggregateFunction, BinaryOperator, Column, Delete, Expression, Insert, Join, JoinKind,
    OrderByElement, Select, SelectItem, Table,
};
pub use sql::Sql;
