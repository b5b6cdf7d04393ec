use clap::ValueEnum;
use serde::Serialize;

/// Values that can be stored in a database row or used as query parameters.
///
/// The middleware and builder flavors both bind through this enum, so query code
/// never has to name a driver type:
/// ```rust
/// use metro_showcase::prelude::*;
///
/// let params = vec![
///     RowValues::Text("Vienna".into()),
///     RowValues::Int(1_982_097),
///     RowValues::Float(414.87),
///     RowValues::Null,
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// NULL value
    Null,
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Integers widen to floats so `population / area` style columns read either way.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Optional text: `Null` maps to `Some(None)`, anything but text/null to `None`.
    #[must_use]
    pub fn as_opt_text(&self) -> Option<Option<&str>> {
        match self {
            RowValues::Null => Some(None),
            RowValues::Text(value) => Some(Some(value)),
            _ => None,
        }
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The database-access approach a catalogue run goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// `tokio-postgres` over a deadpool pool, dynamic `RowValues` rows
    Middleware,
    /// Typed query builder rendered to parameterized SQL
    Builder,
    /// `sqlx` with `FromRow` mapping
    Sqlx,
}

impl Flavor {
    pub const ALL: [Flavor; 3] = [Flavor::Middleware, Flavor::Builder, Flavor::Sqlx];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Middleware => "middleware",
            Flavor::Builder => "builder",
            Flavor::Sqlx => "sqlx",
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn from_desc(desc: bool) -> Self {
        if desc { SortOrder::Desc } else { SortOrder::Asc }
    }

    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
