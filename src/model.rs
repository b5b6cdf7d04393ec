//! Records for the three metro tables and the shapes the catalogue returns.

use std::fmt;

use serde::Serialize;

/// A row of `city`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub population: i32,
    /// km²
    pub area: f64,
    pub link: Option<String>,
}

/// Insert payload for `city`; the id comes back from `RETURNING`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCity {
    pub name: String,
    pub population: i32,
    pub area: f64,
    pub link: Option<String>,
}

impl NewCity {
    #[must_use]
    pub fn new(name: impl Into<String>, population: i32, area: f64) -> Self {
        Self {
            name: name.into(),
            population,
            area,
            link: None,
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Whether `city` carries exactly these field values.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, city: &City) -> bool {
        self.name == city.name
            && self.population == city.population
            && self.area == city.area
            && self.link == city.link
    }
}

/// A row of `metro_system`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MetroSystem {
    pub id: i64,
    pub name: String,
    pub daily_ridership: i32,
    pub city_id: i64,
}

/// A row of `metro_line`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MetroLine {
    pub id: i64,
    pub name: String,
    pub station_count: i32,
    pub system_id: i64,
}

/// One line joined with its system and city.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct LineDetails {
    pub line_name: String,
    pub station_count: i32,
    pub system_name: String,
    pub city_name: String,
}

/// Per-system line count and station total.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SystemStats {
    pub system_name: String,
    pub line_count: i64,
    pub total_stations: i64,
}

/// Inhabitants per km².
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CityDensity {
    pub name: String,
    pub density: f64,
}

/// Flat row of `city LEFT JOIN metro_system LEFT JOIN metro_line`, the input to
/// [`build_city_tree`](crate::catalogue::nesting::build_city_tree).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CityTreeRow {
    pub city_id: i64,
    pub city_name: String,
    pub system_id: Option<i64>,
    pub system_name: Option<String>,
    pub line_id: Option<i64>,
    pub line_name: Option<String>,
    pub station_count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTree {
    pub id: i64,
    pub name: String,
    pub systems: Vec<SystemTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemTree {
    pub id: i64,
    pub name: String,
    pub lines: Vec<LineLeaf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLeaf {
    pub id: i64,
    pub name: String,
    pub station_count: i32,
}

/// Optional station-count bounds plus sort direction for `filter_lines`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StationFilter {
    pub min_stations: Option<i32>,
    pub max_stations: Option<i32>,
    pub sort_desc: bool,
}

impl StationFilter {
    /// In-memory version of the predicate every flavor pushes into SQL.
    #[must_use]
    pub fn admits(&self, station_count: i32) -> bool {
        self.min_stations.is_none_or(|min| station_count >= min)
            && self.max_stations.is_none_or(|max| station_count <= max)
    }
}

/// What the transaction example did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxReport {
    pub inserted_id: i64,
    pub rows_deleted: u64,
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "City(id={}, name={}, population={}, area={}, link={})",
            self.id,
            self.name,
            self.population,
            self.area,
            self.link.as_deref().unwrap_or("-")
        )
    }
}

impl fmt::Display for MetroLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MetroLine(id={}, name={}, stations={}, system_id={})",
            self.id, self.name, self.station_count, self.system_id
        )
    }
}

impl fmt::Display for LineDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} ({} stations)",
            self.city_name, self.system_name, self.line_name, self.station_count
        )
    }
}

impl fmt::Display for SystemStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} lines, {} stations",
            self.system_name, self.line_count, self.total_stations
        )
    }
}

impl fmt::Display for CityDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1} per km²", self.name, self.density)
    }
}

impl fmt::Display for TxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inserted id={} then deleted {} row(s) in one transaction",
            self.inserted_id, self.rows_deleted
        )
    }
}

impl fmt::Display for CityTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}
