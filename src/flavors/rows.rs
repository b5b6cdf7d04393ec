//! `ResultSet` row → record decoding for the flavors that read dynamic rows.

use crate::error::ShowcaseError;
use crate::model::{City, CityDensity, CityTreeRow, LineDetails, MetroLine, SystemStats};
use crate::results::{CustomDbRow, ResultSet};

impl TryFrom<&CustomDbRow> for City {
    type Error = ShowcaseError;

    fn try_from(row: &CustomDbRow) -> Result<Self, Self::Error> {
        Ok(City {
            id: row.get_i64("id")?,
            name: row.get_text("name")?,
            population: row.get_i32("population")?,
            area: row.get_f64("area")?,
            link: row.get_opt_text("link")?,
        })
    }
}

impl TryFrom<&CustomDbRow> for MetroLine {
    type Error = ShowcaseError;

    fn try_from(row: &CustomDbRow) -> Result<Self, Self::Error> {
        Ok(MetroLine {
            id: row.get_i64("id")?,
            name: row.get_text("name")?,
            station_count: row.get_i32("station_count")?,
            system_id: row.get_i64("system_id")?,
        })
    }
}

impl TryFrom<&CustomDbRow> for LineDetails {
    type Error = ShowcaseError;

    fn try_from(row: &CustomDbRow) -> Result<Self, Self::Error> {
        Ok(LineDetails {
            line_name: row.get_text("line_name")?,
            station_count: row.get_i32("station_count")?,
            system_name: row.get_text("system_name")?,
            city_name: row.get_text("city_name")?,
        })
    }
}

impl TryFrom<&CustomDbRow> for SystemStats {
    type Error = ShowcaseError;

    fn try_from(row: &CustomDbRow) -> Result<Self, Self::Error> {
        Ok(SystemStats {
            system_name: row.get_text("system_name")?,
            line_count: row.get_i64("line_count")?,
            total_stations: row.get_i64("total_stations")?,
        })
    }
}

impl TryFrom<&CustomDbRow> for CityDensity {
    type Error = ShowcaseError;

    fn try_from(row: &CustomDbRow) -> Result<Self, Self::Error> {
        Ok(CityDensity {
            name: row.get_text("name")?,
            density: row.get_f64("density")?,
        })
    }
}

impl TryFrom<&CustomDbRow> for CityTreeRow {
    type Error = ShowcaseError;

    fn try_from(row: &CustomDbRow) -> Result<Self, Self::Error> {
        let station_count = row
            .get_opt_i64("station_count")?
            .map(i32::try_from)
            .transpose()
            .map_err(|e| ShowcaseError::ExecutionError(format!("station_count: {e}")))?;
        Ok(CityTreeRow {
            city_id: row.get_i64("city_id")?,
            city_name: row.get_text("city_name")?,
            system_id: row.get_opt_i64("system_id")?,
            system_name: row.get_opt_text("system_name")?,
            line_id: row.get_opt_i64("line_id")?,
            line_name: row.get_opt_text("line_name")?,
            station_count,
        })
    }
}

/// Decode every row of `rs` into `T`.
///
/// # Errors
/// Returns the first decoding error.
pub fn decode_all<T>(rs: &ResultSet) -> Result<Vec<T>, ShowcaseError>
where
    T: for<'r> TryFrom<&'r CustomDbRow, Error = ShowcaseError>,
{
    rs.results.iter().map(T::try_from).collect()
}

/// Decode the first row of `rs`, if any.
///
/// # Errors
/// Returns the decoding error of the first row.
pub fn decode_first<T>(rs: &ResultSet) -> Result<Option<T>, ShowcaseError>
where
    T: for<'r> TryFrom<&'r CustomDbRow, Error = ShowcaseError>,
{
    rs.first().map(T::try_from).transpose()
}

/// First row's integer column, for `RETURNING id` and `COUNT(*)` results.
///
/// # Errors
/// Returns `ShowcaseError::ExecutionError` if there is no row or the column is not an integer.
pub fn first_i64(rs: &ResultSet, column: &str) -> Result<i64, ShowcaseError> {
    rs.first()
        .ok_or_else(|| ShowcaseError::ExecutionError(format!("expected a row with `{column}`")))?
        .get_i64(column)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::RowValues;

    fn result_set(columns: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
        let mut rs = ResultSet::with_capacity(rows.len());
        rs.set_column_names(Arc::new(columns.iter().map(|c| (*c).to_string()).collect()));
        for row in rows {
            rs.add_row_values(row);
        }
        rs
    }

    #[test]
    fn decodes_cities_with_and_without_link() {
        let rs = result_set(
            &["id", "name", "population", "area", "link"],
            vec![
                vec![
                    RowValues::Int(1),
                    RowValues::Text("Berlin".into()),
                    RowValues::Int(3_850_809),
                    RowValues::Float(891.12),
                    RowValues::Text("https://www.berlin.de".into()),
                ],
                vec![
                    RowValues::Int(4),
                    RowValues::Text("Reykjavik".into()),
                    RowValues::Int(139_875),
                    RowValues::Float(273.0),
                    RowValues::Null,
                ],
            ],
        );
        let cities: Vec<City> = decode_all(&rs).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].link.as_deref(), Some("https://www.berlin.de"));
        assert_eq!(cities[1].link, None);
    }

    #[test]
    fn decodes_outer_join_padding_as_none() {
        let rs = result_set(
            &[
                "city_id",
                "city_name",
                "system_id",
                "system_name",
                "line_id",
                "line_name",
                "station_count",
            ],
            vec![vec![
                RowValues::Int(4),
                RowValues::Text("Reykjavik".into()),
                RowValues::Null,
                RowValues::Null,
                RowValues::Null,
                RowValues::Null,
                RowValues::Null,
            ]],
        );
        let row: Option<CityTreeRow> = decode_first(&rs).unwrap();
        let row = row.unwrap();
        assert_eq!(row.city_id, 4);
        assert!(row.system_id.is_none() && row.station_count.is_none());
    }

    #[test]
    fn first_i64_needs_a_row() {
        let empty = result_set(&["id"], vec![]);
        assert!(first_i64(&empty, "id").is_err());
        let one = result_set(&["id"], vec![vec![RowValues::Int(17)]]);
        assert_eq!(first_i64(&one, "id").unwrap(), 17);
    }
}
