//! Fold flat `city ⟕ metro_system ⟕ metro_line` rows into a city → system → line tree.

use std::collections::{HashMap, HashSet};

use crate::model::{CityTree, CityTreeRow, LineLeaf, SystemTree};

/// Group joined rows into one [`CityTree`] per city.
///
/// Every line lands under the system of its row and every system under its city; a
/// `NULL` system or line (outer-join padding) adds no child. Children are ordered by id.
#[must_use]
pub fn build_city_tree(rows: impl IntoIterator<Item = CityTreeRow>) -> Vec<CityTree> {
    let mut cities: Vec<CityTree> = Vec::new();
    let mut city_index: HashMap<i64, usize> = HashMap::new();
    let mut system_index: HashMap<i64, (usize, usize)> = HashMap::new();
    let mut seen_lines: HashSet<i64> = HashSet::new();

    for row in rows {
        let city_pos = *city_index.entry(row.city_id).or_insert_with(|| {
            cities.push(CityTree {
                id: row.city_id,
                name: row.city_name.clone(),
                systems: Vec::new(),
            });
            cities.len() - 1
        });

        let (Some(system_id), Some(system_name)) = (row.system_id, row.system_name) else {
            continue;
        };
        let (city_pos, system_pos) = *system_index.entry(system_id).or_insert_with(|| {
            let systems = &mut cities[city_pos].systems;
            systems.push(SystemTree {
                id: system_id,
                name: system_name,
                lines: Vec::new(),
            });
            (city_pos, systems.len() - 1)
        });

        let (Some(line_id), Some(line_name), Some(station_count)) =
            (row.line_id, row.line_name, row.station_count)
        else {
            continue;
        };
        if seen_lines.insert(line_id) {
            cities[city_pos].systems[system_pos].lines.push(LineLeaf {
                id: line_id,
                name: line_name,
                station_count,
            });
        }
    }

    cities.sort_by_key(|city| city.id);
    for city in &mut cities {
        city.systems.sort_by_key(|system| system.id);
        for system in &mut city.systems {
            system.lines.sort_by_key(|line| line.id);
        }
    }
    cities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        city: (i64, &str),
        system: Option<(i64, &str)>,
        line: Option<(i64, &str, i32)>,
    ) -> CityTreeRow {
        CityTreeRow {
            city_id: city.0,
            city_name: city.1.to_string(),
            system_id: system.map(|s| s.0),
            system_name: system.map(|s| s.1.to_string()),
            line_id: line.map(|l| l.0),
            line_name: line.map(|l| l.1.to_string()),
            station_count: line.map(|l| l.2),
        }
    }

    #[test]
    fn groups_lines_under_systems_under_cities() {
        let rows = vec![
            row((2, "Paris"), Some((2, "Metro")), Some((5, "Line 7bis", 8))),
            row((1, "Berlin"), Some((1, "U-Bahn")), Some((2, "U2", 29))),
            row((1, "Berlin"), Some((1, "U-Bahn")), Some((1, "U1", 13))),
            row((2, "Paris"), Some((2, "Metro")), Some((4, "Line 1", 25))),
            row((4, "Reykjavik"), None, None),
        ];

        let tree = build_city_tree(rows);

        assert_eq!(
            tree.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Berlin", "Paris", "Reykjavik"]
        );
        let berlin_lines: Vec<_> = tree[0].systems[0]
            .lines
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(berlin_lines, vec!["U1", "U2"]);
        assert_eq!(tree[1].systems.len(), 1);
        assert_eq!(tree[1].systems[0].lines.len(), 2);
        assert!(tree[2].systems.is_empty());
    }

    #[test]
    fn system_without_lines_is_kept_empty() {
        let rows = vec![row((1, "Oslo"), Some((9, "T-bane")), None)];
        let tree = build_city_tree(rows);
        assert_eq!(tree[0].systems[0].name, "T-bane");
        assert!(tree[0].systems[0].lines.is_empty());
    }

    #[test]
    fn repeated_rows_do_not_duplicate_children() {
        let dup = row((1, "Berlin"), Some((1, "U-Bahn")), Some((1, "U1", 13)));
        let tree = build_city_tree(vec![dup.clone(), dup]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].systems.len(), 1);
        assert_eq!(tree[0].systems[0].lines.len(), 1);
    }

    #[test]
    fn every_line_is_counted_once() {
        let mut rows = Vec::new();
        for city in 1..=3_i64 {
            for system in 0..2_i64 {
                let system_id = city * 10 + system;
                for line in 0..4_i64 {
                    rows.push(row(
                        (city, "c"),
                        Some((system_id, "s")),
                        Some((system_id * 10 + line, "l", 1)),
                    ));
                }
            }
        }
        let tree = build_city_tree(rows);
        let lines: usize = tree
            .iter()
            .flat_map(|c| &c.systems)
            .map(|s| s.lines.len())
            .sum();
        assert_eq!(tree.len(), 3);
        assert_eq!(lines, 24);
    }
}
