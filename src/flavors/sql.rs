//! Hand-written SQL shared by the middleware and sqlx flavors.

pub const INSERT_CITY: &str =
    "INSERT INTO city (name, population, area, link) VALUES ($1, $2, $3, $4) RETURNING id";

pub const CITY_BY_ID: &str = "SELECT id, name, population, area, link FROM city WHERE id = $1";

pub const ALL_CITIES: &str = "SELECT id, name, population, area, link FROM city ORDER BY id";

pub const LARGE_CITIES: &str = "SELECT id, name, population, area, link FROM city \
     WHERE population >= $1 ORDER BY population DESC, id";

pub const LINE_DETAILS: &str = "SELECT l.name AS line_name, l.station_count, \
     s.name AS system_name, c.name AS city_name \
     FROM metro_line l \
     JOIN metro_system s ON s.id = l.system_id \
     JOIN city c ON c.id = s.city_id \
     ORDER BY c.name, s.name, l.name";

pub const SYSTEM_STATS: &str = "SELECT s.name AS system_name, COUNT(l.id) AS line_count, \
     SUM(l.station_count) AS total_stations \
     FROM metro_system s \
     JOIN metro_line l ON l.system_id = s.id \
     GROUP BY s.id, s.name \
     ORDER BY total_stations DESC, s.name";

pub const CITY_TREE_ROWS: &str = "SELECT c.id AS city_id, c.name AS city_name, \
     s.id AS system_id, s.name AS system_name, \
     l.id AS line_id, l.name AS line_name, l.station_count \
     FROM city c \
     LEFT JOIN metro_system s ON s.city_id = c.id \
     LEFT JOIN metro_line l ON l.system_id = s.id \
     ORDER BY c.id, s.id, l.id";

pub const DENSEST_CITIES: &str =
    "SELECT name, population / area AS density FROM city ORDER BY density DESC";

pub const DELETE_CITY: &str = "DELETE FROM city WHERE id = $1";

pub const COUNT_CITIES_NAMED: &str = "SELECT COUNT(*) AS n FROM city WHERE name = $1";
