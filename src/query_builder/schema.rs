//! Table and column constants for the metro schema.

use super::ast::{Column, Table};

pub mod city {
    use super::{Column, Table};

    pub const TABLE: Table = Table::new("city", "c");
    pub const ID: Column = TABLE.column("id");
    pub const NAME: Column = TABLE.column("name");
    pub const POPULATION: Column = TABLE.column("population");
    pub const AREA: Column = TABLE.column("area");
    pub const LINK: Column = TABLE.column("link");

    pub const ALL: [Column; 5] = [ID, NAME, POPULATION, AREA, LINK];
}

pub mod metro_system {
    use super::{Column, Table};

    pub const TABLE: Table = Table::new("metro_system", "s");
    pub const ID: Column = TABLE.column("id");
    pub const NAME: Column = TABLE.column("name");
    pub const DAILY_RIDERSHIP: Column = TABLE.column("daily_ridership");
    pub const CITY_ID: Column = TABLE.column("city_id");

    pub const ALL: [Column; 4] = [ID, NAME, DAILY_RIDERSHIP, CITY_ID];
}

pub mod metro_line {
    use super::{Column, Table};

    pub const TABLE: Table = Table::new("metro_line", "l");
    pub const ID: Column = TABLE.column("id");
    pub const NAME: Column = TABLE.column("name");
    pub const STATION_COUNT: Column = TABLE.column("station_count");
    pub const SYSTEM_ID: Column = TABLE.column("system_id");

    pub const ALL: [Column; 4] = [ID, NAME, STATION_COUNT, SYSTEM_ID];
}
