//! Versioned schema migrations, Flyway style.
//!
//! Files under `migrations/` are named `V<version>__<description>.sql` and embedded at
//! compile time. Each pending version runs in its own transaction together with its
//! `schema_history` row, so a failed script leaves no trace.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use deadpool_postgres::Object;
use regex::Regex;
use tracing::{debug, info};

use crate::error::ShowcaseError;
use crate::postgres::{begin_transaction, execute_batch, execute_select};
use crate::types::RowValues;

const SCHEMA_HISTORY_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_history (
    version INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    applied_on TIMESTAMP NOT NULL DEFAULT now()
)";

const EMBEDDED: &[(&str, &str)] = &[
    (
        "V1__create_tables.sql",
        include_str!("../../migrations/V1__create_tables.sql"),
    ),
    (
        "V2__seed_data.sql",
        include_str!("../../migrations/V2__seed_data.sql"),
    ),
];

static FILE_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^V([0-9]+)__([A-Za-z0-9_]+)\.sql$"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: i32,
    pub description: String,
    pub sql: &'static str,
}

/// Parse `V<version>__<description>.sql`; underscores in the description read as spaces.
///
/// # Errors
/// Returns `ShowcaseError::MigrationError` for names that do not follow the pattern.
pub fn parse_file_name(file_name: &str) -> Result<(i32, String), ShowcaseError> {
    let re = FILE_NAME
        .as_ref()
        .map_err(|e| ShowcaseError::MigrationError(format!("bad file name pattern: {e}")))?;
    let caps = re.captures(file_name).ok_or_else(|| {
        ShowcaseError::MigrationError(format!(
            "`{file_name}` is not named V<version>__<description>.sql"
        ))
    })?;
    let version = caps[1].parse::<i32>().map_err(|e| {
        ShowcaseError::MigrationError(format!("`{file_name}` has a bad version: {e}"))
    })?;
    Ok((version, caps[2].replace('_', " ")))
}

/// Build the ordered migration list from `(file name, sql)` pairs.
///
/// # Errors
/// Returns `ShowcaseError::MigrationError` on malformed names, version 0, or duplicate versions.
pub fn collect(files: &[(&str, &'static str)]) -> Result<Vec<Migration>, ShowcaseError> {
    let mut migrations = Vec::with_capacity(files.len());
    let mut seen = BTreeSet::new();
    for (file_name, sql) in files {
        let (version, description) = parse_file_name(file_name)?;
        if version == 0 {
            return Err(ShowcaseError::MigrationError(format!(
                "`{file_name}`: versions start at 1"
            )));
        }
        if !seen.insert(version) {
            return Err(ShowcaseError::MigrationError(format!(
                "duplicate migration version {version}"
            )));
        }
        migrations.push(Migration {
            version,
            description,
            sql,
        });
    }
    migrations.sort_by_key(|m| m.version);
    Ok(migrations)
}

/// The migrations shipped with this binary, in version order.
///
/// # Errors
/// Returns `ShowcaseError::MigrationError` if an embedded file is misnamed.
pub fn embedded() -> Result<Vec<Migration>, ShowcaseError> {
    collect(EMBEDDED)
}

/// Versions already recorded in `schema_history`.
///
/// # Errors
/// Returns driver errors from creating or reading the history table.
pub async fn applied_versions(conn: &mut Object) -> Result<BTreeSet<i32>, ShowcaseError> {
    execute_batch(conn, SCHEMA_HISTORY_DDL).await?;
    let rs = execute_select(conn, "SELECT version FROM schema_history ORDER BY version", &[])
        .await?;
    rs.results.iter().map(|row| row.get_i32("version")).collect()
}

/// Apply every pending embedded migration. Returns the versions applied by this call.
///
/// # Errors
/// Returns `ShowcaseError::MigrationError` if the database is ahead of this binary,
/// or the driver error of the first failing script (its transaction is rolled back).
pub async fn apply_migrations(conn: &mut Object) -> Result<Vec<i32>, ShowcaseError> {
    apply(conn, &embedded()?).await
}

/// Apply pending `migrations` (already in version order).
///
/// # Errors
/// See [`apply_migrations`].
pub async fn apply(conn: &mut Object, migrations: &[Migration]) -> Result<Vec<i32>, ShowcaseError> {
    let applied = applied_versions(conn).await?;
    let latest = migrations.last().map_or(0, |m| m.version);

    if let Some(&newest) = applied.last()
        && newest > latest
    {
        return Err(ShowcaseError::MigrationError(format!(
            "database is at version {newest}, newest known migration is {latest}"
        )));
    }

    let mut ran = Vec::new();
    for migration in migrations {
        if applied.contains(&migration.version) {
            debug!(version = migration.version, "migration already applied");
            continue;
        }

        info!(
            version = migration.version,
            description = %migration.description,
            "applying migration"
        );
        let tx = begin_transaction(conn).await?;
        tx.execute_batch(migration.sql).await?;
        tx.dml(
            "INSERT INTO schema_history (version, description) VALUES ($1, $2)",
            &[
                RowValues::from(migration.version),
                RowValues::Text(migration.description.clone()),
            ],
        )
        .await?;
        tx.commit().await?;
        ran.push(migration.version);
    }

    Ok(ran)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_parse_into_version_and_description() {
        let (version, description) = parse_file_name("V12__add_metro_lines.sql").unwrap();
        assert_eq!(version, 12);
        assert_eq!(description, "add metro lines");
    }

    #[test]
    fn malformed_file_names_are_rejected() {
        for bad in ["1__init.sql", "V1_init.sql", "V1__init.txt", "Vx__init.sql", "V1__.sql"] {
            assert!(
                matches!(parse_file_name(bad), Err(ShowcaseError::MigrationError(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn collect_sorts_and_rejects_duplicates() {
        let sorted = collect(&[("V2__b.sql", "SELECT 2"), ("V1__a.sql", "SELECT 1")]).unwrap();
        assert_eq!(
            sorted.iter().map(|m| m.version).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let dup = collect(&[("V1__a.sql", "SELECT 1"), ("V1__b.sql", "SELECT 1")]);
        assert!(matches!(dup, Err(ShowcaseError::MigrationError(_))));

        let zero = collect(&[("V0__a.sql", "SELECT 1")]);
        assert!(zero.is_err());
    }

    #[test]
    fn embedded_migrations_create_then_seed() {
        let migrations = embedded().unwrap();
        assert_eq!(migrations.len(), 2);
        assert_eq!(migrations[0].description, "create tables");
        assert!(migrations[0].sql.contains("CREATE TABLE metro_line"));
        assert!(migrations[1].sql.contains("INSERT INTO city"));
    }
}
