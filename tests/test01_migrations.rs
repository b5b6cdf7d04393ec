#![cfg(feature = "test-utils")]

use metro_showcase::migrations::{Migration, apply, apply_migrations};
use metro_showcase::model::MetroSystem;
use metro_showcase::pool::connect_sqlx;
use metro_showcase::postgres::execute_select;
use metro_showcase::prelude::*;
use metro_showcase::test_utils::{setup_postgres_embedded, stop_postgres_embedded};

fn test_settings() -> DbSettings {
    DbSettings {
        dbname: "metro_migrations".to_string(),
        ..DbSettings::default()
    }
}

async fn count(cap: &ConfigAndPool, table: &str) -> Result<i64, ShowcaseError> {
    let mut conn = cap.get_connection().await?;
    let rs = execute_select(&mut conn, &format!("SELECT COUNT(*) AS n FROM {table}"), &[]).await?;
    rs.results[0].get_i64("n")
}

#[test]
fn migrations_apply_once_and_seed_fixture() -> Result<(), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded(&test_settings())?;
    let settings = pg.settings.clone();

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async move {
        let cap = ConfigAndPool::from_settings(&settings).await?;
        let mut conn = cap.get_connection().await?;

        assert_eq!(apply_migrations(&mut conn).await?, vec![1, 2]);
        // second run finds both versions in schema_history
        assert!(apply_migrations(&mut conn).await?.is_empty());
        drop(conn);

        assert_eq!(count(&cap, "city").await?, 4);
        assert_eq!(count(&cap, "metro_system").await?, 3);
        assert_eq!(count(&cap, "metro_line").await?, 9);
        assert_eq!(count(&cap, "schema_history").await?, 2);

        // sequences moved past the explicit fixture ids
        let mut conn = cap.get_connection().await?;
        let rs = execute_select(
            &mut conn,
            "INSERT INTO city (name, population, area) VALUES ($1, $2, $3) RETURNING id",
            &[RowValues::from("Lisbon"), RowValues::Int(545_923), RowValues::Float(100.05)],
        )
        .await?;
        assert_eq!(rs.results[0].get_i64("id")?, 5);

        // every fixture system points at a fixture city
        let pool = connect_sqlx(&settings).await?;
        let systems = sqlx::query_as::<_, MetroSystem>(
            "SELECT id, name, daily_ridership, city_id FROM metro_system ORDER BY id",
        )
        .fetch_all(&pool)
        .await?;
        assert_eq!(
            systems.iter().map(|s| s.city_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(systems[1].name, "Paris Metro");
        pool.close().await;

        cap.close();
        Ok::<(), ShowcaseError>(())
    });

    stop_postgres_embedded(pg);
    result?;
    Ok(())
}

#[test]
fn database_ahead_of_binary_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded(&test_settings())?;
    let settings = pg.settings.clone();

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async move {
        let cap = ConfigAndPool::from_settings(&settings).await?;
        let mut conn = cap.get_connection().await?;
        apply_migrations(&mut conn).await?;

        let only_first = [Migration {
            version: 1,
            description: "create tables".to_string(),
            sql: "SELECT 1",
        }];
        let err = apply(&mut conn, &only_first).await.unwrap_err();
        assert!(
            matches!(&err, ShowcaseError::MigrationError(msg) if msg.contains("version 2")),
            "{err}"
        );

        cap.close();
        Ok::<(), ShowcaseError>(())
    });

    stop_postgres_embedded(pg);
    result?;
    Ok(())
}

#[test]
fn failing_script_leaves_no_history() -> Result<(), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded(&test_settings())?;
    let settings = pg.settings.clone();

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async move {
        let cap = ConfigAndPool::from_settings(&settings).await?;
        let mut conn = cap.get_connection().await?;

        let broken = [Migration {
            version: 1,
            description: "half done".to_string(),
            sql: "CREATE TABLE half_done (id INTEGER); SELECT * FROM no_such_table;",
        }];
        assert!(apply(&mut conn, &broken).await.is_err());
        drop(conn);

        assert_eq!(count(&cap, "schema_history").await?, 0);
        let mut conn = cap.get_connection().await?;
        let rs = execute_select(
            &mut conn,
            "SELECT COUNT(*) AS n FROM pg_tables WHERE tablename = $1",
            &[RowValues::from("half_done")],
        )
        .await?;
        assert_eq!(rs.results[0].get_i64("n")?, 0);

        cap.close();
        Ok::<(), ShowcaseError>(())
    });

    stop_postgres_embedded(pg);
    result?;
    Ok(())
}
