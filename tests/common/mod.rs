use metro_showcase::migrations::apply_migrations;
use metro_showcase::prelude::*;
use metro_showcase::test_utils::{EmbeddedPostgres, setup_postgres_embedded};
use tokio::runtime::Runtime;

/// Embedded server with the schema and fixture applied, plus a runtime to drive it.
pub fn seeded_db(dbname: &str) -> Result<(EmbeddedPostgres, Runtime), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded(&DbSettings {
        dbname: dbname.to_string(),
        ..DbSettings::default()
    })?;
    let rt = Runtime::new()?;
    let settings = pg.settings.clone();
    rt.block_on(async move {
        let cap = ConfigAndPool::from_settings(&settings).await?;
        let mut conn = cap.get_connection().await?;
        apply_migrations(&mut conn).await?;
        drop(conn);
        cap.close();
        Ok::<(), ShowcaseError>(())
    })?;
    Ok((pg, rt))
}
