mod args;
mod logging;

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use metro_showcase::catalogue::{CatalogueInput, run_and_close};
use metro_showcase::config::DbSettings;
use metro_showcase::error::ShowcaseError;
use metro_showcase::flavors::connect;
use metro_showcase::migrations::apply_migrations;
use metro_showcase::pool::ConfigAndPool;
use metro_showcase::report::Reporter;
use tokio::time::{Instant, timeout_at};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, RunConfig};
use crate::logging::LogWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = RunConfig::from_args(args);
    let writer = match LogWriter::new(config.log.clone()) {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("failed to open log file: {err}");
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let config_json = serde_json::to_string_pretty(&config).unwrap_or_else(|_| "{}".to_string());
    info!("config: {}", config_json);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "catalogue run failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "test-utils")]
async fn run(config: &RunConfig) -> Result<(), ShowcaseError> {
    if !config.embedded {
        return run_against(config, &config.settings).await;
    }
    let pg = metro_showcase::test_utils::start_embedded(&config.settings).await?;
    let result = run_against(config, &pg.settings).await;
    pg.stop().await;
    result
}

#[cfg(not(feature = "test-utils"))]
async fn run(config: &RunConfig) -> Result<(), ShowcaseError> {
    if config.embedded {
        return Err(ShowcaseError::ConfigError(
            "--embedded requires building with the test-utils feature".to_string(),
        ));
    }
    run_against(config, &config.settings).await
}

async fn run_against(config: &RunConfig, settings: &DbSettings) -> Result<(), ShowcaseError> {
    if !config.skip_migrations {
        let cap = ConfigAndPool::from_settings(settings).await?;
        let mut conn = cap.get_connection().await?;
        let applied = apply_migrations(&mut conn).await?;
        info!(?applied, "schema up to date");
        drop(conn);
        cap.close();
    }

    let input = CatalogueInput::default();
    let deadline = Instant::now() + Duration::from_secs(config.timeout_secs);
    run_flavors(config, settings, &input, deadline).await
}

/// Flavors share one deadline; each pool is closed before the next flavor starts.
async fn run_flavors(
    config: &RunConfig,
    settings: &DbSettings,
    input: &CatalogueInput,
    deadline: Instant,
) -> Result<(), ShowcaseError> {
    let mut reporter = Reporter::new(io::BufWriter::new(io::stdout()));
    for &flavor in &config.flavors {
        let queries = timeout_at(deadline, connect(flavor, settings))
            .await
            .map_err(|_| ShowcaseError::Timeout(config.timeout_secs))??;
        run_and_close(
            queries.as_ref(),
            input,
            &mut reporter,
            deadline,
            config.timeout_secs,
        )
        .await?;
    }
    Ok(())
}
