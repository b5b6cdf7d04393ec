use std::path::PathBuf;

use clap::Parser;
use metro_showcase::config::DbSettings;
use metro_showcase::types::Flavor;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run the metro query catalogue through each database-access flavor"
)]
pub(crate) struct Args {
    #[arg(long, env = "PGHOST", default_value = "localhost")]
    pub(crate) host: String,
    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    pub(crate) port: u16,
    #[arg(long, env = "PGUSER", default_value = "postgres")]
    pub(crate) user: String,
    #[arg(long, env = "PGPASSWORD", default_value = "postgres", hide_env_values = true)]
    pub(crate) password: String,
    #[arg(long, env = "PGDATABASE", default_value = "metro")]
    pub(crate) dbname: String,
    #[arg(long, default_value_t = 4)]
    pub(crate) pool_size: usize,
    /// Flavor to run; repeat for several. All of them when omitted.
    #[arg(long = "flavor", value_enum)]
    pub(crate) flavors: Vec<Flavor>,
    /// Boot an embedded PostgreSQL instead of connecting to `--host`
    #[arg(long)]
    pub(crate) embedded: bool,
    #[arg(long)]
    pub(crate) skip_migrations: bool,
    #[arg(long, default_value_t = 60)]
    pub(crate) timeout_secs: u64,
    /// Default filter when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    pub(crate) log_level: String,
    /// Also append log output to this file
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunConfig {
    pub(crate) settings: DbSettings,
    pub(crate) flavors: Vec<Flavor>,
    pub(crate) embedded: bool,
    pub(crate) skip_migrations: bool,
    pub(crate) timeout_secs: u64,
    pub(crate) log_level: String,
    pub(crate) log: Option<PathBuf>,
}

impl RunConfig {
    pub(crate) fn from_args(args: Args) -> Self {
        RunConfig {
            settings: DbSettings {
                host: args.host,
                port: args.port,
                user: args.user,
                password: args.password,
                dbname: args.dbname,
                max_connections: args.pool_size.max(1),
            },
            flavors: dedup_flavors(args.flavors),
            embedded: args.embedded,
            skip_migrations: args.skip_migrations,
            timeout_secs: args.timeout_secs,
            log_level: args.log_level,
            log: args.log,
        }
    }
}

/// Keep first occurrences in command-line order; nothing selected means every flavor.
fn dedup_flavors(requested: Vec<Flavor>) -> Vec<Flavor> {
    if requested.is_empty() {
        return Flavor::ALL.to_vec();
    }
    let mut flavors = Vec::with_capacity(requested.len());
    for flavor in requested {
        if !flavors.contains(&flavor) {
            flavors.push(flavor);
        }
    }
    flavors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_every_flavor() {
        let args = Args::try_parse_from(["metro-showcase"]).unwrap();
        let config = RunConfig::from_args(args);
        assert_eq!(config.flavors, Flavor::ALL.to_vec());
        assert_eq!(config.timeout_secs, 60);
        assert!(!config.embedded && !config.skip_migrations);
    }

    #[test]
    fn repeated_flavors_keep_order_once() {
        let args = Args::try_parse_from([
            "metro-showcase",
            "--flavor",
            "sqlx",
            "--flavor",
            "middleware",
            "--flavor",
            "sqlx",
        ])
        .unwrap();
        let config = RunConfig::from_args(args);
        assert_eq!(config.flavors, vec![Flavor::Sqlx, Flavor::Middleware]);
    }

    #[test]
    fn unknown_flavor_is_rejected() {
        assert!(Args::try_parse_from(["metro-showcase", "--flavor", "diesel"]).is_err());
    }

    #[test]
    fn config_json_omits_password() {
        let args = Args::try_parse_from(["metro-showcase", "--password", "hunter2"]).unwrap();
        let json = serde_json::to_string(&RunConfig::from_args(args)).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"flavors\":[\"middleware\",\"builder\",\"sqlx\"]"));
    }
}
