//! Command-line flags.
//!
//! Every flag has an environment fallback so the collector can run from a
//! scheduler with no arguments at all.

use clap::{Parser, ValueEnum};
use fortune_warehouse::config::{DEFAULT_DATASET_ID, DEFAULT_PROJECT_ID, DEFAULT_TABLE};
use fortune_warehouse::Backend;
use std::path::PathBuf;

/// Fortune Collector - Gather fortune interpretations into the warehouse.
#[derive(Debug, Parser)]
#[command(name = "fortune-collector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Warehouse project
    #[arg(long, env = "GOOGLE_PROJECT_ID", default_value = DEFAULT_PROJECT_ID)]
    pub project_id: String,

    /// Warehouse dataset
    #[arg(long, env = "BIGQUERY_DATASET_ID", default_value = DEFAULT_DATASET_ID)]
    pub dataset_id: String,

    /// Table inside the dataset
    #[arg(long, env = "FORTUNE_TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Warehouse backend
    #[arg(long, env = "FORTUNE_WAREHOUSE", value_enum, default_value_t = BackendArg::Bigquery)]
    pub backend: BackendArg,

    /// Database file for the sqlite backend
    #[arg(long, env = "FORTUNE_SQLITE_PATH", default_value = "fortune.db")]
    pub sqlite_path: PathBuf,

    /// OAuth access token for BigQuery
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Source registry file (TOML); defaults to the built-in sources
    #[arg(long, env = "FORTUNE_SOURCES")]
    pub sources: Option<PathBuf>,

    /// Per-source fetch timeout in seconds
    #[arg(long, env = "FORTUNE_FETCH_TIMEOUT_SECS", default_value_t = fortune_fetcher::http::DEFAULT_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// Use fixed stub content, even for a --sources registry
    #[arg(long, env = "FORTUNE_OFFLINE", conflicts_with = "online")]
    pub offline: bool,

    /// Fetch the built-in sources over HTTP instead of using stub content
    #[arg(long, env = "FORTUNE_ONLINE")]
    pub online: bool,

    /// Dump at most this many records when no warehouse is connected
    #[arg(long, env = "FORTUNE_PREVIEW")]
    pub preview: Option<usize>,
}

/// Backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// BigQuery streaming inserts (default)
    Bigquery,
    /// Local SQLite file
    Sqlite,
    /// No warehouse; dump records to stdout
    None,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Bigquery => Backend::BigQuery,
            BackendArg::Sqlite => Backend::Sqlite,
            BackendArg::None => Backend::Disabled,
        }
    }
}

#[cfg(test)]
impl Cli {
    /// Parse `args` with every environment fallback disabled
    pub(crate) fn try_parse_args(args: &[&str]) -> Result<Self, clap::Error> {
        use clap::{CommandFactory, FromArgMatches};

        let command = Self::command().mut_args(|arg| arg.env(None::<&'static str>));
        let mut argv = vec!["fortune-collector"];
        argv.extend_from_slice(args);
        let matches = command.try_get_matches_from(argv)?;
        Self::from_arg_matches(&matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_args(&[
            "--backend",
            "sqlite",
            "--sqlite-path",
            "/tmp/f.db",
            "--offline",
            "--preview",
            "5",
            "--fetch-timeout-secs",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.backend, BackendArg::Sqlite);
        assert_eq!(cli.sqlite_path, PathBuf::from("/tmp/f.db"));
        assert!(cli.offline);
        assert!(!cli.online);
        assert_eq!(cli.preview, Some(5));
        assert_eq!(cli.fetch_timeout_secs, 3);
    }

    #[test]
    fn test_backend_none_maps_to_disabled() {
        let cli = Cli::try_parse_args(&["--backend", "none"]).unwrap();
        assert_eq!(Backend::from(cli.backend), Backend::Disabled);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Cli::try_parse_args(&["--backend", "postgres"]).is_err());
    }

    #[test]
    fn test_defaults_without_environment() {
        let cli = Cli::try_parse_args(&[]).unwrap();
        assert_eq!(cli.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(cli.dataset_id, DEFAULT_DATASET_ID);
        assert_eq!(cli.table, DEFAULT_TABLE);
        assert_eq!(cli.backend, BackendArg::Bigquery);
        assert!(cli.access_token.is_none());
        assert!(cli.sources.is_none());
        assert!(!cli.offline && !cli.online);
        assert!(cli.preview.is_none());
    }

    #[test]
    fn test_offline_conflicts_with_online() {
        assert!(Cli::try_parse_args(&["--offline", "--online"]).is_err());
    }
}
