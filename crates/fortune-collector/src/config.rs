//! Run configuration.
//!
//! Built once from the parsed flags, validated, then passed by reference.

use crate::cli::Cli;
use crate::error::{CollectorError, Result};
use crate::registry::SourceRegistry;
use fortune_warehouse::{Backend, WarehouseSettings};
use std::path::PathBuf;
use std::time::Duration;

/// Everything a run needs to know
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Warehouse destination and credentials
    pub warehouse: WarehouseSettings,

    /// Registry file; `None` means the built-in sources
    pub sources: Option<PathBuf>,

    /// Per-source fetch timeout
    pub fetch_timeout: Duration,

    /// Force the stub fetcher, even for a registry file
    pub offline: bool,

    /// Fetch the built-in sources over HTTP
    pub online: bool,

    /// Cap on records dumped in disconnected mode
    pub preview: Option<usize>,
}

impl CollectorConfig {
    /// Build and validate the configuration from parsed flags
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self {
            warehouse: WarehouseSettings {
                backend: cli.backend.into(),
                project_id: cli.project_id,
                dataset_id: cli.dataset_id,
                table: cli.table,
                access_token: cli.access_token.filter(|t| !t.trim().is_empty()),
                sqlite_path: cli.sqlite_path,
                ..WarehouseSettings::default()
            },
            sources: cli.sources,
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
            offline: cli.offline,
            online: cli.online,
            preview: cli.preview,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run could work with
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("project id", &self.warehouse.project_id),
            ("dataset id", &self.warehouse.dataset_id),
            ("table", &self.warehouse.table),
        ] {
            if value.trim().is_empty() {
                return Err(CollectorError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.fetch_timeout.is_zero() {
            return Err(CollectorError::Config(
                "fetch timeout must be at least 1 second".to_string(),
            ));
        }

        if self.preview == Some(0) {
            return Err(CollectorError::Config(
                "preview must be at least 1 record".to_string(),
            ));
        }

        if self.warehouse.backend == Backend::Sqlite
            && self.warehouse.sqlite_path.as_os_str().is_empty()
        {
            return Err(CollectorError::Config("sqlite path must not be empty".to_string()));
        }

        Ok(())
    }

    /// Whether sources are fetched over HTTP
    ///
    /// The built-in locators are placeholders, so they are served from stub
    /// content unless `online` is set. A registry file is fetched unless
    /// `offline` is set.
    pub fn uses_http(&self) -> bool {
        if self.offline {
            return false;
        }
        self.online || self.sources.is_some()
    }

    /// Load the configured registry, or the built-in one
    pub fn load_registry(&self) -> Result<SourceRegistry> {
        match &self.sources {
            Some(path) => Ok(SourceRegistry::from_file(path)?),
            None => Ok(SourceRegistry::builtin()),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            warehouse: WarehouseSettings::default(),
            sources: None,
            fetch_timeout: Duration::from_secs(fortune_fetcher::http::DEFAULT_TIMEOUT_SECS),
            offline: false,
            online: false,
            preview: None,
        }
    }
}
