//! Gateway selection: local database or remote backend.

use anyhow::{Context, Result};
use medlog_api::{ApiError, Client};
use medlog_core::{HistoryGateway, MedicationEntry, NewEntry, SubmissionGateway};
use medlog_db::Database;
use tokio::runtime::Runtime;

use crate::Config;

/// Opens the configured database, ensuring the parent directory exists.
pub fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Where `log` and `history` read and write entries.
pub enum Backend {
    Local(Database),
    Remote(RemoteGateway),
}

impl Backend {
    /// Uses the remote backend when `api_url` is configured, otherwise the local database.
    pub fn open(config: &Config) -> Result<Self> {
        match config.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                tracing::debug!(url, "using remote backend");
                Ok(Self::Remote(RemoteGateway::new(url)?))
            }
            _ => Ok(Self::Local(open_database(config)?)),
        }
    }
}

/// Blocking adapter over the async API client.
pub struct RemoteGateway {
    client: Client,
    runtime: Runtime,
}

impl RemoteGateway {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::new(base_url).context("failed to create API client")?;
        let runtime = Runtime::new().context("failed to initialize tokio runtime")?;
        Ok(Self { client, runtime })
    }
}

impl SubmissionGateway for RemoteGateway {
    type Error = ApiError;

    fn submit(&mut self, entry: &NewEntry) -> Result<(), ApiError> {
        self.runtime.block_on(self.client.submit(entry))
    }
}

impl HistoryGateway for RemoteGateway {
    type Error = ApiError;

    fn fetch_all(&self) -> Result<Vec<MedicationEntry>, ApiError> {
        self.runtime.block_on(self.client.fetch_all())
    }
}
