//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use medlog_core::{ClockStyle, Locale};
use serde::{Deserialize, Serialize};

/// Address `medlog serve` binds when none is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Base URL of a remote backend. When set, `log` and `history` go through it.
    pub api_url: Option<String>,
    /// IANA time zone used for labels (e.g. `Europe/Berlin`).
    /// Falls back to the system zone, then UTC.
    pub timezone: Option<String>,
    /// `24h` or `12h`.
    pub clock: ClockStyle,
    /// Listen address for `medlog serve`.
    pub bind_address: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("api_url", &self.api_url)
            .field("timezone", &self.timezone)
            .field("clock", &self.clock)
            .field("bind_address", &self.bind_address)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("medlog.db"),
            api_url: None,
            timezone: None,
            clock: ClockStyle::default(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (MEDLOG_*)
        figment = figment.merge(Env::prefixed("MEDLOG_"));

        figment.extract()
    }

    /// Formatting conventions for labels.
    pub const fn locale(&self) -> Locale {
        Locale { clock: self.clock }
    }

    /// Resolves the time zone labels are computed in.
    ///
    /// A configured zone must be a valid IANA name. Without one, the system
    /// zone is used when it can be determined, otherwise UTC.
    pub fn timezone(&self) -> Result<Tz> {
        if let Some(name) = self.timezone.as_deref() {
            return name
                .parse::<Tz>()
                .map_err(|err| anyhow::anyhow!("{err}"))
                .with_context(|| format!("invalid timezone in configuration: {name}"));
        }

        let system = iana_time_zone::get_timezone()
            .ok()
            .and_then(|name| name.parse::<Tz>().ok());
        if system.is_none() {
            tracing::debug!("system time zone unavailable, using UTC");
        }
        Ok(system.unwrap_or(Tz::UTC))
    }
}

/// Returns the platform-specific config directory for medlog.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("medlog"))
}

/// Returns the platform-specific data directory for medlog.
///
/// On Linux: `~/.local/share/medlog`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("medlog"))
}
