//! Serve command for running the HTTP backend.

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

use crate::{Config, open_database};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on. Overrides `bind_address` from the config.
    #[arg(long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    fn bind_address<'a>(&'a self, config: &'a Config) -> &'a str {
        self.bind.as_deref().unwrap_or(&config.bind_address)
    }
}

/// Serves the local database until interrupted.
pub fn run(config: &Config, args: &ServeArgs) -> Result<()> {
    let db = open_database(config)?;
    let address = args.bind_address(config).to_string();

    let runtime = Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {address}"))?;
        medlog_api::serve(listener, db)
            .await
            .context("server error")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_flag_overrides_config() {
        let config = Config::default();
        let args = ServeArgs {
            bind: Some("0.0.0.0:8080".to_string()),
        };
        assert_eq!(args.bind_address(&config), "0.0.0.0:8080");
    }

    #[test]
    fn bind_defaults_to_config() {
        let config = Config {
            bind_address: "127.0.0.1:9000".to_string(),
            ..Config::default()
        };
        let args = ServeArgs { bind: None };
        assert_eq!(args.bind_address(&config), "127.0.0.1:9000");
    }

    #[test]
    fn serve_reports_unusable_address() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: temp.path().join("medlog.db"),
            ..Config::default()
        };
        let args = ServeArgs {
            bind: Some("not-an-address".to_string()),
        };
        let err = run(&config, &args).unwrap_err();
        assert!(err.to_string().contains("failed to bind not-an-address"));
    }
}
