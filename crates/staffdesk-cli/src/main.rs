//! staffdesk - terminal client for the staff management API

mod cli;
mod commands;
mod render;

use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use staffdesk_core::auth::{CredentialStore, Navigator};
use staffdesk_core::{ApiClient, Config, StorageBackend};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::Cli;

const LOG_FILE_PREFIX: &str = "staffdesk.log";

/// Tells the user the session is gone once a token refresh fails.
struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, path: &str) {
        debug!(path, "Navigating after session end");
        eprintln!("Session ended. Run `staffdesk login` to sign in again.");
    }
}

/// Initialize the tracing subscriber for logging
///
/// With `log_dir` set, a daily-rotated file is written alongside stderr.
/// The returned guard must stay alive until exit to flush the file writer.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    let cache_dir = config.cache_dir()?;

    let log_dir = cli.log_file.then(|| cache_dir.join("logs"));
    let _guard = init_tracing(log_dir.as_deref());

    let backend = match cli.storage.as_deref() {
        Some(name) => StorageBackend::from_str(name)?,
        None => config.storage,
    };
    let base_url = cli.base_url.clone().unwrap_or_else(|| config.base_url());
    info!(%base_url, storage = %backend, "staffdesk starting");

    let store = Arc::new(CredentialStore::new(backend.open(&cache_dir)));
    let client = ApiClient::with_timeout(
        &base_url,
        config.timeout(),
        store,
        Arc::new(CliNavigator),
    )
    .with_context(|| format!("Invalid API base URL '{}'", base_url))?;

    commands::run(cli.command, &client, &mut config).await
}
