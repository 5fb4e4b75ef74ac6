//! gphotos-dl — downloads a Google Photos library into a date-based
//! directory hierarchy (`<base>/<year>/<MonthAbbrev>`), preserving each
//! item's original creation timestamp on disk.
//!
//! Pages of the library listing are walked with a continuation token; each
//! page's items are routed into their date directories on a single control
//! task and fetched by a bounded pool of concurrent download tasks that is
//! drained before the next listing call.

#![warn(clippy::all)]

mod auth;
mod cli;
mod config;
mod download;
mod photos;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::Config::from_cli(cli)?;

    let filter = match config.log_level {
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    let log_file = std::fs::File::options()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let (file_writer, _guard) = tracing_appender::non_blocking(log_file);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    tracing::info!(
        concurrency = config.concurrency,
        directory = %config.directory.display(),
        "Starting gphotos-dl"
    );

    let http = reqwest::Client::new();
    let access_token = auth::access_token(&http, &config.token_file).await?;
    let photos_client = photos::PhotosClient::new(http.clone(), access_token);

    let download_config = download::DownloadConfig {
        directory: config.directory.clone(),
        concurrency: config.concurrency,
        page_size: config.page_size,
    };

    // Per-item failures are already in the log; the exit code does not
    // distinguish them from a fully successful run.
    download::download_media(&http, &photos_client, &download_config).await?;
    Ok(())
}
