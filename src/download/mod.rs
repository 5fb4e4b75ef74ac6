//! Download engine — pages through the library listing and downloads each
//! page's items with a bounded pool of concurrent fetch tasks.
//!
//! The pool is scoped per page: it is opened once the page's items have been
//! routed into their date directories on the control task and fully drained
//! before the next listing call. Peak in-flight downloads therefore never
//! exceed the pool size, and a bucket-transition log can only appear after
//! the page that triggered it has been fully visited.

pub mod error;
pub mod fetch;
pub mod paths;

use std::path::PathBuf;

use anyhow::Context;
use futures_util::{stream, StreamExt};
use reqwest::Client;

use crate::photos::{self, MediaItem, MediaItemsApi};
use error::DownloadError;
use paths::DirectoryRouter;

/// Subset of application config consumed by the download engine.
/// Decoupled from CLI parsing so the engine can be tested independently.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub directory: PathBuf,
    pub concurrency: usize,
    pub page_size: u32,
}

/// Per-item result, produced by a fetch task and consumed here for logging.
/// Never persisted — the log is the only record.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub item_id: String,
    pub filename: String,
    pub result: Result<(), DownloadError>,
}

/// End-of-run counts. The process exit code does not distinguish "all
/// succeeded" from "some items failed"; callers that care read these.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub failed: usize,
}

/// Drive the whole run: list pages, route items into date directories on the
/// single control task, fetch each page's items concurrently and drain the
/// pool before the next listing call.
///
/// Per-item failures are logged and counted but never abort the run; listing
/// failures and directory-creation failures propagate and terminate it.
pub async fn download_media(
    client: &Client,
    api: &dyn MediaItemsApi,
    config: &DownloadConfig,
) -> anyhow::Result<DownloadSummary> {
    let mut router = DirectoryRouter::new();
    let mut summary = DownloadSummary::default();

    let pages = photos::page_stream(api, config.page_size);
    tokio::pin!(pages);

    while let Some(page) = pages.next().await {
        let items = page.context("listing media items failed")?;
        tracing::debug!("Processing page of {} items", items.len());

        let mut outcomes: Vec<DownloadOutcome> = Vec::new();
        let mut submissions: Vec<(MediaItem, PathBuf)> = Vec::with_capacity(items.len());

        for item in items {
            // Items without a creation time have no bucket: no download, no
            // per-item log.
            let Some(creation_time) = item.creation_time() else {
                continue;
            };
            let bucket = match paths::classify(creation_time) {
                Ok(bucket) => bucket,
                Err(e) => {
                    tracing::error!("Skipping {}: {}", item.filename, e);
                    outcomes.push(DownloadOutcome {
                        item_id: item.id.clone(),
                        filename: item.filename.clone(),
                        result: Err(e),
                    });
                    continue;
                }
            };
            let dir = router
                .route(bucket, &config.directory)
                .context("creating download directory failed")?;
            submissions.push((item, dir));
        }

        // Fresh bounded pool for this page, fully drained before the next
        // listing call.
        let page_outcomes: Vec<DownloadOutcome> = stream::iter(submissions)
            .map(|(item, dir)| fetch::fetch_item(client, item, dir))
            .buffer_unordered(config.concurrency.max(1))
            .collect()
            .await;
        outcomes.extend(page_outcomes);

        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => summary.downloaded += 1,
                // Already logged with item context at the failure site.
                Err(_) => summary.failed += 1,
            }
        }
    }

    tracing::info!("All media downloaded.");
    tracing::info!(
        "  {} downloaded, {} failed, {} total",
        summary.downloaded,
        summary.failed,
        summary.downloaded + summary.failed
    );
    Ok(summary)
}
