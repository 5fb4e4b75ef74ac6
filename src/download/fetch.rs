//! Fetch task — downloads one media item into its resolved directory and
//! restores the original timestamps. Every failure is converted into a
//! failed [`DownloadOutcome`]; nothing propagates past the task boundary.

use std::fs::FileTimes;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::error::DownloadError;
use super::paths;
use super::DownloadOutcome;
use crate::photos::MediaItem;

/// Query suffix selecting the original-quality variant of a signed media
/// URL: `=dv` for video/audio bytes, `=d` for image bytes.
pub(crate) fn variant_suffix(mime_type: &str) -> &'static str {
    if mime_type.contains("video") || mime_type.contains("audio") {
        "=dv"
    } else {
        "=d"
    }
}

/// Download one item into `dir`. Failures of any kind — non-200 status,
/// network error, disk error, malformed timestamp — are logged with item
/// context and returned as a failed outcome, never raised.
pub async fn fetch_item(client: &Client, item: MediaItem, dir: PathBuf) -> DownloadOutcome {
    let result = download(client, &item, &dir).await;
    match &result {
        Ok(()) => tracing::info!("Downloaded {} to {}", item.filename, dir.display()),
        Err(e) => tracing::error!(
            "Failed to download {} from {}: {}",
            item.filename,
            dir.display(),
            e
        ),
    }
    DownloadOutcome {
        item_id: item.id,
        filename: item.filename,
        result,
    }
}

async fn download(client: &Client, item: &MediaItem, dir: &Path) -> Result<(), DownloadError> {
    let creation_time = item
        .creation_time()
        .ok_or(DownloadError::MissingField("creationTime"))?;
    let url = format!("{}{}", item.base_url, variant_suffix(&item.mime_type));

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| DownloadError::Http {
            filename: item.filename.clone(),
            source: e,
        })?;
    if response.status() != reqwest::StatusCode::OK {
        return Err(DownloadError::HttpStatus {
            status: response.status().as_u16(),
            filename: item.filename.clone(),
        });
    }

    // Stream the body straight into the final path, truncating any existing
    // file of the same name (last-writer-wins, no collision renaming).
    let path = dir.join(&item.filename);
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .await
        .map_err(|e| persistence(item, e))?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::Http {
            filename: item.filename.clone(),
            source: e,
        })?;
        file.write_all(&chunk).await.map_err(|e| persistence(item, e))?;
    }
    file.flush().await.map_err(|e| persistence(item, e))?;
    drop(file);

    // Restore mtime/atime to the original creation time. The file is already
    // on disk at this point; a parse or utime failure still marks the item
    // failed, but must not disturb sibling tasks.
    let epoch = paths::parse_epoch(creation_time)?;
    let times_path = path.clone();
    tokio::task::spawn_blocking(move || set_file_times(&times_path, epoch))
        .await
        .map_err(|e| persistence(item, io::Error::other(e)))?
        .map_err(|e| persistence(item, e))?;

    Ok(())
}

fn persistence(item: &MediaItem, source: io::Error) -> DownloadError {
    DownloadError::Persistence {
        filename: item.filename.clone(),
        source,
    }
}

/// Set a file's modification and access times to the given Unix timestamp.
/// Negative timestamps (dates before 1970) are clamped to the epoch.
fn set_file_times(path: &Path, timestamp: i64) -> io::Result<()> {
    let time = if timestamp >= 0 {
        UNIX_EPOCH + Duration::from_secs(timestamp as u64)
    } else {
        UNIX_EPOCH
            .checked_sub(Duration::from_secs(timestamp.unsigned_abs()))
            .unwrap_or(UNIX_EPOCH)
    };
    let times = FileTimes::new().set_modified(time).set_accessed(time);
    let file = std::fs::File::options().write(true).open(path)?;
    file.set_times(times)?;
    Ok(())
}
