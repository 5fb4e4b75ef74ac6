use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};

use super::error::DownloadError;

/// Month-number → three-letter directory label.
const MONTHS: [(&str, &str); 12] = [
    ("01", "Jan"),
    ("02", "Feb"),
    ("03", "Mar"),
    ("04", "Apr"),
    ("05", "May"),
    ("06", "Jun"),
    ("07", "Jul"),
    ("08", "Aug"),
    ("09", "Sep"),
    ("10", "Oct"),
    ("11", "Nov"),
    ("12", "Dec"),
];

/// Look up the display name for a two-digit month number. Unknown codes fall
/// back to the raw numeric string rather than failing.
fn month_name(month_number: &str) -> String {
    MONTHS
        .iter()
        .find(|(number, _)| *number == month_number)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| month_number.to_string())
}

/// A (year, month) grouping used as both a directory and a logical batch
/// boundary. Derived deterministically from an item's creation timestamp.
#[derive(Debug, Clone)]
pub struct DateBucket {
    pub year: String,
    pub month_number: String,
    pub month_name: String,
}

// Equality is on (year, month_number); month_name is derived display data.
impl PartialEq for DateBucket {
    fn eq(&self, other: &Self) -> bool {
        self.year == other.year && self.month_number == other.month_number
    }
}

impl Eq for DateBucket {}

impl std::fmt::Display for DateBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.year, self.month_name)
    }
}

/// Parse a creation timestamp into a naive datetime.
///
/// The API emits ISO-8601 with a trailing zone marker (`Z`); it is stripped
/// before parsing, matching how the timestamps are interpreted everywhere
/// else in the pipeline.
fn parse_creation_time(creation_time: &str) -> Result<NaiveDateTime, DownloadError> {
    creation_time
        .trim_end_matches('Z')
        .parse::<NaiveDateTime>()
        .map_err(|_| DownloadError::MalformedTimestamp(creation_time.to_string()))
}

/// Derive the (year, month) bucket for a creation timestamp.
pub fn classify(creation_time: &str) -> Result<DateBucket, DownloadError> {
    let parsed = parse_creation_time(creation_time)?;
    let year = format!("{:04}", parsed.year());
    let month_number = format!("{:02}", parsed.month());
    let month_name = month_name(&month_number);
    Ok(DateBucket {
        year,
        month_number,
        month_name,
    })
}

/// Parse a creation timestamp into a Unix epoch, for restoring file times.
pub fn parse_epoch(creation_time: &str) -> Result<i64, DownloadError> {
    Ok(parse_creation_time(creation_time)?.and_utc().timestamp())
}

/// Tracks the current (year, month) bucket across the page-ordered item
/// sequence. Owned by the orchestrator and mutated only from its control
/// task — fetch tasks receive the already-resolved path, so directory
/// creation never races.
#[derive(Debug, Default)]
pub struct DirectoryRouter {
    current: Option<(DateBucket, PathBuf)>,
}

impl DirectoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the directory for `bucket` under `base`.
    ///
    /// An unchanged bucket returns the cached path with no I/O. A change
    /// logs completion of the previous bucket (if any), creates
    /// `base/year/month_name` idempotently and logs the creation. A
    /// pre-existing directory is not an error; creation failure is, and it
    /// aborts the run rather than being folded into a per-item outcome.
    pub fn route(&mut self, bucket: DateBucket, base: &Path) -> io::Result<PathBuf> {
        if let Some((current, path)) = &self.current {
            if *current == bucket {
                return Ok(path.clone());
            }
            tracing::info!("Completed processing {}", current);
        }

        let path = base.join(&bucket.year).join(&bucket.month_name);
        std::fs::create_dir_all(&path)?;
        tracing::info!("Created folders for {}", bucket);
        self.current = Some((bucket, path.clone()));
        Ok(path)
    }
}
