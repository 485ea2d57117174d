//! Calendar feed retrieval with a local cache fallback

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::calendar::event::CalendarEvent;
use crate::calendar::ics::parse_ics;
use crate::error::RotationError;

/// Bound on a single feed fetch
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can produce the raw ICS text of the school calendar
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch the current feed body
    async fn fetch(&self) -> Result<String, RotationError>;
}

/// Fetches the feed over HTTP
pub struct HttpCalendarSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCalendarSource {
    /// Create a source for `url` with a bounded timeout
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl CalendarSource for HttpCalendarSource {
    async fn fetch(&self) -> Result<String, RotationError> {
        debug!(url = %self.url, "fetching calendar feed");
        let unavailable = |e: reqwest::Error| {
            if e.is_builder() {
                RotationError::config(format!("bad calendar_url '{}': {e}", self.url))
            } else {
                RotationError::DataUnavailable(e.to_string())
            }
        };
        self.client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?
            .text()
            .await
            .map_err(unavailable)
    }
}

/// Last successfully fetched feed body, kept on disk
pub struct FeedCache {
    path: PathBuf,
}

impl FeedCache {
    /// Cache stored at `path`
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the cached body, `None` if nothing has been cached yet
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read feed cache: {}", self.path.display()))?;
        Ok(Some(text))
    }

    /// Replace the cached body
    pub fn store(&self, text: &str) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
        }
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write feed cache: {}", self.path.display()))
    }

    /// Path of the cache file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Where the events of a [`CalendarFeed`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    /// Fresh fetch
    Live,
    /// Live fetch failed; read from the local cache
    Cache,
    /// Neither live nor cached data could be used
    Unavailable,
}

/// Parsed feed plus any warning the caller should surface
#[derive(Debug, Clone)]
pub struct CalendarFeed {
    /// Events in feed order
    pub events: Vec<CalendarEvent>,
    /// Data provenance
    pub origin: FeedOrigin,
    /// Set when the data is stale or missing
    pub warning: Option<String>,
}

/// Fetch and parse the feed, falling back to the cache.
///
/// Only a non-recoverable error (a misconfigured source) fails. Without live or
/// cached data the feed is empty and carries a warning that calendar closures
/// may be incomplete.
pub async fn load_feed(
    source: &dyn CalendarSource,
    cache: &FeedCache,
    tz: Tz,
) -> Result<CalendarFeed, RotationError> {
    let live = match source.fetch().await {
        Ok(text) => parse_ics(&text, tz).map(|events| (text, events)),
        Err(e) => Err(e),
    };

    let err = match live {
        Ok((text, events)) => {
            if let Err(e) = cache.store(&text) {
                warn!(error = %e, "could not update feed cache");
            }
            info!(count = events.len(), "loaded live calendar feed");
            return Ok(CalendarFeed {
                events,
                origin: FeedOrigin::Live,
                warning: None,
            });
        }
        Err(e) if !e.is_recoverable() => return Err(e),
        Err(e) => e,
    };

    warn!(error = %err, cache = %cache.path().display(), "live calendar feed failed");

    let cached = match cache.load() {
        Ok(Some(text)) => parse_ics(&text, tz).ok(),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "could not read feed cache");
            None
        }
    };

    Ok(match cached {
        Some(events) => CalendarFeed {
            events,
            origin: FeedOrigin::Cache,
            warning: Some(format!("{err}; using cached calendar")),
        },
        None => CalendarFeed {
            events: Vec::new(),
            origin: FeedOrigin::Unavailable,
            warning: Some(format!(
                "{err}; calendar closures and events may be incomplete"
            )),
        },
    })
}
