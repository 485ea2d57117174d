//! Per-run data snapshot
//!
//! Gathers the calendar feed and manual off-days once per invocation and
//! builds the [`ClosureSet`] every query in that run shares.

use anyhow::{Context, Result};
use tracing::debug;

use crate::calendar::{load_feed, CalendarEvent, CalendarSource, FeedCache, FeedOrigin};
use crate::cycle::closure::ClosureSet;
use crate::cycle::config::RotationConfig;
use crate::cycle::notice::ScheduleView;
use crate::store::OffDayStore;

/// Everything a run needs to answer date queries
#[derive(Debug, Clone)]
pub struct RotationContext {
    /// Feed entries in feed order
    pub events: Vec<CalendarEvent>,
    /// Closure set built from the feed and the off-day store
    pub closures: ClosureSet,
    /// Where the feed entries came from, `None` if no feed is configured
    pub origin: Option<FeedOrigin>,
    /// Data problems to surface on every notice
    pub warnings: Vec<String>,
}

impl RotationContext {
    /// Load the feed (if a source is given) and the off-day store
    pub async fn load(
        config: &RotationConfig,
        source: Option<&dyn CalendarSource>,
        store: &OffDayStore,
    ) -> Result<Self> {
        let (events, origin, warnings) = match source {
            Some(source) => {
                let cache = FeedCache::new(&config.closures.cache_file);
                let feed = load_feed(source, &cache, config.timezone).await?;
                (feed.events, Some(feed.origin), feed.warning.into_iter().collect())
            }
            None => (Vec::new(), None, Vec::new()),
        };

        let manual = store.load().context("Failed to load manual off-days")?;
        let rules = config.closure_rules()?;
        let closures = ClosureSet::from_sources(&events, manual, &rules, config.timezone);
        debug!(closures = closures.len(), events = events.len(), "built closure set");

        Ok(Self {
            events,
            closures,
            origin,
            warnings,
        })
    }

    /// A notice builder over this snapshot
    pub fn view<'a>(&'a self, config: &'a RotationConfig) -> Result<ScheduleView<'a>> {
        let view = ScheduleView::new(config, &self.closures, &self.events)?;
        Ok(self
            .warnings
            .iter()
            .fold(view, |view, w| view.with_warning(w.as_str())))
    }
}
