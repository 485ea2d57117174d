//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar::{CalendarEvent, CalendarSource, EventTime};
use crate::cycle::config::RotationConfig;
use crate::error::RotationError;

/// Build a date, panicking on invalid input
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Date-valued feed entry; `end` is exclusive
#[must_use]
pub fn all_day(title: &str, start: NaiveDate, end: Option<NaiveDate>) -> CalendarEvent {
    CalendarEvent {
        title: title.to_string(),
        start: EventTime::Date(start),
        end: end.map(EventTime::Date),
        location: None,
    }
}

/// Timed feed entry from RFC 3339 instants
#[must_use]
pub fn timed(title: &str, start: &str, end: Option<&str>) -> CalendarEvent {
    let instant = |s: &str| EventTime::Instant(s.parse::<DateTime<Utc>>().unwrap());
    CalendarEvent {
        title: title.to_string(),
        start: instant(start),
        end: end.map(instant),
        location: None,
    }
}

/// Two library reminders, anchored on Tuesday 2025-09-02 as day 1 of 5
#[must_use]
pub fn sample_config() -> RotationConfig {
    RotationConfig::parse(
        r#"
timezone = "America/New_York"
cycle_length = 5

[anchor]
date = "2025-09-02"
cycle_index = 1

[[reminder]]
label = "Aiden (Day 2 library)"
days = [2]

[[reminder]]
label = "Averie (Day 3 library)"
days = [3]
"#,
    )
    .unwrap()
}

/// Small feed: Labor Day closure and one evening meeting
pub const SAMPLE_FEED: &str = "BEGIN:VCALENDAR\n\
VERSION:2.0\n\
BEGIN:VEVENT\n\
SUMMARY:Labor Day - No School\n\
DTSTART;VALUE=DATE:20250901\n\
DTEND;VALUE=DATE:20250902\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
SUMMARY:PTO Meeting\n\
DTSTART;TZID=America/New_York:20250903T183000\n\
DTEND;TZID=America/New_York:20250903T200000\n\
END:VEVENT\n\
END:VCALENDAR\n";

/// Calendar source returning a fixed body or error
pub struct StaticSource {
    body: Result<String, RotationError>,
}

impl StaticSource {
    /// Always returns `body`
    #[must_use]
    pub fn ok(body: &str) -> Self {
        Self {
            body: Ok(body.to_string()),
        }
    }

    /// Always fails as unavailable
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self::error(RotationError::DataUnavailable(reason.to_string()))
    }

    /// Always fails with `err`
    #[must_use]
    pub const fn error(err: RotationError) -> Self {
        Self { body: Err(err) }
    }
}

#[async_trait]
impl CalendarSource for StaticSource {
    async fn fetch(&self) -> Result<String, RotationError> {
        self.body.clone()
    }
}
