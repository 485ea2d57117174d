//! Calendar feed entries and their projection onto a single civil date

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Start or end of a feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// Date-valued (`VALUE=DATE`), no time component
    Date(NaiveDate),
    /// A fixed instant
    Instant(DateTime<Utc>),
}

impl EventTime {
    /// Wall-clock time in `tz`. Date values start at local midnight.
    #[must_use]
    pub fn to_local(self, tz: Tz) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_time(NaiveTime::MIN),
            Self::Instant(t) => t.with_timezone(&tz).naive_local(),
        }
    }
}

/// A single entry from the calendar feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Event title (`SUMMARY`)
    pub title: String,
    /// Start (`DTSTART`)
    pub start: EventTime,
    /// End, exclusive (`DTEND`)
    pub end: Option<EventTime>,
    /// Optional location
    pub location: Option<String>,
}

impl CalendarEvent {
    /// Local `[start, end)` span in `tz`.
    ///
    /// A date-valued event without a usable end lasts one day; a timed event
    /// without one has zero duration.
    #[must_use]
    pub fn local_span(&self, tz: Tz) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.start.to_local(tz);
        let end = self.end.map(|e| e.to_local(tz));
        let end = match (self.start, end) {
            (EventTime::Date(_), Some(end)) if end > start => end,
            (EventTime::Date(_), _) => start + Duration::days(1),
            (EventTime::Instant(_), Some(end)) => end.max(start),
            (EventTime::Instant(_), None) => start,
        };
        (start, end)
    }

    /// Whether this is an all-day entry.
    ///
    /// Date-valued starts are all-day. Timed entries count when they run from
    /// local midnight to local midnight at least a day later.
    #[must_use]
    pub fn is_all_day(&self, tz: Tz) -> bool {
        if matches!(self.start, EventTime::Date(_)) {
            return true;
        }
        let (start, end) = self.local_span(tz);
        start.time() == NaiveTime::MIN
            && end.time() == NaiveTime::MIN
            && end - start >= Duration::days(1)
    }

    /// Whether the entry touches the local civil date `date`
    #[must_use]
    pub fn covers(&self, date: NaiveDate, tz: Tz) -> bool {
        let (start, end) = self.local_span(tz);
        let day_start = date.and_time(NaiveTime::MIN);
        start.date() <= date && (end > day_start || start.date() == date)
    }

    /// Every local date the entry touches, in order
    #[must_use]
    pub fn covered_dates(&self, tz: Tz) -> Vec<NaiveDate> {
        let (start, _) = self.local_span(tz);
        start
            .date()
            .iter_days()
            .take_while(|d| self.covers(*d, tz))
            .collect()
    }

    /// Project the entry onto `date`, clipping times to that day
    #[must_use]
    pub fn on_date(&self, date: NaiveDate, tz: Tz) -> Option<DayEvent> {
        if !self.covers(date, tz) {
            return None;
        }
        if self.is_all_day(tz) {
            return Some(DayEvent {
                title: self.title.clone(),
                all_day: true,
                starts: None,
                ends: None,
                location: self.location.clone(),
            });
        }

        let (start, end) = self.local_span(tz);
        let day_start = date.and_time(NaiveTime::MIN);
        let day_end = day_start + Duration::days(1);
        let shown_end = end.min(day_end);

        Some(DayEvent {
            title: self.title.clone(),
            all_day: false,
            starts: Some(start.max(day_start).time()),
            // Running past midnight is shown as open-ended
            ends: (shown_end < day_end).then(|| shown_end.time()),
            location: self.location.clone(),
        })
    }
}

/// A feed entry as seen on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEvent {
    /// Event title
    pub title: String,
    /// All-day entry
    pub all_day: bool,
    /// Local start time on this date (None for all-day)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts: Option<NaiveTime>,
    /// Local end time on this date (None if all-day or running to midnight)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends: Option<NaiveTime>,
    /// Optional location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Entries touching `date`, in feed order
#[must_use]
pub fn events_on_date(events: &[CalendarEvent], date: NaiveDate, tz: Tz) -> Vec<DayEvent> {
    events.iter().filter_map(|e| e.on_date(date, tz)).collect()
}
