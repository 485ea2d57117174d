//! Minimal iCalendar (RFC 5545) reader
//!
//! Extracts `VEVENT` title, location and start/end. Recurrence rules, alarms
//! and other components are ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::event::{CalendarEvent, EventTime};
use crate::error::RotationError;

/// Parse an ICS document into events.
///
/// Floating times (no `Z`, no known `TZID`) are read in `tz`. Events without
/// a parseable `DTSTART` are skipped.
pub fn parse_ics(text: &str, tz: Tz) -> Result<Vec<CalendarEvent>, RotationError> {
    let lines = unfold(text);
    if !lines
        .iter()
        .any(|l| l.eq_ignore_ascii_case("BEGIN:VCALENDAR"))
    {
        return Err(RotationError::DataUnavailable(
            "feed is not an iCalendar document".to_string(),
        ));
    }

    let mut events = Vec::new();
    let mut current: Option<PendingEvent> = None;

    for line in &lines {
        let Some(prop) = Property::parse(line) else {
            continue;
        };
        let is_vevent = prop.value.eq_ignore_ascii_case("VEVENT");

        if prop.name == "BEGIN" && is_vevent {
            current = Some(PendingEvent::default());
            continue;
        }
        if prop.name == "END" && is_vevent {
            if let Some(event) = current.take().and_then(PendingEvent::finish) {
                events.push(event);
            }
            continue;
        }

        let Some(ev) = current.as_mut() else {
            continue;
        };
        match prop.name.as_str() {
            "SUMMARY" => ev.title = Some(unescape(&prop.value)),
            "LOCATION" => {
                let loc = unescape(&prop.value);
                ev.location = (!loc.is_empty()).then_some(loc);
            }
            "DTSTART" => ev.start = prop.event_time(tz),
            "DTEND" => ev.end = prop.event_time(tz),
            _ => {}
        }
    }

    debug!(count = events.len(), "parsed calendar feed");
    Ok(events)
}

/// Join folded continuation lines (leading space or tab)
fn unfold(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in text.lines() {
        match raw.strip_prefix([' ', '\t']) {
            Some(rest) if !out.is_empty() => {
                if let Some(prev) = out.last_mut() {
                    prev.push_str(rest);
                }
            }
            _ if raw.is_empty() => {}
            _ => out.push(raw.to_string()),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out.trim().to_string()
}

#[derive(Default)]
struct PendingEvent {
    title: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
    location: Option<String>,
}

impl PendingEvent {
    fn finish(self) -> Option<CalendarEvent> {
        let Some(start) = self.start else {
            debug!(title = ?self.title, "skipping event without DTSTART");
            return None;
        };
        Some(CalendarEvent {
            title: self.title.unwrap_or_default(),
            start,
            end: self.end,
            location: self.location,
        })
    }
}

/// One content line: `NAME;PARAM=VAL:VALUE`
struct Property {
    name: String,
    params: Vec<(String, String)>,
    value: String,
}

impl Property {
    fn parse(line: &str) -> Option<Self> {
        let (head, value) = split_value(line)?;
        let mut parts = head.split(';');
        let name = parts.next()?.trim().to_ascii_uppercase();
        let params = parts
            .filter_map(|p| p.split_once('='))
            .map(|(k, v)| (k.trim().to_ascii_uppercase(), v.trim_matches('"').to_string()))
            .collect();
        Some(Self {
            name,
            params,
            value: value.to_string(),
        })
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn event_time(&self, tz: Tz) -> Option<EventTime> {
        let value = self.value.trim();
        let date_only = self
            .param("VALUE")
            .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
            || (value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()));

        if date_only {
            return NaiveDate::parse_from_str(value, "%Y%m%d")
                .ok()
                .map(EventTime::Date);
        }

        if let Some(utc) = value.strip_suffix(['Z', 'z']) {
            let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
            return Some(EventTime::Instant(naive.and_utc()));
        }

        let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
        let zone = self
            .param("TZID")
            .and_then(|id| id.parse::<Tz>().ok())
            .unwrap_or(tz);
        Some(EventTime::Instant(localize(zone, naive)))
    }
}

/// Split at the first colon outside a quoted parameter value
fn split_value(line: &str) -> Option<(&str, &str)> {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some((&line[..i], &line[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Resolve a wall-clock time in `zone`, taking the earlier reading on a fall-back overlap
fn localize(zone: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    zone.from_local_datetime(&naive)
        .earliest()
        .map_or_else(
            || zone.from_utc_datetime(&naive).with_timezone(&Utc),
            |t| t.with_timezone(&Utc),
        )
}
