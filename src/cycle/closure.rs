//! Non-instructional days
//!
//! A [`ClosureSet`] is the union of weekends, closures found in the calendar
//! feed and manually declared off-days. It is rebuilt on every run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::error::RotationError;

/// Title patterns that mark a feed entry as a closure
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"\bno school\b",
    r"\bschool closed\b",
    r"\bholiday\b",
    r"\bsnow day\b",
    r"\binclement weather\b",
    r"\b(in[-\s]?service|teacher work day)\b",
];

/// Saturday or Sunday
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Compiled rules deciding whether a feed entry closes school
#[derive(Debug, Clone)]
pub struct ClosureRules {
    patterns: Vec<Regex>,
    exclude: Vec<Regex>,
    all_day_closes: bool,
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, RotationError> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|e| RotationError::config(format!("bad closure pattern '{p}': {e}")))
        })
        .collect()
}

impl ClosureRules {
    /// Compile title patterns and exclusions (case-insensitive)
    pub fn compile(
        patterns: &[String],
        exclude: &[String],
        all_day_closes: bool,
    ) -> Result<Self, RotationError> {
        Ok(Self {
            patterns: compile_all(patterns)?,
            exclude: compile_all(exclude)?,
            all_day_closes,
        })
    }

    /// Whether `event` marks the dates it covers as closed
    #[must_use]
    pub fn closes(&self, event: &CalendarEvent, tz: Tz) -> bool {
        let title = event.title.as_str();
        if self.exclude.iter().any(|re| re.is_match(title)) {
            return false;
        }
        self.patterns.iter().any(|re| re.is_match(title))
            || (self.all_day_closes && event.is_all_day(tz))
    }
}

static BUILT_IN_RULES: LazyLock<ClosureRules> = LazyLock::new(|| {
    let patterns: Vec<String> = DEFAULT_PATTERNS.iter().map(ToString::to_string).collect();
    ClosureRules::compile(&patterns, &[], true).expect("built-in closure patterns must compile")
});

impl Default for ClosureRules {
    fn default() -> Self {
        BUILT_IN_RULES.clone()
    }
}

/// Why a date is not instructional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "title", rename_all = "snake_case")]
pub enum ClosureReason {
    /// School is in session
    None,
    /// Saturday or Sunday
    Weekend,
    /// Closure from the calendar feed, with the entry title
    CalendarClosure(String),
    /// Manually declared off-day
    ManualOffDay,
}

impl fmt::Display for ClosureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "school day"),
            Self::Weekend => write!(f, "weekend"),
            Self::CalendarClosure(title) => write!(f, "{title}"),
            Self::ManualOffDay => write!(f, "manual off-day"),
        }
    }
}

/// Set of non-instructional dates.
///
/// Membership is a pure function of weekends, calendar closures and manual
/// off-days. Reasons only matter for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureSet {
    calendar: BTreeMap<NaiveDate, String>,
    manual: BTreeSet<NaiveDate>,
}

impl ClosureSet {
    /// Empty set: only weekends are closed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from feed entries and manual off-days
    #[must_use]
    pub fn from_sources(
        events: &[CalendarEvent],
        manual: impl IntoIterator<Item = NaiveDate>,
        rules: &ClosureRules,
        tz: Tz,
    ) -> Self {
        let mut set = Self::new();
        for event in events.iter().filter(|e| rules.closes(e, tz)) {
            for date in event.covered_dates(tz) {
                set.insert_calendar_closure(date, &event.title);
            }
        }
        for date in manual {
            set.add(date);
        }
        set
    }

    /// Record a feed closure. The first title seen for a date is kept.
    pub fn insert_calendar_closure(&mut self, date: NaiveDate, title: &str) -> bool {
        if self.calendar.contains_key(&date) {
            return false;
        }
        self.calendar.insert(date, title.to_string());
        true
    }

    /// Add a manual off-day. Returns `false` if it was already recorded.
    pub fn add(&mut self, date: NaiveDate) -> bool {
        self.manual.insert(date)
    }

    /// Whether the date counts toward the cycle
    #[must_use]
    pub fn is_instructional(&self, date: NaiveDate) -> bool {
        !(is_weekend(date) || self.calendar.contains_key(&date) || self.manual.contains(&date))
    }

    /// Display reason for a date: weekend, then calendar, then manual
    #[must_use]
    pub fn closure_reason(&self, date: NaiveDate) -> ClosureReason {
        if is_weekend(date) {
            ClosureReason::Weekend
        } else {
            self.explicit_reason(date).unwrap_or(ClosureReason::None)
        }
    }

    fn explicit_reason(&self, date: NaiveDate) -> Option<ClosureReason> {
        self.calendar
            .get(&date)
            .map(|title| ClosureReason::CalendarClosure(title.clone()))
            .or_else(|| {
                self.manual
                    .contains(&date)
                    .then_some(ClosureReason::ManualOffDay)
            })
    }

    /// Explicitly closed dates (weekends excluded), in date order
    #[must_use]
    pub fn closures(&self) -> Vec<(NaiveDate, ClosureReason)> {
        self.calendar
            .keys()
            .chain(self.manual.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|d| self.explicit_reason(d).map(|r| (d, r)))
            .collect()
    }

    /// Number of explicitly closed dates
    #[must_use]
    pub fn len(&self) -> usize {
        self.calendar.len()
            + self
                .manual
                .iter()
                .filter(|d| !self.calendar.contains_key(d))
                .count()
    }

    /// No explicit closures
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calendar.is_empty() && self.manual.is_empty()
    }
}
