//! Daily notice assembly
//!
//! [`ScheduleView`] combines the resolved cycle day, reminder rules and the
//! day's calendar entries into a [`Notice`]. It performs no I/O.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{events_on_date, CalendarEvent, DayEvent};
use crate::cycle::closure::{ClosureReason, ClosureSet};
use crate::cycle::config::{ReminderRule, RotationConfig};
use crate::cycle::resolver::CycleResolver;
use crate::cycle::rules::find_triggered_reminders;
use crate::error::RotationError;

/// School-day status of a notice date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayStatus {
    /// School is in session
    Instructional {
        /// Cycle day
        cycle_day: u32,
    },
    /// No school
    NoSchool {
        /// Why
        reason: ClosureReason,
        /// Cycle day the date would have had if school were in session
        cycle_day_if_open: u32,
    },
}

/// Rendered facts for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Date this notice describes
    pub date: NaiveDate,
    /// Cycle day or no-school flag
    #[serde(flatten)]
    pub status: DayStatus,
    /// Triggered reminder labels, in config order
    pub reminders: Vec<String>,
    /// Calendar entries on the date, in feed order
    pub events: Vec<DayEvent>,
    /// Data problems the reader should know about
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Notice {
    /// Cycle day if school is in session
    #[must_use]
    pub const fn cycle_day(&self) -> Option<u32> {
        match self.status {
            DayStatus::Instructional { cycle_day } => Some(cycle_day),
            DayStatus::NoSchool { .. } => None,
        }
    }

    /// Whether school is in session
    #[must_use]
    pub const fn is_school_day(&self) -> bool {
        matches!(self.status, DayStatus::Instructional { .. })
    }
}

/// Builds notices for arbitrary dates from fixed inputs
#[derive(Debug, Clone)]
pub struct ScheduleView<'a> {
    resolver: CycleResolver<'a>,
    closures: &'a ClosureSet,
    reminders: &'a [ReminderRule],
    events: &'a [CalendarEvent],
    tz: Tz,
    warnings: Vec<String>,
}

impl<'a> ScheduleView<'a> {
    /// Create a view over `config`, the closure set and the feed entries
    pub fn new(
        config: &'a RotationConfig,
        closures: &'a ClosureSet,
        events: &'a [CalendarEvent],
    ) -> Result<Self, RotationError> {
        Ok(Self {
            resolver: CycleResolver::new(config.anchor, config.cycle_length, closures)?,
            closures,
            reminders: &config.reminders,
            events,
            tz: config.timezone,
            warnings: Vec::new(),
        })
    }

    /// Attach a warning to every notice built from this view
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Entries on `target`, in feed order
    #[must_use]
    pub fn events_on(&self, target: NaiveDate) -> Vec<DayEvent> {
        events_on_date(self.events, target, self.tz)
    }

    /// Build the notice for `target`
    #[must_use]
    pub fn build_notice(&self, target: NaiveDate) -> Notice {
        let cycle_day = self.resolver.cycle_index_for(target);

        let (status, reminders) = if self.resolver.is_instructional(target) {
            let reminders = find_triggered_reminders(self.reminders, cycle_day)
                .into_iter()
                .map(str::to_string)
                .collect();
            (DayStatus::Instructional { cycle_day }, reminders)
        } else {
            let status = DayStatus::NoSchool {
                reason: self.closures.closure_reason(target),
                cycle_day_if_open: cycle_day,
            };
            (status, Vec::new())
        };

        Notice {
            date: target,
            status,
            reminders,
            events: self.events_on(target),
            warnings: self.warnings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::closure::ClosureRules;
    use crate::testutil::{all_day, date, sample_config, timed};

    fn sample_events() -> Vec<CalendarEvent> {
        vec![
            all_day("Labor Day - No School", date(2025, 9, 1), None),
            timed("PTO Meeting", "2025-09-03T22:30:00Z", Some("2025-09-04T00:00:00Z")),
            all_day("Back to School Night", date(2025, 9, 3), None),
            all_day("Rosh Hashanah Holiday", date(2025, 9, 23), None),
        ]
    }

    fn closures_for(events: &[CalendarEvent], manual: &[NaiveDate]) -> ClosureSet {
        let rules = ClosureRules::compile(
            &sample_config().closures.patterns,
            &[],
            false,
        )
        .unwrap();
        ClosureSet::from_sources(events, manual.iter().copied(), &rules, chrono_tz::America::New_York)
    }

    #[test]
    fn test_instructional_day_notice() {
        let config = sample_config();
        let events = sample_events();
        let closures = closures_for(&events, &[]);
        let view = ScheduleView::new(&config, &closures, &events).unwrap();

        // Tue 1, Wed 2
        let notice = view.build_notice(date(2025, 9, 3));
        assert_eq!(notice.cycle_day(), Some(2));
        assert_eq!(notice.reminders, vec!["Aiden (Day 2 library)"]);
        let titles: Vec<_> = notice.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["PTO Meeting", "Back to School Night"]);
        assert!(notice.warnings.is_empty());
    }

    #[test]
    fn test_calendar_closure_notice_keeps_events() {
        let config = sample_config();
        let events = sample_events();
        let closures = closures_for(&events, &[]);
        let view = ScheduleView::new(&config, &closures, &events).unwrap();

        let notice = view.build_notice(date(2025, 9, 23));
        assert!(!notice.is_school_day());
        assert!(notice.reminders.is_empty());
        assert_eq!(notice.events.len(), 1);
        match notice.status {
            DayStatus::NoSchool { reason, .. } => assert_eq!(
                reason,
                ClosureReason::CalendarClosure("Rosh Hashanah Holiday".to_string())
            ),
            DayStatus::Instructional { .. } => panic!("expected no school"),
        }
    }

    #[test]
    fn test_manual_off_day_reports_would_be_cycle_day() {
        let config = sample_config();
        let events = sample_events();
        let closures = closures_for(&events, &[date(2025, 9, 4)]);
        let view = ScheduleView::new(&config, &closures, &events).unwrap();

        let notice = view.build_notice(date(2025, 9, 4));
        assert_eq!(
            notice.status,
            DayStatus::NoSchool {
                reason: ClosureReason::ManualOffDay,
                cycle_day_if_open: 3,
            }
        );
        // Friday picks up the slot Thursday would have used
        assert_eq!(view.build_notice(date(2025, 9, 5)).cycle_day(), Some(3));
    }

    #[test]
    fn test_weekend_notice() {
        let config = sample_config();
        let closures = ClosureSet::new();
        let view = ScheduleView::new(&config, &closures, &[]).unwrap();

        let notice = view.build_notice(date(2025, 9, 6));
        assert!(matches!(
            notice.status,
            DayStatus::NoSchool {
                reason: ClosureReason::Weekend,
                ..
            }
        ));
    }

    #[test]
    fn test_warnings_attached_to_every_notice() {
        let config = sample_config();
        let closures = ClosureSet::new();
        let view = ScheduleView::new(&config, &closures, &[])
            .unwrap()
            .with_warning("calendar unavailable");

        assert_eq!(view.build_notice(date(2025, 9, 2)).warnings, vec!["calendar unavailable"]);
        assert_eq!(view.build_notice(date(2025, 9, 6)).warnings, vec!["calendar unavailable"]);
    }

    #[test]
    fn test_same_inputs_same_notice() {
        let config = sample_config();
        let events = sample_events();
        let closures = closures_for(&events, &[]);
        let view = ScheduleView::new(&config, &closures, &events).unwrap();

        assert_eq!(view.build_notice(date(2025, 9, 3)), view.build_notice(date(2025, 9, 3)));
    }

    #[test]
    fn test_notice_json_shape() {
        let config = sample_config();
        let closures = ClosureSet::new();
        let view = ScheduleView::new(&config, &closures, &[]).unwrap();

        let json = serde_json::to_value(view.build_notice(date(2025, 9, 2))).unwrap();
        assert_eq!(json["date"], "2025-09-02");
        assert_eq!(json["status"], "instructional");
        assert_eq!(json["cycle_day"], 1);
        assert!(json.get("warnings").is_none());
    }
}
