//! cycleday - school rotation day resolver
//!
//! Works out which day of an N-day rotation any date falls on, skipping
//! weekends, calendar-feed closures and manual off-days, and renders a short
//! daily notice with reminders and school events.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod calendar;
pub mod cli;
pub mod cycle;
pub mod error;
pub mod logging;
pub mod notify;
pub mod store;

#[cfg(test)]
pub mod testutil;

// Re-export commonly used types
pub use calendar::{CalendarEvent, CalendarSource, DayEvent, FeedCache, HttpCalendarSource};
pub use cli::render_notice;
pub use cycle::closure::{ClosureReason, ClosureRules, ClosureSet};
pub use cycle::config::{Anchor, ReminderRule, RotationConfig};
pub use cycle::context::RotationContext;
pub use cycle::notice::{DayStatus, Notice, ScheduleView};
pub use cycle::resolver::CycleResolver;
pub use cycle::rules::find_triggered_reminders;
pub use error::RotationError;
pub use notify::{DeliveryReport, Notifier, TextbeltNotifier};
pub use store::OffDayStore;
