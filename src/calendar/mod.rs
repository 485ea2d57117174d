//! School calendar feed
//!
//! Fetching, caching and parsing of the remote ICS feed, and projection of
//! its entries onto single dates.

pub mod event;
pub mod ics;
pub mod source;

pub use event::{events_on_date, CalendarEvent, DayEvent, EventTime};
pub use ics::parse_ics;
pub use source::{load_feed, CalendarFeed, CalendarSource, FeedCache, FeedOrigin, HttpCalendarSource};
