//! Persistent state
//!
//! Manually declared off-days live in a YAML file next to the config.

pub mod off_days;

pub use off_days::OffDayStore;
