//! CLI output formatting
//!
//! Renders notices and listings as plain text, and reports delivery
//! outcomes on stderr.

pub mod display;

pub use display::print_delivery;
pub use display::print_warning;
pub use display::render_closures;
pub use display::render_events;
pub use display::render_notice;
pub use display::render_off_days;
