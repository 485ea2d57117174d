//! Plain-text rendering of notices and listings
//!
//! Notice text is kept free of terminal styling so the same string can be
//! printed or sent as a text message. Diagnostics go to stderr with color.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveTime};
use colored::Colorize;

use crate::calendar::DayEvent;
use crate::cycle::closure::ClosureReason;
use crate::cycle::notice::{DayStatus, Notice};
use crate::notify::DeliveryReport;

fn long_date(date: NaiveDate) -> String {
    date.format("%A %b %d, %Y").to_string()
}

fn clock(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// One bullet line for an event
#[must_use]
pub fn render_event_line(event: &DayEvent) -> String {
    let when = match (event.all_day, event.starts, event.ends) {
        (true, _, _) | (false, None, _) => "All day".to_string(),
        (false, Some(start), Some(end)) if end != start => {
            format!("{}–{}", clock(start), clock(end))
        }
        (false, Some(start), _) => clock(start),
    };
    let location = event
        .location
        .as_deref()
        .map_or_else(String::new, |loc| format!(" @ {loc}"));
    format!("- {when}: {}{location}", event.title)
}

fn no_school_label(reason: &ClosureReason) -> String {
    match reason {
        ClosureReason::None => "No school".to_string(),
        other => format!("No school ({other})"),
    }
}

/// Render a notice as message text
#[must_use]
pub fn render_notice(notice: &Notice) -> String {
    let mut out = String::new();
    let date = long_date(notice.date);

    match &notice.status {
        DayStatus::Instructional { cycle_day } => {
            let _ = writeln!(out, "{date}: Cycle Day {cycle_day}");
            if notice.reminders.is_empty() {
                out.push_str("No reminders.\n");
            } else {
                out.push_str("Reminders:\n");
                for label in &notice.reminders {
                    let _ = writeln!(out, " • {label}");
                }
            }
            if notice.events.is_empty() {
                out.push_str("School events: none listed.\n");
            } else {
                out.push_str("School events:\n");
                for event in &notice.events {
                    let _ = writeln!(out, "{}", render_event_line(event));
                }
            }
        }
        DayStatus::NoSchool {
            reason,
            cycle_day_if_open,
        } => {
            let _ = writeln!(out, "{date}: {}", no_school_label(reason));
            let _ = writeln!(out, "Cycle day if in session: {cycle_day_if_open}");
            if !notice.events.is_empty() {
                out.push_str("School events (non-instructional):\n");
                for event in &notice.events {
                    let _ = writeln!(out, "{}", render_event_line(event));
                }
            }
        }
    }

    for warning in &notice.warnings {
        let _ = writeln!(out, "Note: {warning}");
    }

    out.trim_end().to_string()
}

/// Render the events-only listing for a date
#[must_use]
pub fn render_events(date: NaiveDate, events: &[DayEvent]) -> String {
    let mut out = format!("Events on {}:", long_date(date));
    if events.is_empty() {
        out.push_str("\n (none)");
    }
    for event in events {
        out.push('\n');
        out.push_str(&render_event_line(event));
    }
    out
}

/// Render the manual off-day listing
#[must_use]
pub fn render_off_days(days: &[NaiveDate]) -> String {
    if days.is_empty() {
        return "No manual off-days saved.".to_string();
    }
    let mut out = "Manual off-days:".to_string();
    for day in days {
        let _ = write!(out, "\n • {day}");
    }
    out
}

/// Render every known closure with its reason
#[must_use]
pub fn render_closures(closures: &[(NaiveDate, ClosureReason)]) -> String {
    if closures.is_empty() {
        return "No closures known besides weekends.".to_string();
    }
    let mut out = "Closures:".to_string();
    for (date, reason) in closures {
        let _ = write!(out, "\n • {date} ({}): {reason}", date.format("%a"));
    }
    out
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Print the outcome of a delivery attempt to stderr
pub fn print_delivery(report: &DeliveryReport) {
    match report {
        DeliveryReport::Sent {
            id,
            quota_remaining,
        } => {
            eprintln!(
                "{} SMS sent. ID: {}",
                "✓".green().bold(),
                id.as_deref().unwrap_or("unknown")
            );
            if let Some(quota) = quota_remaining {
                eprintln!("  {} {quota}", "Quota remaining:".dimmed());
            }
        }
        DeliveryReport::QuotaExhausted => {
            eprintln!("{} SMS not sent: quota exhausted", "✗".red().bold());
        }
        DeliveryReport::Failed { error } => {
            eprintln!("{} Failed to send SMS: {}", "✗".red().bold(), error.red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::date;

    fn event(title: &str, times: Option<(u32, u32, u32, u32)>, location: Option<&str>) -> DayEvent {
        DayEvent {
            title: title.to_string(),
            all_day: times.is_none(),
            starts: times.and_then(|(h, m, _, _)| NaiveTime::from_hms_opt(h, m, 0)),
            ends: times.and_then(|(_, _, h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            location: location.map(ToString::to_string),
        }
    }

    #[test]
    fn test_event_lines() {
        assert_eq!(
            render_event_line(&event("Back to School", None, None)),
            "- All day: Back to School"
        );
        assert_eq!(
            render_event_line(&event("PTO Meeting", Some((18, 30, 20, 0)), Some("Library"))),
            "- 6:30 PM–8:00 PM: PTO Meeting @ Library"
        );
    }

    #[test]
    fn test_open_ended_event_shows_start_only() {
        let mut ev = event("Lock-in", Some((19, 0, 0, 0)), None);
        ev.ends = None;
        assert_eq!(render_event_line(&ev), "- 7:00 PM: Lock-in");
    }

    #[test]
    fn test_render_instructional_notice() {
        let notice = Notice {
            date: date(2025, 9, 3),
            status: DayStatus::Instructional { cycle_day: 2 },
            reminders: vec!["Aiden (Day 2 library)".to_string()],
            events: vec![event("Back to School Night", None, None)],
            warnings: vec![],
        };
        assert_eq!(
            render_notice(&notice),
            "Wednesday Sep 03, 2025: Cycle Day 2\n\
             Reminders:\n \
             • Aiden (Day 2 library)\n\
             School events:\n\
             - All day: Back to School Night"
        );
    }

    #[test]
    fn test_render_quiet_day() {
        let notice = Notice {
            date: date(2025, 9, 2),
            status: DayStatus::Instructional { cycle_day: 1 },
            reminders: vec![],
            events: vec![],
            warnings: vec![],
        };
        let text = render_notice(&notice);
        assert!(text.contains("No reminders."));
        assert!(text.ends_with("School events: none listed."));
    }

    #[test]
    fn test_render_no_school_notice_with_warning() {
        let notice = Notice {
            date: date(2025, 9, 1),
            status: DayStatus::NoSchool {
                reason: ClosureReason::CalendarClosure("Labor Day - No School".to_string()),
                cycle_day_if_open: 1,
            },
            reminders: vec![],
            events: vec![event("Labor Day - No School", None, None)],
            warnings: vec!["feed timed out".to_string()],
        };
        let text = render_notice(&notice);
        assert!(text.starts_with("Monday Sep 01, 2025: No school (Labor Day - No School)"));
        assert!(text.contains("Cycle day if in session: 1"));
        assert!(text.contains("School events (non-instructional):\n- All day: Labor Day"));
        assert!(text.ends_with("Note: feed timed out"));
    }

    #[test]
    fn test_render_events_listing() {
        assert_eq!(
            render_events(date(2025, 9, 2), &[]),
            "Events on Tuesday Sep 02, 2025:\n (none)"
        );
    }

    #[test]
    fn test_render_off_days() {
        assert_eq!(render_off_days(&[]), "No manual off-days saved.");
        assert_eq!(
            render_off_days(&[date(2025, 10, 13), date(2025, 11, 26)]),
            "Manual off-days:\n • 2025-10-13\n • 2025-11-26"
        );
    }

    #[test]
    fn test_render_closures() {
        let text = render_closures(&[
            (date(2025, 9, 1), ClosureReason::CalendarClosure("Labor Day".to_string())),
            (date(2025, 10, 13), ClosureReason::ManualOffDay),
        ]);
        assert_eq!(
            text,
            "Closures:\n • 2025-09-01 (Mon): Labor Day\n • 2025-10-13 (Mon): manual off-day"
        );
    }

    #[test]
    fn test_print_helpers_do_not_panic() {
        print_warning("calendar unavailable");
        print_delivery(&DeliveryReport::Sent {
            id: Some("1".to_string()),
            quota_remaining: Some(3),
        });
        print_delivery(&DeliveryReport::QuotaExhausted);
        print_delivery(&DeliveryReport::Failed {
            error: "bad number".to_string(),
        });
    }
}
