//! cycleday - school rotation day resolver
//!
//! CLI entry point.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use clap::{ArgGroup, CommandFactory, Parser};

use cycleday::calendar::{CalendarSource, HttpCalendarSource};
use cycleday::cli::{
    print_delivery, print_warning, render_closures, render_events, render_notice, render_off_days,
};
use cycleday::cycle::config::RotationConfig;
use cycleday::cycle::context::RotationContext;
use cycleday::notify::{Notifier, TextbeltNotifier};
use cycleday::store::OffDayStore;

/// School rotation day resolver
///
/// Shows the cycle day, reminders and school events for a date, optionally
/// sending them as a text message.
#[derive(Parser, Debug)]
#[command(name = "cycleday", version, about)]
#[command(group(
    ArgGroup::new("action").args([
        "today", "tomorrow", "sms_today", "sms_tomorrow", "check", "events",
        "add_off", "list_off", "list_closures",
    ])
))]
struct Cli {
    /// Show today's cycle day, reminders and events
    #[arg(long)]
    today: bool,

    /// Show tomorrow's cycle day, reminders and events
    #[arg(long)]
    tomorrow: bool,

    /// Send today's notice by SMS
    #[arg(long)]
    sms_today: bool,

    /// Send tomorrow's notice by SMS
    #[arg(long)]
    sms_tomorrow: bool,

    /// Show the notice for a specific date
    #[arg(long, value_name = "YYYY-MM-DD")]
    check: Option<NaiveDate>,

    /// List only the events on a specific date
    #[arg(long, value_name = "YYYY-MM-DD")]
    events: Option<NaiveDate>,

    /// Record a manual off-day
    #[arg(long, value_name = "YYYY-MM-DD")]
    add_off: Option<NaiveDate>,

    /// List manual off-days
    #[arg(long)]
    list_off: bool,

    /// List every known closure with its reason
    #[arg(long)]
    list_closures: bool,

    /// Print the notice as JSON
    #[arg(long)]
    json: bool,

    /// Path to the rotation.toml configuration file
    #[arg(long, default_value = "rotation.toml")]
    config: PathBuf,
}

/// What the invocation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show(NaiveDate),
    Send(NaiveDate),
    Events(NaiveDate),
    AddOff(NaiveDate),
    ListOff,
    ListClosures,
}

impl Cli {
    /// Resolve flags against the civil date `today`
    fn action(&self, today: NaiveDate) -> Option<Action> {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        if self.today {
            Some(Action::Show(today))
        } else if self.tomorrow {
            Some(Action::Show(tomorrow))
        } else if self.sms_today {
            Some(Action::Send(today))
        } else if self.sms_tomorrow {
            Some(Action::Send(tomorrow))
        } else if let Some(date) = self.check {
            Some(Action::Show(date))
        } else if let Some(date) = self.events {
            Some(Action::Events(date))
        } else if let Some(date) = self.add_off {
            Some(Action::AddOff(date))
        } else if self.list_off {
            Some(Action::ListOff)
        } else if self.list_closures {
            Some(Action::ListClosures)
        } else {
            None
        }
    }
}

/// Non-empty environment variable
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load the run snapshot, fetching the feed when one is configured
async fn load_context(config: &RotationConfig, store: &OffDayStore) -> Result<RotationContext> {
    let source = config
        .calendar_url
        .as_deref()
        .map(HttpCalendarSource::new)
        .transpose()?;
    let ctx = RotationContext::load(
        config,
        source.as_ref().map(|s| s as &dyn CalendarSource),
        store,
    )
    .await?;
    for warning in &ctx.warnings {
        print_warning(warning);
    }
    Ok(ctx)
}

/// Send a notice, printing it instead when no destination is configured
async fn send_notice(config: &RotationConfig, message: &str) -> Result<()> {
    let Some(phone) = env_value("TO_PHONE_NUMBER").or_else(|| config.notify.phone.clone()) else {
        print_warning("Phone number not configured. Printing instead:");
        println!("{message}");
        return Ok(());
    };

    let notifier = TextbeltNotifier::new(&config.notify.endpoint, env_value("TEXTBELT_API_KEY"))?;
    if !notifier.has_api_key() {
        print_warning("Using Textbelt free quota (1 text per day per IP)");
    }

    let report = notifier.send(&phone, message).await;
    print_delivery(&report);
    if !report.is_sent() {
        println!("{message}");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    cycleday::logging::init();
    let cli = Cli::parse();

    // Load configuration
    let config = RotationConfig::from_path(&cli.config)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))?;
    let store = OffDayStore::new(&config.closures.off_day_file);

    let today = Utc::now().with_timezone(&config.timezone).date_naive();
    let Some(action) = cli.action(today) else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match action {
        Action::AddOff(date) => {
            if store.add(date).context("Failed to record off-day")? {
                println!("Added manual off-day: {date}");
            } else {
                println!("Manual off-day already recorded: {date}");
            }
        }
        Action::ListOff => {
            let days = store.list().context("Failed to read off-days")?;
            println!("{}", render_off_days(&days));
        }
        Action::ListClosures => {
            let ctx = load_context(&config, &store).await?;
            println!("{}", render_closures(&ctx.closures.closures()));
        }
        Action::Events(date) => {
            let ctx = load_context(&config, &store).await?;
            let view = ctx.view(&config)?;
            println!("{}", render_events(date, &view.events_on(date)));
        }
        Action::Show(date) => {
            let ctx = load_context(&config, &store).await?;
            let notice = ctx.view(&config)?.build_notice(date);
            if cli.json {
                let json =
                    serde_json::to_string_pretty(&notice).context("Failed to serialize notice")?;
                println!("{json}");
            } else {
                println!("{}", render_notice(&notice));
            }
        }
        Action::Send(date) => {
            let ctx = load_context(&config, &store).await?;
            let notice = ctx.view(&config)?.build_notice(date);
            send_notice(&config, &render_notice(&notice)).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cycleday").chain(args.iter().copied())).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_tomorrow() {
        let today = date(2025, 9, 5);
        assert_eq!(parse(&["--today"]).action(today), Some(Action::Show(today)));
        assert_eq!(
            parse(&["--tomorrow"]).action(today),
            Some(Action::Show(date(2025, 9, 6)))
        );
        assert_eq!(
            parse(&["--sms-tomorrow"]).action(today),
            Some(Action::Send(date(2025, 9, 6)))
        );
    }

    #[test]
    fn test_date_arguments() {
        let today = date(2025, 9, 5);
        assert_eq!(
            parse(&["--check", "2025-10-01"]).action(today),
            Some(Action::Show(date(2025, 10, 1)))
        );
        assert_eq!(
            parse(&["--events", "2025-10-02"]).action(today),
            Some(Action::Events(date(2025, 10, 2)))
        );
        assert_eq!(
            parse(&["--add-off", "2025-10-13"]).action(today),
            Some(Action::AddOff(date(2025, 10, 13)))
        );
    }

    #[test]
    fn test_listing_flags() {
        let today = date(2025, 9, 5);
        assert_eq!(parse(&["--list-off"]).action(today), Some(Action::ListOff));
        assert_eq!(
            parse(&["--list-closures"]).action(today),
            Some(Action::ListClosures)
        );
    }

    #[test]
    fn test_no_flags_means_help() {
        assert_eq!(parse(&[]).action(date(2025, 9, 5)), None);
    }

    #[test]
    fn test_actions_are_mutually_exclusive() {
        let err = Cli::try_parse_from(["cycleday", "--today", "--list-off"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_reject_malformed_date() {
        assert!(Cli::try_parse_from(["cycleday", "--check", "10/01/2025"]).is_err());
    }

    #[test]
    fn test_config_default_and_override() {
        assert_eq!(parse(&["--today"]).config, PathBuf::from("rotation.toml"));
        assert_eq!(
            parse(&["--today", "--config", "school.toml"]).config,
            PathBuf::from("school.toml")
        );
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
