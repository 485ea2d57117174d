//! Rotation configuration parser
//!
//! Parses `rotation.toml` into an immutable configuration object.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::cycle::closure::{ClosureRules, DEFAULT_PATTERNS};
use crate::error::RotationError;

/// The known fact every other cycle day is counted from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Anchor {
    /// Date on which the cycle index is known
    pub date: NaiveDate,
    /// Cycle index on that date (1-based)
    pub cycle_index: u32,
}

/// How feed entries and manual off-days become closures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClosureSettings {
    /// Case-insensitive regexes; a matching title closes the dates it covers
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    /// Titles matching any of these never close school
    #[serde(default)]
    pub exclude: Vec<String>,
    /// All-day entries close school regardless of title
    #[serde(default = "default_all_day_closes")]
    pub all_day_closes: bool,
    /// YAML file holding manually declared off-days
    #[serde(default = "default_off_day_file")]
    pub off_day_file: PathBuf,
    /// Local copy of the last fetched feed
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,
}

fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(ToString::to_string).collect()
}

const fn default_all_day_closes() -> bool {
    true
}

fn default_off_day_file() -> PathBuf {
    PathBuf::from("manual_off_days.yaml")
}

fn default_cache_file() -> PathBuf {
    PathBuf::from(".cycleday/calendar.ics")
}

impl Default for ClosureSettings {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            exclude: Vec::new(),
            all_day_closes: default_all_day_closes(),
            off_day_file: default_off_day_file(),
            cache_file: default_cache_file(),
        }
    }
}

/// Text message delivery settings. Secrets come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifySettings {
    /// Textbelt-compatible endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Destination number, overridden by `TO_PHONE_NUMBER`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

fn default_endpoint() -> String {
    crate::notify::textbelt::DEFAULT_ENDPOINT.to_string()
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            phone: None,
        }
    }
}

/// Remind `label` on the listed cycle days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderRule {
    /// Who or what to remind, shown verbatim
    pub label: String,
    /// Cycle days that trigger the reminder
    pub days: BTreeSet<u32>,
}

/// Top-level configuration parsed from rotation.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotationConfig {
    /// Civil timezone all dates are compared in
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// Rotation period in instructional days
    pub cycle_length: u32,
    /// ICS feed of the school calendar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_url: Option<String>,
    /// Known (date, cycle day) pair
    pub anchor: Anchor,
    /// Closure detection and storage
    #[serde(default)]
    pub closures: ClosureSettings,
    /// Message delivery
    #[serde(default)]
    pub notify: NotifySettings,
    /// Per-person reminders, in display order
    #[serde(default, rename = "reminder")]
    pub reminders: Vec<ReminderRule>,
}

const fn default_timezone() -> Tz {
    chrono_tz::America::New_York
}

impl RotationConfig {
    /// Parse a rotation.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse rotation.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse rotation.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Compile the closure matching rules
    pub fn closure_rules(&self) -> Result<ClosureRules, RotationError> {
        ClosureRules::compile(
            &self.closures.patterns,
            &self.closures.exclude,
            self.closures.all_day_closes,
        )
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), RotationError> {
        if self.cycle_length == 0 {
            return Err(RotationError::config("cycle_length must be at least 1"));
        }

        if !(1..=self.cycle_length).contains(&self.anchor.cycle_index) {
            return Err(RotationError::config(format!(
                "anchor cycle_index {} is outside 1..={}",
                self.anchor.cycle_index, self.cycle_length
            )));
        }

        let mut seen = HashSet::new();
        for rule in &self.reminders {
            if rule.label.trim().is_empty() {
                return Err(RotationError::config("reminder label cannot be empty"));
            }
            if !seen.insert(rule.label.as_str()) {
                return Err(RotationError::config(format!(
                    "Duplicate reminder label: '{}'",
                    rule.label
                )));
            }
            if let Some(day) = rule
                .days
                .iter()
                .find(|d| !(1..=self.cycle_length).contains(*d))
            {
                return Err(RotationError::config(format!(
                    "reminder '{}' uses cycle day {day}, outside 1..={}",
                    rule.label, self.cycle_length
                )));
            }
        }

        self.closure_rules()?;
        Ok(())
    }
}
