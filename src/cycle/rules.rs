//! Reminder rules engine
//!
//! Determines which reminders fire on a given cycle day, based on the
//! `days` sets in the reminder configuration.

use crate::cycle::config::ReminderRule;

/// Find reminders that fire on `cycle_index`.
///
/// A reminder fires if its `days` set contains the cycle index.
/// Returns labels in config definition order.
#[must_use]
pub fn find_triggered_reminders(rules: &[ReminderRule], cycle_index: u32) -> Vec<&str> {
    rules
        .iter()
        .filter(|r| r.days.contains(&cycle_index))
        .map(|r| r.label.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::config::RotationConfig;

    const CONFIG_WITH_REMINDERS: &str = r#"
cycle_length = 5

[anchor]
date = "2025-09-02"
cycle_index = 1

[[reminder]]
label = "Aiden (Day 2 library)"
days = [2]

[[reminder]]
label = "Averie (Day 3 library)"
days = [3]

[[reminder]]
label = "Gym shoes"
days = [2, 4]
"#;

    fn test_rules() -> Vec<ReminderRule> {
        RotationConfig::parse(CONFIG_WITH_REMINDERS).unwrap().reminders
    }

    #[test]
    fn test_day_two_triggers_in_config_order() {
        let rules = test_rules();
        assert_eq!(
            find_triggered_reminders(&rules, 2),
            vec!["Aiden (Day 2 library)", "Gym shoes"]
        );
    }

    #[test]
    fn test_single_match() {
        let rules = test_rules();
        assert_eq!(
            find_triggered_reminders(&rules, 3),
            vec!["Averie (Day 3 library)"]
        );
    }

    #[test]
    fn test_no_reminders_on_quiet_day() {
        let rules = test_rules();
        assert!(find_triggered_reminders(&rules, 1).is_empty());
        assert!(find_triggered_reminders(&rules, 5).is_empty());
    }

    #[test]
    fn test_empty_rules_trigger_nothing() {
        assert!(find_triggered_reminders(&[], 2).is_empty());
    }
}
