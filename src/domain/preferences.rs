// User preference domain models
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_STEP_GOAL: i64 = 10_000;

/// Keys understood by the preference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    UseImperialUnits,
    StartYear,
    EndYear,
    StepGoal,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 4] = [
        PreferenceKey::UseImperialUnits,
        PreferenceKey::StartYear,
        PreferenceKey::EndYear,
        PreferenceKey::StepGoal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::UseImperialUnits => "useImperialUnits",
            PreferenceKey::StartYear => "startYear",
            PreferenceKey::EndYear => "endYear",
            PreferenceKey::StepGoal => "stepGoal",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
}

impl PreferenceValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PreferenceValue::Bool(b) => Some(*b),
            PreferenceValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PreferenceValue::Int(i) => Some(*i),
            PreferenceValue::Bool(_) => None,
        }
    }
}

/// Snapshot of every preference with defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub use_imperial_units: bool,
    pub start_year: i32,
    pub end_year: i32,
    pub step_goal: i64,
}

impl Preferences {
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            use_imperial_units: true,
            start_year: today.year(),
            end_year: today.year(),
            step_goal: DEFAULT_STEP_GOAL,
        }
    }

    pub fn default_value(key: PreferenceKey, today: NaiveDate) -> PreferenceValue {
        let defaults = Self::defaults(today);
        match key {
            PreferenceKey::UseImperialUnits => PreferenceValue::Bool(defaults.use_imperial_units),
            PreferenceKey::StartYear => PreferenceValue::Int(i64::from(defaults.start_year)),
            PreferenceKey::EndYear => PreferenceValue::Int(i64::from(defaults.end_year)),
            PreferenceKey::StepGoal => PreferenceValue::Int(defaults.step_goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_today() {
        let prefs = Preferences::defaults(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert!(prefs.use_imperial_units);
        assert_eq!(prefs.start_year, 2026);
        assert_eq!(prefs.end_year, 2026);
        assert_eq!(prefs.step_goal, 10_000);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(PreferenceValue::Bool(true).as_bool(), Some(true));
        assert_eq!(PreferenceValue::Bool(true).as_int(), None);
        assert_eq!(PreferenceValue::Int(2024).as_int(), Some(2024));
    }
}
