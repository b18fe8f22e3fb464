// Preference service - typed access to the user's settings
use super::preference_store::{PreferenceError, PreferenceStore};
use crate::domain::preferences::{PreferenceKey, PreferenceValue, Preferences};
use chrono::NaiveDate;
use std::sync::Arc;

/// Typed view over a [`PreferenceStore`].
///
/// Defaults are written to the store for any missing key when the service is
/// opened, so later reads never see a gap.
#[derive(Clone)]
pub struct UserPreferences {
    store: Arc<dyn PreferenceStore>,
    today: NaiveDate,
}

impl UserPreferences {
    pub fn open(store: Arc<dyn PreferenceStore>, today: NaiveDate) -> Result<Self, PreferenceError> {
        let prefs = Self { store, today };
        prefs.apply_defaults()?;
        Ok(prefs)
    }

    fn apply_defaults(&self) -> Result<(), PreferenceError> {
        for key in PreferenceKey::ALL {
            if self.store.get(key)?.is_none() {
                tracing::debug!(key = key.as_str(), "applying default preference");
                self.store.set(key, Preferences::default_value(key, self.today))?;
            }
        }
        Ok(())
    }

    fn read(&self, key: PreferenceKey) -> Result<PreferenceValue, PreferenceError> {
        Ok(self
            .store
            .get(key)?
            .unwrap_or_else(|| Preferences::default_value(key, self.today)))
    }

    fn read_int(&self, key: PreferenceKey) -> Result<i64, PreferenceError> {
        self.read(key)?
            .as_int()
            .ok_or(PreferenceError::TypeMismatch { key })
    }

    fn read_year(&self, key: PreferenceKey) -> Result<i32, PreferenceError> {
        i32::try_from(self.read_int(key)?).map_err(|_| PreferenceError::TypeMismatch { key })
    }

    pub fn use_imperial_units(&self) -> Result<bool, PreferenceError> {
        let key = PreferenceKey::UseImperialUnits;
        self.read(key)?
            .as_bool()
            .ok_or(PreferenceError::TypeMismatch { key })
    }

    pub fn set_use_imperial_units(&self, value: bool) -> Result<(), PreferenceError> {
        self.store
            .set(PreferenceKey::UseImperialUnits, PreferenceValue::Bool(value))
    }

    pub fn start_year(&self) -> Result<i32, PreferenceError> {
        self.read_year(PreferenceKey::StartYear)
    }

    pub fn set_start_year(&self, year: i32) -> Result<(), PreferenceError> {
        self.store
            .set(PreferenceKey::StartYear, PreferenceValue::Int(i64::from(year)))
    }

    pub fn end_year(&self) -> Result<i32, PreferenceError> {
        self.read_year(PreferenceKey::EndYear)
    }

    pub fn set_end_year(&self, year: i32) -> Result<(), PreferenceError> {
        self.store
            .set(PreferenceKey::EndYear, PreferenceValue::Int(i64::from(year)))
    }

    pub fn step_goal(&self) -> Result<i64, PreferenceError> {
        self.read_int(PreferenceKey::StepGoal)
    }

    pub fn set_step_goal(&self, goal: i64) -> Result<(), PreferenceError> {
        self.store.set(PreferenceKey::StepGoal, PreferenceValue::Int(goal))
    }

    pub fn snapshot(&self) -> Result<Preferences, PreferenceError> {
        Ok(Preferences {
            use_imperial_units: self.use_imperial_units()?,
            start_year: self.start_year()?,
            end_year: self.end_year()?,
            step_goal: self.step_goal()?,
        })
    }

    /// Drop every stored key and write the defaults back.
    pub fn reset_to_defaults(&self) -> Result<(), PreferenceError> {
        for key in PreferenceKey::ALL {
            self.store.remove(key)?;
        }
        self.apply_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::preference_store::MemoryPreferenceStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_open_applies_defaults_once() {
        let store = Arc::new(MemoryPreferenceStore::default());
        store
            .set(PreferenceKey::StepGoal, PreferenceValue::Int(8_000))
            .unwrap();

        let prefs = UserPreferences::open(store.clone(), today()).unwrap();
        assert_eq!(
            prefs.snapshot().unwrap(),
            Preferences {
                use_imperial_units: true,
                start_year: 2026,
                end_year: 2026,
                step_goal: 8_000,
            }
        );
        // defaults were persisted, not just synthesised
        assert_eq!(
            store.get(PreferenceKey::StartYear).unwrap(),
            Some(PreferenceValue::Int(2026))
        );

        // reopening on a later date keeps the stored years
        let later = NaiveDate::from_ymd_opt(2027, 2, 1).unwrap();
        let reopened = UserPreferences::open(store, later).unwrap();
        assert_eq!(reopened.start_year().unwrap(), 2026);
    }

    #[test]
    fn test_setters_round_trip() {
        let prefs = UserPreferences::open(Arc::new(MemoryPreferenceStore::default()), today()).unwrap();
        prefs.set_use_imperial_units(false).unwrap();
        prefs.set_start_year(2021).unwrap();
        prefs.set_end_year(2023).unwrap();
        prefs.set_step_goal(12_500).unwrap();

        let snapshot = prefs.snapshot().unwrap();
        assert!(!snapshot.use_imperial_units);
        assert_eq!((snapshot.start_year, snapshot.end_year), (2021, 2023));
        assert_eq!(snapshot.step_goal, 12_500);
    }

    #[test]
    fn test_reset_to_defaults() {
        let prefs = UserPreferences::open(Arc::new(MemoryPreferenceStore::default()), today()).unwrap();
        prefs.set_use_imperial_units(false).unwrap();
        prefs.set_start_year(2019).unwrap();

        prefs.reset_to_defaults().unwrap();
        assert_eq!(prefs.snapshot().unwrap(), Preferences::defaults(today()));
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let store = Arc::new(MemoryPreferenceStore::default());
        store
            .set(PreferenceKey::UseImperialUnits, PreferenceValue::Int(1))
            .unwrap();
        let prefs = UserPreferences::open(store, today()).unwrap();
        assert_eq!(
            prefs.use_imperial_units().unwrap_err(),
            PreferenceError::TypeMismatch {
                key: PreferenceKey::UseImperialUnits
            }
        );
    }
}
