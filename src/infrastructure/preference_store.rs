// Preference stores - TOML file and in-memory
use crate::application::preference_store::{PreferenceError, PreferenceStore};
use crate::domain::preferences::{PreferenceKey, PreferenceValue};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<PreferenceKey, PreferenceValue>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<PreferenceValue>, PreferenceError> {
        Ok(lock(&self.values).get(&key).copied())
    }

    fn set(&self, key: PreferenceKey, value: PreferenceValue) -> Result<(), PreferenceError> {
        lock(&self.values).insert(key, value);
        Ok(())
    }

    fn remove(&self, key: PreferenceKey) -> Result<(), PreferenceError> {
        lock(&self.values).remove(&key);
        Ok(())
    }
}

/// Flat TOML table keyed by preference name:
///
/// ```toml
/// useImperialUnits = true
/// startYear = 2024
/// ```
///
/// The file is re-read on every access and rewritten on every change. Unknown
/// keys are preserved.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TomlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn io_error(&self, err: std::io::Error) -> PreferenceError {
        PreferenceError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, toml::Value>, PreferenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => toml::from_str(&text).map_err(|e| PreferenceError::Decode(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, table: &BTreeMap<String, toml::Value>) -> Result<(), PreferenceError> {
        let text = toml::to_string(table).map_err(|e| PreferenceError::Encode(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }

    fn update<F>(&self, change: F) -> Result<(), PreferenceError>
    where
        F: FnOnce(&mut BTreeMap<String, toml::Value>),
    {
        let _guard = lock(&self.write_lock);
        let mut table = self.load()?;
        change(&mut table);
        self.save(&table)
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<PreferenceValue>, PreferenceError> {
        match self.load()?.remove(key.as_str()) {
            None => Ok(None),
            Some(toml::Value::Boolean(b)) => Ok(Some(PreferenceValue::Bool(b))),
            Some(toml::Value::Integer(i)) => Ok(Some(PreferenceValue::Int(i))),
            Some(_) => Err(PreferenceError::TypeMismatch { key }),
        }
    }

    fn set(&self, key: PreferenceKey, value: PreferenceValue) -> Result<(), PreferenceError> {
        let value = match value {
            PreferenceValue::Bool(b) => toml::Value::Boolean(b),
            PreferenceValue::Int(i) => toml::Value::Integer(i),
        };
        self.update(|table| {
            table.insert(key.as_str().to_string(), value);
        })
    }

    fn remove(&self, key: PreferenceKey) -> Result<(), PreferenceError> {
        self.update(|table| {
            table.remove(key.as_str());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::preference_service::UserPreferences;
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[test]
    fn test_toml_store_persists_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("genart.toml");

        let store = TomlPreferenceStore::new(&path);
        assert_eq!(store.get(PreferenceKey::StepGoal).unwrap(), None);
        store.set(PreferenceKey::StepGoal, PreferenceValue::Int(7_500)).unwrap();
        store.set(PreferenceKey::UseImperialUnits, PreferenceValue::Bool(false)).unwrap();

        let reopened = TomlPreferenceStore::new(&path);
        assert_eq!(reopened.get(PreferenceKey::StepGoal).unwrap(), Some(PreferenceValue::Int(7_500)));
        assert_eq!(
            reopened.get(PreferenceKey::UseImperialUnits).unwrap(),
            Some(PreferenceValue::Bool(false))
        );

        reopened.remove(PreferenceKey::StepGoal).unwrap();
        assert_eq!(store.get(PreferenceKey::StepGoal).unwrap(), None);
    }

    #[test]
    fn test_toml_store_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = \"dark\"\nstartYear = 2022\n").unwrap();

        let store = TomlPreferenceStore::new(&path);
        store.set(PreferenceKey::EndYear, PreferenceValue::Int(2024)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("theme = \"dark\""));
        assert_eq!(store.get(PreferenceKey::StartYear).unwrap(), Some(PreferenceValue::Int(2022)));
    }

    #[test]
    fn test_toml_store_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        std::fs::write(&path, "startYear = \"last year\"\n").unwrap();
        let store = TomlPreferenceStore::new(&path);
        assert_eq!(
            store.get(PreferenceKey::StartYear).unwrap_err(),
            PreferenceError::TypeMismatch {
                key: PreferenceKey::StartYear
            }
        );

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(store.get(PreferenceKey::StartYear), Err(PreferenceError::Decode(_))));
    }

    #[test]
    fn test_defaults_written_through_toml_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let prefs = UserPreferences::open(Arc::new(TomlPreferenceStore::new(&path)), today).unwrap();
        assert_eq!(prefs.step_goal().unwrap(), 10_000);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("useImperialUnits = true"));
        assert!(text.contains("startYear = 2026"));
    }
}
