// Preference store trait - key-value persistence for user settings
use crate::domain::preferences::{PreferenceKey, PreferenceValue};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreferenceError {
    #[error("preference file {path}: {message}")]
    Io { path: String, message: String },
    #[error("cannot decode preferences: {0}")]
    Decode(String),
    #[error("cannot encode preferences: {0}")]
    Encode(String),
    #[error("stored value for {key} has the wrong type")]
    TypeMismatch { key: PreferenceKey },
}

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: PreferenceKey) -> Result<Option<PreferenceValue>, PreferenceError>;

    fn set(&self, key: PreferenceKey, value: PreferenceValue) -> Result<(), PreferenceError>;

    fn remove(&self, key: PreferenceKey) -> Result<(), PreferenceError>;
}
