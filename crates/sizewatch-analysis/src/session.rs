use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Key holding the last selected history window.
pub const WINDOW_STORAGE_KEY: &str = "historyWindow";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

/// Ephemeral per-viewer key/value storage. Callers treat every error as a
/// cache miss.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let values = self
            .values
            .lock()
            .map_err(|_| SessionError::Unavailable("session lock poisoned".to_owned()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| SessionError::Unavailable("session lock poisoned".to_owned()))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(WINDOW_STORAGE_KEY).expect("get"), None);

        store.set(WINDOW_STORAGE_KEY, "30").expect("set");
        store.set(WINDOW_STORAGE_KEY, "180").expect("overwrite");
        assert_eq!(
            store.get(WINDOW_STORAGE_KEY).expect("get").as_deref(),
            Some("180")
        );
    }
}
