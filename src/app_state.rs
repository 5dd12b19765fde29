use crate::clock::Clock;
use crate::error::Result;
use crate::notifications::{Notifications, Severity};
use crate::signals::SignalBus;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Draft,
    LastSavedEntry,
    Theme,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Draft => "diary-draft",
            StorageKey::LastSavedEntry => "diary-last-saved-entry",
            StorageKey::Theme => "diary-theme",
        }
    }
}

/// Keyed in-memory store of JSON values. Lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<StorageKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        match self.slots.get(&key) {
            Some(serialized) => Ok(Some(serde_json::from_str(serialized)?)),
            None => Ok(None),
        }
    }

    /// Overwrites whatever the slot held.
    pub fn set<T: Serialize>(&mut self, key: StorageKey, value: &T) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        self.slots.insert(key, serialized);
        debug!("Stored {}", key.as_str());
        Ok(())
    }

    /// Clearing an empty slot is a no-op. Returns whether something was removed.
    pub fn clear(&mut self, key: StorageKey) -> bool {
        self.slots.remove(&key).is_some()
    }

    #[cfg(test)]
    pub fn contains(&self, key: StorageKey) -> bool {
        self.slots.contains_key(&key)
    }

    #[cfg(test)]
    pub fn set_raw(&mut self, key: StorageKey, raw: &str) {
        self.slots.insert(key, raw.to_string());
    }
}

/// Everything the controllers share. Owned by the app and lent out per call.
pub struct AppState {
    pub store: MemoryStore,
    pub notifications: Notifications,
    pub signals: SignalBus,
    pub clock: Box<dyn Clock>,
}

impl AppState {
    pub fn new(clock: Box<dyn Clock>, notification_duration: Duration) -> Self {
        AppState {
            store: MemoryStore::new(),
            notifications: Notifications::new(notification_duration),
            signals: SignalBus::new(),
            clock,
        }
    }

    /// Posts a toast stamped with the shared clock.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let now = self.clock.instant();
        self.notifications.notify(message, severity, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;

    #[test]
    fn set_overwrites_slot() {
        let mut store = MemoryStore::new();
        store.set(StorageKey::Theme, &"dark").unwrap();
        store.set(StorageKey::Theme, &"light").unwrap();

        let theme: Option<String> = store.get(StorageKey::Theme).unwrap();
        assert_eq!(theme.as_deref(), Some("light"));
    }

    #[test]
    fn get_missing_slot_is_none() {
        let store = MemoryStore::new();
        let draft: Option<String> = store.get(StorageKey::Draft).unwrap();
        assert!(draft.is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = MemoryStore::new();
        store.set(StorageKey::Draft, &"text").unwrap();

        assert!(store.clear(StorageKey::Draft));
        assert!(!store.clear(StorageKey::Draft));
        assert!(!store.contains(StorageKey::Draft));
    }

    #[test]
    fn slots_are_independent() {
        let mut store = MemoryStore::new();
        store.set(StorageKey::Draft, &1).unwrap();
        store.set(StorageKey::LastSavedEntry, &2).unwrap();
        store.clear(StorageKey::Draft);

        let saved: Option<i32> = store.get(StorageKey::LastSavedEntry).unwrap();
        assert_eq!(saved, Some(2));
    }

    #[test]
    fn corrupt_slot_reports_json_error() {
        let mut store = MemoryStore::new();
        store.set_raw(StorageKey::Draft, "{not json");

        let result: Result<Option<String>> = store.get(StorageKey::Draft);
        assert!(matches!(result, Err(JournalError::Json(_))));
    }
}
