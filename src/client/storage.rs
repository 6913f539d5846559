//! Browser-profile key/value storage.
//!
//! Values are JSON text. A value that cannot be read back is treated as
//! absent, so a corrupted entry never blocks the flow.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Booking draft handed from the car detail screen to checkout.
pub const PENDING_BOOKING_KEY: &str = "pending_booking";
/// List of bookings confirmed from this profile.
pub const BOOKINGS_KEY: &str = "rideflex_bookings";
/// Logged-in marker; holds the user's email.
pub const USER_TOKEN_KEY: &str = "userToken";
pub const THEME_KEY: &str = "theme";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), serde_json::Error>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw);
    Ok(())
}

pub fn load_json<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "failed to load from storage");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        compact: bool,
    }

    #[test]
    fn json_roundtrip() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "prefs", &Prefs { compact: true }).unwrap();
        assert_eq!(store.get("prefs").as_deref(), Some(r#"{"compact":true}"#));
        assert_eq!(load_json::<_, Prefs>(&store, "prefs"), Some(Prefs { compact: true }));
    }

    #[test]
    fn corrupted_value_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.set("prefs", "{not json".into());
        assert_eq!(load_json::<_, Prefs>(&store, "prefs"), None);
        assert_eq!(load_json::<_, Prefs>(&store, "missing"), None);
    }

    #[test]
    fn remove_returns_previous_value() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "\"dark\"".into());
        assert_eq!(store.remove(THEME_KEY).as_deref(), Some("\"dark\""));
        assert!(store.get(THEME_KEY).is_none());
    }
}
