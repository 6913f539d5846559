use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bookings::draft::{BookingDraft, ConfirmedBooking};
use crate::client::storage::{
    load_json, save_json, KeyValueStore, BOOKINGS_KEY, PENDING_BOOKING_KEY, THEME_KEY,
    USER_TOKEN_KEY,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

/// Typed view over the browser-profile storage.
#[derive(Debug, Default)]
pub struct ClientSession<S> {
    store: S,
}

impl<S: KeyValueStore> ClientSession<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The logged-in marker is the user's email, stored as plain text.
    pub fn user_email(&self) -> Option<String> {
        self.store
            .get(USER_TOKEN_KEY)
            .filter(|email| !email.trim().is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_email().is_some()
    }

    pub fn log_in(&mut self, email: &str) {
        self.store.set(USER_TOKEN_KEY, email.trim().to_owned());
    }

    pub fn log_out(&mut self) {
        self.store.remove(USER_TOKEN_KEY);
    }

    pub fn theme(&self) -> Theme {
        load_json(&self.store, THEME_KEY).unwrap_or_default()
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, serde_json::Error> {
        let theme = self.theme().toggled();
        save_json(&mut self.store, THEME_KEY, &theme)?;
        Ok(theme)
    }

    pub fn save_pending_draft(&mut self, draft: &BookingDraft) -> Result<(), serde_json::Error> {
        save_json(&mut self.store, PENDING_BOOKING_KEY, draft)
    }

    pub fn pending_draft(&self) -> Option<BookingDraft> {
        load_json(&self.store, PENDING_BOOKING_KEY)
    }

    /// Read the pending draft and remove it, so it is consumed once.
    pub fn take_pending_draft(&mut self) -> Option<BookingDraft> {
        let draft = self.pending_draft();
        self.store.remove(PENDING_BOOKING_KEY);
        draft
    }

    pub fn clear_pending_draft(&mut self) {
        self.store.remove(PENDING_BOOKING_KEY);
    }

    pub fn bookings(&self) -> Vec<ConfirmedBooking> {
        load_json(&self.store, BOOKINGS_KEY).unwrap_or_default()
    }

    pub fn record_booking(&mut self, booking: &ConfirmedBooking) -> Result<(), serde_json::Error> {
        let mut bookings = self.bookings();
        bookings.push(booking.clone());
        debug!(count = bookings.len(), "recording confirmed booking");
        save_json(&mut self.store, BOOKINGS_KEY, &bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStore;

    fn session() -> ClientSession<MemoryStore> {
        ClientSession::new(MemoryStore::new())
    }

    #[test]
    fn login_marker() {
        let mut s = session();
        assert!(!s.is_logged_in());
        s.log_in(" juan@example.com ");
        assert!(s.is_logged_in());
        assert_eq!(s.store().get(USER_TOKEN_KEY).as_deref(), Some("juan@example.com"));
        s.log_out();
        assert!(s.user_email().is_none());
    }

    #[test]
    fn blank_marker_is_not_a_login() {
        let mut store = MemoryStore::new();
        store.set(USER_TOKEN_KEY, "  ".into());
        assert!(!ClientSession::new(store).is_logged_in());
    }

    #[test]
    fn theme_defaults_to_light_and_toggles() {
        let mut s = session();
        assert_eq!(s.theme(), Theme::Light);
        assert_eq!(s.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(s.store().get(THEME_KEY).as_deref(), Some("\"dark\""));
        assert_eq!(s.toggle_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn pending_draft_is_taken_once() {
        let mut s = session();
        let draft = BookingDraft {
            car_id: 3,
            pickup_location: "Cebu City".into(),
            ..BookingDraft::default()
        };
        s.save_pending_draft(&draft).unwrap();
        assert_eq!(s.take_pending_draft(), Some(draft));
        assert_eq!(s.take_pending_draft(), None);
    }

    #[test]
    fn corrupted_bookings_list_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(BOOKINGS_KEY, "[{".into());
        assert!(ClientSession::new(store).bookings().is_empty());
    }
}
