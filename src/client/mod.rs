//! Front-end state that lives in the browser profile: the login marker,
//! theme, pending booking draft and locally confirmed bookings, plus the
//! form checks run before any request.

pub mod forms;
pub mod session;
pub mod storage;

pub use session::{ClientSession, Theme};
pub use storage::{KeyValueStore, MemoryStore};
