use crate::state::AppState;
use axum::Router;

pub mod draft;
pub mod dto;
pub mod handlers;
pub mod pricing;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use repo::{BookingRepository, MemoryBookingRepository, SqliteBookingRepository};

pub fn router() -> Router<AppState> {
    handlers::booking_routes()
}
