//! Rideflex car-rental marketplace: account service, fleet catalog, booking
//! flow and pricing.

pub mod accounts;
pub mod app;
pub mod bookings;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
