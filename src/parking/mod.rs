//! Parking Domain Module
//!
//! This module contains the slot availability logic and its service surface:
//! - Slot identifier codec (`"A 007"` <-> zone and slot number)
//! - Availability resolver (zone configuration + bookings -> slot grid)
//! - Duration formatter
//! - Domain models, errors, in-memory state and REST handlers

pub mod duration;
pub mod error;
pub mod handlers;
pub mod models;
pub mod resolver;
pub mod slot_id;
pub mod state;

// Re-export commonly used types for convenience
pub use duration::format_duration;
pub use error::ParkingError;
pub use handlers::routes;
pub use resolver::{resolve_availability, resolve_for_window, BookingSource};
pub use slot_id::{decode_slot_id, encode_slot_id, SlotId};
pub use state::{AppState, SharedState};
