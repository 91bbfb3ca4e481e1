//! Parking State Management
//!
//! In-memory merchant configuration and booking storage. This plays the part
//! of the booking backend: it filters bookings down to a queried window before
//! they reach the resolver, and guards slot uniqueness when bookings are made.

use super::{
    error::ParkingError,
    models::{BookedSlotEntry, Booking, BookingWindow, ResolvedAvailability, ZoneConfig},
    resolver::{resolve_for_window, BookingSource},
    slot_id::SlotId,
};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state containing merchant zones and their bookings
#[derive(Default)]
pub struct AppState {
    /// Zone configuration per merchant id
    pub merchants: DashMap<String, ZoneConfig>,

    /// Bookings per merchant id.
    /// Booking creation holds the entry guard while it checks for overlaps.
    pub bookings: DashMap<String, Vec<Booking>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores the zone configuration of `merchant_id`
    pub fn upsert_zones(&self, merchant_id: &str, zones: ZoneConfig) -> Result<(), ParkingError> {
        zones.validate()?;
        info!(
            "Merchant {} configured with {} zone(s)",
            merchant_id,
            zones.len()
        );
        self.merchants.insert(merchant_id.to_string(), zones);
        Ok(())
    }

    pub fn zones(&self, merchant_id: &str) -> Result<ZoneConfig, ParkingError> {
        self.merchants
            .get(merchant_id)
            .map(|zones| zones.clone())
            .ok_or_else(|| ParkingError::UnknownMerchant(merchant_id.to_string()))
    }

    /// Reserves a slot for a window.
    ///
    /// Fails when the identifier is malformed, names an unknown zone or a slot
    /// past its capacity, when the window is empty, or when another booking of
    /// the same slot overlaps it.
    pub fn create_booking(
        &self,
        merchant_id: &str,
        entry: BookedSlotEntry,
    ) -> Result<Booking, ParkingError> {
        let zones = self.zones(merchant_id)?;
        let slot_id: SlotId = entry.rented_slot.parse()?;

        let settings = zones
            .get(&slot_id.zone)
            .ok_or_else(|| ParkingError::UnknownZone {
                merchant_id: merchant_id.to_string(),
                zone: slot_id.zone.clone(),
            })?;
        if slot_id.slot == 0 || slot_id.slot > settings.count {
            return Err(ParkingError::SlotOutOfRange {
                slot_id: slot_id.to_string(),
                count: settings.count,
            });
        }

        let window = entry.window();
        if !window.is_valid() {
            return Err(ParkingError::InvalidWindow);
        }

        let mut bookings = self.bookings.entry(merchant_id.to_string()).or_default();
        let taken = bookings
            .iter()
            .any(|b| b.entry.rented_slot == entry.rented_slot && b.entry.window().overlaps(&window));
        if taken {
            return Err(ParkingError::SlotUnavailable(entry.rented_slot));
        }

        let booking = Booking {
            booking_id: Uuid::new_v4(),
            entry,
        };
        bookings.push(booking.clone());
        info!(
            "Booked {} for merchant {} ({})",
            booking.entry.rented_slot, merchant_id, booking.booking_id
        );

        Ok(booking)
    }

    /// Resolves the slot grid of `merchant_id` for `window`
    pub fn resolve_for_merchant(
        &self,
        merchant_id: &str,
        window: &BookingWindow,
    ) -> Result<ResolvedAvailability, ParkingError> {
        if !window.is_valid() {
            return Err(ParkingError::InvalidWindow);
        }
        let zones = self.zones(merchant_id)?;
        Ok(resolve_for_window(self, merchant_id, &zones, window))
    }
}

impl BookingSource for AppState {
    fn booked_slots(&self, merchant_id: &str, window: &BookingWindow) -> Vec<BookedSlotEntry> {
        self.bookings
            .get(merchant_id)
            .map(|bookings| {
                bookings
                    .iter()
                    .filter(|b| b.entry.window().overlaps(window))
                    .map(|b| b.entry.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
