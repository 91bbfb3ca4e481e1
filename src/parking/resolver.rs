//! Availability Resolver
//!
//! Reconciles a merchant's zone configuration with the bookings that cover a
//! queried window and produces the per-zone slot grid plus the flat list of
//! free slot identifiers.

use super::{
    models::{
        BookedSlotEntry, BookingWindow, ParkingSection, ParkingSpot, ResolvedAvailability,
        ZoneConfig, ZoneMap, ZoneSettings,
    },
    slot_id::{decode_slot_id, encode_slot_id},
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Supplies the bookings relevant to a merchant and window.
///
/// Implemented by the in-memory store and by any
/// `Fn(&str, &BookingWindow) -> Vec<BookedSlotEntry>`, so callers can inject a
/// fetch function or hand over pre-fetched data.
pub trait BookingSource {
    fn booked_slots(&self, merchant_id: &str, window: &BookingWindow) -> Vec<BookedSlotEntry>;
}

impl<F> BookingSource for F
where
    F: Fn(&str, &BookingWindow) -> Vec<BookedSlotEntry>,
{
    fn booked_slots(&self, merchant_id: &str, window: &BookingWindow) -> Vec<BookedSlotEntry> {
        self(merchant_id, window)
    }
}

/// Resolves availability with bookings pulled from `source`.
pub fn resolve_for_window<S: BookingSource + ?Sized>(
    source: &S,
    merchant_id: &str,
    zone_config: &ZoneConfig,
    window: &BookingWindow,
) -> ResolvedAvailability {
    let booked = source.booked_slots(merchant_id, window);
    debug!(
        "Resolving availability for {} with {} booking(s)",
        merchant_id,
        booked.len()
    );
    resolve_availability(zone_config, &booked)
}

/// Builds the slot grid for every configured zone.
///
/// Every entry in `booked_slots` counts as occupying its slot for the whole
/// queried window. Entries that do not decode, that name an unconfigured zone
/// or that point past a zone's capacity are logged and otherwise ignored;
/// they never prevent the remaining zones from resolving.
pub fn resolve_availability(
    zone_config: &ZoneConfig,
    booked_slots: &[BookedSlotEntry],
) -> ResolvedAvailability {
    let occupied = occupied_by_zone(booked_slots);

    for zone in occupied.keys() {
        if zone_config.get(zone).is_none() {
            warn!("Ignoring bookings for unconfigured zone {}", zone);
        }
    }

    let mut parking_data = ZoneMap::new();
    let mut available_slots = Vec::new();

    for (zone, settings) in zone_config.iter() {
        let taken = occupied.get(zone).map(Vec::as_slice).unwrap_or(&[]);
        let section = walk_zone(zone, settings, taken, &mut available_slots);
        parking_data.insert(zone, section);
    }

    ResolvedAvailability {
        parking_data,
        available_slots,
    }
}

/// Sorted, deduplicated occupied slot numbers per zone
fn occupied_by_zone(booked_slots: &[BookedSlotEntry]) -> BTreeMap<String, Vec<u32>> {
    let mut occupied: BTreeMap<String, Vec<u32>> = BTreeMap::new();

    for entry in booked_slots {
        match decode_slot_id(&entry.rented_slot) {
            Some(id) => occupied.entry(id.zone).or_default().push(id.slot),
            None => warn!(
                "Skipping booking with malformed slot identifier {:?}",
                entry.rented_slot
            ),
        }
    }

    // A slot may be booked several times inside one window.
    for slots in occupied.values_mut() {
        slots.sort_unstable();
        slots.dedup();
    }

    occupied
}

/// Walks `1..=count` with a cursor over the sorted occupied numbers.
fn walk_zone(
    zone: &str,
    settings: &ZoneSettings,
    occupied: &[u32],
    available_slots: &mut Vec<String>,
) -> ParkingSection {
    let mut spots = Vec::with_capacity(settings.count as usize);
    let mut cursor = 0;
    let mut consumed = 0;

    for slot in 1..=settings.count {
        // Slot 000 sorts before 1 and must not stall the cursor.
        while cursor < occupied.len() && occupied[cursor] < slot {
            cursor += 1;
        }

        let id = encode_slot_id(zone, slot);
        let is_occupied = occupied.get(cursor) == Some(&slot);
        if is_occupied {
            cursor += 1;
            consumed += 1;
        } else {
            available_slots.push(id.clone());
        }
        spots.push(ParkingSpot { id, is_occupied });
    }

    let out_of_range = occupied
        .iter()
        .filter(|&&n| n == 0 || n > settings.count)
        .count();
    if out_of_range > 0 {
        warn!(
            "Zone {} has {} booking(s) outside its capacity of {}",
            zone, out_of_range, settings.count
        );
    }

    ParkingSection {
        available_spots: settings.count - consumed,
        spots,
        price: settings.price,
    }
}
