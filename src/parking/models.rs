//! Parking Domain Models
//!
//! This module contains the data structures shared by the resolver, the
//! in-memory booking store and the REST handlers.

use super::{error::ParkingError, slot_id::MAX_SLOT_NUMBER};
use chrono::{DateTime, Utc};
use serde::{
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{fmt, marker::PhantomData};
use uuid::Uuid;

// =============================================================================
// Zone Configuration
// =============================================================================

/// Mapping keyed by zone label that keeps declaration order.
///
/// On the wire it is a plain JSON object; the order of its keys is the order
/// zones are laid out in and the order free slots are listed in. An object
/// that repeats a zone label is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for ZoneMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> ZoneMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `zone`. A replaced zone keeps its original position.
    pub fn insert(&mut self, zone: impl Into<String>, value: V) -> Option<V> {
        let zone = zone.into();
        match self.entries.iter_mut().find(|(z, _)| *z == zone) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((zone, value));
                None
            }
        }
    }

    pub fn get(&self, zone: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(z, _)| z == zone)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(z, v)| (z.as_str(), v))
    }

    pub fn zones(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(z, _)| z.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for ZoneMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ZoneMap::new();
        for (zone, value) in iter {
            map.insert(zone, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for ZoneMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (zone, value) in &self.entries {
            map.serialize_entry(zone, value)?;
        }
        map.end()
    }
}

struct ZoneMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for ZoneMapVisitor<V> {
    type Value = ZoneMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by zone label")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = ZoneMap::new();
        while let Some((zone, value)) = access.next_entry::<String, V>()? {
            if map.get(&zone).is_some() {
                return Err(de::Error::custom(format!("duplicate zone {zone:?}")));
            }
            map.insert(zone, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for ZoneMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ZoneMapVisitor(PhantomData))
    }
}

/// Merchant-declared capacity and hourly price of one zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ZoneSettings {
    /// Number of slots, numbered `1..=count`
    pub count: u32,

    /// Hourly price
    pub price: f64,
}

/// Per-zone capacity configuration of a merchant
pub type ZoneConfig = ZoneMap<ZoneSettings>;

impl ZoneMap<ZoneSettings> {
    /// Rejects configurations that would render wrong availability.
    ///
    /// A zone label must be uppercase ASCII letters and a zone may hold at most
    /// [`MAX_SLOT_NUMBER`] slots, otherwise some of its slot identifiers would
    /// not decode. Prices must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ParkingError> {
        for (zone, settings) in self.iter() {
            if zone.is_empty() || !zone.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(ParkingError::InvalidConfiguration(format!(
                    "zone label {zone:?} must be one or more uppercase letters"
                )));
            }
            if settings.count > MAX_SLOT_NUMBER {
                return Err(ParkingError::InvalidConfiguration(format!(
                    "zone {zone} has {} slots, at most {MAX_SLOT_NUMBER} are supported",
                    settings.count
                )));
            }
            if !settings.price.is_finite() || settings.price < 0.0 {
                return Err(ParkingError::InvalidConfiguration(format!(
                    "zone {zone} has invalid price {}",
                    settings.price
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Bookings
// =============================================================================

/// One existing reservation occupying a slot for an interval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlotEntry {
    /// Slot identifier, e.g. `"A 003"`
    pub rented_slot: String,

    pub rent_from: DateTime<Utc>,

    pub rent_to: DateTime<Utc>,
}

impl BookedSlotEntry {
    pub fn window(&self) -> BookingWindow {
        BookingWindow {
            from: self.rent_from,
            to: self.rent_to,
        }
    }
}

/// Half-open time range `[from, to)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl BookingWindow {
    pub fn is_valid(&self) -> bool {
        self.from < self.to
    }

    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.from < other.to && other.from < self.to
    }
}

/// A stored reservation
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: Uuid,

    #[serde(flatten)]
    pub entry: BookedSlotEntry,
}

// =============================================================================
// Resolved Availability
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: String,
    pub is_occupied: bool,
}

/// Computed grid of one zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSection {
    /// Free slots in this zone
    pub available_spots: u32,

    /// Every slot `1..=count`, in order
    pub spots: Vec<ParkingSpot>,

    pub price: f64,
}

/// Resolver output for a whole merchant
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAvailability {
    pub parking_data: ZoneMap<ParkingSection>,

    /// Free identifiers across zones, zone order first then ascending slot
    pub available_slots: Vec<String>,
}

// =============================================================================
// Request / Response Payloads
// =============================================================================

/// Input for the stateless availability endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInput {
    pub zones: ZoneConfig,

    #[serde(default)]
    pub booked_slots: Vec<BookedSlotEntry>,
}

/// Input for the duration endpoint
#[derive(Debug, Deserialize)]
pub struct DurationInput {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DurationResponse {
    pub text: String,
}

/// Response for zone configuration updates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesResponse {
    pub status: String,
    pub merchant_id: String,
    pub zones: ZoneConfig,
}
