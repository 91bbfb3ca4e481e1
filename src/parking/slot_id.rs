//! Slot Identifier Codec
//!
//! A slot identifier is the zone label, a single space and the slot number
//! zero-padded to three digits (`"A 007"`). It is the only token used to
//! address a physical slot between the client, the resolver and the backend.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Width of the zero-padded numeric part
pub const SLOT_DIGITS: usize = 3;

/// Highest slot number that still has a canonical identifier
pub const MAX_SLOT_NUMBER: u32 = 999;

/// Decoded form of a slot identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    /// Zone label (one or more uppercase ASCII letters)
    pub zone: String,

    /// Slot number within the zone
    pub slot: u32,
}

/// Returned by [`SlotId::from_str`] when the input is not a canonical identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid slot identifier {0:?}, expected \"<ZONE> <NNN>\"")]
pub struct ParseSlotIdError(pub String);

/// Builds the canonical identifier for `slot_number` in `zone`.
///
/// Numbers wider than three digits are emitted unpadded (`"A 1234"`). Such an
/// identifier does not decode again, so zone configurations are capped at
/// [`MAX_SLOT_NUMBER`] slots.
pub fn encode_slot_id(zone: &str, slot_number: u32) -> String {
    format!("{} {:0width$}", zone, slot_number, width = SLOT_DIGITS)
}

/// Parses `"<ZONE> <NNN>"`, returning `None` for anything else.
///
/// Accepts exactly one or more uppercase ASCII letters, one space and three
/// ASCII digits. Leading zeros are dropped from the returned slot number.
pub fn decode_slot_id(id: &str) -> Option<SlotId> {
    let (zone, digits) = id.split_once(' ')?;

    if zone.is_empty() || !zone.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    if digits.len() != SLOT_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let slot = digits.parse().ok()?;
    Some(SlotId {
        zone: zone.to_string(),
        slot,
    })
}

impl SlotId {
    pub fn new(zone: impl Into<String>, slot: u32) -> Self {
        Self {
            zone: zone.into(),
            slot,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_slot_id(&self.zone, self.slot))
    }
}

impl FromStr for SlotId {
    type Err = ParseSlotIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_slot_id(s).ok_or_else(|| ParseSlotIdError(s.to_string()))
    }
}

impl Serialize for SlotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
