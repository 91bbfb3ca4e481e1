//! Parking Domain Errors
//!
//! Failures raised by configuration validation and booking creation, plus
//! their translation into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParkingError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown merchant: {0}")]
    UnknownMerchant(String),

    #[error("Zone {zone} is not configured for merchant {merchant_id}")]
    UnknownZone { merchant_id: String, zone: String },

    #[error("Slot {slot_id} is outside zone capacity {count}")]
    SlotOutOfRange { slot_id: String, count: u32 },

    #[error(transparent)]
    InvalidSlotId(#[from] super::slot_id::ParseSlotIdError),

    #[error("Invalid window: rentFrom must be before rentTo")]
    InvalidWindow,

    #[error("Slot {0} is already booked for an overlapping window")]
    SlotUnavailable(String),
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable code for programmatic handling
    pub code: &'static str,

    /// Human-readable description
    pub message: String,
}

impl ParkingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ParkingError::UnknownMerchant(_) => StatusCode::NOT_FOUND,
            ParkingError::SlotUnavailable(_) => StatusCode::CONFLICT,
            ParkingError::InvalidConfiguration(_)
            | ParkingError::UnknownZone { .. }
            | ParkingError::SlotOutOfRange { .. }
            | ParkingError::InvalidSlotId(_)
            | ParkingError::InvalidWindow => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParkingError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            ParkingError::UnknownMerchant(_) => "UNKNOWN_MERCHANT",
            ParkingError::UnknownZone { .. } => "UNKNOWN_ZONE",
            ParkingError::SlotOutOfRange { .. } => "SLOT_OUT_OF_RANGE",
            ParkingError::InvalidSlotId(_) => "INVALID_SLOT_ID",
            ParkingError::InvalidWindow => "INVALID_WINDOW",
            ParkingError::SlotUnavailable(_) => "SLOT_UNAVAILABLE",
        }
    }
}

impl IntoResponse for ParkingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
