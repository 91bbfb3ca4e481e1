//! REST API handlers for parking availability
//!
//! This module implements HTTP endpoints for merchant zone configuration,
//! booking creation, availability queries and duration formatting.

use super::{
    duration::format_duration,
    error::ParkingError,
    models::*,
    resolver::resolve_availability,
    state::SharedState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

/// Creates routes for parking-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/availability", post(resolve))
        .route("/duration", post(duration))
        .route(
            "/merchants/:merchant_id/zones",
            put(put_zones).get(get_zones),
        )
        .route("/merchants/:merchant_id/bookings", post(create_booking))
        .route(
            "/merchants/:merchant_id/availability",
            get(merchant_availability),
        )
}

/// Endpoint: POST /availability
/// Resolves availability from a zone configuration and booking list supplied by the caller.
async fn resolve(
    Json(payload): Json<AvailabilityInput>,
) -> Result<Json<ResolvedAvailability>, ParkingError> {
    payload.zones.validate()?;
    Ok(Json(resolve_availability(
        &payload.zones,
        &payload.booked_slots,
    )))
}

/// Endpoint: POST /duration
async fn duration(Json(payload): Json<DurationInput>) -> Json<DurationResponse> {
    Json(DurationResponse {
        text: format_duration(payload.start, payload.end),
    })
}

/// Endpoint: PUT /merchants/:merchant_id/zones
/// Replaces the merchant's zone configuration.
async fn put_zones(
    State(state): State<SharedState>,
    Path(merchant_id): Path<String>,
    Json(zones): Json<ZoneConfig>,
) -> Result<Json<ZonesResponse>, ParkingError> {
    state.upsert_zones(&merchant_id, zones.clone())?;

    Ok(Json(ZonesResponse {
        status: "updated".to_string(),
        merchant_id,
        zones,
    }))
}

/// Endpoint: GET /merchants/:merchant_id/zones
async fn get_zones(
    State(state): State<SharedState>,
    Path(merchant_id): Path<String>,
) -> Result<Json<ZoneConfig>, ParkingError> {
    state.zones(&merchant_id).map(Json)
}

/// Endpoint: POST /merchants/:merchant_id/bookings
/// Books one slot, typically picked from `availableSlots`.
async fn create_booking(
    State(state): State<SharedState>,
    Path(merchant_id): Path<String>,
    Json(entry): Json<BookedSlotEntry>,
) -> Result<impl IntoResponse, ParkingError> {
    let booking = state.create_booking(&merchant_id, entry)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Endpoint: GET /merchants/:merchant_id/availability?from=..&to=..
async fn merchant_availability(
    State(state): State<SharedState>,
    Path(merchant_id): Path<String>,
    Query(window): Query<BookingWindow>,
) -> Result<Json<ResolvedAvailability>, ParkingError> {
    let resolved = state.resolve_for_merchant(&merchant_id, &window)?;
    info!(
        "Availability for {}: {} free slot(s)",
        merchant_id,
        resolved.available_slots.len()
    );
    Ok(Json(resolved))
}
