//! Integration tests for the parking availability REST API
//!
//! These tests drive the complete router:
//! - Stateless availability resolution and duration formatting
//! - Merchant zone configuration
//! - Booking creation and conflict detection
//! - Windowed availability queries
//! - Error handling

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use parking_slots_rust::parking::AppState;
use parking_slots_rust::router::create_app_router;

/// Helper function to create a test app instance
fn create_test_app() -> axum::Router {
    let state = Arc::new(AppState::new());
    create_app_router(state)
}

/// Helper function to send a request and get the JSON response
async fn send_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

/// Configures merchant `m-1` with zones B (2 slots) then A (3 slots)
async fn configure_merchant(app: &axum::Router) {
    let zones = json!({
        "B": { "count": 2, "price": 4.5 },
        "A": { "count": 3, "price": 2.0 }
    });
    let (status, _) = send_request(app, "PUT", "/merchants/m-1/zones", Some(zones)).await;
    assert_eq!(status, StatusCode::OK);
}

fn booking(slot: &str, from: &str, to: &str) -> Value {
    json!({ "rentedSlot": slot, "rentFrom": from, "rentTo": to })
}

#[tokio::test]
async fn test_stateless_availability() {
    let app = create_test_app();

    let payload = json!({
        "zones": { "A": { "count": 5, "price": 10.0 } },
        "bookedSlots": [
            booking("A 003", "2024-05-01T08:00:00Z", "2024-05-01T10:00:00Z"),
            booking("bad", "2024-05-01T08:00:00Z", "2024-05-01T10:00:00Z"),
            booking("A 999", "2024-05-01T08:00:00Z", "2024-05-01T10:00:00Z")
        ]
    });

    let (status, body) = send_request(&app, "POST", "/availability", Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    let a = &body["parkingData"]["A"];
    assert_eq!(a["availableSpots"], 4);
    assert_eq!(a["price"], 10.0);
    assert_eq!(a["spots"].as_array().unwrap().len(), 5);
    assert_eq!(a["spots"][2], json!({ "id": "A 003", "isOccupied": true }));
    assert_eq!(
        body["availableSlots"],
        json!(["A 001", "A 002", "A 004", "A 005"])
    );
}

#[tokio::test]
async fn test_stateless_availability_keeps_zone_order() {
    let app = create_test_app();

    let payload = json!({
        "zones": {
            "B": { "count": 1, "price": 1.0 },
            "A": { "count": 1, "price": 1.0 }
        }
    });

    let (status, body) = send_request(&app, "POST", "/availability", Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availableSlots"], json!(["B 001", "A 001"]));
}

#[tokio::test]
async fn test_stateless_availability_rejects_invalid_configuration() {
    let app = create_test_app();

    let payload = json!({
        "zones": { "A": { "count": 2, "price": -1.0 } }
    });

    let (status, body) = send_request(&app, "POST", "/availability", Some(payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_CONFIGURATION");
}

#[tokio::test]
async fn test_zone_capacity_above_999_is_rejected() {
    let app = create_test_app();

    let zones = json!({ "A": { "count": 1000, "price": 1.0 } });

    let payload = json!({ "zones": zones.clone() });
    let (status, body) = send_request(&app, "POST", "/availability", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_CONFIGURATION");

    let (status, body) = send_request(&app, "PUT", "/merchants/m-1/zones", Some(zones)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_CONFIGURATION");

    let (status, _) = send_request(&app, "GET", "/merchants/m-1/zones", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_last_advertised_slot_can_be_booked() {
    let app = create_test_app();

    let zones = json!({ "A": { "count": 999, "price": 1.0 } });
    send_request(&app, "PUT", "/merchants/m-1/zones", Some(zones)).await;

    let (_, body) = send_request(
        &app,
        "GET",
        "/merchants/m-1/availability?from=2024-05-01T08:00:00Z&to=2024-05-01T10:00:00Z",
        None,
    )
    .await;
    let last = body["availableSlots"]
        .as_array()
        .unwrap()
        .last()
        .unwrap()
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(last, "A 999");

    let payload = booking(&last, "2024-05-01T08:00:00Z", "2024-05-01T10:00:00Z");
    let (status, _) = send_request(&app, "POST", "/merchants/m-1/bookings", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_duration() {
    let app = create_test_app();

    let payload = json!({
        "start": "2024-05-01T08:00:00Z",
        "end": "2024-05-02T09:30:00Z"
    });

    let (status, body) = send_request(&app, "POST", "/duration", Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "1 day 1 hour 30 minutes");
}

#[tokio::test]
async fn test_zone_configuration_round_trip() {
    let app = create_test_app();
    configure_merchant(&app).await;

    let (status, body) = send_request(&app, "GET", "/merchants/m-1/zones", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["B"]["count"], 2);
    assert_eq!(body["A"]["price"], 2.0);
}

#[tokio::test]
async fn test_put_zones_response() {
    let app = create_test_app();

    let zones = json!({ "C": { "count": 1, "price": 3.0 } });
    let (status, body) = send_request(&app, "PUT", "/merchants/m-7/zones", Some(zones)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "updated");
    assert_eq!(body["merchantId"], "m-7");
    assert_eq!(body["zones"]["C"]["count"], 1);
}

#[tokio::test]
async fn test_unknown_merchant() {
    let app = create_test_app();

    let (status, body) = send_request(&app, "GET", "/merchants/ghost/zones", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UNKNOWN_MERCHANT");
}

#[tokio::test]
async fn test_booking_flow() {
    let app = create_test_app();
    configure_merchant(&app).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/merchants/m-1/bookings",
        Some(booking(
            "A 002",
            "2024-05-01T08:00:00Z",
            "2024-05-01T10:00:00Z",
        )),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["bookingId"].is_string());
    assert_eq!(body["rentedSlot"], "A 002");

    let (status, body) = send_request(
        &app,
        "GET",
        "/merchants/m-1/availability?from=2024-05-01T09:00:00Z&to=2024-05-01T12:00:00Z",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parkingData"]["A"]["availableSpots"], 2);
    assert_eq!(body["parkingData"]["A"]["spots"][1]["isOccupied"], true);
    assert_eq!(
        body["availableSlots"],
        json!(["B 001", "B 002", "A 001", "A 003"])
    );

    // The booking ends before this window starts.
    let (_, body) = send_request(
        &app,
        "GET",
        "/merchants/m-1/availability?from=2024-05-01T10:00:00Z&to=2024-05-01T12:00:00Z",
        None,
    )
    .await;
    assert_eq!(body["parkingData"]["A"]["availableSpots"], 3);
}

#[tokio::test]
async fn test_double_booking_conflict() {
    let app = create_test_app();
    configure_merchant(&app).await;

    let first = booking("B 001", "2024-05-01T08:00:00Z", "2024-05-01T10:00:00Z");
    let (status, _) = send_request(&app, "POST", "/merchants/m-1/bookings", Some(first)).await;
    assert_eq!(status, StatusCode::CREATED);

    let second = booking("B 001", "2024-05-01T09:00:00Z", "2024-05-01T11:00:00Z");
    let (status, body) =
        send_request(&app, "POST", "/merchants/m-1/bookings", Some(second)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SLOT_UNAVAILABLE");
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let app = create_test_app();
    configure_merchant(&app).await;

    let cases = [
        ("A3", "INVALID_SLOT_ID"),
        ("Z 001", "UNKNOWN_ZONE"),
        ("A 004", "SLOT_OUT_OF_RANGE"),
    ];
    for (slot, code) in cases {
        let payload = booking(slot, "2024-05-01T08:00:00Z", "2024-05-01T10:00:00Z");
        let (status, body) =
            send_request(&app, "POST", "/merchants/m-1/bookings", Some(payload)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{slot}");
        assert_eq!(body["code"], code, "{slot}");
    }

    let reversed = booking("A 001", "2024-05-01T10:00:00Z", "2024-05-01T08:00:00Z");
    let (status, body) =
        send_request(&app, "POST", "/merchants/m-1/bookings", Some(reversed)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_WINDOW");
}

#[tokio::test]
async fn test_availability_requires_window() {
    let app = create_test_app();
    configure_merchant(&app).await;

    let (status, _) = send_request(&app, "GET", "/merchants/m-1/availability", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/availability")
        .header("content-type", "application/json")
        .body(Body::from("invalid json {{{"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_merchants_are_isolated() {
    let app = create_test_app();
    configure_merchant(&app).await;

    let zones = json!({ "A": { "count": 3, "price": 2.0 } });
    send_request(&app, "PUT", "/merchants/m-2/zones", Some(zones)).await;

    let payload = booking("A 001", "2024-05-01T08:00:00Z", "2024-05-01T10:00:00Z");
    send_request(&app, "POST", "/merchants/m-1/bookings", Some(payload)).await;

    let (status, body) = send_request(
        &app,
        "GET",
        "/merchants/m-2/availability?from=2024-05-01T08:00:00Z&to=2024-05-01T10:00:00Z",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parkingData"]["A"]["availableSpots"], 3);
}
