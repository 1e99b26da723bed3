//! HTTP API tests driving the router with an in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tourbook_core::BookingService;
use tourbook_testing::fixtures::{self, DESERT_SAFARI, KAYAK_SLOT, LAST_SPOT_SLOT, MORNING_SLOT};
use tourbook_testing::{test_clock, InMemoryBookingStore};
use tourbook_web::{build_router, AppState, REQUEST_ID_HEADER};
use tower::ServiceExt;

fn app() -> (Router, InMemoryBookingStore) {
    let clock = test_clock();
    let store = fixtures::seeded_store(&clock);
    let service = BookingService::new(Arc::new(store.clone()), Arc::new(clock));
    (build_router(AppState::new(service)), store)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn checkout(slot: i64, guests: i64, promo: Option<&str>) -> Value {
    json!({
        "experienceId": DESERT_SAFARI.get(),
        "slotId": slot,
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+971500000000",
        "guests": guests,
        "promoCode": promo,
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let (app, store) = app();
    let (status, body) = send(app.clone(), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    store.set_unavailable(true);
    let (status, body) = send(app, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let (app, _) = app();
    let (status, body) = send(app, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let (app, _) = app();

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");

    let response = app.oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_list_experiences_uses_camel_case() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/experiences")).await;

    assert_eq!(status, StatusCode::OK);
    let experiences = body.as_array().unwrap();
    assert_eq!(experiences.len(), 3);

    let safari = experiences
        .iter()
        .find(|e| e["id"] == DESERT_SAFARI.get())
        .unwrap();
    assert_eq!(safari["price"], 89.0);
    assert!(safari.get("imageUrl").is_some());
    assert!(safari.get("createdAt").is_some());
}

#[tokio::test]
async fn test_get_experience() {
    let (app, _) = app();

    let (status, body) = send(app.clone(), get("/api/experiences/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Desert Safari");

    let (status, body) = send(app.clone(), get("/api/experiences/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Experience not found");
    assert_eq!(body["success"], false);

    let (status, body) = send(app, get("/api/experiences/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid experience ID");
}

#[tokio::test]
async fn test_list_slots_formats_date_and_time() {
    let (app, _) = app();
    let (status, body) = send(app.clone(), get("/api/experiences/1/slots")).await;

    assert_eq!(status, StatusCode::OK);
    let slots = body.as_array().unwrap();
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0]["id"], MORNING_SLOT.get());
    assert_eq!(slots[0]["date"], "2026-03-16");
    assert_eq!(slots[0]["time"], "09:00 AM");
    assert_eq!(slots[0]["availableSpots"], 8);
    assert_eq!(slots[0]["experienceId"], DESERT_SAFARI.get());
    assert_eq!(slots[1]["time"], "04:30 PM");

    let (status, body) = send(app.clone(), get("/api/experiences/999/slots")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(app, get("/api/experiences/x/slots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_booking_and_fetch_it() {
    let (app, store) = app();
    let (status, body) = send(
        app.clone(),
        post_json("/api/bookings", &checkout(MORNING_SLOT.get(), 2, Some("SAVE10"))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking created successfully");
    assert_eq!(body["total"], 168.0);
    assert_eq!(store.slot(MORNING_SLOT).unwrap().available_spots, 6);

    let booking_id = body["bookingId"].as_str().unwrap().to_string();
    let (status, body) = send(app, get(&format!("/api/bookings/{booking_id}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookingId"], booking_id);
    assert_eq!(body["guests"], 2);
    assert_eq!(body["promoCode"], "SAVE10");
    assert_eq!(body["discount"], 10.0);
    assert_eq!(body["totalAmount"], 168.0);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["experience"]["title"], "Desert Safari");
    assert_eq!(body["slot"]["id"], MORNING_SLOT.get());
}

#[tokio::test]
async fn test_validation_errors_are_itemized() {
    let (app, store) = app();
    let body = json!({
        "experienceId": "1",
        "slotId": 11,
        "name": "  ",
        "email": "not-an-email",
        "guests": 0,
    });
    let (status, body) = send(app, post_json("/api/bookings", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["details"],
        json!([
            "Name is required",
            "Valid email is required",
            "Valid experience ID is required",
            "At least 1 guest is required",
        ])
    );
    assert_eq!(store.booking_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_capacity_and_missing_slot() {
    let (app, store) = app();

    let (status, body) = send(
        app.clone(),
        post_json("/api/bookings", &checkout(LAST_SPOT_SLOT.get(), 2, None)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_CAPACITY");
    assert_eq!(body["message"], "Only 1 spots available");
    assert_eq!(store.slot(LAST_SPOT_SLOT).unwrap().available_spots, 1);

    let (status, body) = send(
        app.clone(),
        post_json("/api/bookings", &checkout(KAYAK_SLOT.get(), 1, None)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Slot not found");

    let (status, body) = send(app, get("/api/bookings/BK0000000000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");
}

#[tokio::test]
async fn test_store_failure_is_opaque_500() {
    let (app, store) = app();
    store.set_unavailable(true);

    let (status, body) = send(app, get("/api/experiences")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(body["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_validate_promo() {
    let (app, _) = app();

    let (status, body) = send(
        app.clone(),
        post_json("/api/promo/validate", &json!({ "code": "save10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "valid": true, "discount": 10.0, "message": "Promo code applied successfully" })
    );

    let (_, body) = send(
        app.clone(),
        post_json("/api/promo/validate", &json!({ "code": "BOGUS" })),
    )
    .await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["discount"], 0.0);
    assert_eq!(body["message"], "Invalid or expired promo code");

    let (status, body) = send(app, post_json("/api/promo/validate", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Promo code is required");
}
