//! HTTP API integration tests.
//!
//! Drive the router end to end over the in-memory store with a fixed clock
//! (2025-01-01T09:00:00Z).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum_test::TestServer;
use chrono::Duration;
use hotel_booking_core::booking::{Booking, BookingReceipt, BookingStatus};
use hotel_booking_core::catalog::{Hotel, Room};
use hotel_booking_core::pricing::Quote;
use hotel_booking_core::environment::Clock;
use hotel_booking_core::{Money, UserId};
use hotel_booking_runtime::metrics::MetricsExporter;
use hotel_booking_runtime::retry::RetryPolicy;
use hotel_booking_runtime::BookingConfig;
use hotel_booking_testing::BookingHarness;
use hotel_booking_web::{router, AppState};
use http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

fn server(harness: &BookingHarness) -> TestServer {
    let state = AppState::new(
        harness.env.clone(),
        BookingConfig::default(),
        Arc::new(MetricsExporter::new()),
        RetryPolicy::none(),
    );
    TestServer::new(router(state, std::time::Duration::from_secs(30))).unwrap()
}

fn user_header(user: UserId) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&user.to_string()).unwrap(),
    )
}

fn admin_role() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-role"),
        HeaderValue::from_static("admin"),
    )
}

fn booking_body(harness: &BookingHarness, room: &Room, nights: i64) -> Value {
    let check_in = harness.today() + Duration::days(7);
    json!({
        "room_id": room.id,
        "check_in": check_in,
        "check_out": check_in + Duration::days(nights),
        "guests": 2,
        "guest_info": {
            "full_name": "Omar Al-Farsi",
            "email": "omar@example.com",
            "phone": "+966 55 123 4567"
        }
    })
}

// ============================================================================
// Health and catalog
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let harness = BookingHarness::new();
    let server = server(&harness);

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_metrics_unavailable_without_recorder() {
    let harness = BookingHarness::new();
    let server = server(&harness);

    server
        .get("/metrics")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_hotel_listing_filters_and_lookup() {
    let harness = BookingHarness::new();
    let (hotel, room) = harness.seed_room(10_000, 2).await;
    let server = server(&harness);
    let (name, value) = user_header(UserId::new());
    let (role, role_value) = admin_role();

    let drafts: Vec<Hotel> = server
        .get("/api/hotels")
        .add_header(name.clone(), value.clone())
        .add_header(role.clone(), role_value.clone())
        .add_query_param("published", "false")
        .add_query_param("category", "RESORT")
        .await
        .json();
    assert_eq!(drafts.len(), 1);

    let published: Vec<Hotel> = server
        .get("/api/hotels")
        .add_query_param("published", "true")
        .await
        .json();
    assert!(published.is_empty());

    let fetched: Hotel = server
        .get(&format!("/api/hotels/{}", hotel.id))
        .add_header(name.clone(), value.clone())
        .add_header(role.clone(), role_value.clone())
        .await
        .json();
    assert_eq!(fetched.id, hotel.id);

    let rooms: Vec<Room> = server
        .get(&format!("/api/hotels/{}/rooms", hotel.id))
        .add_header(name, value)
        .add_header(role, role_value)
        .await
        .json();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, room.id);
}

#[tokio::test]
async fn test_public_callers_only_see_published_hotels() {
    let harness = BookingHarness::new();
    let (draft, _) = harness.seed_room(10_000, 1).await;
    let (live, _) = harness.seed_room(12_000, 1).await;
    let mut publish = live.clone();
    publish.published = true;
    harness.catalog.save_hotel(publish).await.unwrap();
    let server = server(&harness);

    let listed: Vec<Hotel> = server.get("/api/hotels").await.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, live.id);

    // Asking for drafts does not reveal them
    let listed: Vec<Hotel> = server
        .get("/api/hotels")
        .add_query_param("published", "false")
        .await
        .json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, live.id);

    server
        .get(&format!("/api/hotels/{}", draft.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&format!("/api/hotels/{}/rooms", draft.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let (name, value) = user_header(UserId::new());
    server
        .get(&format!("/api/hotels/{}", draft.id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .get(&format!("/api/hotels/{}/rooms", live.id))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_inventory_adjustment_over_http() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);
    let (name, value) = user_header(UserId::new());
    let (role, role_value) = admin_role();
    let path = format!("/api/rooms/{}/inventory", room.id);

    server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({"delta": 2}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let body: Value = server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .add_header(role.clone(), role_value.clone())
        .json(&json!({"delta": 2}))
        .await
        .json();
    assert_eq!(body["available"], 3);

    let response = server
        .post(&path)
        .add_header(name, value)
        .add_header(role, role_value)
        .json(&json!({"delta": -4}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(harness.store.room_available(room.id), Some(3));
}

#[tokio::test]
async fn test_unknown_room_is_404() {
    let harness = BookingHarness::new();
    let server = server(&harness);

    let response = server
        .get(&format!("/api/rooms/{}", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

// ============================================================================
// Quotes
// ============================================================================

#[tokio::test]
async fn test_quote_prices_stay() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);

    let quote: Quote = server
        .post("/api/quotes")
        .json(&booking_body(&harness, &room, 3))
        .await
        .json();
    assert_eq!(quote.nights, 3);
    assert_eq!(quote.total, Money::from_cents(30_000));
    assert_eq!(harness.store.room_available(room.id), Some(1));
}

#[tokio::test]
async fn test_invalid_dates_are_422() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);

    let response = server
        .post("/api/quotes")
        .json(&booking_body(&harness, &room, -2))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_DATE_RANGE");
}

// ============================================================================
// Bookings
// ============================================================================

#[tokio::test]
async fn test_booking_requires_user() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);

    server
        .post("/api/bookings")
        .json(&booking_body(&harness, &room, 3))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(harness.store.room_available(room.id), Some(1));
}

#[tokio::test]
async fn test_booking_flow_over_http() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);
    let guest = UserId::new();
    let (name, value) = user_header(guest);

    // Book the last unit
    let response = server
        .post("/api/bookings")
        .add_header(name.clone(), value.clone())
        .json(&booking_body(&harness, &room, 3))
        .await;
    response.assert_status(StatusCode::CREATED);
    let receipt: BookingReceipt = response.json();
    assert_eq!(receipt.status, BookingStatus::Pending);
    assert_eq!(receipt.total_price, Money::from_cents(30_000));
    assert_eq!(harness.store.room_available(room.id), Some(0));

    // Sold out
    let response = server
        .post("/api/bookings")
        .add_header(name.clone(), value.clone())
        .json(&booking_body(&harness, &room, 3))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "ROOM_UNAVAILABLE");

    // Owner can read it, lookup by confirmation is case-insensitive
    let booking: Booking = server
        .get(&format!("/api/bookings/{}", receipt.id))
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(booking.user_id, guest);

    let by_number: BookingReceipt = server
        .get(&format!(
            "/api/bookings/confirmation/{}",
            receipt.confirmation_number.as_str().to_ascii_lowercase()
        ))
        .await
        .json();
    assert_eq!(by_number.id, receipt.id);

    let mine: Vec<Booking> = server
        .get("/api/bookings")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn test_other_users_cannot_read_booking() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);
    let (owner, owner_value) = user_header(UserId::new());
    let (stranger, stranger_value) = user_header(UserId::new());

    let receipt: BookingReceipt = server
        .post("/api/bookings")
        .add_header(owner, owner_value)
        .json(&booking_body(&harness, &room, 2))
        .await
        .json();

    server
        .get(&format!("/api/bookings/{}", receipt.id))
        .add_header(stranger, stranger_value)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_status_change_requires_admin_and_releases_inventory() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);
    let (name, value) = user_header(UserId::new());

    let receipt: BookingReceipt = server
        .post("/api/bookings")
        .add_header(name.clone(), value.clone())
        .json(&booking_body(&harness, &room, 2))
        .await
        .json();
    let path = format!("/api/bookings/{}/status", receipt.id);

    server
        .post(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({"status": "cancelled"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let (role, role_value) = admin_role();
    let (admin, admin_value) = user_header(UserId::new());
    let cancelled: Booking = server
        .post(&path)
        .add_header(admin.clone(), admin_value.clone())
        .add_header(role.clone(), role_value.clone())
        .json(&json!({"status": "cancelled"}))
        .await
        .json();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(harness.store.room_available(room.id), Some(1));

    // Terminal
    let response = server
        .post(&path)
        .add_header(admin, admin_value)
        .add_header(role, role_value)
        .json(&json!({"status": "confirmed"}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(harness.store.room_available(room.id), Some(1));
}

// ============================================================================
// Offers
// ============================================================================

#[tokio::test]
async fn test_offer_creation_and_validation() {
    let harness = BookingHarness::new();
    let (_, room) = harness.seed_room(10_000, 1).await;
    let server = server(&harness);
    let (name, value) = user_header(UserId::new());
    let (role, role_value) = admin_role();
    let now = harness.clock.now();

    let offer = |basis_points: u32| {
        json!({
            "title": {"en": "Winter deal", "ar": "عرض الشتاء"},
            "scope": {"type": "room", "id": room.id},
            "discount": {"type": "percentage", "value": basis_points},
            "valid_from": now - Duration::days(1),
            "valid_to": now + Duration::days(30),
        })
    };

    let response = server
        .post("/api/offers")
        .add_header(name.clone(), value.clone())
        .add_header(role.clone(), role_value.clone())
        .json(&offer(15_000))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_OFFER");

    server
        .post("/api/offers")
        .add_header(name, value)
        .add_header(role, role_value)
        .json(&offer(1_000))
        .await
        .assert_status(StatusCode::CREATED);

    let quote: Quote = server
        .post("/api/quotes")
        .json(&booking_body(&harness, &room, 3))
        .await
        .json();
    assert_eq!(quote.discount_applied, Money::from_cents(3_000));
    assert_eq!(quote.total, Money::from_cents(27_000));
}
