//! Tests for the in-memory store

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use chrono::Duration;
use hotel_booking_core::booking::{
    Booking, BookingFilter, BookingStatus, InventoryEffect, Transition,
};
use hotel_booking_core::catalog::{HotelFilter, Room};
use hotel_booking_core::confirmation::ConfirmationNumber;
use hotel_booking_core::environment::Clock;
use hotel_booking_core::offer::OfferScope;
use hotel_booking_core::store::{BookingStore, CatalogStore, OfferStore, StoreError};
use hotel_booking_core::{BookingId, Money, UserId};
use hotel_booking_testing::{InMemoryStore, fixtures, test_clock};

fn booking_for(room: &Room, number: &str) -> Booking {
    let now = test_clock().now();
    let check_in = test_clock().today() + Duration::days(3);
    Booking {
        id: BookingId::new(),
        confirmation_number: ConfirmationNumber::parse(number).unwrap(),
        user_id: UserId::new(),
        hotel_id: room.hotel_id,
        room_id: room.id,
        offer_id: None,
        check_in,
        check_out: check_in + Duration::days(2),
        guests: 2,
        guest_info: fixtures::guest(),
        add_on_ids: vec![],
        subtotal: Money::from_cents(20_000),
        add_on_total: Money::ZERO,
        discount_applied: Money::ZERO,
        total_price: Money::from_cents(20_000),
        currency: fixtures::usd(),
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

async fn seeded(available: u32) -> (InMemoryStore, Room) {
    let store = InMemoryStore::new();
    let hotel = fixtures::hotel(test_clock().now());
    store.save_hotel(&hotel).await.unwrap();
    let room = fixtures::room(&hotel, 10_000, available);
    store.save_room(&room).await.unwrap();
    (store, room)
}

fn cancel(booking: &Booking, from: BookingStatus) -> Transition {
    Transition {
        booking_id: booking.id,
        room_id: booking.room_id,
        from,
        to: BookingStatus::Cancelled,
        inventory: InventoryEffect::Release,
    }
}

#[tokio::test]
async fn test_insert_decrements_inventory() {
    let (store, room) = seeded(1).await;

    store
        .insert_booking(&booking_for(&room, "AAAA222222"))
        .await
        .unwrap();
    assert_eq!(store.room_available(room.id), Some(0));

    let err = store
        .insert_booking(&booking_for(&room, "BBBB222222"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::RoomUnavailable(id) if id == room.id));
    assert_eq!(store.booking_count(), 1);
}

#[tokio::test]
async fn test_duplicate_confirmation_rejected_without_side_effects() {
    let (store, room) = seeded(3).await;

    store
        .insert_booking(&booking_for(&room, "SAME222222"))
        .await
        .unwrap();
    let err = store
        .insert_booking(&booking_for(&room, "SAME222222"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateConfirmation(_)));
    assert_eq!(store.room_available(room.id), Some(2));
    assert!(
        store
            .confirmation_exists(&ConfirmationNumber::parse("same222222").unwrap())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_guarded_transition() {
    let (store, room) = seeded(1).await;
    let booking = booking_for(&room, "CCCC222222");
    store.insert_booking(&booking).await.unwrap();

    let at = test_clock().now() + Duration::hours(1);
    let cancelled = store
        .apply_transition(&cancel(&booking, BookingStatus::Pending), at)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.updated_at, at);
    assert_eq!(store.room_available(room.id), Some(1));

    let err = store
        .apply_transition(&cancel(&booking, BookingStatus::Pending), at)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::StatusConflict {
            actual: BookingStatus::Cancelled,
            ..
        }
    ));
    assert_eq!(store.room_available(room.id), Some(1));
}

#[tokio::test]
async fn test_lookup_by_confirmation_and_filter() {
    let (store, room) = seeded(2).await;
    let first = booking_for(&room, "DDDD222222");
    let second = booking_for(&room, "EEEE222222");
    store.insert_booking(&first).await.unwrap();
    store.insert_booking(&second).await.unwrap();

    let found = store
        .find_by_confirmation(&first.confirmation_number)
        .await
        .unwrap();
    assert_eq!(found, Some(first.clone()));

    let mine = store
        .list_bookings(&BookingFilter {
            user_id: Some(second.user_id),
            ..BookingFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(mine, vec![second]);
}

#[tokio::test]
async fn test_delete_hotel_cascades_rooms_and_offers() {
    let (store, room) = seeded(1).await;
    let offer = fixtures::offer(
        OfferScope::Room(room.id),
        fixtures::percent(10),
        test_clock().now(),
    );
    store.save_offer(&offer).await.unwrap();
    assert_eq!(store.offers_for_room(&room).await.unwrap().len(), 1);

    assert!(store.delete_hotel(room.hotel_id).await.unwrap());
    assert!(!store.delete_hotel(room.hotel_id).await.unwrap());

    assert!(store.get_room(room.id).await.unwrap().is_none());
    assert!(store.get_offer(offer.id).await.unwrap().is_none());
    assert!(
        store
            .list_hotels(&HotelFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_injected_insert_failure() {
    let (store, room) = seeded(1).await;
    store.fail_next_booking_inserts(1);

    let err = store
        .insert_booking(&booking_for(&room, "FFFF222222"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));
    assert_eq!(store.room_available(room.id), Some(1));

    store
        .insert_booking(&booking_for(&room, "FFFF222222"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_save_room_keeps_stored_inventory() {
    let (store, room) = seeded(2).await;
    store
        .insert_booking(&booking_for(&room, "BBBB333333"))
        .await
        .unwrap();

    // Stale copy still claims two units
    let mut stale = room.clone();
    stale.max_guests += 1;
    store.save_room(&stale).await.unwrap();

    let stored = store.get_room(room.id).await.unwrap().unwrap();
    assert_eq!(stored.available, 1);
    assert_eq!(stored.max_guests, room.max_guests + 1);
}

#[tokio::test]
async fn test_adjust_room_inventory_never_goes_negative() {
    let (store, room) = seeded(1).await;

    assert_eq!(store.adjust_room_inventory(room.id, 4).await.unwrap(), Some(5));
    assert!(matches!(
        store.adjust_room_inventory(room.id, -6).await,
        Err(StoreError::RoomUnavailable(id)) if id == room.id
    ));
    assert_eq!(store.room_available(room.id), Some(5));
    assert_eq!(
        store
            .adjust_room_inventory(hotel_booking_core::RoomId::new(), 1)
            .await
            .unwrap(),
        None
    );
}
