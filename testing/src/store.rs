//! In-memory booking store
//!
//! Provides a [`BookingStore`] backed by plain collections behind a single
//! mutex, so every `create_booking` runs as one critical section. That gives
//! the same all-or-nothing capacity behaviour as the Postgres store without a
//! database.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned mutex

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tourbook_core::booking::ensure_capacity;
use tourbook_core::{
    Booking, BookingCode, BookingDetail, BookingDraft, BookingError, BookingStore, Experience,
    ExperienceId, PromoCode, Slot, SlotId, StoreError, StoreFuture,
};

#[derive(Debug, Default)]
struct State {
    experiences: BTreeMap<ExperienceId, Experience>,
    slots: BTreeMap<SlotId, Slot>,
    promos: BTreeMap<String, PromoCode>,
    bookings: Vec<Booking>,
}

/// In-memory store for fast, deterministic tests.
///
/// Cloning shares the underlying state, so a test can keep a handle for
/// assertions after giving one to a `BookingService`.
///
/// # Example
///
/// ```
/// use tourbook_testing::{fixtures, InMemoryBookingStore};
///
/// let store = InMemoryBookingStore::new();
/// store.insert_experience(fixtures::experience(1, "Desert Safari", 89));
/// store.insert_slot(fixtures::slot(10, 1, "2026-03-20", "09:00", 8));
///
/// assert_eq!(store.slot(tourbook_core::SlotId::new(10)).map(|s| s.available_spots), Some(8));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryBookingStore {
    state: Arc<Mutex<State>>,
    unavailable: Arc<AtomicBool>,
    failing_promos: Arc<AtomicBool>,
}

impl InMemoryBookingStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an experience
    pub fn insert_experience(&self, experience: Experience) {
        self.state
            .lock()
            .unwrap()
            .experiences
            .insert(experience.id, experience);
    }

    /// Add or replace a slot
    pub fn insert_slot(&self, slot: Slot) {
        self.state.lock().unwrap().slots.insert(slot.id, slot);
    }

    /// Add or replace a promo code. The code is stored upper-case.
    pub fn insert_promo(&self, mut promo: PromoCode) {
        promo.code = promo.code.to_uppercase();
        self.state
            .lock()
            .unwrap()
            .promos
            .insert(promo.code.clone(), promo);
    }

    /// Current state of a slot
    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<Slot> {
        self.state.lock().unwrap().slots.get(&id).cloned()
    }

    /// Every booking written so far, in insertion order
    #[must_use]
    pub fn bookings(&self) -> Vec<Booking> {
        self.state.lock().unwrap().bookings.clone()
    }

    /// Number of bookings written so far
    #[must_use]
    pub fn booking_count(&self) -> usize {
        self.state.lock().unwrap().bookings.len()
    }

    /// Make every call fail with a database error, as if the backend were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make promo lookups fail while everything else keeps working.
    pub fn set_promo_lookups_failing(&self, failing: bool) {
        self.failing_promos.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::DatabaseError(
                "in-memory store marked unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn write_booking(&self, draft: BookingDraft) -> Result<Booking, BookingError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();

        let slot_id = draft.request.slot_id;
        let slot = state
            .slots
            .get(&slot_id)
            .filter(|slot| slot.experience_id == draft.request.experience_id)
            .cloned()
            .ok_or(BookingError::SlotNotFound(slot_id))?;

        ensure_capacity(slot.available_spots, draft.request.guests)?;

        let price = state
            .experiences
            .get(&slot.experience_id)
            .map(|experience| experience.price)
            .ok_or_else(|| {
                StoreError::CorruptRecord(format!(
                    "slot {slot_id} references missing experience {}",
                    slot.experience_id
                ))
            })?;

        let quote = draft.quote(price);
        let id = i64::try_from(state.bookings.len()).unwrap() + 1;
        let booking = draft.into_booking(id, quote);

        if let Some(slot) = state.slots.get_mut(&slot_id) {
            slot.available_spots -= booking.guests;
        }
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    fn read_booking(&self, code: &BookingCode) -> Result<Option<BookingDetail>, StoreError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();

        let Some(booking) = state.bookings.iter().find(|b| &b.booking_id == code) else {
            return Ok(None);
        };
        let experience = state.experiences.get(&booking.experience_id).cloned();
        let slot = state.slots.get(&booking.slot_id).cloned();

        match (experience, slot) {
            (Some(experience), Some(slot)) => Ok(Some(BookingDetail {
                booking: booking.clone(),
                experience,
                slot,
            })),
            _ => Err(StoreError::CorruptRecord(format!(
                "booking {code} is missing its experience or slot"
            ))),
        }
    }
}

impl BookingStore for InMemoryBookingStore {
    fn ping(&self) -> StoreFuture<'_, Result<(), StoreError>> {
        Box::pin(future::ready(self.check_available()))
    }

    fn list_experiences(&self) -> StoreFuture<'_, Result<Vec<Experience>, StoreError>> {
        let result = self.check_available().map(|()| {
            let mut experiences: Vec<Experience> =
                self.state.lock().unwrap().experiences.values().cloned().collect();
            experiences.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            experiences
        });
        Box::pin(future::ready(result))
    }

    fn find_experience(
        &self,
        id: ExperienceId,
    ) -> StoreFuture<'_, Result<Option<Experience>, StoreError>> {
        let result = self
            .check_available()
            .map(|()| self.state.lock().unwrap().experiences.get(&id).cloned());
        Box::pin(future::ready(result))
    }

    fn list_slots(
        &self,
        experience_id: ExperienceId,
        after: NaiveDateTime,
    ) -> StoreFuture<'_, Result<Vec<Slot>, StoreError>> {
        let result = self.check_available().map(|()| {
            let mut slots: Vec<Slot> = self
                .state
                .lock()
                .unwrap()
                .slots
                .values()
                .filter(|slot| {
                    slot.experience_id == experience_id && slot.date.and_time(slot.time) > after
                })
                .cloned()
                .collect();
            slots.sort_by_key(|slot| (slot.date, slot.time));
            slots
        });
        Box::pin(future::ready(result))
    }

    fn find_active_promo(
        &self,
        code: String,
    ) -> StoreFuture<'_, Result<Option<PromoCode>, StoreError>> {
        let result = if self.failing_promos.load(Ordering::SeqCst) {
            Err(StoreError::DatabaseError("promo lookup failed".to_string()))
        } else {
            self.check_available().map(|()| {
                self.state
                    .lock()
                    .unwrap()
                    .promos
                    .get(&code)
                    .filter(|promo| promo.active)
                    .cloned()
            })
        };
        Box::pin(future::ready(result))
    }

    fn create_booking(
        &self,
        draft: BookingDraft,
    ) -> StoreFuture<'_, Result<Booking, BookingError>> {
        Box::pin(future::ready(self.write_booking(draft)))
    }

    fn find_booking(
        &self,
        code: BookingCode,
    ) -> StoreFuture<'_, Result<Option<BookingDetail>, StoreError>> {
        Box::pin(future::ready(self.read_booking(&code)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::{fixtures, test_clock};
    use tourbook_core::promo::AppliedPromo;
    use futures::executor::block_on;
    use tourbook_core::{BookingRequest, Money};

    fn draft(slot_id: i64, guests: i64, promo: Option<AppliedPromo>) -> BookingDraft {
        let request = BookingRequest {
            experience_id: Some(1),
            slot_id: Some(slot_id),
            name: Some("Grace Hopper".to_string()),
            email: Some("grace@example.com".to_string()),
            guests: Some(guests),
            ..BookingRequest::default()
        }
        .validate()
        .unwrap();

        BookingDraft {
            booking_code: BookingCode::generate(),
            request,
            promo,
            created_at: chrono::DateTime::UNIX_EPOCH,
        }
    }

    fn store() -> InMemoryBookingStore {
        let store = InMemoryBookingStore::new();
        store.insert_experience(fixtures::experience(1, "Desert Safari", 89));
        store.insert_slot(fixtures::slot(10, 1, "2026-03-20", "09:00", 3));
        store
    }

    #[test]
    fn test_write_decrements_slot() {
        let store = store();
        let booking = store.write_booking(draft(10, 2, None)).unwrap();

        assert_eq!(booking.id, 1);
        assert_eq!(booking.total_amount, Money::from_major(178));
        assert_eq!(store.slot(SlotId::new(10)).unwrap().available_spots, 1);
    }

    #[test]
    fn test_write_applies_promo() {
        let store = store();
        let promo = AppliedPromo {
            code: "SAVE10".to_string(),
            discount: Money::from_major(10),
        };
        let booking = store.write_booking(draft(10, 2, Some(promo))).unwrap();

        assert_eq!(booking.total_amount, Money::from_major(168));
        assert_eq!(booking.promo_code.as_deref(), Some("SAVE10"));
    }

    #[test]
    fn test_over_capacity_changes_nothing() {
        let store = store();
        let err = store.write_booking(draft(10, 4, None)).unwrap_err();

        assert_eq!(
            err,
            BookingError::InsufficientCapacity {
                available: 3,
                requested: 4
            }
        );
        assert_eq!(store.booking_count(), 0);
        assert_eq!(store.slot(SlotId::new(10)).unwrap().available_spots, 3);
    }

    #[test]
    fn test_slot_of_other_experience_is_not_found() {
        let store = store();
        store.insert_experience(fixtures::experience(2, "Kayak Tour", 45));
        store.insert_slot(fixtures::slot(20, 2, "2026-03-20", "09:00", 5));

        let err = store.write_booking(draft(20, 1, None)).unwrap_err();
        assert_eq!(err, BookingError::SlotNotFound(SlotId::new(20)));
    }

    #[test]
    fn test_promo_lookup_is_exact_and_active_only() {
        let clock = test_clock();
        let store = fixtures::seeded_store(&clock);

        let found = block_on(store.find_active_promo("SAVE10".to_string()));
        assert!(found.unwrap().is_some());

        let inactive = block_on(store.find_active_promo("EXPIRED5".to_string()));
        assert!(inactive.unwrap().is_none());
    }

    #[test]
    fn test_unavailable_store_fails_reads() {
        let store = store();
        store.set_unavailable(true);
        assert!(block_on(store.ping()).is_err());
        assert!(store.write_booking(draft(10, 1, None)).is_err());
        assert_eq!(store.slot(SlotId::new(10)).unwrap().available_spots, 3);
    }
}
