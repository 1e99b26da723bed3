//! Storage abstraction for experiences, slots, promo codes and bookings.
//!
//! # Implementations
//!
//! - `PostgresBookingStore` (in `tourbook-postgres`): production storage
//! - `InMemoryBookingStore` (in `tourbook-testing`): fast, deterministic tests
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so the
//! service can hold an `Arc<dyn BookingStore>` and the HTTP state stays
//! non-generic.

use crate::booking::BookingDraft;
use crate::error::{BookingError, StoreError};
use crate::types::{Booking, BookingCode, BookingDetail, Experience, ExperienceId, PromoCode, Slot};
use chrono::NaiveDateTime;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`BookingStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence for the booking domain.
///
/// Everything except [`create_booking`](BookingStore::create_booking) is a
/// read. `create_booking` must be atomic: it either inserts the booking *and*
/// decrements the slot, or changes nothing. Two concurrent calls against the
/// same slot must never both succeed past its capacity.
pub trait BookingStore: Send + Sync {
    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the backend cannot be reached.
    fn ping(&self) -> StoreFuture<'_, Result<(), StoreError>>;

    /// All experiences, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    fn list_experiences(&self) -> StoreFuture<'_, Result<Vec<Experience>, StoreError>>;

    /// One experience by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    fn find_experience(
        &self,
        id: ExperienceId,
    ) -> StoreFuture<'_, Result<Option<Experience>, StoreError>>;

    /// Slots of an experience starting strictly after `after`, ordered by
    /// date then time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    fn list_slots(
        &self,
        experience_id: ExperienceId,
        after: NaiveDateTime,
    ) -> StoreFuture<'_, Result<Vec<Slot>, StoreError>>;

    /// Active promo code matching an already upper-cased `code`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    fn find_active_promo(
        &self,
        code: String,
    ) -> StoreFuture<'_, Result<Option<PromoCode>, StoreError>>;

    /// Persist a booking and take `guests` spots from its slot, atomically.
    ///
    /// Implementations lock the slot, reject with `SlotNotFound` if it is
    /// missing or belongs to a different experience, reject with
    /// `InsufficientCapacity` via [`ensure_capacity`](crate::booking::ensure_capacity),
    /// and price the booking with [`BookingDraft::quote`].
    ///
    /// # Errors
    ///
    /// - `SlotNotFound`: no such slot for the requested experience
    /// - `InsufficientCapacity`: not enough spots left
    /// - `Store`: persistence failure (nothing was written)
    fn create_booking(&self, draft: BookingDraft) -> StoreFuture<'_, Result<Booking, BookingError>>;

    /// A booking with its experience and slot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    fn find_booking(
        &self,
        code: BookingCode,
    ) -> StoreFuture<'_, Result<Option<BookingDetail>, StoreError>>;
}
