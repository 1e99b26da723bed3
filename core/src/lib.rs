//! # Tourbook Core
//!
//! Domain types and business rules for browsing experiences and booking their
//! time slots.
//!
//! This crate is the functional core of the workspace. It knows nothing about
//! HTTP or SQL; those live in `tourbook-web` and `tourbook-postgres`.
//!
//! ## Core Concepts
//!
//! - **Experience**: a bookable activity with a per-guest price
//! - **Slot**: a dated instance of an experience with finite capacity
//! - **Booking**: a confirmed reservation of `guests` spots on one slot
//! - **`PromoCode`**: a flat discount applied at checkout
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tourbook-web (axum handlers)           │  ← JSON, status codes
//! ├─────────────────────────────────────────┤
//! │  BookingService                         │  ← validate, resolve promo
//! │    validate() / quote() / capacity      │  ← pure, unit tested
//! ├─────────────────────────────────────────┤
//! │  dyn BookingStore                       │  ← Postgres or in-memory
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use tourbook_core::{BookingRequest, BookingService};
//!
//! let service = BookingService::new(store, clock);
//! let booking = service.create_booking(BookingRequest {
//!     experience_id: Some(1),
//!     slot_id: Some(12),
//!     name: Some("Ada Lovelace".into()),
//!     email: Some("ada@example.com".into()),
//!     guests: Some(2),
//!     promo_code: Some("save10".into()),
//!     ..BookingRequest::default()
//! }).await?;
//! assert_eq!(booking.total_amount, Money::from_major(168));
//! ```

#![forbid(unsafe_code)]

pub mod booking;
pub mod error;
pub mod promo;
pub mod service;
pub mod store;
pub mod types;

pub use booking::{BookingDraft, BookingRequest, NewBooking, Quote, ValidationErrors};
pub use error::{BookingError, StoreError};
pub use promo::{AppliedPromo, PromoValidation};
pub use service::BookingService;
pub use store::{BookingStore, StoreFuture};
pub use types::{
    Booking, BookingCode, BookingDetail, BookingStatus, Experience, ExperienceId, Money,
    PromoCode, Slot, SlotId,
};

/// Environment module - injected dependencies
///
/// Everything that would make the service non-deterministic (currently only
/// the wall clock) is reached through a trait so tests can pin it.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time for testability
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{DateTime, Utc};
    /// use tourbook_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let _now: DateTime<Utc> = clock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
