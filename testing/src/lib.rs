//! # Tourbook Testing
//!
//! Testing utilities for the Tourbook workspace.
//!
//! This crate provides:
//! - [`InMemoryBookingStore`]: a `BookingStore` backed by a mutex-guarded map
//! - [`FixedClock`]: deterministic time
//! - [`fixtures`]: builders for experiences, slots and promo codes, plus a
//!   seeded catalog
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tourbook_core::BookingService;
//! use tourbook_testing::{fixtures, test_clock};
//!
//! let clock = test_clock();
//! let store = fixtures::seeded_store(&clock);
//! let service = BookingService::new(Arc::new(store), Arc::new(clock));
//! ```

pub mod fixtures;
pub mod store;

pub use store::InMemoryBookingStore;

/// Mock implementations of environment traits
pub mod mocks {
    use chrono::{DateTime, NaiveDate, Utc};
    use tourbook_core::environment::Clock;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tourbook_testing::mocks::FixedClock;
    /// use tourbook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// Calendar date the clock is pinned to.
        #[must_use]
        pub fn today(&self) -> NaiveDate {
            self.time.date_naive()
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-03-15 10:30:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2026, 3, 15)
                .and_then(|d| d.and_hms_opt(10, 30, 0))
                .map_or_else(Utc::now, |naive| naive.and_utc()),
        )
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
