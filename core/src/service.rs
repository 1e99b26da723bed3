//! Booking service: the operations exposed over HTTP.
//!
//! The service owns no state. It validates input, resolves promo codes and
//! delegates persistence to a [`BookingStore`].

use crate::booking::{BookingDraft, BookingRequest};
use crate::environment::Clock;
use crate::error::{BookingError, StoreError};
use crate::promo::{normalize_code, AppliedPromo, PromoValidation};
use crate::store::BookingStore;
use crate::types::{Booking, BookingCode, BookingDetail, Experience, ExperienceId, Slot};
use std::sync::Arc;
use std::time::Instant;

/// Entry point for experience queries, promo validation and checkout.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    /// Create a service over a store and a clock.
    #[must_use]
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Underlying store, for health checks.
    #[must_use]
    pub fn store(&self) -> &dyn BookingStore {
        self.store.as_ref()
    }

    /// List every experience, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn list_experiences(&self) -> Result<Vec<Experience>, StoreError> {
        self.store.list_experiences().await
    }

    /// Fetch one experience.
    ///
    /// # Errors
    ///
    /// - `ExperienceNotFound` if no experience has this id
    /// - `Store` if the store fails
    #[tracing::instrument(skip(self))]
    pub async fn get_experience(&self, id: ExperienceId) -> Result<Experience, BookingError> {
        self.store
            .find_experience(id)
            .await?
            .ok_or(BookingError::ExperienceNotFound(id))
    }

    /// Slots of an experience that haven't started yet (UTC), by date then time.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn list_upcoming_slots(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Vec<Slot>, StoreError> {
        let now = self.clock.now().naive_utc();
        self.store.list_slots(experience_id, now).await
    }

    /// Check a promo code without touching any state.
    ///
    /// Never fails: blank input, unknown codes and store errors all come back
    /// as "not valid".
    #[tracing::instrument(skip(self))]
    pub async fn validate_promo(&self, code: &str) -> PromoValidation {
        let result = match normalize_code(code) {
            None => PromoValidation::missing(),
            Some(code) => match self.resolve_promo(code).await {
                Some(promo) => PromoValidation::applied(&promo),
                None => PromoValidation::unknown(),
            },
        };

        metrics::counter!("promo_validations_total", "valid" => result.valid.to_string())
            .increment(1);
        result
    }

    /// Validate, price and persist a booking.
    ///
    /// Unknown or inactive promo codes are ignored. The capacity check and the
    /// write happen atomically inside the store.
    ///
    /// # Errors
    ///
    /// - `Validation` if the request is incomplete or malformed
    /// - `SlotNotFound` if the slot doesn't exist for that experience
    /// - `InsufficientCapacity` if `guests` exceeds the remaining spots
    /// - `Store` if persistence fails (nothing is written)
    #[tracing::instrument(skip(self, request))]
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let started = Instant::now();
        let result = self.try_create_booking(request).await;
        metrics::histogram!("booking_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(booking) => {
                metrics::counter!("bookings_created_total").increment(1);
                tracing::info!(
                    booking_id = %booking.booking_id,
                    slot_id = %booking.slot_id,
                    guests = booking.guests,
                    total = %booking.total_amount,
                    "Booking created"
                );
            }
            Err(err) => {
                metrics::counter!("bookings_rejected_total", "reason" => err.reason())
                    .increment(1);
                tracing::debug!(reason = err.reason(), error = %err, "Booking rejected");
            }
        }

        result
    }

    /// Fetch a booking with its experience and slot.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the reference is unknown
    /// - `Store` if the store fails
    #[tracing::instrument(skip(self))]
    pub async fn get_booking(&self, booking_id: &str) -> Result<BookingDetail, BookingError> {
        self.store
            .find_booking(BookingCode::new(booking_id))
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))
    }

    async fn try_create_booking(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let request = request.validate()?;

        let promo = match request.promo_code.clone() {
            Some(code) => self.resolve_promo(code).await,
            None => None,
        };

        let draft = BookingDraft {
            booking_code: BookingCode::generate(),
            request,
            promo,
            created_at: self.clock.now(),
        };

        self.store.create_booking(draft).await
    }

    /// Look up an active promo, treating store failures as "no promo".
    async fn resolve_promo(&self, code: String) -> Option<AppliedPromo> {
        match self.store.find_active_promo(code.clone()).await {
            Ok(promo) => promo.and_then(AppliedPromo::from_active),
            Err(err) => {
                tracing::warn!(code = %code, error = %err, "Promo lookup failed, ignoring code");
                None
            }
        }
    }
}
