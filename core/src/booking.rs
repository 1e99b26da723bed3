//! Booking requests: validation, pricing and capacity rules.
//!
//! Everything in this module is pure. Store implementations call
//! [`BookingDraft::quote`] and [`ensure_capacity`] from inside their write
//! transaction so the Postgres and in-memory backends apply identical rules.
//!
//! # Flow
//!
//! ```text
//! BookingRequest ──validate()──▶ NewBooking ──+ code, promo──▶ BookingDraft
//!                                                              │
//!                     store: lock slot, ensure_capacity(), quote(), insert
//!                                                              ▼
//!                                                           Booking
//! ```

use crate::error::BookingError;
use crate::promo::{normalize_code, AppliedPromo};
use crate::types::{Booking, BookingCode, BookingStatus, ExperienceId, Money, SlotId};
use chrono::{DateTime, Utc};
use std::fmt;

// ============================================================================
// Request
// ============================================================================

/// Raw booking request as submitted at checkout.
///
/// Every field is optional so that missing or mistyped input is reported as an
/// itemized validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    /// Experience being booked
    pub experience_id: Option<i64>,
    /// Slot being booked
    pub slot_id: Option<i64>,
    /// Customer name
    pub name: Option<String>,
    /// Customer email
    pub email: Option<String>,
    /// Optional phone number
    pub phone: Option<String>,
    /// Number of guests
    pub guests: Option<i64>,
    /// Optional promo code, any case
    pub promo_code: Option<String>,
}

/// Itemized validation failures, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Individual messages.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    fn push(&mut self, message: &str) {
        self.0.push(message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// A booking request that passed validation, with normalized fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Experience being booked
    pub experience_id: ExperienceId,
    /// Slot being booked
    pub slot_id: SlotId,
    /// Trimmed name
    pub name: String,
    /// Trimmed, lower-cased email
    pub email: String,
    /// Trimmed phone, `None` when blank
    pub phone: Option<String>,
    /// Guest count, at least 1
    pub guests: u32,
    /// Upper-cased promo code as submitted, `None` when blank.
    ///
    /// Kept on the booking even when it didn't resolve to a discount.
    pub promo_code: Option<String>,
}

impl BookingRequest {
    /// Validate and normalize the request.
    ///
    /// All failures are collected, not just the first one.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] listing every failed check.
    pub fn validate(self) -> Result<NewBooking, BookingError> {
        let mut errors = ValidationErrors::default();

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        if name.is_none() {
            errors.push("Name is required");
        }

        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| is_valid_email(e))
            .map(str::to_lowercase);
        if email.is_none() {
            errors.push("Valid email is required");
        }

        let experience_id = self.experience_id.filter(|id| *id > 0).map(ExperienceId::new);
        if experience_id.is_none() {
            errors.push("Valid experience ID is required");
        }

        let slot_id = self.slot_id.filter(|id| *id > 0).map(SlotId::new);
        if slot_id.is_none() {
            errors.push("Valid slot ID is required");
        }

        let guests = self
            .guests
            .filter(|g| *g >= 1)
            .and_then(|g| u32::try_from(g).ok());
        if guests.is_none() {
            errors.push("At least 1 guest is required");
        }

        match (name, email, experience_id, slot_id, guests) {
            (Some(name), Some(email), Some(experience_id), Some(slot_id), Some(guests)) => {
                Ok(NewBooking {
                    experience_id,
                    slot_id,
                    name,
                    email,
                    phone: self
                        .phone
                        .as_deref()
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string),
                    guests,
                    promo_code: self.promo_code.as_deref().and_then(normalize_code),
                })
            }
            _ => Err(BookingError::Validation(errors)),
        }
    }
}

/// Validate email address syntax.
///
/// Accepts `local@domain.tld` where no part is empty and nothing contains
/// whitespace or a second `@`.
///
/// # Examples
///
/// ```
/// use tourbook_core::booking::is_valid_email;
///
/// assert!(is_valid_email("ada@example.com"));
/// assert!(is_valid_email("ada+tours@mail.example.co.uk"));
/// assert!(!is_valid_email("ada@example"));
/// assert!(!is_valid_email("ada @example.com"));
/// assert!(!is_valid_email("@example.com"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Domain needs a dot with something on both sides of the last one
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

// ============================================================================
// Pricing and capacity
// ============================================================================

/// Price breakdown for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// `price * guests`
    pub subtotal: Money,
    /// Discount applied
    pub discount: Money,
    /// `max(0, subtotal - discount)`
    pub total: Money,
}

/// Price `guests` spots at `unit_price`, minus a flat discount.
///
/// The total never goes negative; a discount larger than the subtotal makes
/// the booking free.
///
/// # Examples
///
/// ```
/// use tourbook_core::booking::quote;
/// use tourbook_core::Money;
///
/// let q = quote(Money::from_major(89), 2, Money::from_major(10));
/// assert_eq!(q.total, Money::from_major(168));
/// ```
#[must_use]
pub const fn quote(unit_price: Money, guests: u32, discount: Money) -> Quote {
    let subtotal = unit_price.times(guests);
    Quote {
        subtotal,
        discount,
        total: subtotal.minus_floor_zero(discount),
    }
}

/// Check that `requested` guests fit into `available` spots.
///
/// # Errors
///
/// Returns [`BookingError::InsufficientCapacity`] when they don't.
pub fn ensure_capacity(available: u32, requested: u32) -> Result<(), BookingError> {
    if requested > available {
        return Err(BookingError::InsufficientCapacity {
            available,
            requested,
        });
    }
    Ok(())
}

// ============================================================================
// Draft
// ============================================================================

/// Everything a store needs to persist a booking.
///
/// The promo has already been resolved; the store supplies the slot's current
/// capacity and the experience price from inside its transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    /// Generated external reference
    pub booking_code: BookingCode,
    /// Validated request
    pub request: NewBooking,
    /// Resolved promo, `None` if absent, unknown or inactive
    pub promo: Option<AppliedPromo>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl BookingDraft {
    /// Discount carried by the resolved promo.
    #[must_use]
    pub fn discount(&self) -> Money {
        self.promo.as_ref().map_or(Money::ZERO, |p| p.discount)
    }

    /// Price this draft at the experience's per-guest price.
    #[must_use]
    pub fn quote(&self, unit_price: Money) -> Quote {
        quote(unit_price, self.request.guests, self.discount())
    }

    /// Build the persisted booking once the store has assigned an id.
    #[must_use]
    pub fn into_booking(self, id: i64, quote: Quote) -> Booking {
        Booking {
            id,
            booking_id: self.booking_code,
            experience_id: self.request.experience_id,
            slot_id: self.request.slot_id,
            name: self.request.name,
            email: self.request.email,
            phone: self.request.phone,
            guests: self.request.guests,
            promo_code: self.request.promo_code,
            discount: quote.discount,
            total_amount: quote.total,
            status: BookingStatus::Confirmed,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn messages(err: BookingError) -> Vec<String> {
        match err {
            BookingError::Validation(errors) => errors.messages().to_vec(),
            other => vec![format!("unexpected: {other}")],
        }
    }

    fn valid_request() -> BookingRequest {
        BookingRequest {
            experience_id: Some(1),
            slot_id: Some(12),
            name: Some("  Ada Lovelace ".to_string()),
            email: Some(" Ada@Example.COM ".to_string()),
            phone: Some("   ".to_string()),
            guests: Some(2),
            promo_code: Some(" save10 ".to_string()),
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let booking = valid_request().validate().unwrap();

        assert_eq!(booking.experience_id, ExperienceId::new(1));
        assert_eq!(booking.slot_id, SlotId::new(12));
        assert_eq!(booking.name, "Ada Lovelace");
        assert_eq!(booking.email, "ada@example.com");
        assert_eq!(booking.phone, None);
        assert_eq!(booking.guests, 2);
        assert_eq!(booking.promo_code.as_deref(), Some("SAVE10"));
    }

    #[test]
    fn test_validate_collects_every_error_in_order() {
        let err = BookingRequest::default().validate().unwrap_err();
        assert!(err.to_string().starts_with("Name is required, Valid email"));

        assert_eq!(
            messages(err),
            [
                "Name is required",
                "Valid email is required",
                "Valid experience ID is required",
                "Valid slot ID is required",
                "At least 1 guest is required",
            ]
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_numbers() {
        let request = BookingRequest {
            experience_id: Some(0),
            slot_id: Some(-4),
            guests: Some(0),
            ..valid_request()
        };

        assert_eq!(messages(request.validate().unwrap_err()).len(), 3);
    }

    #[test]
    fn test_validate_rejects_blank_name_and_bad_email() {
        let request = BookingRequest {
            name: Some("   ".to_string()),
            email: Some("not-an-email".to_string()),
            ..valid_request()
        };

        assert_eq!(
            messages(request.validate().unwrap_err()),
            ["Name is required", "Valid email is required"]
        );
    }

    #[test]
    fn test_quote_example_from_checkout() {
        let q = quote(Money::from_major(89), 2, Money::from_major(10));
        assert_eq!(q.subtotal, Money::from_major(178));
        assert_eq!(q.discount, Money::from_major(10));
        assert_eq!(q.total, Money::from_major(168));
    }

    #[test]
    fn test_quote_never_negative() {
        let q = quote(Money::from_major(45), 1, Money::from_major(100));
        assert_eq!(q.total, Money::ZERO);
    }

    #[test]
    fn test_ensure_capacity() {
        assert!(ensure_capacity(3, 3).is_ok());
        assert_eq!(
            ensure_capacity(3, 4),
            Err(BookingError::InsufficientCapacity {
                available: 3,
                requested: 4
            })
        );
    }

    #[test]
    fn test_unresolved_promo_is_kept_without_discount() {
        let draft = BookingDraft {
            booking_code: BookingCode::new("BK0000000001"),
            request: valid_request().validate().unwrap(),
            promo: None,
            created_at: Utc::now(),
        };

        let q = draft.quote(Money::from_major(50));
        let booking = draft.into_booking(9, q);

        assert_eq!(booking.discount, Money::ZERO);
        assert_eq!(booking.total_amount, Money::from_major(100));
        assert_eq!(booking.promo_code.as_deref(), Some("SAVE10"));
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    proptest! {
        #[test]
        fn prop_total_is_floored_difference(
            price in 1i64..1_000_000,
            guests in 1u32..100,
            discount in 0i64..10_000_000,
        ) {
            let q = quote(Money::from_cents(price), guests, Money::from_cents(discount));
            let expected = (price * i64::from(guests) - discount).max(0);
            prop_assert_eq!(q.total.cents(), expected);
            prop_assert!(q.total <= q.subtotal);
        }

        #[test]
        fn prop_capacity_check_matches_comparison(available in 0u32..50, requested in 1u32..60) {
            prop_assert_eq!(ensure_capacity(available, requested).is_ok(), requested <= available);
        }
    }
}
