//! Domain types for experiences, slots, bookings and promo codes.
//!
//! All types serialize with camelCase field names, which is the shape the
//! browser client consumes.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Experience identifier (database serial).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceId(pub i64);

impl ExperienceId {
    /// Wrap a raw database id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw database id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExperienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot identifier (database serial).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub i64);

impl SlotId {
    /// Wrap a raw database id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw database id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque external booking reference handed to customers.
///
/// Generated codes look like `BK3F9A0C12DE`: a `BK` prefix followed by ten
/// upper-case hex digits taken from a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingCode(String);

impl BookingCode {
    /// Length of the random hex part.
    const RANDOM_LEN: usize = 10;

    /// Generate a fresh booking code.
    #[must_use]
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!("BK{}", &hex[..Self::RANDOM_LEN]))
    }

    /// Wrap an existing code (e.g. from a URL path or database row).
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money
// ============================================================================

/// Monetary amount in minor units (cents).
///
/// Serialized as a decimal number of major units, so `Money::from_cents(8950)`
/// becomes `89.5` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Build from minor units.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Build from whole major units.
    #[must_use]
    pub const fn from_major(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Amount in major units, for display and JSON.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Cents stay far below 2^53
    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a guest count, saturating on overflow.
    #[must_use]
    #[allow(clippy::cast_lossless)] // `i64::from` is not const
    pub const fn times(self, count: u32) -> Self {
        Self(self.0.saturating_mul(count as i64))
    }

    /// Subtract, never going below zero.
    #[must_use]
    pub const fn minus_floor_zero(self, other: Self) -> Self {
        let diff = self.0.saturating_sub(other.0);
        if diff < 0 { Self::ZERO } else { Self(diff) }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

// ============================================================================
// Experiences and slots
// ============================================================================

/// A bookable activity or tour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Experience ID
    pub id: ExperienceId,
    /// Display title
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Human-readable location ("Dubai, UAE")
    pub location: String,
    /// Price per guest
    pub price: Money,
    /// Duration label ("6 hours")
    pub duration: String,
    /// Category ("Adventure", "Food & Wine", ...)
    pub category: String,
    /// Average rating, 0-5
    pub rating: f64,
    /// Number of reviews behind the rating
    pub reviews: i32,
    /// Cover image URL
    pub image_url: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A dated, capacity-limited instance of an experience.
///
/// `available_spots` only ever moves down, and only through booking creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Slot ID
    pub id: SlotId,
    /// Owning experience
    pub experience_id: ExperienceId,
    /// Calendar date
    pub date: NaiveDate,
    /// Start time, serialized as a label like `"09:00 AM"`
    #[serde(serialize_with = "time_label::serialize")]
    pub time: NaiveTime,
    /// Spots still bookable
    pub available_spots: u32,
    /// Fixed capacity
    pub total_spots: u32,
}

/// Serde helpers for 12-hour time labels.
pub mod time_label {
    use chrono::NaiveTime;
    use serde::Serializer;

    /// Label format, e.g. `02:00 PM`.
    pub const FORMAT: &str = "%I:%M %p";

    /// Render a time as its label.
    #[must_use]
    pub fn format(time: NaiveTime) -> String {
        time.format(FORMAT).to_string()
    }

    /// `serialize_with` adapter.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)] // Signature fixed by serde
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*time))
    }
}

// ============================================================================
// Promo codes
// ============================================================================

/// Flat discount code applied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// Upper-case code
    pub code: String,
    /// Flat discount off the booking subtotal
    pub discount: Money,
    /// Inactive codes never match
    pub active: bool,
}

// ============================================================================
// Bookings
// ============================================================================

/// Booking lifecycle status.
///
/// Bookings are created confirmed and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Spots are held for the customer
    Confirmed,
}

impl BookingStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
        }
    }

    /// Parse the database representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

/// A confirmed reservation against one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Internal database id
    pub id: i64,
    /// External booking reference
    pub booking_id: BookingCode,
    /// Booked experience
    pub experience_id: ExperienceId,
    /// Booked slot
    pub slot_id: SlotId,
    /// Customer name (trimmed)
    pub name: String,
    /// Customer email (trimmed, lower-case)
    pub email: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Number of guests, at least 1
    pub guests: u32,
    /// Applied promo code, if any
    pub promo_code: Option<String>,
    /// Discount that was applied
    pub discount: Money,
    /// Amount charged: `max(0, price * guests - discount)`
    pub total_amount: Money,
    /// Status
    pub status: BookingStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A booking together with the experience and slot it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    /// The booking itself
    #[serde(flatten)]
    pub booking: Booking,
    /// Booked experience
    pub experience: Experience,
    /// Booked slot
    pub slot: Slot,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn test_booking_code_shape() {
        let code = BookingCode::generate();
        assert_eq!(code.as_str().len(), 12);
        assert!(code.as_str().starts_with("BK"));
        assert!(
            code.as_str()[2..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert_ne!(code, BookingCode::generate());
    }

    #[test]
    fn test_money_display_and_json() {
        assert_eq!(Money::from_cents(8950).to_string(), "89.50");
        assert_eq!(Money::from_major(168).to_string(), "168.00");
        assert_eq!(
            serde_json::to_value(Money::from_cents(8950)).unwrap(),
            serde_json::json!(89.5)
        );
    }

    #[test]
    fn test_money_floor_zero() {
        let small = Money::from_major(45);
        let big = Money::from_major(100);
        assert_eq!(small.minus_floor_zero(big), Money::ZERO);
        assert_eq!(big.minus_floor_zero(small), Money::from_major(55));
    }

    #[test]
    fn test_time_label_is_twelve_hour() {
        let afternoon = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(time_label::format(afternoon), "02:00 PM");
        let midnight = NaiveTime::from_hms_opt(0, 5, 0).unwrap();
        assert_eq!(time_label::format(midnight), "12:05 AM");
    }

    #[test]
    fn test_slot_serializes_camel_case_with_time_label() {
        let slot = Slot {
            id: SlotId::new(7),
            experience_id: ExperienceId::new(1),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            available_spots: 4,
            total_spots: 10,
        };

        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["experienceId"], 1);
        assert_eq!(json["date"], "2026-10-20");
        assert_eq!(json["time"], "09:00 AM");
        assert_eq!(json["availableSpots"], 4);
        assert_eq!(json["totalSpots"], 10);
    }

    #[test]
    fn test_booking_status_round_trip() {
        assert_eq!(BookingStatus::parse("confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::Confirmed.as_str(), "confirmed");
        assert_eq!(BookingStatus::parse("cancelled"), None);
    }
}
