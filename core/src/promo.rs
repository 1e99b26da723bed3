//! Promo code normalization and validation results.
//!
//! Codes are stored upper-case and matched case-insensitively, so `save10`
//! and `SAVE10` are the same code. Lookups never fail the caller: an unknown,
//! inactive or unreadable code simply isn't valid.

use crate::types::{Money, PromoCode};
use serde::Serialize;

/// Normalize a user-supplied code for lookup.
///
/// Returns `None` for blank input.
///
/// # Examples
///
/// ```
/// use tourbook_core::promo::normalize_code;
///
/// assert_eq!(normalize_code(" save10 ").as_deref(), Some("SAVE10"));
/// assert_eq!(normalize_code("   "), None);
/// ```
#[must_use]
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// A promo code that was found active and will be applied to a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPromo {
    /// Upper-case code
    pub code: String,
    /// Flat discount
    pub discount: Money,
}

impl AppliedPromo {
    /// Apply a stored promo code, if it is active.
    #[must_use]
    pub fn from_active(promo: PromoCode) -> Option<Self> {
        promo.active.then_some(Self {
            code: promo.code,
            discount: promo.discount,
        })
    }
}

/// Answer to "is this promo code usable?".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidation {
    /// Whether the code is active
    pub valid: bool,
    /// Discount it grants, zero when not valid
    pub discount: Money,
    /// Message for the customer
    pub message: String,
}

impl PromoValidation {
    /// The code matched an active promo.
    #[must_use]
    pub fn applied(promo: &AppliedPromo) -> Self {
        Self {
            valid: true,
            discount: promo.discount,
            message: "Promo code applied successfully".to_string(),
        }
    }

    /// The code is unknown or inactive.
    ///
    /// Codes have no expiry date; "expired" in the message covers codes that
    /// were switched off.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            valid: false,
            discount: Money::ZERO,
            message: "Invalid or expired promo code".to_string(),
        }
    }

    /// No code was supplied.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            valid: false,
            discount: Money::ZERO,
            message: "Promo code is required".to_string(),
        }
    }
}
