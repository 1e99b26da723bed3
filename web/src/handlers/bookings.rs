//! Booking endpoints:
//! - POST /api/bookings - Validate, price and confirm a booking
//! - GET /api/bookings/:booking_id - Booking with its experience and slot

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tourbook_core::{BookingCode, BookingDetail, BookingRequest, Money};

/// Response after creating a booking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    /// Always `true`
    pub success: bool,
    /// External booking reference
    pub booking_id: BookingCode,
    /// Confirmation message
    pub message: String,
    /// Amount charged
    pub total: Money,
}

/// Create a booking.
///
/// The body is read as loose JSON so that a missing or mistyped field shows up
/// in the itemized validation errors rather than as a parse failure.
///
/// # Errors
///
/// - 400 `BAD_REQUEST` if the body isn't a JSON object
/// - 400 `VALIDATION_ERROR` listing every invalid field
/// - 404 if the slot doesn't exist for the experience
/// - 400 `INSUFFICIENT_CAPACITY` if the slot has too few spots left
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    if !body.is_object() {
        return Err(AppError::bad_request("Request body must be a JSON object"));
    }

    let booking = state.service.create_booking(booking_request(&body)).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            success: true,
            booking_id: booking.booking_id,
            message: "Booking created successfully".to_string(),
            total: booking.total_amount,
        }),
    ))
}

/// Fetch a booking by its external reference.
///
/// # Errors
///
/// Returns 404 if the reference is unknown.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingDetail>, AppError> {
    let detail = state.service.get_booking(&booking_id).await?;
    Ok(Json(detail))
}

/// Pick the checkout fields out of a JSON body.
///
/// Ids and guest counts must be JSON integers; anything else counts as missing.
fn booking_request(body: &Value) -> BookingRequest {
    let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
    let integer = |key: &str| body.get(key).and_then(Value::as_i64);

    BookingRequest {
        experience_id: integer("experienceId"),
        slot_id: integer("slotId"),
        name: text("name"),
        email: text("email"),
        phone: text("phone"),
        guests: integer("guests"),
        promo_code: text("promoCode"),
    }
}
