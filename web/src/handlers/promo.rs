//! Promo code endpoint:
//! - POST /api/promo/validate - Check a code without applying it

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tourbook_core::PromoValidation;

/// Validate a promo code.
///
/// Always answers 200. A missing, blank or unreadable `code` is reported as
/// `"Promo code is required"`.
pub async fn validate_promo(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Json<PromoValidation> {
    let code = payload
        .ok()
        .and_then(|Json(body)| body.get("code").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default();

    Json(state.service.validate_promo(&code).await)
}
