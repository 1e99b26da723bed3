//! Experience catalog endpoints:
//! - GET /api/experiences - All experiences, newest first
//! - GET /api/experiences/:id - One experience
//! - GET /api/experiences/:id/slots - Upcoming slots for an experience

use crate::error::AppError;
use crate::WebResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use tourbook_core::{Experience, ExperienceId, Slot};

/// List every experience.
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn list_experiences(
    State(state): State<AppState>,
) -> WebResult<Json<Vec<Experience>>> {
    let experiences = state.service.list_experiences().await?;
    Ok(Json(experiences))
}

/// Fetch one experience.
///
/// # Errors
///
/// - 400 if `id` is not an integer
/// - 404 if the experience doesn't exist
pub async fn get_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<Experience>> {
    let id = parse_experience_id(&id)?;
    let experience = state.service.get_experience(id).await?;
    Ok(Json(experience))
}

/// Upcoming slots for an experience, by date then time.
///
/// An unknown experience has no slots, so it yields an empty list.
///
/// # Errors
///
/// - 400 if `id` is not an integer
/// - 500 if the store fails
pub async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<Vec<Slot>>> {
    let id = parse_experience_id(&id)?;
    let slots = state.service.list_upcoming_slots(id).await?;
    Ok(Json(slots))
}

fn parse_experience_id(raw: &str) -> Result<ExperienceId, AppError> {
    raw.trim()
        .parse::<i64>()
        .map(ExperienceId::new)
        .map_err(|_| AppError::bad_request("Invalid experience ID"))
}
