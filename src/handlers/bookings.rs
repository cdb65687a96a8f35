use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::extract::AppJson;
use crate::models::NewBooking;
use crate::services::{bookings, notifications};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<NewBooking>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let booking = bookings::add_booking(state.store.as_ref(), &state.changes, body)?;

    notifications::dispatch_confirmation(&state, booking.clone());

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "booking": booking })),
    ))
}
