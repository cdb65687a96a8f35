use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::extract::AppQuery;
use crate::models::{EarlyHotel, Hotel, InventoryItem, RentalCategory};
use crate::services::catalog;
use crate::services::pricing::{self, Quote};
use crate::state::AppState;

pub(crate) fn parse_category(raw: &str) -> Result<RentalCategory, AppError> {
    RentalCategory::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("unknown rental category: {raw}")))
}

// GET /api/hotels
#[derive(Deserialize)]
pub struct HotelsQuery {
    pub location: Option<String>,
}

pub async fn list_hotels(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<HotelsQuery>,
) -> Result<Json<Vec<Hotel>>, AppError> {
    let hotels = state.store.list_hotels(query.location.as_deref())?;
    Ok(Json(hotels))
}

// GET /api/early-hotels
pub async fn list_early_hotels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EarlyHotel>>, AppError> {
    Ok(Json(state.store.list_early_hotels()?))
}

// GET /api/hotels/:id/quote
#[derive(Deserialize)]
pub struct QuoteQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

pub async fn quote_hotel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<QuoteQuery>,
) -> Result<Json<Quote>, AppError> {
    let rate = match state.store.get_hotel(&id)? {
        Some(hotel) => hotel.price_per_night,
        None => state
            .store
            .get_early_hotel(&id)?
            .map(|early| early.hotel.price_per_night)
            .ok_or_else(|| AppError::NotFound(format!("hotel {id}")))?,
    };

    let quote = pricing::quote_stay(rate, query.check_in, query.check_out)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(quote))
}

// GET /api/rentals/:category
pub async fn list_rentals(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let category = parse_category(&category)?;
    Ok(Json(catalog::fetch_inventory(state.store.as_ref(), category)?))
}
