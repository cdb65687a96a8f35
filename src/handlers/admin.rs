use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::DashboardStats;
use crate::errors::AppError;
use crate::models::{
    BookingFilter, BookingView, EarlyHotel, Hotel, InventoryItem, InventoryStatus,
};
use crate::services::{bookings, catalog, export};
use crate::state::AppState;

use super::catalog::parse_category;
use super::extract::{AppJson, AppQuery};
use super::check_auth;

// GET /api/admin/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppQuery(filter): AppQuery<BookingFilter>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let views = catalog::fetch_all_bookings(state.store.as_ref())?;
    Ok(Json(catalog::filter_bookings(views, &filter)))
}

// GET /api/admin/bookings/export.csv
pub async fn export_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppQuery(filter): AppQuery<BookingFilter>,
) -> Result<Response, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let views = catalog::filter_bookings(catalog::fetch_all_bookings(state.store.as_ref())?, &filter);
    let csv = export::bookings_to_csv(&views);
    let filename = format!("bookings-{}.csv", Utc::now().format("%Y-%m-%d"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

// GET /api/admin/bookings/by-type/:category
pub async fn list_bookings_by_type(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(category): Path<String>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let store = state.store.as_ref();
    let views = match category.trim().to_lowercase().as_str() {
        "hotel" | "hotels" => catalog::fetch_hotel_bookings(store)?,
        other => catalog::fetch_rental_bookings(store, parse_category(other)?)?,
    };
    Ok(Json(views))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

// POST /api/admin/bookings/:id/status
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    AppJson(body): AppJson<StatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking =
        bookings::update_booking_status(state.store.as_ref(), &state.changes, &id, &body.status)?;
    Ok(Json(serde_json::json!({ "success": true, "booking": booking })))
}

// POST /api/admin/bookings/:id/payment
pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    AppJson(body): AppJson<StatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking =
        bookings::update_payment_status(state.store.as_ref(), &state.changes, &id, &body.status)?;
    Ok(Json(serde_json::json!({ "success": true, "booking": booking })))
}

// DELETE /api/admin/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    bookings::delete_booking(state.store.as_ref(), &state.changes, &id)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    Ok(Json(state.store.dashboard_stats()?))
}

// ── Catalog management ──

#[derive(Deserialize)]
pub struct CreateHotelRequest {
    pub name: String,
    pub location: String,
    pub price_per_night: f64,
    pub rating: Option<f64>,
    pub status: Option<String>,
    /// Only read for early-check-in hotels.
    pub early_checkin_hour: Option<u32>,
}

impl CreateHotelRequest {
    fn into_hotel(self) -> Result<(Hotel, Option<u32>), AppError> {
        if self.name.trim().is_empty() || self.location.trim().is_empty() {
            return Err(AppError::BadRequest("name and location are required".to_string()));
        }
        if self.price_per_night < 0.0 {
            return Err(AppError::BadRequest("price_per_night must not be negative".to_string()));
        }
        let hotel = Hotel {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            location: self.location.trim().to_string(),
            price_per_night: self.price_per_night,
            rating: self.rating,
            status: self.status.unwrap_or_else(|| "active".to_string()),
            created_at: Utc::now().naive_utc(),
        };
        Ok((hotel, self.early_checkin_hour))
    }
}

// POST /api/admin/hotels
pub async fn create_hotel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(body): AppJson<CreateHotelRequest>,
) -> Result<(StatusCode, Json<Hotel>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (hotel, _) = body.into_hotel()?;
    state.store.insert_hotel(&hotel)?;
    tracing::info!(hotel_id = %hotel.id, name = %hotel.name, "hotel created");
    Ok((StatusCode::CREATED, Json(hotel)))
}

// POST /api/admin/early-hotels
pub async fn create_early_hotel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(body): AppJson<CreateHotelRequest>,
) -> Result<(StatusCode, Json<EarlyHotel>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let (hotel, hour) = body.into_hotel()?;
    let early_checkin_hour = hour.unwrap_or(6);
    if early_checkin_hour > 23 {
        return Err(AppError::BadRequest("early_checkin_hour must be 0-23".to_string()));
    }
    let early = EarlyHotel {
        hotel,
        early_checkin_hour,
    };
    state.store.insert_early_hotel(&early)?;
    tracing::info!(hotel_id = %early.hotel.id, "early check-in hotel created");
    Ok((StatusCode::CREATED, Json(early)))
}

#[derive(Deserialize)]
pub struct CreateRentalRequest {
    pub name: String,
    pub location: Option<String>,
    pub price: f64,
    pub status: Option<InventoryStatus>,
}

// POST /api/admin/rentals/:category
pub async fn create_rental(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(category): Path<String>,
    AppJson(body): AppJson<CreateRentalRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let category = parse_category(&category)?;
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if body.price < 0.0 {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }

    let item = InventoryItem {
        id: uuid::Uuid::new_v4().to_string(),
        category,
        name: body.name.trim().to_string(),
        location: body.location,
        price: body.price,
        status: body.status.unwrap_or(InventoryStatus::Available),
        created_at: Utc::now().naive_utc(),
    };
    state.store.insert_inventory_item(&item)?;
    tracing::info!(item_id = %item.id, category = category.as_str(), "rental item created");
    Ok((StatusCode::CREATED, Json(item)))
}

// POST /api/admin/rentals/:category/:id/status
pub async fn update_rental_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((category, id)): Path<(String, String)>,
    AppJson(body): AppJson<StatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let category = parse_category(&category)?;
    let status = InventoryStatus::parse(&body.status)
        .ok_or_else(|| AppError::BadRequest(format!("invalid status: {}", body.status)))?;

    if !state.store.set_inventory_status(category, &id, status)? {
        return Err(AppError::NotFound(format!("{} {id}", category.as_str())));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
