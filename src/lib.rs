pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/hotels", get(handlers::catalog::list_hotels))
        .route("/api/hotels/:id/quote", get(handlers::catalog::quote_hotel))
        .route("/api/early-hotels", get(handlers::catalog::list_early_hotels))
        .route("/api/rentals/:category", get(handlers::catalog::list_rentals))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/events", get(handlers::events::booking_events))
        .route("/api/admin/stats", get(handlers::admin::get_stats))
        .route("/api/admin/bookings", get(handlers::admin::list_bookings))
        .route(
            "/api/admin/bookings/export.csv",
            get(handlers::admin::export_bookings),
        )
        .route(
            "/api/admin/bookings/by-type/:category",
            get(handlers::admin::list_bookings_by_type),
        )
        .route(
            "/api/admin/bookings/:id",
            delete(handlers::admin::delete_booking),
        )
        .route(
            "/api/admin/bookings/:id/status",
            post(handlers::admin::update_booking_status),
        )
        .route(
            "/api/admin/bookings/:id/payment",
            post(handlers::admin::update_payment_status),
        )
        .route("/api/admin/hotels", post(handlers::admin::create_hotel))
        .route(
            "/api/admin/early-hotels",
            post(handlers::admin::create_early_hotel),
        )
        .route(
            "/api/admin/rentals/:category",
            post(handlers::admin::create_rental),
        )
        .route(
            "/api/admin/rentals/:category/:id/status",
            post(handlers::admin::update_rental_status),
        )
        .with_state(state)
}
