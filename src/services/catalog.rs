use std::cmp::Ordering;

use crate::db::BookingStore;
use crate::models::{
    BookingFilter, BookingType, BookingView, InventoryItem, RentalCategory, SortKey, SortOrder,
};

fn fetch(store: &dyn BookingStore, types: &[BookingType]) -> anyhow::Result<Vec<BookingView>> {
    let mut views = Vec::new();
    for t in types {
        views.extend(store.list_booking_views(*t)?);
    }
    views.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
    Ok(views)
}

/// Hotel and early-check-in hotel bookings, with the hotel name resolved.
pub fn fetch_hotel_bookings(store: &dyn BookingStore) -> anyhow::Result<Vec<BookingView>> {
    fetch(store, &[BookingType::Hotel, BookingType::EarlyHotel])
}

/// Reservations of one rental category. Inventory rows are never reported
/// as bookings: no reservations means an empty list.
pub fn fetch_rental_bookings(
    store: &dyn BookingStore,
    category: RentalCategory,
) -> anyhow::Result<Vec<BookingView>> {
    fetch(store, &[category.booking_type()])
}

pub fn fetch_car_bookings(store: &dyn BookingStore) -> anyhow::Result<Vec<BookingView>> {
    fetch_rental_bookings(store, RentalCategory::Car)
}

pub fn fetch_bike_bookings(store: &dyn BookingStore) -> anyhow::Result<Vec<BookingView>> {
    fetch_rental_bookings(store, RentalCategory::Bike)
}

pub fn fetch_adventure_bookings(store: &dyn BookingStore) -> anyhow::Result<Vec<BookingView>> {
    fetch_rental_bookings(store, RentalCategory::Adventure)
}

/// Unified admin view across every category, newest first.
pub fn fetch_all_bookings(store: &dyn BookingStore) -> anyhow::Result<Vec<BookingView>> {
    fetch(store, &BookingType::ALL)
}

pub fn fetch_inventory(
    store: &dyn BookingStore,
    category: RentalCategory,
) -> anyhow::Result<Vec<InventoryItem>> {
    store.list_inventory(category)
}

fn matches(view: &BookingView, filter: &BookingFilter) -> bool {
    let b = &view.booking;
    if filter.status.is_some_and(|s| s != b.booking_status) {
        return false;
    }
    if filter.payment_status.is_some_and(|s| s != b.payment_status) {
        return false;
    }
    if filter.booking_type.is_some_and(|t| t != b.booking_type) {
        return false;
    }
    if filter.check_in_from.is_some_and(|d| b.check_in_date < d) {
        return false;
    }
    if filter.check_in_to.is_some_and(|d| b.check_in_date > d) {
        return false;
    }
    match filter.search.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => {
            let q = q.to_lowercase();
            b.guest_name.to_lowercase().contains(&q) || b.guest_email.to_lowercase().contains(&q)
        }
        _ => true,
    }
}

/// Filters and sorts an already fetched list, the way the admin table does.
pub fn filter_bookings(views: Vec<BookingView>, filter: &BookingFilter) -> Vec<BookingView> {
    let mut out: Vec<BookingView> = views.into_iter().filter(|v| matches(v, filter)).collect();

    out.sort_by(|a, b| {
        let (a, b) = (&a.booking, &b.booking);
        let ord = match filter.sort {
            SortKey::CheckIn => a.check_in_date.cmp(&b.check_in_date),
            SortKey::TotalPrice => a
                .total_price
                .partial_cmp(&b.total_price)
                .unwrap_or(Ordering::Equal),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match filter.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    out
}
