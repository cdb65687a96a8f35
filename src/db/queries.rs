use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::models::{
    Booking, BookingStatus, BookingType, BookingView, EarlyHotel, Hotel, InventoryItem,
    InventoryStatus, PaymentStatus, RentalCategory,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "b.id, b.user_id, b.booking_type, b.item_id, b.guest_name, b.guest_email, \
     b.guest_phone, b.check_in_date, b.check_out_date, b.number_of_guests, b.base_price, \
     b.tax_amount, b.total_price, b.booking_status, b.payment_status, b.special_requests, \
     b.created_at, b.updated_at";

fn now_str() -> String {
    Utc::now().naive_utc().format(DATETIME_FORMAT).to_string()
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, user_id, booking_type, item_id, guest_name, guest_email, guest_phone,
                               check_in_date, check_out_date, number_of_guests, base_price, tax_amount,
                               total_price, booking_status, payment_status, special_requests,
                               created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            booking.id,
            booking.user_id,
            booking.booking_type.as_str(),
            booking.item_id,
            booking.guest_name,
            booking.guest_email,
            booking.guest_phone,
            booking.check_in_date.format(DATE_FORMAT).to_string(),
            booking.check_out_date.format(DATE_FORMAT).to_string(),
            booking.number_of_guests,
            booking.base_price,
            booking.tax_amount,
            booking.total_price,
            booking.booking_status.as_str(),
            booking.payment_status.as_str(),
            booking.special_requests,
            booking.created_at.format(DATETIME_FORMAT).to_string(),
            booking.updated_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1");
    let result = conn
        .query_row(&sql, params![id], |row| Ok(parse_booking_row(row)))
        .optional()?;

    result.transpose()
}

pub fn get_bookings(
    conn: &Connection,
    booking_type: Option<BookingType>,
) -> anyhow::Result<Vec<Booking>> {
    let mut bookings = vec![];
    match booking_type {
        Some(t) => {
            let sql = format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.booking_type = ?1 ORDER BY b.created_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![t.as_str()], |row| Ok(parse_booking_row(row)))?;
            for row in rows {
                bookings.push(row??);
            }
        }
        None => {
            let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings b ORDER BY b.created_at DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;
            for row in rows {
                bookings.push(row??);
            }
        }
    }
    Ok(bookings)
}

/// Bookings of one type joined with the name of the item they reference.
pub fn get_booking_views(
    conn: &Connection,
    booking_type: BookingType,
) -> anyhow::Result<Vec<BookingView>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS}, i.name
         FROM bookings b LEFT JOIN {table} i ON i.id = b.item_id
         WHERE b.booking_type = ?1
         ORDER BY b.created_at DESC",
        table = booking_type.item_table(),
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![booking_type.as_str()], |row| {
        let item_name: Option<String> = row.get(18)?;
        Ok(parse_booking_row(row).map(|booking| BookingView { booking, item_name }))
    })?;

    let mut views = vec![];
    for row in rows {
        views.push(row??);
    }
    Ok(views)
}

/// Compare-and-set on `booking_status`. Returns false when the row is gone or
/// its status no longer equals `expected`.
pub fn set_booking_status(
    conn: &Connection,
    id: &str,
    expected: BookingStatus,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET booking_status = ?1, updated_at = ?2 WHERE id = ?3 AND booking_status = ?4",
        params![status.as_str(), now_str(), id, expected.as_str()],
    )?;
    Ok(count > 0)
}

pub fn set_payment_status(
    conn: &Connection,
    id: &str,
    expected: PaymentStatus,
    status: PaymentStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET payment_status = ?1, updated_at = ?2 WHERE id = ?3 AND payment_status = ?4",
        params![status.as_str(), now_str(), id, expected.as_str()],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let booking_type_str: String = row.get(2)?;
    let check_in_str: String = row.get(7)?;
    let check_out_str: String = row.get(8)?;
    let booking_status_str: String = row.get(13)?;
    let payment_status_str: String = row.get(14)?;
    let created_at_str: String = row.get(16)?;
    let updated_at_str: String = row.get(17)?;

    let booking_type = BookingType::parse(&booking_type_str)
        .ok_or_else(|| anyhow::anyhow!("unknown booking_type in row: {booking_type_str}"))?;
    let booking_status = BookingStatus::parse(&booking_status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown booking_status in row: {booking_status_str}"))?;
    let payment_status = PaymentStatus::parse(&payment_status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown payment_status in row: {payment_status_str}"))?;

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        booking_type,
        item_id: row.get(3)?,
        guest_name: row.get(4)?,
        guest_email: row.get(5)?,
        guest_phone: row.get(6)?,
        check_in_date: NaiveDate::parse_from_str(&check_in_str, DATE_FORMAT)?,
        check_out_date: NaiveDate::parse_from_str(&check_out_str, DATE_FORMAT)?,
        number_of_guests: row.get(9)?,
        base_price: row.get(10)?,
        tax_amount: row.get(11)?,
        total_price: row.get(12)?,
        booking_status,
        payment_status,
        special_requests: row.get(15)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

// ── Hotels ──

pub fn insert_hotel(conn: &Connection, hotel: &Hotel) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO hotels (id, name, location, price_per_night, rating, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            hotel.id,
            hotel.name,
            hotel.location,
            hotel.price_per_night,
            hotel.rating,
            hotel.status,
            hotel.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Escapes `LIKE` wildcards so user input matches literally under `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `location` matches case-insensitively anywhere in the hotel's location.
pub fn get_hotels(conn: &Connection, location: Option<&str>) -> anyhow::Result<Vec<Hotel>> {
    let pattern = format!("%{}%", escape_like(location.unwrap_or("").trim()));
    let mut stmt = conn.prepare(
        "SELECT id, name, location, price_per_night, rating, status, created_at
         FROM hotels WHERE location LIKE ?1 ESCAPE '\\' ORDER BY name ASC",
    )?;
    let rows = stmt.query_map(params![pattern], parse_hotel_row)?;

    let mut hotels = vec![];
    for row in rows {
        hotels.push(row?);
    }
    Ok(hotels)
}

pub fn get_hotel_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Hotel>> {
    let hotel = conn
        .query_row(
            "SELECT id, name, location, price_per_night, rating, status, created_at
             FROM hotels WHERE id = ?1",
            params![id],
            parse_hotel_row,
        )
        .optional()?;
    Ok(hotel)
}

fn parse_hotel_row(row: &rusqlite::Row) -> rusqlite::Result<Hotel> {
    let created_at_str: String = row.get(6)?;
    Ok(Hotel {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        price_per_night: row.get(3)?,
        rating: row.get(4)?,
        status: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

pub fn insert_early_hotel(conn: &Connection, early: &EarlyHotel) -> anyhow::Result<()> {
    let hotel = &early.hotel;
    conn.execute(
        "INSERT INTO early_hotels (id, name, location, price_per_night, rating, status, early_checkin_hour, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            hotel.id,
            hotel.name,
            hotel.location,
            hotel.price_per_night,
            hotel.rating,
            hotel.status,
            early.early_checkin_hour,
            hotel.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_early_hotels(conn: &Connection) -> anyhow::Result<Vec<EarlyHotel>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, location, price_per_night, rating, status, created_at, early_checkin_hour
         FROM early_hotels ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], parse_early_hotel_row)?;

    let mut hotels = vec![];
    for row in rows {
        hotels.push(row?);
    }
    Ok(hotels)
}

pub fn get_early_hotel_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<EarlyHotel>> {
    let hotel = conn
        .query_row(
            "SELECT id, name, location, price_per_night, rating, status, created_at, early_checkin_hour
             FROM early_hotels WHERE id = ?1",
            params![id],
            parse_early_hotel_row,
        )
        .optional()?;
    Ok(hotel)
}

fn parse_early_hotel_row(row: &rusqlite::Row) -> rusqlite::Result<EarlyHotel> {
    Ok(EarlyHotel {
        hotel: parse_hotel_row(row)?,
        early_checkin_hour: row.get(7)?,
    })
}

// ── Inventory ──

pub fn insert_inventory_item(conn: &Connection, item: &InventoryItem) -> anyhow::Result<()> {
    let sql = format!(
        "INSERT INTO {} (id, name, location, price, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        item.category.table()
    );
    conn.execute(
        &sql,
        params![
            item.id,
            item.name,
            item.location,
            item.price,
            item.status.as_str(),
            item.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_inventory(
    conn: &Connection,
    category: RentalCategory,
) -> anyhow::Result<Vec<InventoryItem>> {
    let sql = format!(
        "SELECT id, name, location, price, status, created_at FROM {} ORDER BY created_at DESC",
        category.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let status_str: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, f64>(3)?,
            status_str,
            created_at_str,
        ))
    })?;

    let mut items = vec![];
    for row in rows {
        let (id, name, location, price, status_str, created_at_str) = row?;
        let status = InventoryStatus::parse(&status_str)
            .ok_or_else(|| anyhow::anyhow!("unknown inventory status in {}: {status_str}", category.table()))?;
        items.push(InventoryItem {
            id,
            category,
            name,
            location,
            price,
            status,
            created_at: parse_datetime(&created_at_str),
        });
    }
    Ok(items)
}

pub fn set_inventory_status(
    conn: &Connection,
    category: RentalCategory,
    id: &str,
    status: InventoryStatus,
) -> anyhow::Result<bool> {
    let sql = format!("UPDATE {} SET status = ?1 WHERE id = ?2", category.table());
    let count = conn.execute(&sql, params![status.as_str(), id])?;
    Ok(count > 0)
}

// ── Dashboard ──

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_bookings: i64,
    pub by_status: BTreeMap<String, i64>,
    pub by_type: BTreeMap<String, i64>,
    /// Sum of `total_price` over paid bookings.
    pub revenue: f64,
    pub pending_payments: i64,
    pub upcoming_check_ins: i64,
}

pub fn get_dashboard_stats(conn: &Connection) -> anyhow::Result<DashboardStats> {
    let today = Utc::now().date_naive().format(DATE_FORMAT).to_string();

    let total_bookings: i64 =
        conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;

    let mut by_status: BTreeMap<String, i64> = BookingStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut stmt =
        conn.prepare("SELECT booking_status, COUNT(*) FROM bookings GROUP BY booking_status")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
    for row in rows {
        let (status, count) = row?;
        by_status.insert(status, count);
    }

    let mut by_type: BTreeMap<String, i64> = BookingType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), 0))
        .collect();
    let mut stmt =
        conn.prepare("SELECT booking_type, COUNT(*) FROM bookings GROUP BY booking_type")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
    for row in rows {
        let (booking_type, count) = row?;
        by_type.insert(booking_type, count);
    }

    let revenue: f64 = conn.query_row(
        "SELECT COALESCE(SUM(total_price), 0.0) FROM bookings WHERE payment_status = 'paid'",
        [],
        |row| row.get(0),
    )?;

    let pending_payments: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE payment_status = 'pending'",
        [],
        |row| row.get(0),
    )?;

    let upcoming_check_ins: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE booking_status = 'confirmed' AND check_in_date >= ?1",
        params![today],
        |row| row.get(0),
    )?;

    Ok(DashboardStats {
        total_bookings,
        by_status,
        by_type,
        revenue,
        pending_payments,
        upcoming_check_ins,
    })
}
