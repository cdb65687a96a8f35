pub mod migrations;
pub mod queries;

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use rusqlite::Connection;

use crate::models::{
    Booking, BookingStatus, BookingType, BookingView, EarlyHotel, Hotel, InventoryItem,
    InventoryStatus, PaymentStatus, RentalCategory,
};

pub use queries::DashboardStats;

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Everything the services need from the system of record. Service functions
/// take `&dyn BookingStore` so tests can substitute their own implementation.
pub trait BookingStore: Send + Sync {
    fn insert_booking(&self, booking: &Booking) -> anyhow::Result<()>;
    fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>>;
    fn list_bookings(&self, booking_type: Option<BookingType>) -> anyhow::Result<Vec<Booking>>;
    fn list_booking_views(&self, booking_type: BookingType) -> anyhow::Result<Vec<BookingView>>;
    fn set_booking_status(
        &self,
        id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> anyhow::Result<bool>;
    fn set_payment_status(
        &self,
        id: &str,
        expected: PaymentStatus,
        status: PaymentStatus,
    ) -> anyhow::Result<bool>;
    fn delete_booking(&self, id: &str) -> anyhow::Result<bool>;

    fn insert_hotel(&self, hotel: &Hotel) -> anyhow::Result<()>;
    fn list_hotels(&self, location: Option<&str>) -> anyhow::Result<Vec<Hotel>>;
    fn get_hotel(&self, id: &str) -> anyhow::Result<Option<Hotel>>;
    fn insert_early_hotel(&self, hotel: &EarlyHotel) -> anyhow::Result<()>;
    fn list_early_hotels(&self) -> anyhow::Result<Vec<EarlyHotel>>;
    fn get_early_hotel(&self, id: &str) -> anyhow::Result<Option<EarlyHotel>>;

    fn insert_inventory_item(&self, item: &InventoryItem) -> anyhow::Result<()>;
    fn list_inventory(&self, category: RentalCategory) -> anyhow::Result<Vec<InventoryItem>>;
    fn set_inventory_status(
        &self,
        category: RentalCategory,
        id: &str,
        status: InventoryStatus,
    ) -> anyhow::Result<bool>;

    fn dashboard_stats(&self) -> anyhow::Result<DashboardStats>;
}

/// SQLite-backed store. The connection is locked per call and never held
/// across an await point.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self::new(init_db(path)?))
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection mutex poisoned"))
    }
}

impl BookingStore for SqliteStore {
    fn insert_booking(&self, booking: &Booking) -> anyhow::Result<()> {
        let conn = self.lock()?;
        queries::insert_booking(&conn, booking)
    }

    fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        let conn = self.lock()?;
        queries::get_booking_by_id(&conn, id)
    }

    fn list_bookings(&self, booking_type: Option<BookingType>) -> anyhow::Result<Vec<Booking>> {
        let conn = self.lock()?;
        queries::get_bookings(&conn, booking_type)
    }

    fn list_booking_views(&self, booking_type: BookingType) -> anyhow::Result<Vec<BookingView>> {
        let conn = self.lock()?;
        queries::get_booking_views(&conn, booking_type)
    }

    fn set_booking_status(
        &self,
        id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> anyhow::Result<bool> {
        let conn = self.lock()?;
        queries::set_booking_status(&conn, id, expected, status)
    }

    fn set_payment_status(
        &self,
        id: &str,
        expected: PaymentStatus,
        status: PaymentStatus,
    ) -> anyhow::Result<bool> {
        let conn = self.lock()?;
        queries::set_payment_status(&conn, id, expected, status)
    }

    fn delete_booking(&self, id: &str) -> anyhow::Result<bool> {
        let conn = self.lock()?;
        queries::delete_booking(&conn, id)
    }

    fn insert_hotel(&self, hotel: &Hotel) -> anyhow::Result<()> {
        let conn = self.lock()?;
        queries::insert_hotel(&conn, hotel)
    }

    fn list_hotels(&self, location: Option<&str>) -> anyhow::Result<Vec<Hotel>> {
        let conn = self.lock()?;
        queries::get_hotels(&conn, location)
    }

    fn get_hotel(&self, id: &str) -> anyhow::Result<Option<Hotel>> {
        let conn = self.lock()?;
        queries::get_hotel_by_id(&conn, id)
    }

    fn insert_early_hotel(&self, hotel: &EarlyHotel) -> anyhow::Result<()> {
        let conn = self.lock()?;
        queries::insert_early_hotel(&conn, hotel)
    }

    fn list_early_hotels(&self) -> anyhow::Result<Vec<EarlyHotel>> {
        let conn = self.lock()?;
        queries::get_early_hotels(&conn)
    }

    fn get_early_hotel(&self, id: &str) -> anyhow::Result<Option<EarlyHotel>> {
        let conn = self.lock()?;
        queries::get_early_hotel_by_id(&conn, id)
    }

    fn insert_inventory_item(&self, item: &InventoryItem) -> anyhow::Result<()> {
        let conn = self.lock()?;
        queries::insert_inventory_item(&conn, item)
    }

    fn list_inventory(&self, category: RentalCategory) -> anyhow::Result<Vec<InventoryItem>> {
        let conn = self.lock()?;
        queries::get_inventory(&conn, category)
    }

    fn set_inventory_status(
        &self,
        category: RentalCategory,
        id: &str,
        status: InventoryStatus,
    ) -> anyhow::Result<bool> {
        let conn = self.lock()?;
        queries::set_inventory_status(&conn, category, id, status)
    }

    fn dashboard_stats(&self) -> anyhow::Result<DashboardStats> {
        let conn = self.lock()?;
        queries::get_dashboard_stats(&conn)
    }
}
