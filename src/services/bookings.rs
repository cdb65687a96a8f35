use chrono::{NaiveDate, SubsecRound, Utc};

use crate::db::BookingStore;
use crate::models::{
    Booking, BookingChange, BookingStatus, BookingType, NewBooking, PaymentStatus,
};
use crate::services::pricing;
use crate::services::realtime::ChangeBus;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid booking: {0}")]
    Invalid(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("cannot change status from {from} to {to}")]
    IllegalTransition { from: &'static str, to: &'static str },

    #[error("booking not found: {0}")]
    NotFound(String),

    #[error("booking {0} was modified concurrently, reload and retry")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

fn required_str<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, BookingError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BookingError::MissingField(field)),
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| BookingError::Invalid(format!("{field} must be a YYYY-MM-DD date, got {value:?}")))
}

fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates, prices and stores a new booking.
///
/// `total_price` on the request is the pre-tax amount; the stored total
/// includes [`pricing::TAX_RATE`]. Nothing is written when validation fails.
pub fn add_booking(
    store: &dyn BookingStore,
    bus: &ChangeBus,
    input: NewBooking,
) -> Result<Booking, BookingError> {
    let guest_name = required_str(&input.guest_name, "guest_name")?;
    let guest_email = required_str(&input.guest_email, "guest_email")?;
    let check_in = required_str(&input.check_in_date, "check_in_date")?;
    let check_out = required_str(&input.check_out_date, "check_out_date")?;
    let number_of_guests = input
        .number_of_guests
        .ok_or(BookingError::MissingField("number_of_guests"))?;
    let booking_type = required_str(&input.booking_type, "booking_type")?;

    let booking_type = BookingType::parse(booking_type)
        .ok_or_else(|| BookingError::Invalid(format!("unknown booking_type {booking_type:?}")))?;
    let check_in_date = parse_date(check_in, "check_in_date")?;
    let check_out_date = parse_date(check_out, "check_out_date")?;

    // Blank statuses fall back to the defaults, same as an absent field
    let booking_status = match optional_trimmed(input.booking_status) {
        Some(s) => BookingStatus::parse(&s).ok_or(BookingError::InvalidStatus(s))?,
        None => BookingStatus::Confirmed,
    };
    let payment_status = match optional_trimmed(input.payment_status) {
        Some(s) => PaymentStatus::parse(&s).ok_or(BookingError::InvalidStatus(s))?,
        None => PaymentStatus::Pending,
    };

    let price = pricing::apply_tax(input.total_price.unwrap_or(0.0));
    // The store keeps whole seconds
    let now = Utc::now().naive_utc().trunc_subsecs(0);

    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: optional_trimmed(input.user_id),
        booking_type,
        item_id: optional_trimmed(input.item_id),
        guest_name: guest_name.to_string(),
        guest_email: guest_email.to_string(),
        guest_phone: optional_trimmed(input.guest_phone),
        check_in_date,
        check_out_date,
        number_of_guests,
        base_price: price.base_price,
        tax_amount: price.tax_amount,
        total_price: price.total_price,
        booking_status,
        payment_status,
        special_requests: optional_trimmed(input.special_requests),
        created_at: now,
        updated_at: now,
    };

    store.insert_booking(&booking)?;

    tracing::info!(
        booking_id = %booking.id,
        booking_type = booking.booking_type.as_str(),
        total_price = booking.total_price,
        "booking created"
    );
    bus.publish(BookingChange::Created {
        booking: booking.clone(),
    });

    Ok(booking)
}

fn load(store: &dyn BookingStore, id: &str) -> Result<Booking, BookingError> {
    store
        .get_booking(id)?
        .ok_or_else(|| BookingError::NotFound(id.to_string()))
}

/// Moves a booking to `status` if the transition table allows it. The write
/// only lands if the status is still the one that was validated against.
pub fn update_booking_status(
    store: &dyn BookingStore,
    bus: &ChangeBus,
    id: &str,
    status: &str,
) -> Result<Booking, BookingError> {
    let next = BookingStatus::parse(status)
        .ok_or_else(|| BookingError::InvalidStatus(status.to_string()))?;
    let current = load(store, id)?.booking_status;

    if !current.can_transition_to(next) {
        return Err(BookingError::IllegalTransition {
            from: current.as_str(),
            to: next.as_str(),
        });
    }

    if !store.set_booking_status(id, current, next)? {
        return Err(BookingError::Conflict(id.to_string()));
    }

    tracing::info!(booking_id = %id, from = current.as_str(), to = next.as_str(), "booking status updated");
    bus.publish(BookingChange::StatusChanged {
        id: id.to_string(),
        booking_status: next,
    });
    load(store, id)
}

pub fn update_payment_status(
    store: &dyn BookingStore,
    bus: &ChangeBus,
    id: &str,
    status: &str,
) -> Result<Booking, BookingError> {
    let next = PaymentStatus::parse(status)
        .ok_or_else(|| BookingError::InvalidStatus(status.to_string()))?;
    let current = load(store, id)?.payment_status;

    if !current.can_transition_to(next) {
        return Err(BookingError::IllegalTransition {
            from: current.as_str(),
            to: next.as_str(),
        });
    }

    if !store.set_payment_status(id, current, next)? {
        return Err(BookingError::Conflict(id.to_string()));
    }

    tracing::info!(booking_id = %id, from = current.as_str(), to = next.as_str(), "payment status updated");
    bus.publish(BookingChange::PaymentChanged {
        id: id.to_string(),
        payment_status: next,
    });
    load(store, id)
}

pub fn delete_booking(store: &dyn BookingStore, bus: &ChangeBus, id: &str) -> Result<(), BookingError> {
    if !store.delete_booking(id)? {
        return Err(BookingError::NotFound(id.to_string()));
    }

    tracing::info!(booking_id = %id, "booking deleted");
    bus.publish(BookingChange::Deleted { id: id.to_string() });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DashboardStats, SqliteStore};
    use crate::models::{
        BookingView, EarlyHotel, Hotel, InventoryItem, InventoryStatus, RentalCategory,
    };

    /// Lets another writer change the status between the read and the
    /// compare-and-set, so every status write loses the race.
    struct RacingStore {
        inner: SqliteStore,
    }

    impl BookingStore for RacingStore {
        fn insert_booking(&self, booking: &Booking) -> anyhow::Result<()> {
            self.inner.insert_booking(booking)
        }
        fn get_booking(&self, id: &str) -> anyhow::Result<Option<Booking>> {
            self.inner.get_booking(id)
        }
        fn list_bookings(&self, t: Option<BookingType>) -> anyhow::Result<Vec<Booking>> {
            self.inner.list_bookings(t)
        }
        fn list_booking_views(&self, t: BookingType) -> anyhow::Result<Vec<BookingView>> {
            self.inner.list_booking_views(t)
        }
        fn set_booking_status(
            &self,
            id: &str,
            expected: BookingStatus,
            status: BookingStatus,
        ) -> anyhow::Result<bool> {
            self.inner.set_booking_status(id, expected, BookingStatus::Cancelled)?;
            self.inner.set_booking_status(id, expected, status)
        }
        fn set_payment_status(
            &self,
            id: &str,
            expected: PaymentStatus,
            status: PaymentStatus,
        ) -> anyhow::Result<bool> {
            self.inner.set_payment_status(id, expected, PaymentStatus::Failed)?;
            self.inner.set_payment_status(id, expected, status)
        }
        fn delete_booking(&self, id: &str) -> anyhow::Result<bool> {
            self.inner.delete_booking(id)
        }
        fn insert_hotel(&self, hotel: &Hotel) -> anyhow::Result<()> {
            self.inner.insert_hotel(hotel)
        }
        fn list_hotels(&self, location: Option<&str>) -> anyhow::Result<Vec<Hotel>> {
            self.inner.list_hotels(location)
        }
        fn get_hotel(&self, id: &str) -> anyhow::Result<Option<Hotel>> {
            self.inner.get_hotel(id)
        }
        fn insert_early_hotel(&self, hotel: &EarlyHotel) -> anyhow::Result<()> {
            self.inner.insert_early_hotel(hotel)
        }
        fn list_early_hotels(&self) -> anyhow::Result<Vec<EarlyHotel>> {
            self.inner.list_early_hotels()
        }
        fn get_early_hotel(&self, id: &str) -> anyhow::Result<Option<EarlyHotel>> {
            self.inner.get_early_hotel(id)
        }
        fn insert_inventory_item(&self, item: &InventoryItem) -> anyhow::Result<()> {
            self.inner.insert_inventory_item(item)
        }
        fn list_inventory(&self, category: RentalCategory) -> anyhow::Result<Vec<InventoryItem>> {
            self.inner.list_inventory(category)
        }
        fn set_inventory_status(
            &self,
            category: RentalCategory,
            id: &str,
            status: InventoryStatus,
        ) -> anyhow::Result<bool> {
            self.inner.set_inventory_status(category, id, status)
        }
        fn dashboard_stats(&self) -> anyhow::Result<DashboardStats> {
            self.inner.dashboard_stats()
        }
    }

    fn setup() -> (SqliteStore, ChangeBus) {
        (SqliteStore::open(":memory:").unwrap(), ChangeBus::new())
    }

    fn valid_input() -> NewBooking {
        NewBooking {
            total_price: Some(1000.0),
            guest_name: Some("A".to_string()),
            guest_email: Some("a@x.com".to_string()),
            check_in_date: Some("2024-01-01".to_string()),
            check_out_date: Some("2024-01-03".to_string()),
            number_of_guests: Some(2),
            booking_type: Some("hotel".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_booking_applies_tax_and_defaults() {
        let (store, bus) = setup();
        let booking = add_booking(&store, &bus, valid_input()).unwrap();

        assert_eq!(booking.total_price, 1100.0);
        assert_eq!(booking.tax_amount, 100.0);
        assert_eq!(booking.base_price, 1000.0);
        assert_eq!(booking.booking_status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);

        let stored = store.get_booking(&booking.id).unwrap().unwrap();
        assert_eq!(stored.total_price, 1100.0);
        assert_eq!(stored.tax_amount, 100.0);
    }

    #[test]
    fn test_add_booking_tax_property() {
        let (store, bus) = setup();
        for p in [0.0, 1.0, 49.5, 123.45, 999.99, 25_000.0] {
            let mut input = valid_input();
            input.total_price = Some(p);
            let booking = add_booking(&store, &bus, input).unwrap();
            assert!((booking.total_price - p * 1.10).abs() < 0.01, "total for {p}");
            assert!((booking.tax_amount - p * 0.10).abs() < 0.01, "tax for {p}");
        }
    }

    #[test]
    fn test_add_booking_missing_fields() {
        let (store, bus) = setup();
        let input = NewBooking {
            guest_name: Some("A".to_string()),
            ..Default::default()
        };
        let err = add_booking(&store, &bus, input).unwrap_err();
        assert!(matches!(err, BookingError::MissingField("guest_email")));
        assert!(store.list_bookings(None).unwrap().is_empty());

        let mut blank = valid_input();
        blank.guest_name = Some("   ".to_string());
        assert!(matches!(
            add_booking(&store, &bus, blank).unwrap_err(),
            BookingError::MissingField("guest_name")
        ));

        let mut no_guests = valid_input();
        no_guests.number_of_guests = None;
        assert!(matches!(
            add_booking(&store, &bus, no_guests).unwrap_err(),
            BookingError::MissingField("number_of_guests")
        ));
        assert!(store.list_bookings(None).unwrap().is_empty());
    }

    #[test]
    fn test_add_booking_rejects_bad_formats() {
        let (store, bus) = setup();
        let mut input = valid_input();
        input.check_in_date = Some("01/01/2024".to_string());
        assert!(matches!(add_booking(&store, &bus, input).unwrap_err(), BookingError::Invalid(_)));

        let mut input = valid_input();
        input.booking_type = Some("spaceship".to_string());
        assert!(matches!(add_booking(&store, &bus, input).unwrap_err(), BookingError::Invalid(_)));

        let mut input = valid_input();
        input.booking_status = Some("whatever".to_string());
        assert!(matches!(
            add_booking(&store, &bus, input).unwrap_err(),
            BookingError::InvalidStatus(_)
        ));
    }

    #[test]
    fn test_add_booking_does_not_check_date_order() {
        let (store, bus) = setup();
        let mut input = valid_input();
        input.check_in_date = Some("2024-02-10".to_string());
        input.check_out_date = Some("2024-02-01".to_string());
        assert!(add_booking(&store, &bus, input).is_ok());
    }

    #[test]
    fn test_duplicate_submissions_create_two_rows() {
        let (store, bus) = setup();
        let a = add_booking(&store, &bus, valid_input()).unwrap();
        let b = add_booking(&store, &bus, valid_input()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_bookings(None).unwrap().len(), 2);
    }

    #[test]
    fn test_status_lifecycle() {
        let (store, bus) = setup();
        let mut input = valid_input();
        input.booking_status = Some("pending".to_string());
        let booking = add_booking(&store, &bus, input).unwrap();

        let b = update_booking_status(&store, &bus, &booking.id, "confirmed").unwrap();
        assert_eq!(b.booking_status, BookingStatus::Confirmed);
        let b = update_booking_status(&store, &bus, &booking.id, "completed").unwrap();
        assert_eq!(b.booking_status, BookingStatus::Completed);

        let err = update_booking_status(&store, &bus, &booking.id, "pending").unwrap_err();
        assert!(matches!(
            err,
            BookingError::IllegalTransition { from: "completed", to: "pending" }
        ));
        let stored = store.get_booking(&booking.id).unwrap().unwrap();
        assert_eq!(stored.booking_status, BookingStatus::Completed);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let (store, bus) = setup();
        let booking = add_booking(&store, &bus, valid_input()).unwrap();
        let err = update_booking_status(&store, &bus, &booking.id, "anything").unwrap_err();
        assert!(matches!(err, BookingError::InvalidStatus(s) if s == "anything"));

        let err = update_payment_status(&store, &bus, &booking.id, "anything").unwrap_err();
        assert!(matches!(err, BookingError::InvalidStatus(_)));
    }

    #[test]
    fn test_update_missing_booking() {
        let (store, bus) = setup();
        let err = update_booking_status(&store, &bus, "nope", "cancelled").unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
        let err = delete_booking(&store, &bus, "nope").unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[test]
    fn test_payment_lifecycle() {
        let (store, bus) = setup();
        let booking = add_booking(&store, &bus, valid_input()).unwrap();

        let b = update_payment_status(&store, &bus, &booking.id, "paid").unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Paid);
        let b = update_payment_status(&store, &bus, &booking.id, "refunded").unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Refunded);

        let err = update_payment_status(&store, &bus, &booking.id, "paid").unwrap_err();
        assert!(matches!(err, BookingError::IllegalTransition { .. }));
    }

    #[test]
    fn test_delete_booking() {
        let (store, bus) = setup();
        let booking = add_booking(&store, &bus, valid_input()).unwrap();
        delete_booking(&store, &bus, &booking.id).unwrap();
        assert!(store.get_booking(&booking.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_each_mutation_publishes_one_change() {
        let (store, bus) = setup();
        let mut rx = bus.subscribe();

        let booking = add_booking(&store, &bus, valid_input()).unwrap();
        update_booking_status(&store, &bus, &booking.id, "cancelled").unwrap();
        update_payment_status(&store, &bus, &booking.id, "failed").unwrap();
        delete_booking(&store, &bus, &booking.id).unwrap();
        // Failed operations publish nothing
        let _ = update_booking_status(&store, &bus, &booking.id, "confirmed");

        let kinds: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|c| c.kind())
            .collect();
        assert_eq!(kinds, vec!["created", "status_changed", "payment_changed", "deleted"]);
    }

    #[tokio::test]
    async fn test_lost_update_is_a_conflict() {
        let store = RacingStore {
            inner: SqliteStore::open(":memory:").unwrap(),
        };
        let bus = ChangeBus::new();
        let mut input = valid_input();
        input.booking_status = Some("pending".to_string());
        let booking = add_booking(&store, &bus, input).unwrap();
        let mut rx = bus.subscribe();

        let err = update_booking_status(&store, &bus, &booking.id, "confirmed").unwrap_err();
        assert!(matches!(err, BookingError::Conflict(ref id) if *id == booking.id));
        let err = update_payment_status(&store, &bus, &booking.id, "paid").unwrap_err();
        assert!(matches!(err, BookingError::Conflict(_)));

        // The competing writes stand and nothing was announced
        let stored = store.get_booking(&booking.id).unwrap().unwrap();
        assert_eq!(stored.booking_status, BookingStatus::Cancelled);
        assert_eq!(stored.payment_status, PaymentStatus::Failed);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_blank_statuses_use_defaults() {
        let (store, bus) = setup();
        let mut input = valid_input();
        input.booking_status = Some(String::new());
        input.payment_status = Some("  ".to_string());

        let booking = add_booking(&store, &bus, input).unwrap();
        assert_eq!(booking.booking_status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_returned_booking_matches_stored_row() {
        let (store, bus) = setup();
        let created = add_booking(&store, &bus, valid_input()).unwrap();
        let stored = store.get_booking(&created.id).unwrap().unwrap();
        assert_eq!(created.created_at, stored.created_at);
        assert_eq!(created.updated_at, stored.updated_at);

        let updated = update_booking_status(&store, &bus, &created.id, "cancelled").unwrap();
        let stored = store.get_booking(&created.id).unwrap().unwrap();
        assert_eq!(updated.booking_status, BookingStatus::Cancelled);
        assert_eq!(updated.updated_at, stored.updated_at);
        assert!(updated.updated_at >= created.updated_at);

        let updated = update_payment_status(&store, &bus, &created.id, "paid").unwrap();
        let stored = store.get_booking(&created.id).unwrap().unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
        assert_eq!(updated.updated_at, stored.updated_at);
    }
}
