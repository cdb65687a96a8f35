use serde::{Deserialize, Serialize};

use super::{Booking, BookingStatus, PaymentStatus};

/// Row-level change on the bookings table, published after the write succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BookingChange {
    Created {
        booking: Booking,
    },
    StatusChanged {
        id: String,
        booking_status: BookingStatus,
    },
    PaymentChanged {
        id: String,
        payment_status: PaymentStatus,
    },
    Deleted {
        id: String,
    },
}

impl BookingChange {
    pub fn booking_id(&self) -> &str {
        match self {
            BookingChange::Created { booking } => &booking.id,
            BookingChange::StatusChanged { id, .. }
            | BookingChange::PaymentChanged { id, .. }
            | BookingChange::Deleted { id } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BookingChange::Created { .. } => "created",
            BookingChange::StatusChanged { .. } => "status_changed",
            BookingChange::PaymentChanged { .. } => "payment_changed",
            BookingChange::Deleted { .. } => "deleted",
        }
    }
}
