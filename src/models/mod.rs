pub mod booking;
pub mod change;
pub mod hotel;
pub mod inventory;

pub use booking::{
    Booking, BookingFilter, BookingStatus, BookingType, BookingView, NewBooking, PaymentStatus,
    SortKey, SortOrder,
};
pub use change::BookingChange;
pub use hotel::{EarlyHotel, Hotel};
pub use inventory::{InventoryItem, InventoryStatus, RentalCategory};
