pub mod bookings;
pub mod catalog;
pub mod export;
pub mod notifications;
pub mod pricing;
pub mod realtime;
