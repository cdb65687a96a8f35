use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub location: String,
    pub price_per_night: f64,
    pub rating: Option<f64>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarlyHotel {
    #[serde(flatten)]
    pub hotel: Hotel,
    /// Earliest check-in hour of the day, 0-23.
    pub early_checkin_hour: u32,
}
