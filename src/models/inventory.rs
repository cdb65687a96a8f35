use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::BookingType;

/// Rentable asset. Availability here says nothing about reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub category: RentalCategory,
    pub name: String,
    pub location: Option<String>,
    /// Per day for cars and bikes, per person for adventures.
    pub price: f64,
    pub status: InventoryStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RentalCategory {
    Car,
    Bike,
    Adventure,
}

impl RentalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalCategory::Car => "car",
            RentalCategory::Bike => "bike",
            RentalCategory::Adventure => "adventure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "car" | "cars" => Some(RentalCategory::Car),
            "bike" | "bikes" => Some(RentalCategory::Bike),
            "adventure" | "adventures" => Some(RentalCategory::Adventure),
            _ => None,
        }
    }

    pub fn table(&self) -> &'static str {
        self.booking_type().item_table()
    }

    pub fn booking_type(&self) -> BookingType {
        match self {
            RentalCategory::Car => BookingType::Car,
            RentalCategory::Bike => BookingType::Bike,
            RentalCategory::Adventure => BookingType::Adventure,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    Available,
    Booked,
    Maintenance,
    Active,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Available => "available",
            InventoryStatus::Booked => "booked",
            InventoryStatus::Maintenance => "maintenance",
            InventoryStatus::Active => "active",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(InventoryStatus::Available),
            "booked" => Some(InventoryStatus::Booked),
            "maintenance" => Some(InventoryStatus::Maintenance),
            "active" => Some(InventoryStatus::Active),
            _ => None,
        }
    }
}
