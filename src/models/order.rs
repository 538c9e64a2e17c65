use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stop on the route. Coordinates come from the frontend's address
/// picker; real geocoding is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub label: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Package dimensions in centimeters. Values between 10 and 60 are
/// representable, but an order is only creatable when both sides fit the
/// 40x40 motorcycle box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Waiting,
    Accepted,
    PickingUp,
    Collected,
    InTransit,
    Delivered,
    Finished,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Finished | OrderStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    /// Set exactly when the order leaves WAITING, never cleared afterwards.
    pub courier_id: Option<Uuid>,
    pub package_count: u32,
    pub dimensions: Dimensions,
    pub pickup_addresses: Vec<Address>,
    pub delivery_addresses: Vec<Address>,
    pub distance_km: f64,
    /// Priced once at creation and persisted verbatim. Later constant or
    /// distance changes never touch existing orders.
    pub total_value: f64,
    pub courier_earnings: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub client_rated: bool,
    pub courier_rated: bool,
    pub observations: Option<String>,
}
