use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Client,
    Courier,
    Admin,
}

/// Account record. Couriers carry the same fields plus a vehicle plate;
/// profile and courier extension share the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Fixed at registration.
    pub role: UserRole,
    pub phone: String,
    pub document: String,
    pub avatar_url: Option<String>,
    pub vehicle_plate: Option<String>,
    /// Accumulated courier earnings, accrued once per finished order.
    pub balance: f64,
    pub rating: f64,
    pub total_ratings: u32,
    pub is_verified: bool,
    pub updated_at: DateTime<Utc>,
}
