use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::order::Order;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEventKind {
    Created,
    Accepted,
    StatusChanged,
    Cancelled,
    Rated,
}

/// Broadcast after every successful order mutation so connected clients can
/// refresh without polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub kind: OrderEventKind,
    pub order: Order,
    pub at: DateTime<Utc>,
}

impl OrderEvent {
    pub fn new(kind: OrderEventKind, order: Order) -> Self {
        Self {
            kind,
            order,
            at: Utc::now(),
        }
    }
}
