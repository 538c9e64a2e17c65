use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::engine::lifecycle;
use crate::engine::pricing::FreightQuote;
use crate::error::AppError;
use crate::models::order::{Address, Dimensions, Order, OrderStatus};
use crate::models::profile::UserProfile;

/// Fields the client supplies at creation; id, status, and timestamp are
/// assigned by the store, the quote comes from the pricing engine.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: Uuid,
    pub package_count: u32,
    pub dimensions: Dimensions,
    pub pickup_addresses: Vec<Address>,
    pub delivery_addresses: Vec<Address>,
    pub distance_km: f64,
    pub quote: FreightQuote,
    pub observations: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingDirection {
    /// Sets `client_rated`; the courier profile receives the stars.
    ClientRatesCourier,
    /// Sets `courier_rated`; the client profile receives the stars.
    CourierRatesClient,
}

/// In-process stand-in for the remote order repository. Every mutation is a
/// single update of one entry under its map lock, which makes the
/// WAITING-or-fail accept check race-free.
#[derive(Default)]
pub struct OrderStore {
    orders: DashMap<Uuid, Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn waiting_count(&self) -> usize {
        self.orders
            .iter()
            .filter(|entry| entry.value().status == OrderStatus::Waiting)
            .count()
    }

    pub fn create(&self, new: NewOrder) -> Order {
        let order = Order {
            id: Uuid::new_v4(),
            client_id: new.client_id,
            courier_id: None,
            package_count: new.package_count,
            dimensions: new.dimensions,
            pickup_addresses: new.pickup_addresses,
            delivery_addresses: new.delivery_addresses,
            distance_km: new.distance_km,
            total_value: new.quote.total_value,
            courier_earnings: new.quote.courier_earnings,
            status: OrderStatus::Waiting,
            created_at: Utc::now(),
            client_rated: false,
            courier_rated: false,
            observations: new.observations,
        };

        self.orders.insert(order.id, order.clone());
        order
    }

    pub fn get(&self, id: Uuid) -> Option<Order> {
        self.orders.get(&id).map(|entry| entry.value().clone())
    }

    /// A client sees their own orders, newest first.
    pub fn list_for_client(&self, client_id: Uuid) -> Vec<Order> {
        self.collect_newest_first(|order| order.client_id == client_id)
    }

    /// A courier sees orders assigned to them plus the open WAITING pool.
    pub fn list_for_courier(&self, courier_id: Uuid) -> Vec<Order> {
        self.collect_newest_first(|order| {
            order.courier_id == Some(courier_id) || order.status == OrderStatus::Waiting
        })
    }

    pub fn list_all(&self) -> Vec<Order> {
        self.collect_newest_first(|_| true)
    }

    fn collect_newest_first<F>(&self, keep: F) -> Vec<Order>
    where
        F: Fn(&Order) -> bool,
    {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Conditional claim: succeeds only if the order is still WAITING at
    /// write time. The status re-check runs under the entry lock, so of two
    /// racing couriers exactly one wins and the other observes a conflict.
    pub fn try_accept(&self, id: Uuid, courier_id: Uuid) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        let next = lifecycle::accept(&order)?;
        order.status = next;
        order.courier_id = Some(courier_id);

        Ok(order.clone())
    }

    /// One step forward by the assigned courier. The target status comes
    /// from the transition table, never from the caller.
    pub fn advance(&self, id: Uuid, courier_id: Uuid) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        let next = lifecycle::advance(&order, courier_id)?;
        order.status = next;

        Ok(order.clone())
    }

    pub fn cancel(&self, id: Uuid, actor: &UserProfile) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        let next = lifecycle::cancel(&order, actor)?;
        order.status = next;

        Ok(order.clone())
    }

    /// Each direction may fire at most once per order; a repeat is a
    /// conflict and changes nothing.
    pub fn set_rating_flag(
        &self,
        id: Uuid,
        direction: RatingDirection,
    ) -> Result<Order, AppError> {
        let mut order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

        let flag = match direction {
            RatingDirection::ClientRatesCourier => &mut order.client_rated,
            RatingDirection::CourierRatesClient => &mut order.courier_rated,
        };

        if *flag {
            return Err(AppError::Conflict(format!(
                "order {id} was already rated in this direction"
            )));
        }
        *flag = true;

        Ok(order.clone())
    }
}
