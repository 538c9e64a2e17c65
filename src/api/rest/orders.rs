use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::pricing::{compute_freight, FreightQuote};
use crate::error::AppError;
use crate::geo::estimate_route_km;
use crate::models::event::{OrderEvent, OrderEventKind};
use crate::models::order::{Address, Dimensions, Order, OrderStatus};
use crate::models::profile::{UserProfile, UserRole};
use crate::state::AppState;
use crate::store::orders::{NewOrder, RatingDirection};

const MAX_PACKAGE_COUNT: u32 = 50;
const DIMENSION_RANGE_CM: std::ops::RangeInclusive<u32> = 10..=60;
const MAX_CREATABLE_DIMENSION_CM: u32 = 40;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/accept", post(accept_order))
        .route("/orders/:id/advance", post(advance_order))
        .route("/orders/:id/cancel", post(cancel_order))
        .route("/orders/:id/rate", post(rate_order))
        .route("/quote", get(quote))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub client_id: Uuid,
    pub package_count: u32,
    pub dimensions: Dimensions,
    pub pickup_addresses: Vec<Address>,
    pub delivery_addresses: Vec<Address>,
    /// Straight-line estimate from the coordinates when omitted.
    pub distance_km: Option<f64>,
    pub observations: Option<String>,
}

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub client_id: Option<Uuid>,
    pub courier_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct AcceptRequest {
    pub courier_id: Uuid,
}

#[derive(Deserialize)]
pub struct AdvanceRequest {
    pub courier_id: Uuid,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub actor_id: Uuid,
}

#[derive(Deserialize)]
pub struct RateRequest {
    pub rater_id: Uuid,
    pub stars: u8,
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub package_count: u32,
    pub distance_km: f64,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let client = require_role(&state, payload.client_id, UserRole::Client)?;
    validate_creation(&payload)?;

    let distance_km = match payload.distance_km {
        Some(distance) => distance,
        None => estimate_route_km(&payload.pickup_addresses, &payload.delivery_addresses),
    };

    // Priced here, once; the stored values are never recomputed.
    let quote = compute_freight(payload.package_count, distance_km);

    let order = state.orders.create(NewOrder {
        client_id: client.id,
        package_count: payload.package_count,
        dimensions: payload.dimensions,
        pickup_addresses: payload.pickup_addresses,
        delivery_addresses: payload.delivery_addresses,
        distance_km,
        quote,
        observations: payload.observations,
    });

    state.metrics.orders_created_total.inc();
    refresh_waiting_gauge(&state);
    state.publish(OrderEvent::new(OrderEventKind::Created, order.clone()));

    info!(
        order_id = %order.id,
        client_id = %client.id,
        total_value = order.total_value,
        "order created"
    );

    Ok(Json(order))
}

fn validate_creation(payload: &CreateOrderRequest) -> Result<(), AppError> {
    if payload.package_count == 0 || payload.package_count > MAX_PACKAGE_COUNT {
        return Err(AppError::Validation(format!(
            "package_count must be between 1 and {MAX_PACKAGE_COUNT}"
        )));
    }

    let Dimensions { width, height } = payload.dimensions;
    if !DIMENSION_RANGE_CM.contains(&width) || !DIMENSION_RANGE_CM.contains(&height) {
        return Err(AppError::Validation(
            "dimensions must be between 10cm and 60cm".to_string(),
        ));
    }
    if width > MAX_CREATABLE_DIMENSION_CM || height > MAX_CREATABLE_DIMENSION_CM {
        return Err(AppError::Validation(format!(
            "package exceeds the {MAX_CREATABLE_DIMENSION_CM}x{MAX_CREATABLE_DIMENSION_CM}cm motorcycle limit"
        )));
    }

    if payload.pickup_addresses.is_empty() || payload.delivery_addresses.is_empty() {
        return Err(AppError::Validation(
            "at least one pickup and one delivery address are required".to_string(),
        ));
    }

    if let Some(distance) = payload.distance_km {
        if !distance.is_finite() || distance < 0.0 {
            return Err(AppError::Validation(
                "distance_km must be non-negative".to_string(),
            ));
        }
    }

    Ok(())
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = match (query.client_id, query.courier_id) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "filter by client_id or courier_id, not both".to_string(),
            ))
        }
        (Some(client_id), None) => state.orders.list_for_client(client_id),
        (None, Some(courier_id)) => state.orders.list_for_courier(courier_id),
        (None, None) => state.orders.list_all(),
    };

    Ok(Json(orders))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order))
}

async fn accept_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AcceptRequest>,
) -> Result<Json<Order>, AppError> {
    let courier = require_role(&state, payload.courier_id, UserRole::Courier)?;

    let order = match state.orders.try_accept(id, courier.id) {
        Ok(order) => order,
        Err(err) => {
            state
                .metrics
                .transitions_total
                .with_label_values(&["conflict"])
                .inc();
            return Err(err);
        }
    };

    state
        .metrics
        .transitions_total
        .with_label_values(&["success"])
        .inc();
    refresh_waiting_gauge(&state);
    state.publish(OrderEvent::new(OrderEventKind::Accepted, order.clone()));

    info!(order_id = %order.id, courier_id = %courier.id, "order accepted");

    Ok(Json(order))
}

async fn advance_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceRequest>,
) -> Result<Json<Order>, AppError> {
    let courier = require_role(&state, payload.courier_id, UserRole::Courier)?;

    let order = match state.orders.advance(id, courier.id) {
        Ok(order) => order,
        Err(err) => {
            state
                .metrics
                .transitions_total
                .with_label_values(&["rejected"])
                .inc();
            return Err(err);
        }
    };

    state
        .metrics
        .transitions_total
        .with_label_values(&["success"])
        .inc();

    // The advance into FINISHED settles the courier's cut. It fires once
    // because the DELIVERED -> FINISHED edge exists once per order.
    if order.status == OrderStatus::Finished {
        let settled = state
            .profiles
            .accrue_earnings(courier.id, order.courier_earnings)?;
        info!(
            order_id = %order.id,
            courier_id = %courier.id,
            earnings = order.courier_earnings,
            balance = settled.balance,
            "courier earnings settled"
        );
    }

    state.publish(OrderEvent::new(OrderEventKind::StatusChanged, order.clone()));

    info!(order_id = %order.id, status = ?order.status, "order advanced");

    Ok(Json(order))
}

async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRequest>,
) -> Result<Json<Order>, AppError> {
    let actor = require_profile(&state, payload.actor_id)?;

    let order = state.orders.cancel(id, &actor)?;

    state
        .metrics
        .transitions_total
        .with_label_values(&["success"])
        .inc();
    refresh_waiting_gauge(&state);
    state.publish(OrderEvent::new(OrderEventKind::Cancelled, order.clone()));

    info!(order_id = %order.id, actor_id = %actor.id, "order cancelled");

    Ok(Json(order))
}

async fn rate_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateRequest>,
) -> Result<Json<Order>, AppError> {
    if !(1..=5).contains(&payload.stars) {
        return Err(AppError::Validation(
            "stars must be between 1 and 5".to_string(),
        ));
    }

    let rater = require_profile(&state, payload.rater_id)?;
    let order = state
        .orders
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    // The rater's role picks the direction; the opposite party's profile
    // receives the stars.
    let (direction, target_id, label) = match rater.role {
        UserRole::Client => {
            if order.client_id != rater.id {
                return Err(AppError::Forbidden(
                    "only the owning client may rate the courier".to_string(),
                ));
            }
            let courier_id = order.courier_id.ok_or_else(|| {
                AppError::Conflict("order has no courier to rate".to_string())
            })?;
            (RatingDirection::ClientRatesCourier, courier_id, "client_rates_courier")
        }
        UserRole::Courier => {
            if order.courier_id != Some(rater.id) {
                return Err(AppError::Forbidden(
                    "only the assigned courier may rate the client".to_string(),
                ));
            }
            (RatingDirection::CourierRatesClient, order.client_id, "courier_rates_client")
        }
        UserRole::Admin => {
            return Err(AppError::Forbidden(
                "admins do not take part in ratings".to_string(),
            ))
        }
    };

    // Confirm the target exists before the once-only flag is spent.
    require_profile(&state, target_id)?;

    let order = state.orders.set_rating_flag(id, direction)?;
    let target = state.profiles.apply_rating(target_id, payload.stars)?;

    state
        .metrics
        .ratings_total
        .with_label_values(&[label])
        .inc();
    state.publish(OrderEvent::new(OrderEventKind::Rated, order.clone()));

    info!(
        order_id = %order.id,
        target_id = %target.id,
        rating = target.rating,
        "rating recorded"
    );

    Ok(Json(order))
}

async fn quote(Query(query): Query<QuoteQuery>) -> Result<Json<FreightQuote>, AppError> {
    if query.package_count == 0 || query.package_count > MAX_PACKAGE_COUNT {
        return Err(AppError::Validation(format!(
            "package_count must be between 1 and {MAX_PACKAGE_COUNT}"
        )));
    }
    if !query.distance_km.is_finite() || query.distance_km < 0.0 {
        return Err(AppError::Validation(
            "distance_km must be non-negative".to_string(),
        ));
    }

    Ok(Json(compute_freight(query.package_count, query.distance_km)))
}

fn require_profile(state: &AppState, id: Uuid) -> Result<UserProfile, AppError> {
    state
        .profiles
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("profile {id} not found")))
}

fn require_role(state: &AppState, id: Uuid, role: UserRole) -> Result<UserProfile, AppError> {
    let profile = require_profile(state, id)?;
    if profile.role != role {
        return Err(AppError::Forbidden(format!(
            "profile {id} does not have the required role"
        )));
    }

    Ok(profile)
}

fn refresh_waiting_gauge(state: &AppState) {
    state
        .metrics
        .orders_waiting
        .set(state.orders.waiting_count() as i64);
}
