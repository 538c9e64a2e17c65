use thiserror::Error;
use uuid::Uuid;

use crate::models::order::{Order, OrderStatus};
use crate::models::profile::{UserProfile, UserRole};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("order is in a terminal state")]
    Terminal,

    #[error("order is no longer waiting for a courier")]
    NotWaiting,

    #[error("order has not been accepted yet")]
    NotAccepted,

    #[error("only the assigned courier may advance this order")]
    WrongCourier,

    #[error("only the owning client or an admin may cancel this order")]
    NotCancellable,
}

/// Explicit transition table for the delivery lifecycle. Every advance moves
/// exactly one step; callers never pick a target status themselves.
pub fn next_status(current: OrderStatus) -> Option<OrderStatus> {
    match current {
        OrderStatus::Waiting => Some(OrderStatus::Accepted),
        OrderStatus::Accepted => Some(OrderStatus::PickingUp),
        OrderStatus::PickingUp => Some(OrderStatus::Collected),
        OrderStatus::Collected => Some(OrderStatus::InTransit),
        OrderStatus::InTransit => Some(OrderStatus::Delivered),
        OrderStatus::Delivered => Some(OrderStatus::Finished),
        OrderStatus::Finished | OrderStatus::Cancelled => None,
    }
}

/// Checks that a courier may claim this order. The caller must apply the
/// result under the store's entry lock so that two racing accepts cannot
/// both observe WAITING.
pub fn accept(order: &Order) -> Result<OrderStatus, TransitionError> {
    if order.status.is_terminal() {
        return Err(TransitionError::Terminal);
    }
    if order.status != OrderStatus::Waiting || order.courier_id.is_some() {
        return Err(TransitionError::NotWaiting);
    }

    Ok(OrderStatus::Accepted)
}

/// One step forward, assigned courier only. WAITING orders are claimed via
/// [`accept`], not advanced.
pub fn advance(order: &Order, courier_id: Uuid) -> Result<OrderStatus, TransitionError> {
    if order.status.is_terminal() {
        return Err(TransitionError::Terminal);
    }
    if order.status == OrderStatus::Waiting {
        return Err(TransitionError::NotAccepted);
    }
    if order.courier_id != Some(courier_id) {
        return Err(TransitionError::WrongCourier);
    }

    next_status(order.status).ok_or(TransitionError::Terminal)
}

/// Cancellation is representable from any non-terminal state, restricted to
/// the owning client or an admin.
pub fn cancel(order: &Order, actor: &UserProfile) -> Result<OrderStatus, TransitionError> {
    if order.status.is_terminal() {
        return Err(TransitionError::Terminal);
    }

    let allowed = actor.role == UserRole::Admin
        || (actor.role == UserRole::Client && order.client_id == actor.id);
    if !allowed {
        return Err(TransitionError::NotCancellable);
    }

    Ok(OrderStatus::Cancelled)
}
