use tokio::sync::broadcast;

use crate::models::event::OrderEvent;
use crate::observability::metrics::Metrics;
use crate::store::orders::OrderStore;
use crate::store::profiles::ProfileStore;

/// Shared application state, owned by the top-level process and passed as
/// `Arc` to whichever handler needs it. The stores are the source of truth;
/// clients resynchronize by re-fetching or by following the event feed.
pub struct AppState {
    pub orders: OrderStore,
    pub profiles: ProfileStore,
    pub order_events_tx: broadcast::Sender<OrderEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        let (order_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            orders: OrderStore::new(),
            profiles: ProfileStore::new(),
            order_events_tx,
            metrics: Metrics::new(),
        }
    }

    /// Lagging or absent subscribers are not an error.
    pub fn publish(&self, event: OrderEvent) {
        let _ = self.order_events_tx.send(event);
    }
}
