use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_created_total: IntCounter,
    pub transitions_total: IntCounterVec,
    pub ratings_total: IntCounterVec,
    pub orders_waiting: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let orders_created_total =
            IntCounter::new("orders_created_total", "Total orders created")
                .expect("valid orders_created_total metric");

        let transitions_total = IntCounterVec::new(
            Opts::new("transitions_total", "Status transitions by outcome"),
            &["outcome"],
        )
        .expect("valid transitions_total metric");

        let ratings_total = IntCounterVec::new(
            Opts::new("ratings_total", "Ratings recorded by direction"),
            &["direction"],
        )
        .expect("valid ratings_total metric");

        let orders_waiting =
            IntGauge::new("orders_waiting", "Orders currently waiting for a courier")
                .expect("valid orders_waiting metric");

        registry
            .register(Box::new(orders_created_total.clone()))
            .expect("register orders_created_total");
        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");
        registry
            .register(Box::new(ratings_total.clone()))
            .expect("register ratings_total");
        registry
            .register(Box::new(orders_waiting.clone()))
            .expect("register orders_waiting");

        Self {
            registry,
            orders_created_total,
            transitions_total,
            ratings_total,
            orders_waiting,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
