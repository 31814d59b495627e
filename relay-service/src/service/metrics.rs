use log::debug;
use prometheus::{Encoder, IntCounterVec, Registry, TextEncoder};
use relay_core::RelayError;
use std::time::{Duration, Instant};

/// Prometheus counters for the relay's two outbound surfaces.
pub struct Metrics {
    registry: Registry,
    events_forwarded_total: IntCounterVec,
    notifications_total: IntCounterVec,
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Result<Self, RelayError> {
        debug!("initializing prometheus metrics");
        let registry = Registry::new();
        let events_forwarded_total = IntCounterVec::new(
            prometheus::Opts::new("events_forwarded_total", "Conversion API events by type and outcome"),
            &["event", "outcome"],
        )
        .map_err(|err| RelayError::Message(err.to_string()))?;
        let notifications_total = IntCounterVec::new(
            prometheus::Opts::new("notifications_total", "WhatsApp notifications by recipient and outcome"),
            &["recipient", "outcome"],
        )
        .map_err(|err| RelayError::Message(err.to_string()))?;

        registry
            .register(Box::new(events_forwarded_total.clone()))
            .map_err(|err| RelayError::Message(err.to_string()))?;
        registry
            .register(Box::new(notifications_total.clone()))
            .map_err(|err| RelayError::Message(err.to_string()))?;

        Ok(Self { registry, events_forwarded_total, notifications_total, started_at: Instant::now() })
    }

    pub fn record_event(&self, event: &str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.events_forwarded_total.with_label_values(&[event, outcome]).inc();
    }

    pub fn record_notification(&self, recipient: &str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.notifications_total.with_label_values(&[recipient, outcome]).inc();
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Text exposition for /metrics.
    pub fn encode(&self) -> Result<String, RelayError> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|err| RelayError::Message(err.to_string()))?;
        String::from_utf8(buffer).map_err(|err| RelayError::Message(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_appear_in_exposition() {
        let metrics = Metrics::new().expect("metrics");
        metrics.record_event("Purchase", true);
        metrics.record_event("Purchase", false);
        metrics.record_notification("customer", true);
        let body = metrics.encode().expect("encode");
        assert!(body.contains("events_forwarded_total"));
        assert!(body.contains("notifications_total"));
    }
}
