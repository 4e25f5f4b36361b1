//! Metrics collection for observability

use prometheus::{
    CounterVec, Histogram, Opts, Registry,
    register_counter_vec_with_registry, register_histogram_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Webhook metrics
    pub skill_requests: CounterVec,
    pub skill_intents: CounterVec,

    // Compliance server metrics
    pub compliance_requests: CounterVec,
    pub compliance_request_duration: Histogram,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let skill_requests = register_counter_vec_with_registry!(
            Opts::new("skill_requests_total", "Total skill envelopes received"),
            &["kind"],
            registry
        )?;

        let skill_intents = register_counter_vec_with_registry!(
            Opts::new("skill_intents_total", "Total intents dispatched"),
            &["intent", "outcome"],
            registry
        )?;

        let compliance_requests = register_counter_vec_with_registry!(
            Opts::new("compliance_requests_total", "Total compliance server requests"),
            &["status"],
            registry
        )?;

        let compliance_request_duration = register_histogram_with_registry!(
            "compliance_request_duration_seconds",
            "Compliance server request duration in seconds",
            registry
        )?;

        Ok(Self {
            registry,
            skill_requests,
            skill_intents,
            compliance_requests,
            compliance_request_duration,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record an inbound envelope by request type
    pub fn record_request(&self, kind: &str) {
        self.skill_requests.with_label_values(&[kind]).inc();
    }

    /// Record the outcome of an intent dispatch
    pub fn record_intent(&self, intent: &str, outcome: &str) {
        self.skill_intents.with_label_values(&[intent, outcome]).inc();
    }

    /// Record an outbound call; `status` is the HTTP status or "error"
    pub fn record_compliance_call(&self, status: &str, seconds: f64) {
        self.compliance_requests.with_label_values(&[status]).inc();
        self.compliance_request_duration.observe(seconds);
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
