//! Prometheus metrics registry for error handling.
//!
//! [`ErrorMetrics`] owns the registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and attach it to
//! the [`crate::handler::ErrorHandler`].
//!
//! Exposed at `GET /metrics` in Prometheus text exposition format
//! (`text/plain; version=0.0.4`).

use axum::http::StatusCode;
use prometheus::{CounterVec, Opts, Registry};

use crate::classify::ClassificationTag;

pub struct ErrorMetrics {
    /// Errors dispatched, labelled by classification and HTTP status.
    pub errors_handled_total: CounterVec,
    pub registry: Registry,
}

impl ErrorMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let errors_handled_total = CounterVec::new(
            Opts::new(
                "app_errors_handled_total",
                "Errors dispatched by classification and status",
            ),
            &["classification", "status"],
        )?;

        registry.register(Box::new(errors_handled_total.clone()))?;

        Ok(Self {
            errors_handled_total,
            registry,
        })
    }

    pub fn record(&self, tag: ClassificationTag, status: StatusCode) {
        self.errors_handled_total
            .with_label_values(&[tag.as_str(), status.as_str()])
            .inc();
    }

    /// Render all metrics as Prometheus text format (for the `/metrics` endpoint).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}
