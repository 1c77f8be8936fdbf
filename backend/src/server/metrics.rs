//! Prometheus request metrics exposed on `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

/// Build the request-metrics middleware for the `patternhub` namespace.
///
/// # Errors
/// Returns [`std::io::Error`] when the collectors cannot be registered.
pub(super) fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("patternhub")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}
