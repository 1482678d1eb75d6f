//! Prometheus metrics

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

/// Install the Prometheus recorder
///
/// Only the first call installs; later calls return the same handle.
/// `None` if another recorder was already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Prometheus recorder");
                None
            }
        })
        .clone()
}

/// Count an API request
pub fn record_request(endpoint: &'static str, status: u16) {
    metrics::counter!(
        "vendchat_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Count a visitor message
pub fn record_message(language: &'static str) {
    metrics::counter!("vendchat_messages_total", "language" => language).increment(1);
}

pub fn set_active_sessions(count: usize) {
    metrics::gauge!("vendchat_active_sessions").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let first = init_metrics();
        let second = init_metrics();
        assert_eq!(first.is_some(), second.is_some());

        record_request("health", 200);
        record_message("en");
        set_active_sessions(3);
        if let Some(handle) = second {
            let rendered = handle.render();
            assert!(rendered.contains("vendchat_active_sessions"));
        }
    }
}
