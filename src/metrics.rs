use std::sync::OnceLock;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
///
/// The recorder is process-global; repeated calls return the same handle.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("A metrics recorder was already installed");
            }

            // Pre-register counters so they appear even before the first increment.
            counter!("orders_created_total").absolute(0);
            counter!("orders_updated_total").absolute(0);
            counter!("orders_deleted_total").absolute(0);
            counter!("csv_rows_imported_total").absolute(0);
            counter!("csv_rows_failed_total").absolute(0);

            handle
        })
        .clone()
}
