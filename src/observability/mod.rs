//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor and API client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID attached to every API call
//! - Metrics are cheap and disabled by default

pub mod logging;
pub mod metrics;

use crate::config::ObservabilityConfig;

/// Initialize logging, and the metrics endpoint when enabled.
pub fn init(config: &ObservabilityConfig) {
    logging::init_logging(config);

    if config.metrics_enabled {
        match config.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
}
