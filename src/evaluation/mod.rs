pub mod metrics;
pub mod validation;

pub use metrics::{compute_route_metrics, compute_route_metrics_with, MetricsParams};
pub use validation::{validate_bins, validate_point};
