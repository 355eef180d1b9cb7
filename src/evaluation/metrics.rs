use itertools::Itertools;

use crate::config::constant::{AVERAGE_SPEED_KMH, SERVICE_MINUTES_PER_STOP};
use crate::distance::haversine_distance_km;
use crate::domain::solution::{Route, RouteMetrics};
use crate::error::{Error, Result};
use crate::utils::round_to;

/// Travel assumptions behind the time estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsParams {
    pub average_speed_kmh: f64,
    pub service_minutes_per_stop: f64,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            average_speed_kmh: AVERAGE_SPEED_KMH,
            service_minutes_per_stop: SERVICE_MINUTES_PER_STOP,
        }
    }
}

impl MetricsParams {
    pub fn new(average_speed_kmh: f64, service_minutes_per_stop: f64) -> Result<Self> {
        if !average_speed_kmh.is_finite() || average_speed_kmh <= 0.0 {
            return Err(Error::invalid_config(format!(
                "average speed must be a positive number of km/h, got {average_speed_kmh}"
            )));
        }
        if !service_minutes_per_stop.is_finite() || service_minutes_per_stop < 0.0 {
            return Err(Error::invalid_config(format!(
                "service time per stop must be non-negative, got {service_minutes_per_stop}"
            )));
        }
        Ok(Self {
            average_speed_kmh,
            service_minutes_per_stop,
        })
    }
}

/// Metrics at 20 km/h with 5 minutes per stop.
pub fn compute_route_metrics(route: &Route) -> RouteMetrics {
    compute_route_metrics_with(route, &MetricsParams::default())
}

/// Distance is summed over consecutive stops only (the start point is not part of the route)
/// and rounded to 2 decimals; the time estimate is derived from that rounded distance and
/// rounded to a whole minute.
pub fn compute_route_metrics_with(route: &Route, params: &MetricsParams) -> RouteMetrics {
    let total_distance_km = round_to(route_distance_km(route), 2);
    let driving_minutes = (total_distance_km / params.average_speed_kmh) * 60.0;
    let service_minutes = route.len() as f64 * params.service_minutes_per_stop;

    RouteMetrics {
        total_distance_km,
        estimated_time_minutes: (driving_minutes + service_minutes).round(),
    }
}

/// Unrounded sum of legs between consecutive stops.
pub fn route_distance_km(route: &Route) -> f64 {
    route
        .iter()
        .tuple_windows()
        .map(|(a, b)| haversine_distance_km(&a.location, &b.location))
        .sum()
}
