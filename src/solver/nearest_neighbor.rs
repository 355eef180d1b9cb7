//! Greedy nearest-neighbor ordering of bins.
//!
//! From the current position, always travel to the closest bin not yet visited.
//! O(n²), no backtracking. The result is usually 15-25% longer than the optimal
//! tour and callers rely on that exact ordering, so it must stay greedy.

use tracing::{debug, trace};

use crate::config::constant::FALLBACK_START;
use crate::distance::haversine_distance_km;
use crate::domain::solution::Route;
use crate::domain::types::{BinLocation, GeoPoint};
use crate::error::Result;
use crate::evaluation::validation::{validate_bins, validate_point};

/// Orders `bins` by repeatedly moving to the nearest remaining one.
///
/// `start` defaults to [`FALLBACK_START`]. Ties go to the bin that came first in
/// the input. Coordinates are not checked: a `NaN` distance never beats a finite
/// one, but a `NaN` bin scanned first is kept as the best candidate. Use
/// [`try_optimize_route`] for untrusted input.
///
/// # Examples
///
/// ```
/// use binroute::domain::{BinLocation, GeoPoint};
/// use binroute::solver::optimize_route;
///
/// let bins = vec![
///     BinLocation::new("far", 0.0, 5.0),
///     BinLocation::new("near", 0.0, 1.0),
/// ];
/// let route = optimize_route(bins, Some(GeoPoint::new(0.0, 0.0)));
/// assert_eq!(route.bin_ids(), vec!["near", "far"]);
/// ```
pub fn optimize_route(bins: Vec<BinLocation>, start: Option<GeoPoint>) -> Route {
    let mut current = start.unwrap_or(FALLBACK_START);
    let mut remaining = bins;
    let mut visited = Vec::with_capacity(remaining.len());

    debug!(
        "Optimizing {} bins from ({}, {})",
        remaining.len(),
        current.latitude,
        current.longitude
    );

    while !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (i, bin) in remaining.iter().enumerate() {
            let d = haversine_distance_km(&current, &bin.location);
            let closer = match best {
                Some((_, best_d)) => d < best_d,
                None => true,
            };
            if closer {
                best = Some((i, d));
            }
        }

        let Some((next, d)) = best else { break };
        // Vec::remove keeps the relative order of the rest, which keeps ties stable.
        let bin = remaining.remove(next);
        trace!("Next stop {} at {:.3} km", bin.bin_id, d);
        current = bin.location;
        visited.push(bin);
    }

    Route::new(visited)
}

/// [`optimize_route`] after rejecting any start or bin coordinate that is
/// non-finite or out of range.
pub fn try_optimize_route(bins: Vec<BinLocation>, start: Option<GeoPoint>) -> Result<Route> {
    if let Some(start) = &start {
        validate_point(start)?;
    }
    validate_bins(&bins)?;
    Ok(optimize_route(bins, start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::evaluation::metrics::compute_route_metrics;

    const ORIGIN: GeoPoint = GeoPoint::new(0.0, 0.0);

    #[test]
    fn empty_input_gives_empty_route() {
        assert!(optimize_route(vec![], Some(ORIGIN)).is_empty());
        assert!(optimize_route(vec![], None).is_empty());
    }

    #[test]
    fn single_bin() {
        let b = BinLocation::new("only", 12.0, 34.0);
        let route = optimize_route(vec![b.clone()], Some(ORIGIN));
        assert_eq!(route.stops, vec![b]);
    }

    #[test]
    fn always_picks_nearest_remaining() {
        let bins = vec![
            BinLocation::new("lon1", 0.0, 1.0),
            BinLocation::new("lon5", 0.0, 5.0),
            BinLocation::new("lon2", 0.0, 2.0),
        ];
        let route = optimize_route(bins, Some(ORIGIN));
        assert_eq!(route.bin_ids(), vec!["lon1", "lon2", "lon5"]);
    }

    #[test]
    fn ties_go_to_first_in_input() {
        let east = BinLocation::new("east", 0.0, 1.0);
        let west = BinLocation::new("west", 0.0, -1.0);

        let route = optimize_route(vec![east.clone(), west.clone()], Some(ORIGIN));
        assert_eq!(route.bin_ids(), vec!["east", "west"]);

        let route = optimize_route(vec![west, east], Some(ORIGIN));
        assert_eq!(route.bin_ids(), vec!["west", "east"]);
    }

    #[test]
    fn stays_greedy_when_greedy_is_worse() {
        // From 0: 1 then -2 then 4 travels 10 degrees; -2, 1, 4 would travel 8.
        let bins = vec![
            BinLocation::new("p4", 0.0, 4.0),
            BinLocation::new("m2", 0.0, -2.0),
            BinLocation::new("p1", 0.0, 1.0),
        ];
        let route = optimize_route(bins, Some(ORIGIN));
        assert_eq!(route.bin_ids(), vec!["p1", "m2", "p4"]);
    }

    #[test]
    fn defaults_to_new_delhi() {
        let bins = vec![
            BinLocation::new("mumbai", 19.0760, 72.8777),
            BinLocation::new("connaught", 28.6315, 77.2167),
        ];
        let route = optimize_route(bins, None);
        assert_eq!(route.bin_ids(), vec!["connaught", "mumbai"]);
    }

    #[test]
    fn delhi_mumbai_scenario() {
        let start = GeoPoint::new(28.6139, 77.2090);
        let bins = vec![
            BinLocation::new("B", 19.0760, 72.8777),
            BinLocation::new("A", 28.6140, 77.2091),
        ];
        let route = optimize_route(bins, Some(start));
        assert_eq!(route.bin_ids(), vec!["A", "B"]);

        let m = compute_route_metrics(&route);
        assert!(
            (1140.0..1160.0).contains(&m.total_distance_km),
            "got {}",
            m.total_distance_km
        );
        let expected = ((m.total_distance_km / 20.0) * 60.0 + 10.0).round();
        assert_eq!(m.estimated_time_minutes, expected);
    }

    #[test]
    fn checked_variant_rejects_bad_coordinates() {
        let bins = vec![
            BinLocation::new("fine", 1.0, 1.0),
            BinLocation::new("broken", f64::NAN, 1.0),
        ];
        match try_optimize_route(bins, Some(ORIGIN)) {
            Err(Error::InvalidCoordinate { bin_id, .. }) => {
                assert_eq!(bin_id.as_deref(), Some("broken"))
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = try_optimize_route(vec![], Some(GeoPoint::new(0.0, 181.0))).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { bin_id: None, .. }));
    }

    #[test]
    fn checked_variant_matches_raw_output() {
        let bins = vec![
            BinLocation::new("a", 28.70, 77.10),
            BinLocation::new("b", 28.50, 77.30),
            BinLocation::new("c", 28.62, 77.21),
        ];
        let raw = optimize_route(bins.clone(), None);
        let checked = try_optimize_route(bins, None).unwrap();
        assert_eq!(raw, checked);
    }
}
