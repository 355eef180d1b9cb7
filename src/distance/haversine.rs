use crate::config::constant::EARTH_RADIUS_KM;
use crate::domain::types::GeoPoint;

/// Straight-line ("as the crow flies") distance in kilometres.
///
/// Ignores elevation and road networks. Non-finite inputs give `NaN`.
pub fn haversine_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let s1 = (d_lat / 2.0).sin();
    let s2 = (d_lon / 2.0).sin();
    // Rounding can push h just past 1 near antipodes.
    let h = (s1 * s1 + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * s2 * s2)
        .clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
