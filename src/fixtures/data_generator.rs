use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::types::{BinLocation, BinRecord, GeoPoint};
use crate::utils::round_to;

const KM_PER_DEGREE_LAT: f64 = 111.32;

/// `count` bins scattered uniformly in a square of half-width `radius_km` around
/// `center`, assigned round-robin to `COL-1`..=`COL-{collectors}`.
///
/// Same seed, same bins. With zero collectors every bin is unassigned.
pub fn generate_random_bins(
    count: usize,
    collectors: usize,
    center: GeoPoint,
    radius_km: f64,
    seed: u64,
) -> Vec<BinRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let lat_span = radius_km / KM_PER_DEGREE_LAT;
    let lon_span = radius_km / (KM_PER_DEGREE_LAT * center.latitude.to_radians().cos().max(1e-6));

    let bins: Vec<BinRecord> = (0..count)
        .map(|i| {
            let latitude = (center.latitude + rng.gen_range(-lat_span..=lat_span)).clamp(-90.0, 90.0);
            let longitude =
                (center.longitude + rng.gen_range(-lon_span..=lon_span)).clamp(-180.0, 180.0);
            let fill_level = round_to(rng.gen_range(0.0..=100.0), 1);
            let collector_id = (collectors > 0).then(|| format!("COL-{}", i % collectors + 1));

            BinRecord::new(
                BinLocation::new(format!("BIN-{:04}", i + 1), latitude, longitude),
                fill_level,
                collector_id,
            )
        })
        .collect();

    info!(
        "Generated {} bins for {} collectors within {} km of ({}, {})",
        bins.len(),
        collectors,
        radius_km,
        center.latitude,
        center.longitude
    );
    bins
}
