use rayon::prelude::*;
use tracing::info;

use crate::domain::solution::Route;
use crate::domain::types::{BinLocation, GeoPoint};

use super::nearest_neighbor::optimize_route;

/// Optimizes independent bin sets in parallel. Output order follows `jobs`.
pub fn optimize_batch<K>(jobs: Vec<(K, Vec<BinLocation>)>, start: Option<GeoPoint>) -> Vec<(K, Route)>
where
    K: Send,
{
    info!("Optimizing {} routes in parallel", jobs.len());
    jobs.into_par_iter()
        .map(|(key, bins)| (key, optimize_route(bins, start)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_job_matches_a_sequential_run() {
        let jobs: Vec<(String, Vec<BinLocation>)> = (0..8)
            .map(|j| {
                let bins = (0..25)
                    .map(|i| {
                        let f = ((i * 7 + j * 3) % 25) as f64;
                        BinLocation::new(format!("J{j}-{i}"), 28.5 + f * 0.01, 77.1 + (i as f64) * 0.005)
                    })
                    .collect();
                (format!("COL-{j}"), bins)
            })
            .collect();

        let start = Some(GeoPoint::new(28.6, 77.2));
        let parallel = optimize_batch(jobs.clone(), start);

        assert_eq!(parallel.len(), jobs.len());
        for ((key, bins), (out_key, route)) in jobs.into_iter().zip(parallel) {
            assert_eq!(key, out_key);
            assert_eq!(route, optimize_route(bins, start));
        }
    }

    #[test]
    fn empty_batch() {
        let out: Vec<(u32, Route)> = optimize_batch(vec![], None);
        assert!(out.is_empty());
    }
}
