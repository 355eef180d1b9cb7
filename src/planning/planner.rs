use chrono::{SubsecRound, Utc};
use tracing::{debug, info, info_span, Instrument};

use crate::config::constant::{FALLBACK_START, MIN_FILL_LEVEL};
use crate::config::Config;
use crate::datasource::FallbackChain;
use crate::domain::solution::{stops_from_route, CurrentRoute, Route, StopStatus};
use crate::domain::types::{Actor, BinLocation, GeoPoint};
use crate::error::{Error, Result};
use crate::evaluation::metrics::{compute_route_metrics_with, MetricsParams};
use crate::evaluation::validation::{validate_bins, validate_point};
use crate::solver::{optimize_batch, try_optimize_route};

use super::access::{authorize, Action};

/// The "current route" resource for collectors.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    chain: FallbackChain,
    params: MetricsParams,
    default_start: GeoPoint,
    min_fill_level: f64,
}

impl RoutePlanner {
    pub fn new(chain: FallbackChain) -> Self {
        Self {
            chain,
            params: MetricsParams::default(),
            default_start: FALLBACK_START,
            min_fill_level: MIN_FILL_LEVEL,
        }
    }

    pub fn from_config(chain: FallbackChain, config: &Config) -> Self {
        Self::new(chain)
            .with_params(config.metrics)
            .with_default_start(config.start)
            .with_min_fill_level(config.min_fill_level)
    }

    pub fn with_params(mut self, params: MetricsParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_default_start(mut self, start: GeoPoint) -> Self {
        self.default_start = start;
        self
    }

    /// Bins below this fill percentage are left off planned routes.
    pub fn with_min_fill_level(mut self, min_fill_level: f64) -> Self {
        self.min_fill_level = min_fill_level;
        self
    }

    /// Orders the collector's bins from `start` (or the default start) and
    /// stores the result as that collector's current route.
    pub async fn plan_route(
        &self,
        actor: &Actor,
        collector_id: &str,
        start: Option<GeoPoint>,
    ) -> Result<CurrentRoute> {
        authorize(actor, Action::PlanRoute, Some(collector_id))?;
        let start = start.unwrap_or(self.default_start);

        async {
            let bins = self.bins_to_visit(collector_id).await?;
            let route = try_optimize_route(bins, Some(start))?;
            self.persist(collector_id, &route).await
        }
        .instrument(info_span!("plan_route", collector = collector_id))
        .await
    }

    /// Plans every collector known to the data sources, optimizing in parallel.
    /// Nothing is persisted if any collector has an invalid bin.
    pub async fn plan_all(&self, actor: &Actor, start: Option<GeoPoint>) -> Result<Vec<CurrentRoute>> {
        authorize(actor, Action::PlanAll, None)?;
        let start = start.unwrap_or(self.default_start);
        validate_point(&start)?;

        let collector_ids = self.chain.collector_ids().await?;
        let mut jobs = Vec::with_capacity(collector_ids.len());
        for collector_id in collector_ids {
            let bins = self.bins_to_visit(&collector_id).await?;
            validate_bins(&bins)?;
            jobs.push((collector_id, bins));
        }

        let routes = tokio::task::spawn_blocking(move || optimize_batch(jobs, Some(start))).await?;

        let mut planned = Vec::with_capacity(routes.len());
        for (collector_id, route) in routes {
            let current = self
                .persist(&collector_id, &route)
                .instrument(info_span!("persist_route", collector = %collector_id))
                .await?;
            planned.push(current);
        }
        Ok(planned)
    }

    /// The stored route with metrics recomputed from its stored order.
    pub async fn current_route(&self, actor: &Actor, collector_id: &str) -> Result<CurrentRoute> {
        authorize(actor, Action::ViewRoute, Some(collector_id))?;

        let stored = self
            .chain
            .current_route(collector_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("current route of {collector_id}")))?;

        let route = Route::new(stored.stops.iter().map(|s| s.bin.clone()).collect());
        Ok(CurrentRoute {
            collector_id: collector_id.to_string(),
            metrics: compute_route_metrics_with(&route, &self.params),
            stops: stored.stops,
            assigned_at: stored.assigned_at,
        })
    }

    pub async fn mark_stop(
        &self,
        actor: &Actor,
        collector_id: &str,
        bin_id: &str,
        status: StopStatus,
    ) -> Result<()> {
        authorize(actor, Action::MarkStop, Some(collector_id))?;
        self.chain
            .update_stop_status(collector_id, bin_id, status)
            .await?;
        info!("{collector_id} marked {bin_id} {status}");
        Ok(())
    }

    async fn bins_to_visit(&self, collector_id: &str) -> Result<Vec<BinLocation>> {
        let records = self.chain.bins_for_collector(collector_id).await?;
        let total = records.len();
        let bins: Vec<BinLocation> = records
            .into_iter()
            .filter(|r| r.fill_level >= self.min_fill_level)
            .map(|r| r.bin)
            .collect();
        debug!(
            "{collector_id}: {} of {total} bins at or above {}% fill",
            bins.len(),
            self.min_fill_level
        );
        Ok(bins)
    }

    async fn persist(&self, collector_id: &str, route: &Route) -> Result<CurrentRoute> {
        let stops = stops_from_route(route);
        // Stores keep millisecond precision.
        let assigned_at = Utc::now().trunc_subsecs(3);
        self.chain.save_route(collector_id, &stops, assigned_at).await?;

        let metrics = compute_route_metrics_with(route, &self.params);
        info!(
            "{collector_id}: {} stops, {:.2} km, ~{} min",
            stops.len(),
            metrics.total_distance_km,
            metrics.estimated_time_minutes
        );

        Ok(CurrentRoute {
            collector_id: collector_id.to_string(),
            stops,
            metrics,
            assigned_at,
        })
    }
}
