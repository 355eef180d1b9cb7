use std::future::Future;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::solution::{RouteStop, StopStatus};
use crate::domain::types::BinRecord;
use crate::error::{Error, Result};

use super::{DataSource, StoredRoute};

/// Data sources tried in order until one answers.
///
/// `NotFound` counts as an answer: it is returned without asking later sources.
/// A route written to a later source during an outage is therefore hidden once
/// an earlier source is healthy again, and its stops can no longer be marked.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    sources: Vec<DataSource>,
}

impl FallbackChain {
    pub fn new(sources: Vec<DataSource>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::invalid_config("a fallback chain needs at least one data source"));
        }
        info!(
            "Data sources in order: {:?}",
            sources.iter().map(DataSource::name).collect::<Vec<_>>()
        );
        Ok(Self { sources })
    }

    async fn first_ok<'a, T, F, Fut>(&'a self, operation: &'static str, call: F) -> Result<T>
    where
        F: Fn(&'a DataSource) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut failures = Vec::new();
        for source in &self.sources {
            match call(source).await {
                Ok(value) => {
                    if !failures.is_empty() {
                        info!("{operation} served by fallback source '{}'", source.name());
                    }
                    return Ok(value);
                }
                Err(e @ Error::NotFound(_)) => return Err(e),
                Err(e) => {
                    warn!("{operation} failed on '{}': {e}", source.name());
                    failures.push(format!("{}: {e}", source.name()));
                }
            }
        }
        Err(Error::SourcesExhausted {
            operation,
            failures,
        })
    }

    pub async fn upsert_bins(&self, records: &[BinRecord]) -> Result<()> {
        self.first_ok("upsert_bins", |s| s.upsert_bins(records))
            .await
    }

    pub async fn bins_for_collector(&self, collector_id: &str) -> Result<Vec<BinRecord>> {
        self.first_ok("bins_for_collector", |s| s.bins_for_collector(collector_id))
            .await
    }

    pub async fn collector_ids(&self) -> Result<Vec<String>> {
        self.first_ok("collector_ids", |s| s.collector_ids()).await
    }

    pub async fn save_route(
        &self,
        collector_id: &str,
        stops: &[RouteStop],
        assigned_at: DateTime<Utc>,
    ) -> Result<()> {
        self.first_ok("save_route", |s| s.save_route(collector_id, stops, assigned_at))
            .await
    }

    pub async fn current_route(&self, collector_id: &str) -> Result<Option<StoredRoute>> {
        self.first_ok("current_route", |s| s.current_route(collector_id))
            .await
    }

    pub async fn update_stop_status(
        &self,
        collector_id: &str,
        bin_id: &str,
        status: StopStatus,
    ) -> Result<()> {
        self.first_ok("update_stop_status", |s| {
            s.update_stop_status(collector_id, bin_id, status)
        })
        .await
    }
}
