use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::solution::{RouteStop, StopStatus};
use crate::domain::types::BinRecord;
use crate::error::{Error, Result};

use super::StoredRoute;

#[derive(Debug, Default)]
struct MemoryState {
    bins: Vec<BinRecord>,
    routes: HashMap<String, StoredRoute>,
}

/// Process-local store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bins(bins: Vec<BinRecord>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                bins,
                routes: HashMap::new(),
            })),
        }
    }

    pub async fn upsert_bins(&self, records: &[BinRecord]) -> Result<()> {
        let mut state = self.state.write().await;
        for record in records {
            match state
                .bins
                .iter()
                .position(|b| b.bin.bin_id == record.bin.bin_id)
            {
                Some(i) => state.bins[i] = record.clone(),
                None => state.bins.push(record.clone()),
            }
        }
        debug!("Memory store now holds {} bins", state.bins.len());
        Ok(())
    }

    pub async fn bins_for_collector(&self, collector_id: &str) -> Result<Vec<BinRecord>> {
        let state = self.state.read().await;
        Ok(state
            .bins
            .iter()
            .filter(|b| b.collector_id.as_deref() == Some(collector_id))
            .cloned()
            .collect())
    }

    pub async fn collector_ids(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        let ids: BTreeSet<&String> = state
            .bins
            .iter()
            .filter_map(|b| b.collector_id.as_ref())
            .collect();
        Ok(ids.into_iter().cloned().collect())
    }

    pub async fn save_route(
        &self,
        collector_id: &str,
        stops: &[RouteStop],
        assigned_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut sorted = stops.to_vec();
        sorted.sort_by_key(|s| s.order);
        self.state.write().await.routes.insert(
            collector_id.to_string(),
            StoredRoute {
                stops: sorted,
                assigned_at,
            },
        );
        Ok(())
    }

    pub async fn current_route(&self, collector_id: &str) -> Result<Option<StoredRoute>> {
        let state = self.state.read().await;
        Ok(state
            .routes
            .get(collector_id)
            .filter(|r| !r.stops.is_empty())
            .cloned())
    }

    pub async fn update_stop_status(
        &self,
        collector_id: &str,
        bin_id: &str,
        status: StopStatus,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let stop = state
            .routes
            .get_mut(collector_id)
            .and_then(|r| r.stops.iter_mut().find(|s| s.bin.bin_id == bin_id))
            .ok_or_else(|| {
                Error::not_found(format!("stop {bin_id} on the route of {collector_id}"))
            })?;
        stop.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::BinLocation;

    fn record(id: &str, collector: Option<&str>) -> BinRecord {
        BinRecord::new(BinLocation::new(id, 0.0, 0.0), 10.0, collector.map(str::to_string))
    }

    #[tokio::test]
    async fn filters_by_collector_and_keeps_order() {
        let store = MemoryStore::with_bins(vec![
            record("c", Some("COL-2")),
            record("a", Some("COL-1")),
            record("b", Some("COL-1")),
            record("x", None),
        ]);
        let ids: Vec<_> = store
            .bins_for_collector("COL-1")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.bin.bin_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.collector_ids().await.unwrap(), vec!["COL-1", "COL-2"]);
    }

    #[tokio::test]
    async fn upsert_replaces_in_place() {
        let store = MemoryStore::with_bins(vec![record("a", Some("COL-1")), record("b", None)]);
        store.upsert_bins(&[record("a", Some("COL-3"))]).await.unwrap();
        store.upsert_bins(&[record("c", Some("COL-3"))]).await.unwrap();
        let ids: Vec<_> = store
            .bins_for_collector("COL-3")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.bin.bin_id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn routes_are_shared_between_clones() {
        let store = MemoryStore::new();
        let other = store.clone();
        let stops = vec![
            RouteStop {
                bin: BinLocation::new("b", 0.0, 0.0),
                order: 1,
                status: StopStatus::Pending,
            },
            RouteStop {
                bin: BinLocation::new("a", 0.0, 0.0),
                order: 0,
                status: StopStatus::Pending,
            },
        ];
        store.save_route("COL-1", &stops, Utc::now()).await.unwrap();
        other
            .update_stop_status("COL-1", "b", StopStatus::Skipped)
            .await
            .unwrap();

        let stored = store.current_route("COL-1").await.unwrap().unwrap();
        assert_eq!(stored.stops[0].bin.bin_id, "a");
        assert_eq!(stored.stops[1].status, StopStatus::Skipped);

        let err = store
            .update_stop_status("COL-2", "a", StopStatus::Collected)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
