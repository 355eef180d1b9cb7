//! Where bins and collector routes live.
//!
//! A [`DataSource`] is one concrete store picked at construction time. Several
//! of them are combined in a [`FallbackChain`], which tries each in order so the
//! planner keeps working on in-memory data when the database is unreachable.

pub mod chain;
pub mod memory;
pub mod sqlite;

use chrono::{DateTime, Utc};

use crate::domain::solution::{RouteStop, StopStatus};
use crate::domain::types::BinRecord;
use crate::error::Result;

pub use chain::FallbackChain;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A persisted route: stops sorted by `order`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRoute {
    pub stops: Vec<RouteStop>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum DataSource {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl DataSource {
    pub fn name(&self) -> &'static str {
        match self {
            DataSource::Sqlite(_) => "sqlite",
            DataSource::Memory(_) => "memory",
        }
    }

    pub async fn upsert_bins(&self, records: &[BinRecord]) -> Result<()> {
        match self {
            DataSource::Sqlite(store) => store.upsert_bins(records).await,
            DataSource::Memory(store) => store.upsert_bins(records).await,
        }
    }

    /// Bins assigned to `collector_id`, in insertion order.
    pub async fn bins_for_collector(&self, collector_id: &str) -> Result<Vec<BinRecord>> {
        match self {
            DataSource::Sqlite(store) => store.bins_for_collector(collector_id).await,
            DataSource::Memory(store) => store.bins_for_collector(collector_id).await,
        }
    }

    /// Distinct collector ids that have at least one bin, sorted.
    pub async fn collector_ids(&self) -> Result<Vec<String>> {
        match self {
            DataSource::Sqlite(store) => store.collector_ids().await,
            DataSource::Memory(store) => store.collector_ids().await,
        }
    }

    /// Replaces the collector's previous route.
    pub async fn save_route(
        &self,
        collector_id: &str,
        stops: &[RouteStop],
        assigned_at: DateTime<Utc>,
    ) -> Result<()> {
        match self {
            DataSource::Sqlite(store) => store.save_route(collector_id, stops, assigned_at).await,
            DataSource::Memory(store) => store.save_route(collector_id, stops, assigned_at).await,
        }
    }

    pub async fn current_route(&self, collector_id: &str) -> Result<Option<StoredRoute>> {
        match self {
            DataSource::Sqlite(store) => store.current_route(collector_id).await,
            DataSource::Memory(store) => store.current_route(collector_id).await,
        }
    }

    /// `NotFound` when the collector has no such stop.
    pub async fn update_stop_status(
        &self,
        collector_id: &str,
        bin_id: &str,
        status: StopStatus,
    ) -> Result<()> {
        match self {
            DataSource::Sqlite(store) => {
                store.update_stop_status(collector_id, bin_id, status).await
            }
            DataSource::Memory(store) => {
                store.update_stop_status(collector_id, bin_id, status).await
            }
        }
    }
}

impl From<SqliteStore> for DataSource {
    fn from(store: SqliteStore) -> Self {
        DataSource::Sqlite(store)
    }
}

impl From<MemoryStore> for DataSource {
    fn from(store: MemoryStore) -> Self {
        DataSource::Memory(store)
    }
}
