use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::domain::solution::{RouteStop, StopStatus};
use crate::domain::types::{BinLocation, BinRecord};
use crate::error::{Error, Result};

use super::StoredRoute;

type BinRow = (String, f64, f64, f64, Option<String>);
type StopRow = (String, f64, f64, i64, String, i64);

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Expects a pool whose schema has been applied by [`crate::database::migrate`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn upsert_bins(&self, records: &[BinRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(
                r#"
                INSERT INTO bins (bin_id, latitude, longitude, fill_level, collector_id)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(bin_id) DO UPDATE SET
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    fill_level = excluded.fill_level,
                    collector_id = excluded.collector_id
                "#,
            )
            .bind(&record.bin.bin_id)
            .bind(record.bin.location.latitude)
            .bind(record.bin.location.longitude)
            .bind(record.fill_level)
            .bind(&record.collector_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        info!("Stored {} bins in SQLite", records.len());
        Ok(())
    }

    pub async fn bins_for_collector(&self, collector_id: &str) -> Result<Vec<BinRecord>> {
        let rows: Vec<BinRow> = sqlx::query_as(
            "SELECT bin_id, latitude, longitude, fill_level, collector_id \
             FROM bins WHERE collector_id = ? ORDER BY rowid",
        )
        .bind(collector_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("Loaded {} bins for {collector_id} from SQLite", rows.len());
        Ok(rows
            .into_iter()
            .map(|(bin_id, lat, lon, fill_level, collector_id)| {
                BinRecord::new(BinLocation::new(bin_id, lat, lon), fill_level, collector_id)
            })
            .collect())
    }

    pub async fn collector_ids(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT collector_id FROM bins \
             WHERE collector_id IS NOT NULL ORDER BY collector_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn save_route(
        &self,
        collector_id: &str,
        stops: &[RouteStop],
        assigned_at: DateTime<Utc>,
    ) -> Result<()> {
        let assigned_ms = assigned_at.timestamp_millis();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM route_stops WHERE collector_id = ?")
            .bind(collector_id)
            .execute(&mut *tx)
            .await?;

        for stop in stops {
            let order = i64::try_from(stop.order)
                .map_err(|_| Error::invalid_input(format!("stop order {} too large", stop.order)))?;
            sqlx::query(
                r#"
                INSERT INTO route_stops
                    (collector_id, bin_id, stop_order, status, latitude, longitude, assigned_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(collector_id)
            .bind(&stop.bin.bin_id)
            .bind(order)
            .bind(stop.status.as_str())
            .bind(stop.bin.location.latitude)
            .bind(stop.bin.location.longitude)
            .bind(assigned_ms)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Saved {} stops for {collector_id} in SQLite", stops.len());
        Ok(())
    }

    pub async fn current_route(&self, collector_id: &str) -> Result<Option<StoredRoute>> {
        let rows: Vec<StopRow> = sqlx::query_as(
            "SELECT bin_id, latitude, longitude, stop_order, status, assigned_at \
             FROM route_stops WHERE collector_id = ? ORDER BY stop_order",
        )
        .bind(collector_id)
        .fetch_all(&self.pool)
        .await?;

        let Some(&(_, _, _, _, _, assigned_ms)) = rows.first() else {
            return Ok(None);
        };
        let assigned_at = DateTime::from_timestamp_millis(assigned_ms).ok_or_else(|| {
            Error::invalid_input(format!("stored timestamp {assigned_ms} is out of range"))
        })?;

        let stops = rows
            .into_iter()
            .map(|(bin_id, lat, lon, order, status, _)| {
                Ok(RouteStop {
                    bin: BinLocation::new(bin_id, lat, lon),
                    order: usize::try_from(order)
                        .map_err(|_| Error::invalid_input(format!("negative stop order {order}")))?,
                    status: status.parse()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(StoredRoute { stops, assigned_at }))
    }

    pub async fn update_stop_status(
        &self,
        collector_id: &str,
        bin_id: &str,
        status: StopStatus,
    ) -> Result<()> {
        let result =
            sqlx::query("UPDATE route_stops SET status = ? WHERE collector_id = ? AND bin_id = ?")
                .bind(status.as_str())
                .bind(collector_id)
                .bind(bin_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!(
                "stop {bin_id} on the route of {collector_id}"
            )));
        }
        debug!("Marked {bin_id} {status} for {collector_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db_connection;

    async fn store() -> SqliteStore {
        SqliteStore::new(db_connection("sqlite::memory:").await.unwrap())
    }

    fn record(id: &str, lat: f64, lon: f64, collector: Option<&str>) -> BinRecord {
        BinRecord::new(
            BinLocation::new(id, lat, lon),
            50.0,
            collector.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn bins_come_back_in_insertion_order() {
        let store = store().await;
        store
            .upsert_bins(&[
                record("Z", 1.0, 1.0, Some("COL-1")),
                record("A", 2.0, 2.0, Some("COL-1")),
                record("M", 3.0, 3.0, Some("COL-2")),
                record("U", 4.0, 4.0, None),
            ])
            .await
            .unwrap();

        let bins = store.bins_for_collector("COL-1").await.unwrap();
        let ids: Vec<_> = bins.iter().map(|b| b.bin.bin_id.as_str()).collect();
        assert_eq!(ids, vec!["Z", "A"]);
        assert_eq!(store.collector_ids().await.unwrap(), vec!["COL-1", "COL-2"]);
    }

    #[tokio::test]
    async fn upsert_updates_existing_bins() {
        let store = store().await;
        store
            .upsert_bins(&[record("A", 1.0, 1.0, Some("COL-1"))])
            .await
            .unwrap();
        store
            .upsert_bins(&[record("A", 5.0, 6.0, Some("COL-2"))])
            .await
            .unwrap();

        assert!(store.bins_for_collector("COL-1").await.unwrap().is_empty());
        let moved = store.bins_for_collector("COL-2").await.unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].bin.location.latitude, 5.0);
    }

    #[tokio::test]
    async fn saving_a_route_replaces_the_previous_one() {
        let store = store().await;
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let first = vec![
            RouteStop {
                bin: BinLocation::new("A", 1.0, 1.0),
                order: 0,
                status: StopStatus::Pending,
            },
            RouteStop {
                bin: BinLocation::new("B", 2.0, 2.0),
                order: 1,
                status: StopStatus::Pending,
            },
        ];
        store.save_route("COL-1", &first, now).await.unwrap();

        let second = vec![RouteStop {
            bin: BinLocation::new("C", 3.0, 3.0),
            order: 0,
            status: StopStatus::Pending,
        }];
        store.save_route("COL-1", &second, now).await.unwrap();

        let stored = store.current_route("COL-1").await.unwrap().unwrap();
        assert_eq!(stored.stops, second);
        assert_eq!(stored.assigned_at, now);
        assert!(store.current_route("COL-9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stop_status_updates() {
        let store = store().await;
        let stops = vec![RouteStop {
            bin: BinLocation::new("A", 1.0, 1.0),
            order: 0,
            status: StopStatus::Pending,
        }];
        store.save_route("COL-1", &stops, Utc::now()).await.unwrap();

        store
            .update_stop_status("COL-1", "A", StopStatus::Collected)
            .await
            .unwrap();
        let stored = store.current_route("COL-1").await.unwrap().unwrap();
        assert_eq!(stored.stops[0].status, StopStatus::Collected);

        let missing = store
            .update_stop_status("COL-1", "nope", StopStatus::Skipped)
            .await
            .unwrap_err();
        assert!(matches!(missing, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn closed_pool_is_an_error() {
        let store = store().await;
        store.pool().close().await;
        let err = store.collector_ids().await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
