//! In-memory entity store.
//!
//! Backs the test suite, and serves as the fallback backend when no
//! database is configured so the server can run without external services.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    EntityId, RecordFields, ScheduleRecord, Station, StationFields, Train, TrainFields,
};

use super::{EntityStore, StoreError};

/// HashMap-backed store.
///
/// Identifiers come from a single shared sequence, so an id never repeats
/// across entity types within one process. Nothing is persisted: all rows
/// are lost on shutdown.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    next_id: AtomicI64,
    trains: RwLock<HashMap<i64, Train>>,
    stations: RwLock<HashMap<i64, Station>>,
    records: RwLock<HashMap<i64, ScheduleRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicI64::new(1),
                trains: RwLock::new(HashMap::new()),
                stations: RwLock::new(HashMap::new()),
                records: RwLock::new(HashMap::new()),
            }),
        }
    }

    fn next_id(&self) -> EntityId {
        EntityId::from_raw(self.inner.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect a table's rows ordered by ascending id.
fn sorted_rows<T: Clone>(map: &HashMap<i64, T>) -> Vec<T> {
    let mut keys: Vec<i64> = map.keys().copied().collect();
    keys.sort_unstable();
    keys.into_iter().map(|k| map[&k].clone()).collect()
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn trains(&self) -> Result<Vec<Train>, StoreError> {
        let guard = self.inner.trains.read().await;
        Ok(sorted_rows(&guard))
    }

    async fn find_train(&self, id: EntityId) -> Result<Option<Train>, StoreError> {
        let guard = self.inner.trains.read().await;
        Ok(guard.get(&id.as_i64()).cloned())
    }

    async fn insert_train(&self, fields: TrainFields) -> Result<Train, StoreError> {
        let id = self.next_id();
        let train = Train {
            id,
            name: fields.name,
            kind: fields.kind,
        };
        let mut guard = self.inner.trains.write().await;
        guard.insert(id.as_i64(), train.clone());
        Ok(train)
    }

    async fn update_train(&self, id: EntityId, fields: TrainFields) -> Result<Train, StoreError> {
        let mut guard = self.inner.trains.write().await;
        let slot = guard.get_mut(&id.as_i64()).ok_or(StoreError::NotFound(id))?;
        slot.name = fields.name;
        slot.kind = fields.kind;
        Ok(slot.clone())
    }

    async fn delete_train(&self, id: EntityId) -> Result<(), StoreError> {
        let mut guard = self.inner.trains.write().await;
        guard
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn stations(&self) -> Result<Vec<Station>, StoreError> {
        let guard = self.inner.stations.read().await;
        Ok(sorted_rows(&guard))
    }

    async fn find_station(&self, id: EntityId) -> Result<Option<Station>, StoreError> {
        let guard = self.inner.stations.read().await;
        Ok(guard.get(&id.as_i64()).cloned())
    }

    async fn insert_station(&self, fields: StationFields) -> Result<Station, StoreError> {
        let id = self.next_id();
        let station = Station {
            id,
            name: fields.name,
            platform: fields.platform,
        };
        let mut guard = self.inner.stations.write().await;
        guard.insert(id.as_i64(), station.clone());
        Ok(station)
    }

    async fn update_station(
        &self,
        id: EntityId,
        fields: StationFields,
    ) -> Result<Station, StoreError> {
        let mut guard = self.inner.stations.write().await;
        let slot = guard.get_mut(&id.as_i64()).ok_or(StoreError::NotFound(id))?;
        slot.name = fields.name;
        slot.platform = fields.platform;
        Ok(slot.clone())
    }

    async fn delete_station(&self, id: EntityId) -> Result<(), StoreError> {
        let mut guard = self.inner.stations.write().await;
        guard
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn records(&self) -> Result<Vec<ScheduleRecord>, StoreError> {
        let guard = self.inner.records.read().await;
        Ok(sorted_rows(&guard))
    }

    async fn find_record(&self, id: EntityId) -> Result<Option<ScheduleRecord>, StoreError> {
        let guard = self.inner.records.read().await;
        Ok(guard.get(&id.as_i64()).cloned())
    }

    async fn insert_record(&self, fields: RecordFields) -> Result<ScheduleRecord, StoreError> {
        let id = self.next_id();
        let record = ScheduleRecord {
            id,
            train_id: fields.train_id,
            departure_station_id: fields.departure_station_id,
            arrival_station_id: fields.arrival_station_id,
            departure_time: fields.departure_time,
            arrival_time: fields.arrival_time,
        };
        let mut guard = self.inner.records.write().await;
        guard.insert(id.as_i64(), record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        id: EntityId,
        fields: RecordFields,
    ) -> Result<ScheduleRecord, StoreError> {
        let mut guard = self.inner.records.write().await;
        let slot = guard.get_mut(&id.as_i64()).ok_or(StoreError::NotFound(id))?;
        slot.train_id = fields.train_id;
        slot.departure_station_id = fields.departure_station_id;
        slot.arrival_station_id = fields.arrival_station_id;
        slot.departure_time = fields.departure_time;
        slot.arrival_time = fields.arrival_time;
        Ok(slot.clone())
    }

    async fn delete_record(&self, id: EntityId) -> Result<(), StoreError> {
        let mut guard = self.inner.records.write().await;
        guard
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeOfDay;

    fn train_fields(name: &str) -> TrainFields {
        TrainFields {
            name: name.to_string(),
            kind: "passenger".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_generates_fresh_ids() {
        let store = MemoryStore::new();
        let a = store.insert_train(train_fields("Express 1")).await.unwrap();
        let b = store.insert_train(train_fields("Express 2")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Express 1");
        assert_eq!(a.kind, "passenger");
    }

    #[tokio::test]
    async fn created_train_listed_exactly_once() {
        let store = MemoryStore::new();
        let created = store.insert_train(train_fields("Express 1")).await.unwrap();

        let all = store.trains().await.unwrap();
        let matching: Vec<_> = all.iter().filter(|t| t.id == created.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "Express 1");
    }

    #[tokio::test]
    async fn listing_is_ordered_by_id() {
        let store = MemoryStore::new();
        for name in ["c", "a", "b"] {
            store.insert_train(train_fields(name)).await.unwrap();
        }
        let all = store.trains().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|t| t.id.as_i64()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let store = MemoryStore::new();
        let created = store.insert_train(train_fields("Express 1")).await.unwrap();

        let updated = store
            .update_train(
                created.id,
                TrainFields {
                    name: "Night Mail".to_string(),
                    kind: "freight".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Night Mail");
        assert_eq!(updated.kind, "freight");
    }

    #[tokio::test]
    async fn update_absent_is_not_found() {
        let store = MemoryStore::new();
        let result = store
            .update_train(EntityId::from_raw(999), train_fields("ghost"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_twice_is_not_found_second_time() {
        let store = MemoryStore::new();
        let created = store.insert_train(train_fields("Express 1")).await.unwrap();

        assert!(store.delete_train(created.id).await.is_ok());
        let second = store.delete_train(created.id).await;
        assert!(matches!(second, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn station_crud_lifecycle() {
        let store = MemoryStore::new();
        let created = store
            .insert_station(StationFields {
                name: "Central".to_string(),
                platform: "1A".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            store.find_station(created.id).await.unwrap(),
            Some(created.clone())
        );

        store.delete_station(created.id).await.unwrap();
        assert_eq!(store.find_station(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_references_are_not_checked_by_the_store() {
        // Referential validation is the handler's job; the store accepts
        // whatever ids it is given.
        let store = MemoryStore::new();
        let record = store
            .insert_record(RecordFields {
                train_id: EntityId::from_raw(100),
                departure_station_id: EntityId::from_raw(200),
                arrival_station_id: EntityId::from_raw(200),
                departure_time: TimeOfDay::parse("08:00").unwrap(),
                arrival_time: TimeOfDay::parse("08:00").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(
            store.find_record(record.id).await.unwrap(),
            Some(record.clone())
        );
    }
}
