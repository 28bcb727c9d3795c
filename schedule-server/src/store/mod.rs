//! Entity storage.
//!
//! All persistence goes through the [`EntityStore`] trait, which carries the
//! find-all / find-by-id / insert / update-by-id / delete-by-id capability
//! set for each entity type. The CRUD handlers and the schedule assembler
//! are written once against this trait; which backend actually holds the
//! rows is invisible to them.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::domain::{
    EntityId, RecordFields, ScheduleRecord, Station, StationFields, Train, TrainFields,
};

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A well-formed identifier that matches no row.
    #[error("no row with id {0}")]
    NotFound(EntityId),

    /// The database rejected or failed an operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted value no longer parses as its domain type.
    #[error("corrupt row {id}: {reason}")]
    Corrupt { id: EntityId, reason: String },
}

/// Storage capability set for the three entity types.
///
/// Every operation is request-scoped: a connection is taken from the backend
/// for the duration of the call and released on every exit path. Inserts
/// generate the identifier and return the stored entity; updates are
/// whole-record replacements; deletes remove exactly one row. Update and
/// delete fail with [`StoreError::NotFound`] when no row matches.
///
/// Find-all results are ordered by ascending identifier, which keeps the
/// listing stable across calls with no intervening writes.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn trains(&self) -> Result<Vec<Train>, StoreError>;
    async fn find_train(&self, id: EntityId) -> Result<Option<Train>, StoreError>;
    async fn insert_train(&self, fields: TrainFields) -> Result<Train, StoreError>;
    async fn update_train(&self, id: EntityId, fields: TrainFields) -> Result<Train, StoreError>;
    async fn delete_train(&self, id: EntityId) -> Result<(), StoreError>;

    async fn stations(&self) -> Result<Vec<Station>, StoreError>;
    async fn find_station(&self, id: EntityId) -> Result<Option<Station>, StoreError>;
    async fn insert_station(&self, fields: StationFields) -> Result<Station, StoreError>;
    async fn update_station(
        &self,
        id: EntityId,
        fields: StationFields,
    ) -> Result<Station, StoreError>;
    async fn delete_station(&self, id: EntityId) -> Result<(), StoreError>;

    async fn records(&self) -> Result<Vec<ScheduleRecord>, StoreError>;
    async fn find_record(&self, id: EntityId) -> Result<Option<ScheduleRecord>, StoreError>;
    async fn insert_record(&self, fields: RecordFields) -> Result<ScheduleRecord, StoreError>;
    async fn update_record(
        &self,
        id: EntityId,
        fields: RecordFields,
    ) -> Result<ScheduleRecord, StoreError>;
    async fn delete_record(&self, id: EntityId) -> Result<(), StoreError>;
}
