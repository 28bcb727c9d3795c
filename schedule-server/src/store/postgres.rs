//! Postgres entity store.
//!
//! Pooled `sqlx` backend. Queries use the runtime API with row structs that
//! map 1-to-1 onto the tables; domain conversion happens at the boundary so
//! nothing outside this module sees a raw row.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::domain::{
    EntityId, RecordFields, ScheduleRecord, Station, StationFields, TimeOfDay, Train, TrainFields,
};

use super::{EntityStore, StoreError};

/// Tables created at startup.
///
/// There are deliberately no foreign-key constraints on `records`: deleting
/// a referenced train or station must leave the record behind with a
/// dangling reference, which the schedule assembler then excludes.
/// Reference existence is checked at the handler layer instead.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS trains (
    id   BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS stations (
    id       BIGSERIAL PRIMARY KEY,
    name     TEXT NOT NULL,
    platform TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS records (
    id                   BIGSERIAL PRIMARY KEY,
    train_id             BIGINT NOT NULL,
    departure_station_id BIGINT NOT NULL,
    arrival_station_id   BIGINT NOT NULL,
    departure_time       TEXT NOT NULL,
    arrival_time         TEXT NOT NULL
);
"#;

/// Pooled Postgres store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database and build the connection pool.
    ///
    /// `max_connections` controls the pool ceiling.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!("Connecting to database (max_connections={})", max_connections);
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        info!("Ensuring database schema");
        let mut conn = self.pool.acquire().await?;
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&mut *conn).await?;
        }
        Ok(())
    }
}

#[derive(FromRow)]
struct TrainRow {
    id: i64,
    name: String,
    kind: String,
}

impl From<TrainRow> for Train {
    fn from(row: TrainRow) -> Self {
        Train {
            id: EntityId::from_raw(row.id),
            name: row.name,
            kind: row.kind,
        }
    }
}

#[derive(FromRow)]
struct StationRow {
    id: i64,
    name: String,
    platform: String,
}

impl From<StationRow> for Station {
    fn from(row: StationRow) -> Self {
        Station {
            id: EntityId::from_raw(row.id),
            name: row.name,
            platform: row.platform,
        }
    }
}

#[derive(FromRow)]
struct RecordRow {
    id: i64,
    train_id: i64,
    departure_station_id: i64,
    arrival_station_id: i64,
    departure_time: String,
    arrival_time: String,
}

impl RecordRow {
    /// Convert to the domain type, re-validating the persisted times.
    ///
    /// Only validated "HH:MM" strings are ever written, so a parse failure
    /// here means the row was edited out-of-band.
    fn into_record(self) -> Result<ScheduleRecord, StoreError> {
        let id = EntityId::from_raw(self.id);
        let parse = |s: &str| {
            TimeOfDay::parse(s).map_err(|e| StoreError::Corrupt {
                id,
                reason: e.to_string(),
            })
        };
        Ok(ScheduleRecord {
            id,
            train_id: EntityId::from_raw(self.train_id),
            departure_station_id: EntityId::from_raw(self.departure_station_id),
            arrival_station_id: EntityId::from_raw(self.arrival_station_id),
            departure_time: parse(&self.departure_time)?,
            arrival_time: parse(&self.arrival_time)?,
        })
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn trains(&self) -> Result<Vec<Train>, StoreError> {
        let rows = sqlx::query_as::<_, TrainRow>("SELECT id, name, kind FROM trains ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Train::from).collect())
    }

    async fn find_train(&self, id: EntityId) -> Result<Option<Train>, StoreError> {
        let row = sqlx::query_as::<_, TrainRow>("SELECT id, name, kind FROM trains WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Train::from))
    }

    async fn insert_train(&self, fields: TrainFields) -> Result<Train, StoreError> {
        let row = sqlx::query_as::<_, TrainRow>(
            "INSERT INTO trains (name, kind) VALUES ($1, $2) RETURNING id, name, kind",
        )
        .bind(&fields.name)
        .bind(&fields.kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_train(&self, id: EntityId, fields: TrainFields) -> Result<Train, StoreError> {
        let row = sqlx::query_as::<_, TrainRow>(
            "UPDATE trains SET name = $2, kind = $3 WHERE id = $1 RETURNING id, name, kind",
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(&fields.kind)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Train::from).ok_or(StoreError::NotFound(id))
    }

    async fn delete_train(&self, id: EntityId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM trains WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn stations(&self) -> Result<Vec<Station>, StoreError> {
        let rows = sqlx::query_as::<_, StationRow>(
            "SELECT id, name, platform FROM stations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Station::from).collect())
    }

    async fn find_station(&self, id: EntityId) -> Result<Option<Station>, StoreError> {
        let row = sqlx::query_as::<_, StationRow>(
            "SELECT id, name, platform FROM stations WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Station::from))
    }

    async fn insert_station(&self, fields: StationFields) -> Result<Station, StoreError> {
        let row = sqlx::query_as::<_, StationRow>(
            "INSERT INTO stations (name, platform) VALUES ($1, $2) RETURNING id, name, platform",
        )
        .bind(&fields.name)
        .bind(&fields.platform)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update_station(
        &self,
        id: EntityId,
        fields: StationFields,
    ) -> Result<Station, StoreError> {
        let row = sqlx::query_as::<_, StationRow>(
            "UPDATE stations SET name = $2, platform = $3 WHERE id = $1 \
             RETURNING id, name, platform",
        )
        .bind(id.as_i64())
        .bind(&fields.name)
        .bind(&fields.platform)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Station::from).ok_or(StoreError::NotFound(id))
    }

    async fn delete_station(&self, id: EntityId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM stations WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn records(&self) -> Result<Vec<ScheduleRecord>, StoreError> {
        let rows = sqlx::query_as::<_, RecordRow>(
            "SELECT id, train_id, departure_station_id, arrival_station_id, \
             departure_time, arrival_time FROM records ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn find_record(&self, id: EntityId) -> Result<Option<ScheduleRecord>, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(
            "SELECT id, train_id, departure_station_id, arrival_station_id, \
             departure_time, arrival_time FROM records WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        row.map(RecordRow::into_record).transpose()
    }

    async fn insert_record(&self, fields: RecordFields) -> Result<ScheduleRecord, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(
            "INSERT INTO records \
             (train_id, departure_station_id, arrival_station_id, departure_time, arrival_time) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, train_id, departure_station_id, arrival_station_id, \
             departure_time, arrival_time",
        )
        .bind(fields.train_id.as_i64())
        .bind(fields.departure_station_id.as_i64())
        .bind(fields.arrival_station_id.as_i64())
        .bind(fields.departure_time.to_string())
        .bind(fields.arrival_time.to_string())
        .fetch_one(&self.pool)
        .await?;
        row.into_record()
    }

    async fn update_record(
        &self,
        id: EntityId,
        fields: RecordFields,
    ) -> Result<ScheduleRecord, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(
            "UPDATE records SET train_id = $2, departure_station_id = $3, \
             arrival_station_id = $4, departure_time = $5, arrival_time = $6 \
             WHERE id = $1 \
             RETURNING id, train_id, departure_station_id, arrival_station_id, \
             departure_time, arrival_time",
        )
        .bind(id.as_i64())
        .bind(fields.train_id.as_i64())
        .bind(fields.departure_station_id.as_i64())
        .bind(fields.arrival_station_id.as_i64())
        .bind(fields.departure_time.to_string())
        .bind(fields.arrival_time.to_string())
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => row.into_record(),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete_record(&self, id: EntityId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
