//! The three persisted entity types.
//!
//! Each entity pairs a stored form (with its generated id) with a fields
//! struct used for create and whole-record update. There are no partial
//! updates anywhere in the system.

use super::id::EntityId;
use super::time::TimeOfDay;

/// A train that can appear in schedule records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    pub id: EntityId,
    pub name: String,
    /// Free-form classification, e.g. "passenger" or "freight".
    pub kind: String,
}

/// Mutable fields of a [`Train`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainFields {
    pub name: String,
    pub kind: String,
}

/// A station that records can depart from or arrive at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: EntityId,
    pub name: String,
    /// Free-form platform label, e.g. "1" or "1A".
    pub platform: String,
}

/// Mutable fields of a [`Station`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationFields {
    pub name: String,
    pub platform: String,
}

/// A single scheduled train movement.
///
/// Links one train to a departure station, an arrival station and two times.
/// The two stations may be the same, and the arrival time may precede the
/// departure time (overnight routes are legitimate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub id: EntityId,
    pub train_id: EntityId,
    pub departure_station_id: EntityId,
    pub arrival_station_id: EntityId,
    pub departure_time: TimeOfDay,
    pub arrival_time: TimeOfDay,
}

/// Mutable fields of a [`ScheduleRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub train_id: EntityId,
    pub departure_station_id: EntityId,
    pub arrival_station_id: EntityId,
    pub departure_time: TimeOfDay,
    pub arrival_time: TimeOfDay,
}
