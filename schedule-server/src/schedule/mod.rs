//! Schedule assembly.
//!
//! Joins each schedule record with its train and its two stations to
//! produce the flat rows the schedule page displays. The join is written
//! once against [`EntityStore`], so every backend gets identical semantics.

use std::collections::HashMap;

use crate::domain::{EntityId, TimeOfDay};
use crate::store::{EntityStore, StoreError};

/// One row of the assembled schedule view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub record_id: EntityId,
    pub train_name: String,
    pub departure_station_name: String,
    pub arrival_station_name: String,
    pub departure_time: TimeOfDay,
    pub arrival_time: TimeOfDay,
}

/// Assemble the whole-table schedule view.
///
/// Inner-join semantics: a record whose train or either station no longer
/// exists is silently excluded. That is deliberate — deletes don't cascade,
/// so dangling references are an expected state, and the schedule page
/// simply stops showing the affected movements.
///
/// Output is ordered by ascending record id, which is stable across calls
/// with no intervening writes.
pub async fn assemble(store: &dyn EntityStore) -> Result<Vec<ScheduleEntry>, StoreError> {
    let trains = store.trains().await?;
    let stations = store.stations().await?;
    let records = store.records().await?;

    let train_names: HashMap<EntityId, &str> = trains
        .iter()
        .map(|t| (t.id, t.name.as_str()))
        .collect();
    let station_names: HashMap<EntityId, &str> = stations
        .iter()
        .map(|s| (s.id, s.name.as_str()))
        .collect();

    // records() already yields ascending id order
    let entries = records
        .iter()
        .filter_map(|r| {
            let train_name = train_names.get(&r.train_id)?;
            let departure = station_names.get(&r.departure_station_id)?;
            let arrival = station_names.get(&r.arrival_station_id)?;
            Some(ScheduleEntry {
                record_id: r.id,
                train_name: train_name.to_string(),
                departure_station_name: departure.to_string(),
                arrival_station_name: arrival.to_string(),
                departure_time: r.departure_time,
                arrival_time: r.arrival_time,
            })
        })
        .collect();

    Ok(entries)
}
