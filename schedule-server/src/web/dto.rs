//! Data transfer objects for web requests and responses.
//!
//! Identifier and time fields are plain strings here; parsing into domain
//! types (and the resulting 400s) happens in the handlers.

use serde::{Deserialize, Serialize};

use crate::domain::{ScheduleRecord, Station, Train};

/// Form body for creating or replacing a train.
#[derive(Debug, Deserialize)]
pub struct TrainForm {
    /// Display name, e.g. "Express 1"
    pub name: String,

    /// Classification, e.g. "passenger"
    #[serde(rename = "type")]
    pub kind: String,
}

/// Form body for creating or replacing a station.
#[derive(Debug, Deserialize)]
pub struct StationForm {
    /// Display name
    pub name: String,

    /// Free-form platform label, e.g. "1" or "1A"
    pub platform: String,
}

/// Form body for creating or replacing a schedule record.
///
/// All five fields are textual tokens; each one can fail to parse.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    /// Identifier token of the train
    pub train_id: String,

    /// Identifier token of the departure station
    pub departure_station_id: String,

    /// Identifier token of the arrival station
    pub arrival_station_id: String,

    /// Departure time as "HH:MM"
    pub departure_time: String,

    /// Arrival time as "HH:MM"
    pub arrival_time: String,
}

/// A train in API responses.
#[derive(Debug, Serialize)]
pub struct TrainDto {
    /// Identifier token
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,
}

impl TrainDto {
    pub fn from_train(train: &Train) -> Self {
        Self {
            id: train.id.to_string(),
            name: train.name.clone(),
            kind: train.kind.clone(),
        }
    }
}

/// A station in API responses.
#[derive(Debug, Serialize)]
pub struct StationDto {
    /// Identifier token
    pub id: String,

    pub name: String,

    pub platform: String,
}

impl StationDto {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            platform: station.platform.clone(),
        }
    }
}

/// A schedule record in API responses.
///
/// Identifiers are resolved to tokens and times formatted back to "HH:MM".
#[derive(Debug, Serialize)]
pub struct RecordDto {
    pub id: String,
    pub train_id: String,
    pub departure_station_id: String,
    pub arrival_station_id: String,
    pub departure_time: String,
    pub arrival_time: String,
}

impl RecordDto {
    pub fn from_record(record: &ScheduleRecord) -> Self {
        Self {
            id: record.id.to_string(),
            train_id: record.train_id.to_string(),
            departure_station_id: record.departure_station_id.to_string(),
            arrival_station_id: record.arrival_station_id.to_string(),
            departure_time: record.departure_time.to_string(),
            arrival_time: record.arrival_time.to_string(),
        }
    }
}

/// Acknowledgement body for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body for failure responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, TimeOfDay};

    #[test]
    fn train_dto_exposes_kind_as_type() {
        let train = Train {
            id: EntityId::from_raw(7),
            name: "Express 1".to_string(),
            kind: "passenger".to_string(),
        };
        let json = serde_json::to_value(TrainDto::from_train(&train)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "7", "name": "Express 1", "type": "passenger"})
        );
    }

    #[test]
    fn train_form_accepts_type_field() {
        let form: TrainForm =
            serde_json::from_value(serde_json::json!({"name": "Express 1", "type": "passenger"}))
                .unwrap();
        assert_eq!(form.kind, "passenger");
    }

    #[test]
    fn record_dto_formats_ids_and_times() {
        let record = ScheduleRecord {
            id: EntityId::from_raw(1),
            train_id: EntityId::from_raw(2),
            departure_station_id: EntityId::from_raw(3),
            arrival_station_id: EntityId::from_raw(4),
            departure_time: TimeOfDay::parse("08:00").unwrap(),
            arrival_time: TimeOfDay::parse("09:05").unwrap(),
        };
        let dto = RecordDto::from_record(&record);
        assert_eq!(dto.id, "1");
        assert_eq!(dto.train_id, "2");
        assert_eq!(dto.departure_time, "08:00");
        assert_eq!(dto.arrival_time, "09:05");
    }
}
