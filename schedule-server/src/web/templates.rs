//! Askama templates for the schedule page.

use askama::Template;

use crate::domain::{Station, Train};
use crate::schedule::ScheduleEntry;

/// Schedule page: the assembled schedule plus entity lists and add forms.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub records: Vec<ScheduleEntryView>,
    pub trains: Vec<TrainView>,
    pub stations: Vec<StationView>,
}

/// Assembled schedule row view model.
#[derive(Debug, Clone)]
pub struct ScheduleEntryView {
    pub id: String,
    pub train_name: String,
    pub departure_station_name: String,
    pub arrival_station_name: String,
    pub departure_time: String,
    pub arrival_time: String,
}

impl ScheduleEntryView {
    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            id: entry.record_id.to_string(),
            train_name: entry.train_name.clone(),
            departure_station_name: entry.departure_station_name.clone(),
            arrival_station_name: entry.arrival_station_name.clone(),
            departure_time: entry.departure_time.to_string(),
            arrival_time: entry.arrival_time.to_string(),
        }
    }
}

/// Train view model.
#[derive(Debug, Clone)]
pub struct TrainView {
    pub id: String,
    pub name: String,
    pub kind: String,
}

impl TrainView {
    pub fn from_train(train: &Train) -> Self {
        Self {
            id: train.id.to_string(),
            name: train.name.clone(),
            kind: train.kind.clone(),
        }
    }
}

/// Station view model.
#[derive(Debug, Clone)]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub platform: String,
}

impl StationView {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            platform: station.platform.clone(),
        }
    }
}
