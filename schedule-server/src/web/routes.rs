//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, put},
};
use tower_http::trace::TraceLayer;

use crate::domain::{EntityId, RecordFields, StationFields, TimeOfDay, TrainFields};
use crate::schedule::assemble;
use crate::store::{EntityStore, StoreError};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/trains/", get(list_trains).post(create_train))
        .route("/trains/:id", put(update_train).delete(delete_train))
        .route("/stations/", get(list_stations).post(create_station))
        .route("/stations/:id", put(update_station).delete(delete_station))
        .route("/records/", get(list_records).post(create_record))
        .route("/records/:id", put(update_record).delete(delete_record))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Schedule page: assembled schedule plus train and station lists.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let entries = assemble(state.store.as_ref()).await?;
    let trains = state.store.trains().await?;
    let stations = state.store.stations().await?;

    let template = IndexTemplate {
        records: entries.iter().map(ScheduleEntryView::from_entry).collect(),
        trains: trains.iter().map(TrainView::from_train).collect(),
        stations: stations.iter().map(StationView::from_station).collect(),
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(Html(html))
}

// ============================================================================
// Trains
// ============================================================================

async fn list_trains(State(state): State<AppState>) -> Result<Json<Vec<TrainDto>>, AppError> {
    let trains = state.store.trains().await?;
    Ok(Json(trains.iter().map(TrainDto::from_train).collect()))
}

async fn create_train(
    State(state): State<AppState>,
    Form(form): Form<TrainForm>,
) -> Result<Json<TrainDto>, AppError> {
    let train = state
        .store
        .insert_train(TrainFields {
            name: form.name,
            kind: form.kind,
        })
        .await?;
    Ok(Json(TrainDto::from_train(&train)))
}

async fn update_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<TrainForm>,
) -> Result<Json<TrainDto>, AppError> {
    let id = parse_path_id(&id)?;
    let train = state
        .store
        .update_train(
            id,
            TrainFields {
                name: form.name,
                kind: form.kind,
            },
        )
        .await?;
    Ok(Json(TrainDto::from_train(&train)))
}

async fn delete_train(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_path_id(&id)?;
    state.store.delete_train(id).await?;
    Ok(Json(MessageResponse {
        message: "Train deleted successfully".to_string(),
    }))
}

// ============================================================================
// Stations
// ============================================================================

async fn list_stations(State(state): State<AppState>) -> Result<Json<Vec<StationDto>>, AppError> {
    let stations = state.store.stations().await?;
    Ok(Json(stations.iter().map(StationDto::from_station).collect()))
}

async fn create_station(
    State(state): State<AppState>,
    Form(form): Form<StationForm>,
) -> Result<Json<StationDto>, AppError> {
    let station = state
        .store
        .insert_station(StationFields {
            name: form.name,
            platform: form.platform,
        })
        .await?;
    Ok(Json(StationDto::from_station(&station)))
}

async fn update_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StationForm>,
) -> Result<Json<StationDto>, AppError> {
    let id = parse_path_id(&id)?;
    let station = state
        .store
        .update_station(
            id,
            StationFields {
                name: form.name,
                platform: form.platform,
            },
        )
        .await?;
    Ok(Json(StationDto::from_station(&station)))
}

async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_path_id(&id)?;
    state.store.delete_station(id).await?;
    Ok(Json(MessageResponse {
        message: "Station deleted successfully".to_string(),
    }))
}

// ============================================================================
// Records
// ============================================================================

async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<RecordDto>>, AppError> {
    let records = state.store.records().await?;
    Ok(Json(records.iter().map(RecordDto::from_record).collect()))
}

async fn create_record(
    State(state): State<AppState>,
    Form(form): Form<RecordForm>,
) -> Result<Json<RecordDto>, AppError> {
    let fields = parse_record_form(&form)?;
    check_references(state.store.as_ref(), &fields).await?;
    let record = state.store.insert_record(fields).await?;
    Ok(Json(RecordDto::from_record(&record)))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<RecordForm>,
) -> Result<Json<RecordDto>, AppError> {
    let id = parse_path_id(&id)?;
    let fields = parse_record_form(&form)?;
    check_references(state.store.as_ref(), &fields).await?;
    let record = state.store.update_record(id, fields).await?;
    Ok(Json(RecordDto::from_record(&record)))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_path_id(&id)?;
    state.store.delete_record(id).await?;
    Ok(Json(MessageResponse {
        message: "Record deleted successfully".to_string(),
    }))
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Parse an identifier token from a path segment.
///
/// A malformed token is a different failure from a well-formed token that
/// matches no row: this maps to 400, a store miss maps to 404.
fn parse_path_id(token: &str) -> Result<EntityId, AppError> {
    EntityId::parse(token).map_err(|e| AppError::InvalidIdentifier {
        message: format!("invalid id {:?}: {}", token, e),
    })
}

/// Parse the record form, collecting every malformed field.
///
/// A record create or update never partially succeeds: all five fields must
/// parse, and the response names each one that did not.
fn parse_record_form(form: &RecordForm) -> Result<RecordFields, AppError> {
    let mut invalid = Vec::new();

    let train_id = EntityId::parse(&form.train_id)
        .inspect_err(|_| invalid.push("train_id"))
        .ok();
    let departure_station_id = EntityId::parse(&form.departure_station_id)
        .inspect_err(|_| invalid.push("departure_station_id"))
        .ok();
    let arrival_station_id = EntityId::parse(&form.arrival_station_id)
        .inspect_err(|_| invalid.push("arrival_station_id"))
        .ok();
    let departure_time = TimeOfDay::parse(&form.departure_time)
        .inspect_err(|_| invalid.push("departure_time"))
        .ok();
    let arrival_time = TimeOfDay::parse(&form.arrival_time)
        .inspect_err(|_| invalid.push("arrival_time"))
        .ok();

    match (
        train_id,
        departure_station_id,
        arrival_station_id,
        departure_time,
        arrival_time,
    ) {
        (Some(train_id), Some(departure), Some(arrival), Some(dep_time), Some(arr_time)) => {
            Ok(RecordFields {
                train_id,
                departure_station_id: departure,
                arrival_station_id: arrival,
                departure_time: dep_time,
                arrival_time: arr_time,
            })
        }
        _ => Err(AppError::InvalidInput {
            message: format!("invalid field(s): {}", invalid.join(", ")),
        }),
    }
}

/// Check that every entity a record references exists.
///
/// Runs before any write so a record with a dangling reference is rejected
/// whole; references can still dangle later through deletes, which the
/// assembler handles by exclusion.
async fn check_references(
    store: &dyn EntityStore,
    fields: &RecordFields,
) -> Result<(), AppError> {
    let mut missing = Vec::new();

    if store.find_train(fields.train_id).await?.is_none() {
        missing.push(format!("train {}", fields.train_id));
    }
    if store
        .find_station(fields.departure_station_id)
        .await?
        .is_none()
    {
        missing.push(format!("departure station {}", fields.departure_station_id));
    }
    if store
        .find_station(fields.arrival_station_id)
        .await?
        .is_none()
    {
        missing.push(format!("arrival station {}", fields.arrival_station_id));
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidInput {
            message: format!("unknown reference(s): {}", missing.join(", ")),
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed identifier token in a path segment (400).
    InvalidIdentifier { message: String },
    /// Malformed or unresolvable body field (400).
    InvalidInput { message: String },
    /// Well-formed identifier with no matching row (404).
    NotFound { message: String },
    /// Storage or rendering fault (500).
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::NotFound {
                message: format!("no row with id {}", id),
            },
            other => AppError::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::InvalidIdentifier { message } | AppError::InvalidInput { message } => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        } else {
            tracing::warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn test_state() -> AppState {
        AppState::new(MemoryStore::new())
    }

    fn train_form(name: &str) -> TrainForm {
        TrainForm {
            name: name.to_string(),
            kind: "passenger".to_string(),
        }
    }

    async fn seed_train(state: &AppState, name: &str) -> TrainDto {
        let Json(dto) = create_train(State(state.clone()), Form(train_form(name)))
            .await
            .unwrap();
        dto
    }

    async fn seed_station(state: &AppState, name: &str) -> StationDto {
        let Json(dto) = create_station(
            State(state.clone()),
            Form(StationForm {
                name: name.to_string(),
                platform: "1".to_string(),
            }),
        )
        .await
        .unwrap();
        dto
    }

    fn record_form(train: &str, from: &str, to: &str, dep: &str, arr: &str) -> RecordForm {
        RecordForm {
            train_id: train.to_string(),
            departure_station_id: from.to_string(),
            arrival_station_id: to.to_string(),
            departure_time: dep.to_string(),
            arrival_time: arr.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_list_trains() {
        let state = test_state();
        let created = seed_train(&state, "Express 1").await;
        assert_eq!(created.name, "Express 1");
        assert_eq!(created.kind, "passenger");

        let Json(all) = list_trains(State(state.clone())).await.unwrap();
        let matching: Vec<_> = all.iter().filter(|t| t.id == created.id).collect();
        assert_eq!(matching.len(), 1);
    }

    #[tokio::test]
    async fn update_absent_train_is_not_found() {
        let state = test_state();
        let result = update_train(
            State(state.clone()),
            Path("999".to_string()),
            Form(train_form("ghost")),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn malformed_token_is_invalid_identifier_not_not_found() {
        let state = test_state();

        let result = delete_train(State(state.clone()), Path("not-a-number".to_string())).await;
        assert!(matches!(result, Err(AppError::InvalidIdentifier { .. })));

        // A 24-hex document-store style token is malformed here too
        let result = update_train(
            State(state.clone()),
            Path("507f1f77bcf86cd799439011".to_string()),
            Form(train_form("ghost")),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidIdentifier { .. })));
    }

    #[tokio::test]
    async fn delete_twice_returns_success_then_not_found() {
        let state = test_state();
        let created = seed_train(&state, "Express 1").await;

        let first = delete_train(State(state.clone()), Path(created.id.clone())).await;
        assert!(first.is_ok());

        let second = delete_train(State(state.clone()), Path(created.id)).await;
        assert!(matches!(second, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn create_record_resolves_ids_and_times() {
        let state = test_state();
        let train = seed_train(&state, "Express 1").await;
        let from = seed_station(&state, "Central").await;
        let to = seed_station(&state, "Harbour").await;

        let Json(record) = create_record(
            State(state.clone()),
            Form(record_form(&train.id, &from.id, &to.id, "08:00", "08:00")),
        )
        .await
        .unwrap();

        assert_eq!(record.train_id, train.id);
        assert_eq!(record.departure_time, "08:00");
        assert_eq!(record.arrival_time, "08:00");
    }

    #[tokio::test]
    async fn record_parse_failures_are_aggregated() {
        let state = test_state();
        let result = create_record(
            State(state.clone()),
            Form(record_form("abc", "1", "xyz", "8:00", "09:00")),
        )
        .await;

        let Err(AppError::InvalidInput { message }) = result else {
            panic!("expected InvalidInput");
        };
        assert!(message.contains("train_id"));
        assert!(message.contains("arrival_station_id"));
        assert!(message.contains("departure_time"));
        assert!(!message.contains("arrival_time"));

        // Nothing was written
        assert!(state.store.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn record_with_unknown_reference_is_rejected() {
        let state = test_state();
        let train = seed_train(&state, "Express 1").await;
        let from = seed_station(&state, "Central").await;

        let result = create_record(
            State(state.clone()),
            Form(record_form(&train.id, &from.id, "999", "08:00", "09:00")),
        )
        .await;

        let Err(AppError::InvalidInput { message }) = result else {
            panic!("expected InvalidInput");
        };
        assert!(message.contains("arrival station 999"));
        assert!(state.store.records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn index_page_renders_schedule() {
        let state = test_state();
        let train = seed_train(&state, "Express 1").await;
        let from = seed_station(&state, "Central").await;
        let to = seed_station(&state, "Harbour").await;
        create_record(
            State(state.clone()),
            Form(record_form(&train.id, &from.id, &to.id, "08:00", "09:30")),
        )
        .await
        .unwrap();

        let Html(html) = index_page(State(state.clone())).await.unwrap();
        assert!(html.contains("Express 1"));
        assert!(html.contains("Central"));
        assert!(html.contains("Harbour"));
        assert!(html.contains("08:00"));
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (
                AppError::InvalidIdentifier {
                    message: "bad token".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::InvalidInput {
                    message: "bad field".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::NotFound {
                    message: "no row".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Internal {
                    message: "boom".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
