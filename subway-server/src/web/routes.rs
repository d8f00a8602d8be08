//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::{LineId, StationId};
use crate::service::ServiceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations).post(create_station))
        .route("/stations/:id", delete(delete_station))
        .route("/lines", get(list_lines).post(create_line))
        .route(
            "/lines/:id",
            get(get_line).put(update_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(add_section).delete(remove_section),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(body), "JSON parse error: {e}");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// A 201 response with a `Location` header.
fn created(location: String, body: impl Serialize) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

/// Register a station.
async fn create_station(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: CreateStationRequest = parse_json(&body)?;
    let station = state.service.create_station(&req.into_name()?).await?;

    Ok(created(
        format!("/stations/{}", station.id()),
        StationResponse::from(&station),
    ))
}

/// List all stations.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.service.list_stations().await;
    Json(stations.iter().map(StationResponse::from).collect())
}

/// Delete a station no line uses.
async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_station(StationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a line with its first section.
async fn create_line(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let req: CreateLineRequest = parse_json(&body)?;
    let line = state.service.create_line(req.into_new_line()?).await?;

    Ok(created(
        format!("/lines/{}", line.id),
        LineResponse::from(line),
    ))
}

/// List all lines with their stations.
async fn list_lines(State(state): State<AppState>) -> Json<Vec<LineResponse>> {
    let lines = state.service.list_lines().await;
    Json(lines.into_iter().map(LineResponse::from).collect())
}

/// Get one line with its stations in order.
async fn get_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<LineResponse>, AppError> {
    let line = state.service.get_line(LineId(id)).await?;
    Ok(Json(LineResponse::from(line)))
}

/// Change a line's name and/or color.
async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let req: UpdateLineRequest = parse_json(&body)?;
    let line = state.service.update_line(LineId(id), req.into()).await?;
    Ok(Json(LineResponse::from(line)))
}

/// Delete a line and its sections.
async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_line(LineId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Register a section on a line.
async fn add_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: CreateSectionRequest = parse_json(&body)?;
    let line = state
        .service
        .add_section(LineId(id), req.into_new_section()?)
        .await?;

    Ok(created(
        format!("/lines/{}", line.id),
        LineResponse::from(line),
    ))
}

/// Remove the last station of a line.
async fn remove_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    query: Result<Query<RemoveSectionQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;
    let station = query.into_station()?;
    state.service.remove_section(LineId(id), station).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Unprocessable { message: String },
}

impl From<MissingField> for AppError {
    fn from(e: MissingField) -> Self {
        AppError::Unprocessable {
            message: e.to_string(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::StationNotFound(_) | ServiceError::LineNotFound(_) => {
                AppError::NotFound { message }
            }
            ServiceError::DuplicateLineName(_) | ServiceError::StationInUse { .. } => {
                AppError::Conflict { message }
            }
            ServiceError::UnknownStation(_)
            | ServiceError::Domain(_)
            | ServiceError::Topology(_) => AppError::Unprocessable { message },
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message }
            | AppError::Unprocessable { message } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        warn!(%status, "{}", self.message());

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
