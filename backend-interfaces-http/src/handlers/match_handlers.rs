use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use backend_application::commands::match_commands;
use backend_application::queries::match_queries;
use backend_application::AppState;
use backend_domain::{CsvRow, DashboardSummary, LogMatchRequest, MatchRecord};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn log_match(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LogMatchRequest>,
) -> Result<(StatusCode, Json<MatchRecord>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let record = match_commands::log_match(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = match_queries::dashboard(&state).await?;
    Ok(Json(summary))
}

pub async fn export_matches(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let csv = match_queries::export_matches(&state).await?;
    Ok(csv_response(csv))
}

pub async fn render_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(rows): Json<Vec<CsvRow>>,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let csv = match_queries::render_rows(&rows)?;
    Ok(csv_response(csv))
}

fn csv_response(body: String) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    (headers, body).into_response()
}
