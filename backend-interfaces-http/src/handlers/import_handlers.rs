use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::error;

use backend_application::commands::import_commands;
use backend_application::AppState;
use backend_domain::{ImportQuery, ImportReport};

use crate::error::HttpError;
use crate::middleware::{authorize, decode_body};

/// Import the request body as a batch file.
pub async fn import_matches(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ImportQuery>,
    body: axum::body::Bytes,
) -> Result<Json<ImportReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let content = decode_body(&headers, &body).map_err(|err| {
        error!("failed to decode import body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;
    let report = import_commands::import_matches(&state, &content, query).await?;
    Ok(Json(report))
}

pub async fn import_bundled(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ImportQuery>,
) -> Result<Json<ImportReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = import_commands::import_bundled_batch(&state, query).await?;
    Ok(Json(report))
}
