use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::report_queries;
use backend_application::AppState;
use backend_domain::{LeagueReport, ReportFilter};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn league_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<LeagueReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = report_queries::league_report(&state, filter).await?;
    Ok(Json(report))
}
