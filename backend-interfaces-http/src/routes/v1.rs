use axum::routing::{get, post, put};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    import_handlers, league_handlers, match_handlers, ops_handlers, report_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/import/matches", post(import_handlers::import_matches))
        .route("/v1/import/bundled", post(import_handlers::import_bundled))
        .route(
            "/v1/players",
            get(league_handlers::list_players).post(league_handlers::register_player),
        )
        .route(
            "/v1/players/:player_id/inventory",
            get(league_handlers::player_inventory).post(league_handlers::add_to_inventory),
        )
        .route(
            "/v1/players/:player_id/inventory/:beyblade_id",
            put(league_handlers::update_inventory_stats),
        )
        .route(
            "/v1/beyblades",
            get(league_handlers::list_beyblades).post(league_handlers::add_beyblade),
        )
        .route("/v1/matches", post(match_handlers::log_match))
        .route("/v1/matches/export", get(match_handlers::export_matches))
        .route("/v1/csv/render", post(match_handlers::render_csv))
        .route("/v1/dashboard", get(match_handlers::dashboard))
        .route("/v1/reports", get(report_handlers::league_report))
        .route("/v1/health/live", get(ops_handlers::health_live))
        .route("/v1/health/ready", get(ops_handlers::health_ready))
        .route("/v1/metrics", get(ops_handlers::metrics_prometheus))
        .with_state(state)
}
