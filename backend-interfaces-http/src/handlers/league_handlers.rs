use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::{beyblade_commands, inventory_commands, player_commands};
use backend_application::queries::{beyblade_queries, inventory_queries, player_queries};
use backend_application::AppState;
use backend_domain::{
    AddInventoryRequest, Beyblade, BeybladeId, BeybladeQuery, InventoryEntry, InventoryQuery,
    InventoryStatsUpdate, NewBeyblade, NewPlayer, Player, PlayerId, PlayerInventory,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_players(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Player>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let players = player_queries::list_players(&state).await?;
    Ok(Json(players))
}

pub async fn register_player(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let player = player_commands::register_player(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn list_beyblades(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BeybladeQuery>,
) -> Result<Json<Vec<Beyblade>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let catalog = beyblade_queries::list_beyblades(&state, query).await?;
    Ok(Json(catalog))
}

pub async fn add_beyblade(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewBeyblade>,
) -> Result<(StatusCode, Json<Beyblade>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let beyblade = beyblade_commands::add_beyblade(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(beyblade)))
}

pub async fn player_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(player_id): Path<String>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<PlayerInventory>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let inventory =
        inventory_queries::player_inventory(&state, PlayerId::new(player_id), query).await?;
    Ok(Json(inventory))
}

pub async fn add_to_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(player_id): Path<String>,
    Json(payload): Json<AddInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryEntry>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entry =
        inventory_commands::add_to_inventory(&state, PlayerId::new(player_id), payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_inventory_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((player_id, beyblade_id)): Path<(String, String)>,
    Json(payload): Json<InventoryStatsUpdate>,
) -> Result<Json<InventoryEntry>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entry = inventory_commands::update_inventory_stats(
        &state,
        PlayerId::new(player_id),
        BeybladeId::new(beyblade_id),
        payload,
    )
    .await?;
    Ok(Json(entry))
}
