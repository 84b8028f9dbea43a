use tracing::info;

use crate::{AppError, AppState};
use backend_domain::{
    AddInventoryRequest, BeybladeId, InventoryEntry, InventoryStatsUpdate, PlayerId,
};

pub async fn add_to_inventory(
    state: &AppState,
    player_id: PlayerId,
    payload: AddInventoryRequest,
) -> Result<InventoryEntry, AppError> {
    if state.repo.find_player(&player_id).await?.is_none() {
        return Err(AppError::NotFound(format!("player {}", player_id)));
    }
    let Some(beyblade) = state.repo.find_beyblade(&payload.beyblade_id).await? else {
        return Err(AppError::NotFound(format!("beyblade {}", payload.beyblade_id)));
    };

    let owned = state.repo.inventory_entries(Some(&player_id)).await?;
    if owned
        .iter()
        .any(|entry| entry.beyblade_id == payload.beyblade_id)
    {
        return Err(AppError::BadRequest(format!(
            "\"{}\" is already in this player's inventory",
            beyblade.name
        )));
    }

    let entry = state
        .repo
        .insert_inventory_entry(&player_id, &payload.beyblade_id)
        .await?;
    info!(player_id = %player_id, beyblade_id = %payload.beyblade_id, "beyblade added to inventory");
    Ok(entry)
}

pub async fn update_inventory_stats(
    state: &AppState,
    player_id: PlayerId,
    beyblade_id: BeybladeId,
    payload: InventoryStatsUpdate,
) -> Result<InventoryEntry, AppError> {
    for (field, value) in [
        ("attack", payload.attack),
        ("defense", payload.defense),
        ("stamina", payload.stamina),
    ] {
        if !(0..=100).contains(&value) {
            return Err(AppError::BadRequest(format!(
                "{} must be between 0 and 100",
                field
            )));
        }
    }

    let entry = state
        .repo
        .update_inventory_stats(&player_id, &beyblade_id, &payload)
        .await?;
    info!(player_id = %player_id, beyblade_id = %beyblade_id, "inventory stats updated");
    Ok(entry)
}
