use tracing::info;

use crate::{AppError, AppState};
use backend_domain::{NewPlayer, Player};

pub async fn register_player(state: &AppState, payload: NewPlayer) -> Result<Player, AppError> {
    let display_name = payload.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::BadRequest("display_name is empty".to_string()));
    }

    let wanted = display_name.to_lowercase();
    let existing = state.repo.players().await?;
    if existing
        .iter()
        .any(|player| player.display_name.trim().to_lowercase() == wanted)
    {
        return Err(AppError::BadRequest(format!(
            "player \"{}\" already exists",
            display_name
        )));
    }

    let player = state.repo.insert_player(display_name).await?;
    info!(player_id = %player.id, display_name, "player registered");
    Ok(player)
}
