use crate::{AppError, AppState};
use backend_domain::Player;

pub async fn list_players(state: &AppState) -> Result<Vec<Player>, AppError> {
    let mut players = state.repo.players().await?;
    players.sort_by_key(|player| player.display_name.to_lowercase());
    Ok(players)
}
