use std::collections::{HashMap, HashSet};

use crate::{AppError, AppState};
use backend_domain::{
    BeyType, InventoryQuery, MatchId, OwnedBeyblade, PlayerId, PlayerInventory,
};

pub async fn player_inventory(
    state: &AppState,
    player_id: PlayerId,
    query: InventoryQuery,
) -> Result<PlayerInventory, AppError> {
    let Some(player) = state.repo.find_player(&player_id).await? else {
        return Err(AppError::NotFound(format!("player {}", player_id)));
    };

    let catalog = state.repo.beyblades().await?;
    let by_id = catalog
        .iter()
        .map(|bey| (&bey.id, bey))
        .collect::<HashMap<_, _>>();
    let entries = state.repo.inventory_entries(Some(&player_id)).await?;
    let owned_ids = entries
        .iter()
        .map(|entry| entry.beyblade_id.clone())
        .collect::<HashSet<_>>();

    let wanted_type = match query.bey_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) if value.eq_ignore_ascii_case("all") => None,
        Some(value) => Some(BeyType::parse(value).ok_or_else(|| {
            AppError::BadRequest(format!("unknown type \"{}\"", value))
        })?),
    };
    let mut beyblades = entries
        .iter()
        .filter_map(|entry| {
            by_id
                .get(&entry.beyblade_id)
                .map(|bey| OwnedBeyblade::from_parts(entry, bey))
        })
        .filter(|owned| wanted_type.map_or(true, |kind| owned.bey_type == kind))
        .collect::<Vec<_>>();
    beyblades.sort_by_key(|owned| owned.name.to_lowercase());

    let mut available = catalog
        .iter()
        .filter(|bey| !owned_ids.contains(&bey.id))
        .cloned()
        .collect::<Vec<_>>();
    available.sort_by_key(|bey| bey.name.to_lowercase());

    let record = state
        .repo
        .participants(None)
        .await?
        .into_iter()
        .filter(|participant| participant.player_id == player_id)
        .collect::<Vec<_>>();
    let battles = record
        .iter()
        .map(|participant| &participant.match_id)
        .collect::<HashSet<&MatchId>>()
        .len() as u64;
    let wins = record
        .iter()
        .filter(|participant| participant.is_winner)
        .count() as u64;
    let losses = record.len() as u64 - wins;
    let win_rate = if battles == 0 {
        0
    } else {
        (wins as f64 / battles as f64 * 100.0).round() as u32
    };

    Ok(PlayerInventory {
        player,
        beyblades,
        wins,
        losses,
        win_rate,
        available,
    })
}
