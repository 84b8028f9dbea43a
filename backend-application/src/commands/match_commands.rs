use chrono::Utc;
use tracing::{info, warn};

use crate::importer::discard_match;
use crate::{AppError, AppState};
use backend_domain::{
    build_participants, LogMatchRequest, MatchRecord, MatchSide, MatchSideInput, NewMatch, Side,
    FORMAT_SINGLE,
};

/// Record one match entered by hand.
pub async fn log_match(state: &AppState, payload: LogMatchRequest) -> Result<MatchRecord, AppError> {
    if payload.player_a.player_id == payload.player_b.player_id {
        return Err(AppError::BadRequest(
            "a match needs two different players".to_string(),
        ));
    }
    for side in [&payload.player_a, &payload.player_b] {
        ensure_owned(state, side).await?;
    }

    let side_a = to_side(&payload.player_a);
    let side_b = to_side(&payload.player_b);
    let winner_player_id = match payload.winner {
        Side::A => side_a.player_id.clone(),
        Side::B => side_b.player_id.clone(),
    };
    let location = payload
        .location
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let record = state
        .repo
        .insert_match(&NewMatch {
            external_id: None,
            played_at: Utc::now(),
            format: FORMAT_SINGLE.to_string(),
            location,
            winner_player_id,
        })
        .await?;

    let participants = build_participants(&record.id, &side_a, &side_b, payload.winner);
    let written = match state.repo.insert_participants(&participants).await {
        Ok(()) => {
            state
                .repo
                .insert_events(&payload.events.to_events(&record.id))
                .await
        }
        Err(err) => Err(err),
    };
    if let Err(err) = written {
        warn!(match_id = %record.id, error = %err, "failed to write match details");
        if state.config.rollback_failed_rows {
            discard_match(&state.repo, &record).await;
        }
        return Err(err.into());
    }

    state.metrics.record_match_logged();
    info!(match_id = %record.id, winner = payload.winner.as_str(), "match logged");
    Ok(record)
}

async fn ensure_owned(state: &AppState, side: &MatchSideInput) -> Result<(), AppError> {
    if state.repo.find_player(&side.player_id).await?.is_none() {
        return Err(AppError::NotFound(format!("player {}", side.player_id)));
    }
    let owned = state.repo.inventory_entries(Some(&side.player_id)).await?;
    if !owned
        .iter()
        .any(|entry| entry.beyblade_id == side.beyblade_id)
    {
        return Err(AppError::BadRequest(format!(
            "beyblade {} is not in the inventory of player {}",
            side.beyblade_id, side.player_id
        )));
    }
    Ok(())
}

fn to_side(input: &MatchSideInput) -> MatchSide {
    MatchSide {
        player_id: input.player_id.clone(),
        beyblade_id: input.beyblade_id.clone(),
        score: input.score,
    }
}
