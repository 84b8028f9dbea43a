use std::collections::HashMap;

use chrono::Local;

use crate::{AppError, AppState};
use backend_domain::ports::tables;
use backend_domain::{
    order_by_side, render_match_csv, CsvRow, DashboardSummary, EventCounts, LeagueTotals, MatchId,
    MatchParticipant, MatchRecord, RecentMatch,
};

const RECENT_LIMIT: usize = 5;

pub async fn dashboard(state: &AppState) -> Result<DashboardSummary, AppError> {
    let mut matches = state.repo.matches().await?;
    let totals = LeagueTotals {
        battles: matches.len() as u64,
        players: state.repo.count(tables::PLAYERS).await?,
        beyblades: state.repo.count(tables::BEYBLADES).await?,
    };

    matches.sort_by(|a, b| b.played_at.cmp(&a.played_at));
    matches.truncate(RECENT_LIMIT);
    let ids = matches
        .iter()
        .map(|record| record.id.clone())
        .collect::<Vec<_>>();
    let lookups = Lookups::load(state).await?;
    let by_match = group_participants(state.repo.participants(Some(ids.as_slice())).await?);

    let recent = matches
        .iter()
        .filter_map(|record| {
            let pair = by_match.get(&record.id)?;
            let [first, second] = [pair.first()?, pair.get(1)?];
            let winner = if !first.is_winner && second.is_winner { 2 } else { 1 };
            Some(RecentMatch {
                match_id: record.id.clone(),
                played_at: record.played_at,
                player1: lookups.player(first),
                player1_bey: lookups.beyblade(first),
                player2: lookups.player(second),
                player2_bey: lookups.beyblade(second),
                winner,
            })
        })
        .collect();

    Ok(DashboardSummary { totals, recent })
}

/// Every stored match with two participants, as a batch file.
pub async fn export_matches(state: &AppState) -> Result<String, AppError> {
    let mut matches = state.repo.matches().await?;
    matches.sort_by(|a, b| a.played_at.cmp(&b.played_at));
    let lookups = Lookups::load(state).await?;
    let by_match = group_participants(state.repo.participants(None).await?);
    let mut events: HashMap<MatchId, EventCounts> = HashMap::new();
    for event in state.repo.events(None).await? {
        events
            .entry(event.match_id)
            .or_default()
            .add(event.event_type, event.count);
    }

    let rows = matches
        .iter()
        .filter_map(|record| {
            let pair = by_match.get(&record.id)?;
            let (first, second) = (pair.first()?, pair.get(1)?);
            Some(export_row(record, first, second, &lookups, events.get(&record.id)))
        })
        .collect::<Vec<_>>();
    render_match_csv(&rows).map_err(AppError::Internal)
}

/// Render caller-supplied rows without touching the store.
pub fn render_rows(rows: &[CsvRow]) -> Result<String, AppError> {
    render_match_csv(rows).map_err(AppError::Internal)
}

fn export_row(
    record: &MatchRecord,
    first: &MatchParticipant,
    second: &MatchParticipant,
    lookups: &Lookups,
    events: Option<&EventCounts>,
) -> CsvRow {
    let events = events.copied().unwrap_or_default();
    let winner = if second.player_id == record.winner_player_id {
        lookups.player(second)
    } else {
        lookups.player(first)
    };
    CsvRow {
        row_number: 0,
        match_id: record
            .external_id
            .clone()
            .unwrap_or_else(|| record.id.to_string()),
        player1: lookups.player(first),
        player1_bey: lookups.beyblade(first),
        player1_score: first.score.to_string(),
        player2: lookups.player(second),
        player2_bey: lookups.beyblade(second),
        player2_score: second.score.to_string(),
        winner,
        winner_side: None,
        date: record
            .played_at
            .with_timezone(&Local)
            .format("%-m/%-d/%Y")
            .to_string(),
        bursts: events.burst.to_string(),
        knockouts: events.knockout.to_string(),
        extreme_knockouts: events.extreme_knockout.to_string(),
        spin_finishes: events.spin_finish.to_string(),
    }
}

fn group_participants(
    participants: Vec<MatchParticipant>,
) -> HashMap<MatchId, Vec<MatchParticipant>> {
    let mut grouped: HashMap<MatchId, Vec<MatchParticipant>> = HashMap::new();
    for participant in participants {
        grouped
            .entry(participant.match_id.clone())
            .or_default()
            .push(participant);
    }
    for pair in grouped.values_mut() {
        order_by_side(pair);
    }
    grouped
}

struct Lookups {
    players: HashMap<String, String>,
    beyblades: HashMap<String, String>,
}

impl Lookups {
    async fn load(state: &AppState) -> Result<Self, AppError> {
        let players = state
            .repo
            .players()
            .await?
            .into_iter()
            .map(|player| (player.id.to_string(), player.display_name))
            .collect();
        let beyblades = state
            .repo
            .beyblades()
            .await?
            .into_iter()
            .map(|bey| (bey.id.to_string(), bey.name))
            .collect();
        Ok(Self { players, beyblades })
    }

    fn player(&self, participant: &MatchParticipant) -> String {
        self.players
            .get(participant.player_id.as_str())
            .cloned()
            .unwrap_or_else(|| "Unknown Player".to_string())
    }

    fn beyblade(&self, participant: &MatchParticipant) -> String {
        self.beyblades
            .get(participant.beyblade_id.as_str())
            .cloned()
            .unwrap_or_else(|| "Unknown Bey".to_string())
    }
}
