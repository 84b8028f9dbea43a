// Match entities
// A match, its two participants and the finishing events counted for it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{BeybladeId, MatchEventType, MatchId, PlayerId, Side};

pub const FORMAT_SINGLE: &str = "single";
pub const FORMAT_BEST_OF: &str = "best_of";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub played_at: DateTime<Utc>,
    pub format: String,
    #[serde(default)]
    pub location: Option<String>,
    pub winner_player_id: PlayerId,
}

impl MatchRecord {
    /// The header as it would be written, used to put a match back.
    pub fn header(&self) -> NewMatch {
        NewMatch {
            external_id: self.external_id.clone(),
            played_at: self.played_at,
            format: self.format.clone(),
            location: self.location.clone(),
            winner_player_id: self.winner_player_id.clone(),
        }
    }
}

/// Match header before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub played_at: DateTime<Utc>,
    pub format: String,
    pub location: Option<String>,
    pub winner_player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub beyblade_id: BeybladeId,
    pub score: i64,
    pub is_winner: bool,
    /// Column the participant was entered in. Rows written before this was
    /// recorded have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl MatchParticipant {
    fn seat(&self) -> u8 {
        match self.side {
            Some(Side::A) => 0,
            Some(Side::B) => 1,
            None => 2,
        }
    }
}

/// Put side A ahead of side B. Participants without a recorded side keep
/// their relative order after the others.
pub fn order_by_side(participants: &mut [MatchParticipant]) {
    participants.sort_by_key(MatchParticipant::seat);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub match_id: MatchId,
    pub event_type: MatchEventType,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    #[serde(default)]
    pub burst: i64,
    #[serde(default)]
    pub knockout: i64,
    #[serde(default)]
    pub extreme_knockout: i64,
    #[serde(default)]
    pub spin_finish: i64,
}

impl EventCounts {
    pub fn get(&self, event_type: MatchEventType) -> i64 {
        match event_type {
            MatchEventType::Burst => self.burst,
            MatchEventType::Knockout => self.knockout,
            MatchEventType::ExtremeKnockout => self.extreme_knockout,
            MatchEventType::SpinFinish => self.spin_finish,
        }
    }

    pub fn add(&mut self, event_type: MatchEventType, count: i64) {
        match event_type {
            MatchEventType::Burst => self.burst += count,
            MatchEventType::Knockout => self.knockout += count,
            MatchEventType::ExtremeKnockout => self.extreme_knockout += count,
            MatchEventType::SpinFinish => self.spin_finish += count,
        }
    }

    /// One event row per strictly positive count, in canonical type order.
    pub fn to_events(&self, match_id: &MatchId) -> Vec<MatchEvent> {
        MatchEventType::ALL
            .iter()
            .filter(|event_type| self.get(**event_type) > 0)
            .map(|event_type| MatchEvent {
                match_id: match_id.clone(),
                event_type: *event_type,
                count: self.get(*event_type),
            })
            .collect()
    }
}

/// One side of a match as entered by a user or resolved from a batch row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSide {
    pub player_id: PlayerId,
    pub beyblade_id: BeybladeId,
    pub score: i64,
}

/// Two participant rows with the winner flag set on exactly one of them.
pub fn build_participants(
    match_id: &MatchId,
    side_a: &MatchSide,
    side_b: &MatchSide,
    winner: Side,
) -> [MatchParticipant; 2] {
    let participant = |entry: &MatchSide, side: Side| MatchParticipant {
        match_id: match_id.clone(),
        player_id: entry.player_id.clone(),
        beyblade_id: entry.beyblade_id.clone(),
        score: entry.score,
        is_winner: winner == side,
        side: Some(side),
    };
    [participant(side_a, Side::A), participant(side_b, Side::B)]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogMatchRequest {
    pub player_a: MatchSideInput,
    pub player_b: MatchSideInput,
    pub winner: Side,
    #[serde(default)]
    pub events: EventCounts,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchSideInput {
    pub player_id: PlayerId,
    pub beyblade_id: BeybladeId,
    #[serde(default)]
    pub score: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentMatch {
    pub match_id: MatchId,
    pub played_at: DateTime<Utc>,
    pub player1: String,
    pub player1_bey: String,
    pub player2: String,
    pub player2_bey: String,
    pub winner: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LeagueTotals {
    pub battles: u64,
    pub players: u64,
    pub beyblades: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub totals: LeagueTotals,
    pub recent: Vec<RecentMatch>,
}
