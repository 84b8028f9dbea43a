// Report entities
// Win/loss aggregates over logged matches

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::EventCounts;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub beyblade_id: Option<String>,
    #[serde(default, rename = "type")]
    pub bey_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStats {
    pub total: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: f64,
}

impl MatchStats {
    pub fn record(&mut self, is_winner: bool) {
        self.total += 1;
        if is_winner {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn finalize(&mut self) {
        self.win_rate = win_rate(self.wins, self.total);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedStats {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub stats: MatchStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverallStats {
    pub total: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: f64,
    pub events: EventCounts,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LeagueReport {
    pub overall: OverallStats,
    pub players: Vec<NamedStats>,
    pub beyblades: Vec<NamedStats>,
    pub types: BTreeMap<String, MatchStats>,
}

/// Percentage in 0..=100, 0 when nothing was played.
pub fn win_rate(wins: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64 * 100.0
    }
}
