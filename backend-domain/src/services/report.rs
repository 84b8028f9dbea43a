use std::collections::{BTreeMap, HashMap, HashSet};

use crate::entities::{
    win_rate, Beyblade, LeagueReport, MatchEvent, MatchParticipant, MatchRecord, MatchStats,
    NamedStats, OverallStats, Player, ReportFilter,
};
use crate::value_objects::MatchId;

/// Everything a report is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub matches: &'a [MatchRecord],
    pub participants: &'a [MatchParticipant],
    pub events: &'a [MatchEvent],
    pub players: &'a [Player],
    pub beyblades: &'a [Beyblade],
}

pub fn build_league_report(input: ReportInput<'_>, filter: &ReportFilter) -> LeagueReport {
    let type_of = input
        .beyblades
        .iter()
        .map(|bey| (bey.id.as_str(), bey.type_label()))
        .collect::<HashMap<_, _>>();
    let bey_type = |participant: &MatchParticipant| {
        type_of
            .get(participant.beyblade_id.as_str())
            .copied()
            .unwrap_or("Unknown")
    };

    let wanted_type = filter
        .bey_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"));
    let selected = input
        .participants
        .iter()
        .filter(|p| matches_id(filter.player_id.as_deref(), p.player_id.as_str()))
        .filter(|p| matches_id(filter.beyblade_id.as_deref(), p.beyblade_id.as_str()))
        .filter(|p| wanted_type.map_or(true, |wanted| bey_type(*p) == wanted))
        .collect::<Vec<_>>();

    let match_ids = selected
        .iter()
        .map(|p| &p.match_id)
        .collect::<HashSet<&MatchId>>();

    let mut by_player: BTreeMap<&str, MatchStats> = BTreeMap::new();
    let mut by_bey: BTreeMap<&str, MatchStats> = BTreeMap::new();
    let mut by_type: BTreeMap<String, MatchStats> = BTreeMap::new();
    for participant in &selected {
        by_player
            .entry(participant.player_id.as_str())
            .or_default()
            .record(participant.is_winner);
        by_bey
            .entry(participant.beyblade_id.as_str())
            .or_default()
            .record(participant.is_winner);
        by_type
            .entry(bey_type(*participant).to_string())
            .or_default()
            .record(participant.is_winner);
    }
    for stats in by_type.values_mut() {
        stats.finalize();
        stats.win_rate = round_tenth(stats.win_rate);
    }

    let mut overall = OverallStats {
        total: input
            .matches
            .iter()
            .filter(|record| match_ids.contains(&record.id))
            .count() as u64,
        ..OverallStats::default()
    };
    for event in input.events {
        if match_ids.contains(&event.match_id) {
            overall.events.add(event.event_type, event.count);
        }
    }
    overall.wins = by_player.values().map(|stats| stats.wins).sum();
    overall.losses = by_player.values().map(|stats| stats.losses).sum();
    overall.win_rate = round_tenth(win_rate(overall.wins, overall.wins + overall.losses));

    let player_names = input
        .players
        .iter()
        .map(|player| (player.id.as_str(), player.display_name.as_str()))
        .collect::<HashMap<_, _>>();
    let bey_names = input
        .beyblades
        .iter()
        .map(|bey| (bey.id.as_str(), bey.name.as_str()))
        .collect::<HashMap<_, _>>();

    LeagueReport {
        overall,
        players: ranked(by_player, &player_names),
        beyblades: ranked(by_bey, &bey_names),
        types: by_type,
    }
}

fn matches_id(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") | Some("all") => true,
        Some(wanted) => wanted == actual,
    }
}

/// Best win rate first; rates are rounded to one decimal.
fn ranked(stats: BTreeMap<&str, MatchStats>, names: &HashMap<&str, &str>) -> Vec<NamedStats> {
    let mut out = stats
        .into_iter()
        .map(|(id, mut stats)| {
            stats.finalize();
            stats.win_rate = round_tenth(stats.win_rate);
            NamedStats {
                id: id.to_string(),
                name: names.get(id).copied().unwrap_or("Unknown").to_string(),
                stats,
            }
        })
        .collect::<Vec<_>>();
    out.sort_by(|a, b| {
        b.stats
            .win_rate
            .total_cmp(&a.stats.win_rate)
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
