use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::entities::{CsvRow, EventCounts, InventoryItem, MatchSide, Player, RowRejection};
use crate::services::normalize_beyblade_name;
use crate::utils::parse_played_at;
use crate::value_objects::{PlayerId, Side};

/// Players and their inventories, loaded once per import session and never
/// refreshed while rows are being resolved.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    players: Vec<Player>,
    inventories: HashMap<PlayerId, Vec<InventoryItem>>,
}

impl ReferenceSnapshot {
    pub fn new(players: Vec<Player>, inventories: HashMap<PlayerId, Vec<InventoryItem>>) -> Self {
        Self {
            players,
            inventories,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn find_player(&self, name: &str) -> Option<&Player> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.players
            .iter()
            .find(|player| player.display_name.trim().to_lowercase() == wanted)
    }

    pub fn inventory(&self, player_id: &PlayerId) -> &[InventoryItem] {
        self.inventories
            .get(player_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Only the player's own inventory is searched.
    pub fn find_owned_beyblade(&self, player_id: &PlayerId, name: &str) -> Option<&InventoryItem> {
        let wanted = normalize_beyblade_name(name);
        self.inventory(player_id)
            .iter()
            .find(|item| normalize_beyblade_name(&item.name) == wanted)
    }

    fn available_names(&self, player_id: &PlayerId) -> String {
        let names = self
            .inventory(player_id)
            .iter()
            .map(|item| format!("\"{}\"", item.name))
            .collect::<Vec<_>>();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }
}

/// A batch row with every reference resolved to store identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch {
    pub external_id: String,
    pub side_a: MatchSide,
    pub side_b: MatchSide,
    pub winner: Side,
    pub played_at: DateTime<Utc>,
    /// The date cell was empty or unreadable and `played_at` is the import time.
    pub date_defaulted: bool,
    pub events: EventCounts,
}

impl ResolvedMatch {
    pub fn winner_player_id(&self) -> &PlayerId {
        match self.winner {
            Side::A => &self.side_a.player_id,
            Side::B => &self.side_b.player_id,
        }
    }
}

pub fn resolve_row(
    row: &CsvRow,
    snapshot: &ReferenceSnapshot,
    now: DateTime<Utc>,
) -> Result<ResolvedMatch, RowRejection> {
    let external_id = row.match_id.trim();
    if external_id.is_empty() {
        return Err(RowRejection::MissingExternalId);
    }

    let player_a = snapshot
        .find_player(&row.player1)
        .ok_or_else(|| RowRejection::UnknownPlayer(row.player1.clone()))?;
    let player_b = snapshot
        .find_player(&row.player2)
        .ok_or_else(|| RowRejection::UnknownPlayer(row.player2.clone()))?;

    let bey_a = owned_beyblade(snapshot, player_a, &row.player1_bey)?;
    let bey_b = owned_beyblade(snapshot, player_b, &row.player2_bey)?;

    let (score_a, score_b) = match (parse_score(&row.player1_score), parse_score(&row.player2_score))
    {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(RowRejection::InvalidScores),
    };

    let winner = row
        .winner_side
        .ok_or_else(|| RowRejection::UnresolvedWinner(row.winner.clone()))?;

    let parsed_date = parse_played_at(&row.date);
    Ok(ResolvedMatch {
        external_id: external_id.to_string(),
        side_a: MatchSide {
            player_id: player_a.id.clone(),
            beyblade_id: bey_a.beyblade_id.clone(),
            score: score_a,
        },
        side_b: MatchSide {
            player_id: player_b.id.clone(),
            beyblade_id: bey_b.beyblade_id.clone(),
            score: score_b,
        },
        winner,
        date_defaulted: parsed_date.is_none(),
        played_at: parsed_date.unwrap_or(now),
        events: EventCounts {
            burst: parse_count(&row.bursts),
            knockout: parse_count(&row.knockouts),
            extreme_knockout: parse_count(&row.extreme_knockouts),
            spin_finish: parse_count(&row.spin_finishes),
        },
    })
}

fn owned_beyblade<'a>(
    snapshot: &'a ReferenceSnapshot,
    player: &Player,
    name: &str,
) -> Result<&'a InventoryItem, RowRejection> {
    snapshot
        .find_owned_beyblade(&player.id, name)
        .ok_or_else(|| RowRejection::UnknownBeyblade {
            player: player.display_name.clone(),
            beyblade: name.to_string(),
            available: snapshot.available_names(&player.id),
        })
}

/// Whole numbers only; participant scores are stored as integers.
fn parse_score(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Unreadable counts are treated as zero.
fn parse_count(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parse_match_csv;
    use crate::value_objects::{AmbiguousWinnerPolicy, BeybladeId};
    use chrono::{Datelike, Local};

    fn snapshot() -> ReferenceSnapshot {
        let players = vec![
            Player {
                id: PlayerId::from("p-alex"),
                display_name: "Alex".to_string(),
            },
            Player {
                id: PlayerId::from("p-jordan"),
                display_name: "Jordan".to_string(),
            },
        ];
        let mut inventories = HashMap::new();
        inventories.insert(
            PlayerId::from("p-alex"),
            vec![InventoryItem {
                beyblade_id: BeybladeId::from("b-valkyrie"),
                name: "Valkyrie Wing".to_string(),
            }],
        );
        inventories.insert(
            PlayerId::from("p-jordan"),
            vec![InventoryItem {
                beyblade_id: BeybladeId::from("b-longinus"),
                name: "Longinus\u{2013}Destroy".to_string(),
            }],
        );
        ReferenceSnapshot::new(players, inventories)
    }

    fn row(line: &str) -> CsvRow {
        parse_match_csv(line, AmbiguousWinnerPolicy::Reject)
            .rows
            .into_iter()
            .next()
            .expect("parsed row")
    }

    #[test]
    fn worked_example_resolves_to_ids() {
        let parsed = row("match-001,Alex,Valkyrie Wing,1,Jordan,Longinus-Destroy,0,Alex,2/3/2026,0,1,0,0");
        let resolved = resolve_row(&parsed, &snapshot(), Utc::now()).expect("resolve");
        assert_eq!(resolved.external_id, "match-001");
        assert_eq!(resolved.winner_player_id(), &PlayerId::from("p-alex"));
        assert_eq!(resolved.side_a.beyblade_id, BeybladeId::from("b-valkyrie"));
        assert_eq!(resolved.side_b.beyblade_id, BeybladeId::from("b-longinus"));
        assert_eq!((resolved.side_a.score, resolved.side_b.score), (1, 0));
        assert_eq!(resolved.events.knockout, 1);
        assert!(!resolved.date_defaulted);
        let local = resolved.played_at.with_timezone(&Local);
        assert_eq!((local.year(), local.month(), local.day()), (2026, 2, 3));
    }

    #[test]
    fn players_match_case_insensitively() {
        let parsed = row("m1,ALEX,valkyrie  wing,1,jordan,LONGINUS - DESTROY,0,a");
        let err = resolve_row(&parsed, &snapshot(), Utc::now()).expect_err("spaced dash");
        assert!(matches!(err, RowRejection::UnknownBeyblade { .. }));

        let parsed = row("m1,ALEX,valkyrie  wing,1,jordan,LONGINUS-DESTROY,0,a");
        assert!(resolve_row(&parsed, &snapshot(), Utc::now()).is_ok());
    }

    #[test]
    fn beyblade_owned_by_someone_else_is_rejected() {
        let parsed = row("m1,Alex,Longinus Destroy,1,Jordan,Longinus Destroy,0,A");
        let err = resolve_row(&parsed, &snapshot(), Utc::now()).expect_err("not owned");
        assert_eq!(
            err,
            RowRejection::UnknownBeyblade {
                player: "Alex".to_string(),
                beyblade: "Longinus Destroy".to_string(),
                available: "\"Valkyrie Wing\"".to_string(),
            }
        );
    }

    #[test]
    fn unknown_player_and_bad_scores_are_rejected() {
        let parsed = row("m1,Sam,Valkyrie Wing,1,Jordan,Longinus-Destroy,0,A");
        assert_eq!(
            resolve_row(&parsed, &snapshot(), Utc::now()),
            Err(RowRejection::UnknownPlayer("Sam".to_string()))
        );

        let parsed = row("m1,Alex,Valkyrie Wing,x,Jordan,Longinus-Destroy,0,A");
        assert_eq!(
            resolve_row(&parsed, &snapshot(), Utc::now()),
            Err(RowRejection::InvalidScores)
        );
    }

    #[test]
    fn fractional_scores_are_rejected() {
        let parsed = row("m1,Alex,Valkyrie Wing,1.5,Jordan,Longinus-Destroy,0,A");
        assert_eq!(
            resolve_row(&parsed, &snapshot(), Utc::now()),
            Err(RowRejection::InvalidScores)
        );

        let parsed = row("m1,Alex,Valkyrie Wing, 3 ,Jordan,Longinus-Destroy,-1,A");
        let resolved = resolve_row(&parsed, &snapshot(), Utc::now()).expect("whole numbers");
        assert_eq!((resolved.side_a.score, resolved.side_b.score), (3, -1));
    }

    #[test]
    fn rejected_winner_and_defaulted_date() {
        let now = Utc::now();
        let parsed = row("m1,Alex,Valkyrie Wing,1,Jordan,Longinus-Destroy,0,Sam");
        assert_eq!(
            resolve_row(&parsed, &snapshot(), now),
            Err(RowRejection::UnresolvedWinner("Sam".to_string()))
        );

        let parsed = row("m1,Alex,Valkyrie Wing,1,Jordan,Longinus-Destroy,0,B,not a date,x,,0,0");
        let resolved = resolve_row(&parsed, &snapshot(), now).expect("resolve");
        assert!(resolved.date_defaulted);
        assert_eq!(resolved.played_at, now);
        assert_eq!(resolved.events, EventCounts::default());
        assert_eq!(resolved.winner_player_id(), &PlayerId::from("p-jordan"));
    }
}
