mod support;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backend_application::commands::{
    add_beyblade, add_to_inventory, import_matches, register_player,
};
use backend_application::{AppError, AppState};
use backend_domain::ports::{tables, Filter, Row, StoreError, TableStore};
use backend_domain::{
    AddInventoryRequest, ImportQuery, MatchEventType, NewBeyblade, NewPlayer, RejectionKind,
    RowStatus, RuntimeConfig,
};
use backend_infrastructure::{FileBatchSource, InMemoryStore};
use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use support::{alex_and_jordan, League};

const HEADER: &str = "match_id,player1,player1_bey,player1_score,player2,player2_bey,player2_score,winner,date,bursts,knockouts,extreme_knockouts,spin_finishes";

fn batch(rows: &[&str]) -> String {
    let mut lines = vec![HEADER];
    lines.extend_from_slice(rows);
    lines.join("\n")
}

#[tokio::test]
async fn worked_example_writes_match_participants_and_one_event() {
    let (league, alex, jordan, valkyrie, longinus) = alex_and_jordan().await;
    let content = batch(&[
        "match-001,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,Alex,2/3/2026,0,1,0,0",
    ]);

    let report = import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.created, 1);
    assert_eq!(report.errors, 0);
    assert!(report.warnings.is_empty());

    let record = league
        .state
        .repo
        .find_match_by_external_id("match-001")
        .await
        .expect("lookup")
        .expect("match stored");
    assert_eq!(record.winner_player_id, alex.id);
    assert_eq!(record.format, "best_of");
    assert_eq!(
        record.played_at.with_timezone(&Local).date_naive(),
        NaiveDate::from_ymd_opt(2026, 2, 3).expect("date")
    );

    let participants = league
        .state
        .repo
        .participants(Some(std::slice::from_ref(&record.id)))
        .await
        .expect("participants");
    assert_eq!(participants.len(), 2);
    let alex_side = participants
        .iter()
        .find(|p| p.player_id == alex.id)
        .expect("alex participant");
    assert_eq!(alex_side.beyblade_id, valkyrie.id);
    assert_eq!(alex_side.score, 1);
    assert!(alex_side.is_winner);
    let jordan_side = participants
        .iter()
        .find(|p| p.player_id == jordan.id)
        .expect("jordan participant");
    assert_eq!(jordan_side.beyblade_id, longinus.id);
    assert_eq!(jordan_side.score, 0);
    assert!(!jordan_side.is_winner);

    let events = league
        .state
        .repo
        .events(Some(std::slice::from_ref(&record.id)))
        .await
        .expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, MatchEventType::Knockout);
    assert_eq!(events[0].count, 1);
}

#[tokio::test]
async fn duplicate_id_in_one_batch_is_created_once_then_skipped() {
    let (league, ..) = alex_and_jordan().await;
    let content = batch(&[
        "m-dup,Alex,Valkyrie Wing,3,Jordan,Longinus Destroy,1,A,1/5/2026,1,0,0,0",
        "m-dup,Alex,Valkyrie Wing,0,Jordan,Longinus Destroy,3,B,1/5/2026,0,0,0,2",
    ]);

    let report = import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.rows[1].status, RowStatus::Skipped);
    assert_eq!(league.store.rows(tables::MATCHES).await.len(), 1);
    assert_eq!(league.store.rows(tables::MATCH_PARTICIPANTS).await.len(), 2);
}

#[tokio::test]
async fn reimport_updates_and_replaces_children() {
    let (league, alex, jordan, ..) = alex_and_jordan().await;
    let first = batch(&[
        "m-10,Alex,Valkyrie Wing,3,Jordan,Longinus Destroy,1,Alex,1/5/2026,0,2,0,0",
    ]);
    import_matches(&league.state, &first, ImportQuery::default())
        .await
        .expect("first import");

    let second = batch(&[
        "m-10,Alex,Valkyrie Wing,2,Jordan,Longinus Destroy,4,Jordan,1/6/2026,1,0,0,0",
    ]);
    let report = import_matches(&league.state, &second, ImportQuery::default())
        .await
        .expect("second import");
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 1);
    assert_eq!(report.rows[0].status, RowStatus::Updated);

    let matches = league.state.repo.matches().await.expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].winner_player_id, jordan.id);

    let participants = league.state.repo.participants(None).await.expect("participants");
    assert_eq!(participants.len(), 2);
    let alex_side = participants
        .iter()
        .find(|p| p.player_id == alex.id)
        .expect("alex participant");
    assert_eq!(alex_side.score, 2);
    assert!(!alex_side.is_winner);

    let events = league.state.repo.events(None).await.expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, MatchEventType::Burst);
    assert_eq!(events[0].count, 1);
}

#[tokio::test]
async fn beyblade_owned_only_by_the_opponent_is_rejected() {
    let (league, ..) = alex_and_jordan().await;
    let content = batch(&[
        "m-20,Alex,Longinus Destroy,1,Jordan,Longinus Destroy,0,A,1/5/2026,0,0,0,0",
    ]);

    let report = import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.created, 0);
    assert_eq!(report.errors, 1);
    assert_eq!(report.rows[0].status, RowStatus::Rejected);
    assert_eq!(
        report.rows[0].rejection,
        Some(RejectionKind::UnresolvedReference)
    );
    assert!(report.error_messages[0].contains("Available: \"Valkyrie Wing\""));
    assert!(league.store.rows(tables::MATCHES).await.is_empty());
}

#[tokio::test]
async fn zero_event_counts_still_write_match_and_participants() {
    let (league, ..) = alex_and_jordan().await;
    let content = batch(&[
        "m-30,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,A,1/5/2026,0,0,0,0",
    ]);

    let report = import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.created, 1);
    assert_eq!(league.store.rows(tables::MATCHES).await.len(), 1);
    assert_eq!(league.store.rows(tables::MATCH_PARTICIPANTS).await.len(), 2);
    assert!(league.store.rows(tables::MATCH_EVENTS).await.is_empty());
}

#[tokio::test]
async fn failed_event_write_removes_the_partial_match() {
    let (league, ..) = alex_and_jordan().await;
    league.store.fail_writes_to(tables::MATCH_EVENTS).await;
    let content = batch(&[
        "m-40,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,A,1/5/2026,0,1,0,0",
        "m-41,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,B,1/5/2026,0,0,0,0",
    ]);

    let report = import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.errors, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.rows[0].status, RowStatus::Failed);
    assert!(report.error_messages[0].starts_with("Row 2 (m-40):"));

    let matches = league.state.repo.matches().await.expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].external_id.as_deref(), Some("m-41"));
    assert_eq!(league.store.rows(tables::MATCH_PARTICIPANTS).await.len(), 2);
}

#[tokio::test]
async fn failed_reimport_keeps_the_previous_version() {
    let (league, alex, jordan, ..) = alex_and_jordan().await;
    let first = batch(&[
        "m-1,Alex,Valkyrie Wing,3,Jordan,Longinus Destroy,1,Alex,1/5/2026,0,1,0,0",
    ]);
    import_matches(&league.state, &first, ImportQuery::default())
        .await
        .expect("first import");

    league.store.fail_writes_to(tables::MATCH_PARTICIPANTS).await;
    let second = batch(&[
        "m-1,Alex,Valkyrie Wing,0,Jordan,Longinus Destroy,3,Jordan,1/6/2026,2,0,0,0",
    ]);
    let report = import_matches(&league.state, &second, ImportQuery::default())
        .await
        .expect("second import");
    assert_eq!(report.errors, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.rows[0].status, RowStatus::Failed);

    let matches = league.state.repo.matches().await.expect("matches");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].winner_player_id, alex.id);

    let participants = league.state.repo.participants(None).await.expect("participants");
    assert_eq!(participants.len(), 2);
    let winners = participants
        .iter()
        .filter(|p| p.is_winner)
        .map(|p| p.player_id.clone())
        .collect::<Vec<_>>();
    assert_eq!(winners, vec![alex.id.clone()]);
    assert!(participants.iter().any(|p| p.player_id == jordan.id && p.score == 1));

    let events = league.state.repo.events(None).await.expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, MatchEventType::Knockout);
}

#[tokio::test]
async fn reimport_with_failing_header_write_drops_the_staged_rows() {
    let (league, alex, ..) = alex_and_jordan().await;
    let first = batch(&[
        "m-2,Alex,Valkyrie Wing,3,Jordan,Longinus Destroy,1,Alex,1/5/2026,0,1,0,0",
    ]);
    import_matches(&league.state, &first, ImportQuery::default())
        .await
        .expect("first import");
    let played_at = league.state.repo.matches().await.expect("matches")[0].played_at;

    league.store.fail_writes_to(tables::MATCHES).await;
    let second = batch(&[
        "m-2,Alex,Valkyrie Wing,0,Jordan,Longinus Destroy,3,Jordan,1/6/2026,2,0,0,1",
    ]);
    let report = import_matches(&league.state, &second, ImportQuery::default())
        .await
        .expect("second import");
    assert_eq!(report.errors, 1);
    assert_eq!(report.rows[0].status, RowStatus::Failed);

    let matches = league.state.repo.matches().await.expect("matches");
    assert_eq!(matches[0].winner_player_id, alex.id);
    assert_eq!(matches[0].played_at, played_at);
    assert_eq!(league.store.rows(tables::MATCH_PARTICIPANTS).await.len(), 2);
    let events = league.state.repo.events(None).await.expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, MatchEventType::Knockout);
}

#[tokio::test]
async fn ambiguous_winner_follows_the_requested_policy() {
    let (league, _, jordan, ..) = alex_and_jordan().await;
    let content = batch(&[
        "m-50,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,Sam,1/5/2026,0,0,0,0",
    ]);

    let rejected = import_matches(
        &league.state,
        &content,
        ImportQuery {
            winner_policy: Some("reject".to_string()),
            location: None,
        },
    )
    .await
    .expect("import");
    assert_eq!(rejected.errors, 1);
    assert_eq!(rejected.rows[0].rejection, Some(RejectionKind::MissingFields));
    assert!(rejected.warnings[0].contains("rejecting row"));

    let defaulted = import_matches(
        &league.state,
        &content,
        ImportQuery {
            winner_policy: Some("b".to_string()),
            location: Some("Hobby Shop".to_string()),
        },
    )
    .await
    .expect("import");
    assert_eq!(defaulted.created, 1);
    let record = league
        .state
        .repo
        .find_match_by_external_id("m-50")
        .await
        .expect("lookup")
        .expect("stored");
    assert_eq!(record.winner_player_id, jordan.id);
    assert_eq!(record.location.as_deref(), Some("Hobby Shop"));

    let err = import_matches(
        &league.state,
        &content,
        ImportQuery {
            winner_policy: Some("coin-flip".to_string()),
            location: None,
        },
    )
    .await
    .expect_err("unknown policy");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn rejections_are_counted_and_messages_truncated() {
    let (league, ..) = alex_and_jordan().await;
    let rows = (0..12)
        .map(|i| format!("m-{i},Nobody,Valkyrie Wing,1,Jordan,Longinus Destroy,0,A,,0,0,0,0"))
        .collect::<Vec<_>>();
    let content = batch(&rows.iter().map(String::as_str).collect::<Vec<_>>());

    let report = import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.errors, 12);
    assert_eq!(report.error_messages.len(), 11);
    assert_eq!(report.error_messages[10], "... and 2 more");
    assert!(report.error_messages[0].contains("\"Nobody\" not found in database"));
    assert!(report.summary().contains("Errors: 12"));
}

#[tokio::test]
async fn unreadable_date_falls_back_to_now_with_a_warning() {
    let (league, ..) = alex_and_jordan().await;
    let content = batch(&[
        "m-60,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,A,someday,0,0,0,0",
    ]);

    let report = import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.created, 1);
    assert_eq!(
        report.warnings,
        vec!["Row 2: Date \"someday\" could not be parsed, using current time".to_string()]
    );
}

#[tokio::test]
async fn empty_file_reports_no_rows() {
    let league = League::new();
    let report = import_matches(&league.state, "", ImportQuery::default())
        .await
        .expect("import");
    assert_eq!(report.total_rows, 0);
    assert_eq!(report.warnings, vec!["No valid rows found in the import file.".to_string()]);
}

#[tokio::test]
async fn metrics_track_import_outcomes() {
    let (league, ..) = alex_and_jordan().await;
    let content = batch(&[
        "m-70,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,A,1/5/2026,0,0,0,0",
        "m-70,Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,A,1/5/2026,0,0,0,0",
    ]);
    import_matches(&league.state, &content, ImportQuery::default())
        .await
        .expect("import");

    let rendered = league.state.metrics.render_prometheus();
    assert!(rendered.contains("beyleague_imports_total 1"));
    assert!(rendered.contains("beyleague_import_rows_created_total 1"));
    assert!(rendered.contains("beyleague_import_rows_skipped_total 1"));
}

/// Slows every write down and records the order matches were written in.
#[derive(Default)]
struct SlowStore {
    inner: InMemoryStore,
    match_writes: Mutex<Vec<String>>,
}

#[async_trait]
impl TableStore for SlowStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        self.inner.select(table, filter).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.inner.insert(table, rows).await
    }

    async fn upsert(&self, table: &str, row: Row, conflict_key: &str) -> Result<Row, StoreError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        if table == tables::MATCHES {
            let external_id = row
                .get("external_id")
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string();
            self.match_writes.lock().await.push(external_id);
        }
        self.inner.upsert(table, row, conflict_key).await
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        self.inner.update(table, filter, patch).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError> {
        self.inner.delete(table, filter).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn concurrent_imports_never_interleave() {
    let store = Arc::new(SlowStore::default());
    let state = AppState::new(
        RuntimeConfig::default(),
        store.clone(),
        Arc::new(FileBatchSource::new("./missing-batch-import.csv")),
    );
    let roster = [
        ("Alex", "Valkyrie Wing", "Attack"),
        ("Jordan", "Longinus Destroy", "Stamina"),
    ];
    for (name, bey, kind) in roster {
        let player = register_player(
            &state,
            NewPlayer {
                display_name: name.to_string(),
            },
        )
        .await
        .expect("register player");
        let beyblade = add_beyblade(
            &state,
            NewBeyblade {
                name: bey.to_string(),
                bey_type: Some(kind.to_string()),
            },
        )
        .await
        .expect("add beyblade");
        add_to_inventory(
            &state,
            player.id,
            AddInventoryRequest {
                beyblade_id: beyblade.id,
            },
        )
        .await
        .expect("add to inventory");
    }

    let rows = |prefix: &str| {
        let lines = (1..=3)
            .map(|i| {
                format!("{prefix}-{i},Alex,Valkyrie Wing,1,Jordan,Longinus Destroy,0,A,1/5/2026,0,1,0,0")
            })
            .collect::<Vec<_>>();
        batch(&lines.iter().map(String::as_str).collect::<Vec<_>>())
    };
    let (first, second) = (rows("a"), rows("b"));
    let (left, right) = tokio::join!(
        import_matches(&state, &first, ImportQuery::default()),
        import_matches(&state, &second, ImportQuery::default()),
    );
    assert_eq!(left.expect("first batch").created, 3);
    assert_eq!(right.expect("second batch").created, 3);

    let writes = store.match_writes.lock().await.clone();
    assert_eq!(writes.len(), 6);
    let switches = writes
        .windows(2)
        .filter(|pair| pair[0][..1] != pair[1][..1])
        .count();
    assert_eq!(switches, 1, "batches interleaved: {writes:?}");
}
