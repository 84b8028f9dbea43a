use std::collections::HashSet;
use std::time::Instant;

use backend_domain::ports::StoreError;
use backend_domain::{
    build_participants, parse_match_csv, resolve_row, truncate_messages, AmbiguousWinnerPolicy,
    CsvRow, ImportReport, MatchId, MatchRecord, NewMatch, ReferenceSnapshot, RejectionKind,
    ResolvedMatch, RowResult, RowStatus, FORMAT_BEST_OF,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::{ChildRowIds, LeagueRepository};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub winner_policy: AmbiguousWinnerPolicy,
    pub rollback_failed_rows: bool,
    pub summary_limit: usize,
    pub location: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            winner_policy: AmbiguousWinnerPolicy::DefaultToA,
            rollback_failed_rows: true,
            summary_limit: 10,
            location: None,
        }
    }
}

/// Parse `content`, reconcile every row against one reference snapshot and
/// write the results. Only a failure to load the snapshot is returned as an
/// error; every row outcome ends up in the report.
pub async fn run_import(
    repo: &LeagueRepository,
    content: &str,
    options: &ImportOptions,
) -> Result<ImportReport, StoreError> {
    let started = Instant::now();
    let parsed = parse_match_csv(content, options.winner_policy);
    let mut report = ImportReport {
        fingerprint: fingerprint(content),
        total_rows: parsed.rows.len(),
        ..ImportReport::default()
    };
    let mut warnings = parsed.warnings;
    let mut errors = Vec::new();

    if parsed.rows.is_empty() {
        warnings.push("No valid rows found in the import file.".to_string());
    } else {
        let snapshot = repo.load_snapshot().await?;
        info!(
            rows = parsed.rows.len(),
            players = snapshot.players().len(),
            fingerprint = %report.fingerprint,
            "batch import started"
        );
        let mut session = Session {
            repo,
            options,
            snapshot: &snapshot,
            seen: HashSet::new(),
            report: &mut report,
            warnings: &mut warnings,
            errors: &mut errors,
        };
        for row in &parsed.rows {
            session.process(row).await;
        }
    }

    report.warnings = truncate_messages(&warnings, options.summary_limit);
    report.error_messages = truncate_messages(&errors, options.summary_limit);
    report.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        created = report.created,
        updated = report.updated,
        skipped = report.skipped,
        errors = report.errors,
        duration_ms = report.duration_ms,
        "batch import finished"
    );
    Ok(report)
}

pub fn fingerprint(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

struct Session<'a> {
    repo: &'a LeagueRepository,
    options: &'a ImportOptions,
    snapshot: &'a ReferenceSnapshot,
    seen: HashSet<String>,
    report: &'a mut ImportReport,
    warnings: &'a mut Vec<String>,
    errors: &'a mut Vec<String>,
}

impl Session<'_> {
    async fn process(&mut self, row: &CsvRow) {
        let external_id = row.match_id.trim();
        if external_id.is_empty() {
            let message = format!("Row {}: Missing match_id", row.row_number);
            self.reject(row, RejectionKind::MissingFields, message);
            return;
        }
        if self.seen.contains(external_id) {
            debug!(row = row.row_number, external_id, "duplicate match id skipped");
            self.report.skipped += 1;
            self.push_result(row, RowStatus::Skipped, None, None);
            return;
        }

        let resolved = match resolve_row(row, self.snapshot, Utc::now()) {
            Ok(resolved) => resolved,
            Err(rejection) => {
                let message = format!("Row {} ({}): {}", row.row_number, external_id, rejection);
                self.reject(row, rejection.kind(), message);
                return;
            }
        };
        if resolved.date_defaulted && !row.date.trim().is_empty() {
            self.warnings.push(format!(
                "Row {}: Date \"{}\" could not be parsed, using current time",
                row.row_number,
                row.date.trim()
            ));
        }
        self.seen.insert(external_id.to_string());

        match persist_resolved(self.repo, &resolved, self.options).await {
            Ok(status) => {
                match status {
                    RowStatus::Updated => self.report.updated += 1,
                    _ => self.report.created += 1,
                }
                self.push_result(row, status, None, None);
            }
            Err(err) => {
                let message = format!("Row {} ({}): {}", row.row_number, external_id, err);
                warn!(
                    row = row.row_number,
                    external_id,
                    error = %err,
                    "failed to write imported match"
                );
                self.report.errors += 1;
                self.errors.push(message.clone());
                self.push_result(row, RowStatus::Failed, None, Some(message));
            }
        }
    }

    fn reject(&mut self, row: &CsvRow, kind: RejectionKind, message: String) {
        debug!(row = row.row_number, %message, "row rejected");
        self.report.errors += 1;
        self.errors.push(message.clone());
        self.push_result(row, RowStatus::Rejected, Some(kind), Some(message));
    }

    fn push_result(
        &mut self,
        row: &CsvRow,
        status: RowStatus,
        rejection: Option<RejectionKind>,
        message: Option<String>,
    ) {
        self.report.rows.push(RowResult {
            row_number: row.row_number,
            match_id: row.match_id.trim().to_string(),
            status,
            rejection,
            message,
        });
    }
}

/// Write one resolved row. Returns `Created` or `Updated`.
async fn persist_resolved(
    repo: &LeagueRepository,
    resolved: &ResolvedMatch,
    options: &ImportOptions,
) -> Result<RowStatus, StoreError> {
    let header = NewMatch {
        external_id: Some(resolved.external_id.clone()),
        played_at: resolved.played_at,
        format: FORMAT_BEST_OF.to_string(),
        location: options.location.clone(),
        winner_player_id: resolved.winner_player_id().clone(),
    };
    match repo
        .find_match_by_external_id(&resolved.external_id)
        .await?
    {
        Some(existing) => {
            replace_match(repo, &existing, &header, resolved, options).await?;
            Ok(RowStatus::Updated)
        }
        None => {
            let record = repo.upsert_match(&header).await?;
            if let Err(err) = write_children(repo, &record.id, resolved).await {
                if options.rollback_failed_rows {
                    discard_match(repo, &record).await;
                }
                return Err(err);
            }
            Ok(RowStatus::Created)
        }
    }
}

/// Stage the new children next to the old ones, move the header, then
/// delete the old children by row id. Until that last step the previous
/// version can be put back exactly.
async fn replace_match(
    repo: &LeagueRepository,
    existing: &MatchRecord,
    header: &NewMatch,
    resolved: &ResolvedMatch,
    options: &ImportOptions,
) -> Result<(), StoreError> {
    let previous = repo.child_row_ids(&existing.id).await?;

    let outcome = match write_children(repo, &existing.id, resolved).await {
        Ok(()) => match repo.upsert_match(header).await {
            Ok(_) => repo.delete_child_rows(&previous).await.map_err(|err| (err, true)),
            Err(err) => Err((err, false)),
        },
        Err(err) => Err((err, false)),
    };
    let Err((err, header_moved)) = outcome else {
        return Ok(());
    };
    if options.rollback_failed_rows {
        restore_match(repo, existing, &previous, header_moved).await;
    }
    Err(err)
}

async fn write_children(
    repo: &LeagueRepository,
    match_id: &MatchId,
    resolved: &ResolvedMatch,
) -> Result<(), StoreError> {
    let participants =
        build_participants(match_id, &resolved.side_a, &resolved.side_b, resolved.winner);
    repo.insert_participants(&participants).await?;
    repo.insert_events(&resolved.events.to_events(match_id))
        .await
}

/// Remove a match this session created, children first.
pub(crate) async fn discard_match(repo: &LeagueRepository, record: &MatchRecord) {
    if let Err(err) = repo.delete_match_children(&record.id).await {
        warn!(match_id = %record.id, error = %err, "cleanup of partial match rows failed");
        return;
    }
    if let Err(err) = repo.delete_match(&record.id).await {
        warn!(match_id = %record.id, error = %err, "cleanup of partial match failed");
    }
}

/// Drop the rows staged for a failed update and write the old header back.
async fn restore_match(
    repo: &LeagueRepository,
    existing: &MatchRecord,
    previous: &ChildRowIds,
    header_moved: bool,
) {
    let staged = match repo.child_row_ids(&existing.id).await {
        Ok(current) => current.added_since(previous),
        Err(err) => {
            warn!(match_id = %existing.id, error = %err, "could not list staged match rows");
            return;
        }
    };
    if !staged.is_empty() {
        if let Err(err) = repo.delete_child_rows(&staged).await {
            warn!(match_id = %existing.id, error = %err, "cleanup of staged match rows failed");
        }
    }
    if header_moved {
        if let Err(err) = repo.upsert_match(&existing.header()).await {
            warn!(match_id = %existing.id, error = %err, "restoring previous match header failed");
        }
    }
}
