// Batch import entities
// Raw rows read from a match file and the per-row outcomes of importing them

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::Side;

/// One data line of a batch file. Every field is the trimmed cell text;
/// nothing here has been resolved against the store yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(default)]
    pub row_number: usize,
    #[serde(default)]
    pub match_id: String,
    #[serde(default)]
    pub player1: String,
    #[serde(default)]
    pub player1_bey: String,
    #[serde(default)]
    pub player1_score: String,
    #[serde(default)]
    pub player2: String,
    #[serde(default)]
    pub player2_bey: String,
    #[serde(default)]
    pub player2_score: String,
    #[serde(default)]
    pub winner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_side: Option<Side>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub bursts: String,
    #[serde(default)]
    pub knockouts: String,
    #[serde(default)]
    pub extreme_knockouts: String,
    #[serde(default)]
    pub spin_finishes: String,
}

/// Per-request overrides for an import session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub winner_policy: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub rows: Vec<CsvRow>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    MissingFields,
    UnresolvedReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("Missing match_id")]
    MissingExternalId,
    #[error("Invalid scores")]
    InvalidScores,
    #[error("Winner \"{0}\" does not match player1 or player2")]
    UnresolvedWinner(String),
    #[error("Missing players - \"{0}\" not found in database")]
    UnknownPlayer(String),
    #[error("Missing Beyblades - \"{beyblade}\" not found for {player}. Available: {available}")]
    UnknownBeyblade {
        player: String,
        beyblade: String,
        available: String,
    },
}

impl RowRejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            RowRejection::UnknownPlayer(_) | RowRejection::UnknownBeyblade { .. } => {
                RejectionKind::UnresolvedReference
            }
            _ => RejectionKind::MissingFields,
        }
    }
}

/// Terminal state of one imported row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Created,
    Updated,
    Skipped,
    Rejected,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowResult {
    pub row_number: usize,
    pub match_id: String,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub fingerprint: String,
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub warnings: Vec<String>,
    pub error_messages: Vec<String>,
    pub rows: Vec<RowResult>,
    pub duration_ms: u64,
}

impl ImportReport {
    /// Plain-text block shown to whoever ran the import.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "CSV Import Complete".to_string(),
            format!("Total rows: {}", self.total_rows),
            format!("Created: {}", self.created),
            format!("Updated: {}", self.updated),
            format!("Skipped (duplicates): {}", self.skipped),
            format!("Errors: {}", self.errors),
        ];
        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push("Warnings:".to_string());
            lines.extend(self.warnings.iter().cloned());
        }
        if !self.error_messages.is_empty() {
            lines.push(String::new());
            lines.push("Errors:".to_string());
            lines.extend(self.error_messages.iter().cloned());
        }
        lines.join("\n")
    }
}

/// First `limit` messages, followed by a "... and K more" line when cut.
pub fn truncate_messages(messages: &[String], limit: usize) -> Vec<String> {
    let mut out = messages.iter().take(limit).cloned().collect::<Vec<_>>();
    if messages.len() > limit {
        out.push(format!("... and {} more", messages.len() - limit));
    }
    out
}
