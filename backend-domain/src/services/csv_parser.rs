use csv::{ReaderBuilder, StringRecord, Trim};

use crate::entities::{CsvRow, ParsedBatch};
use crate::value_objects::{AmbiguousWinnerPolicy, Side};

/// Columns of a batch file, in their positional (headerless) order.
pub const CSV_COLUMNS: [&str; 13] = [
    "match_id",
    "player1",
    "player1_bey",
    "player1_score",
    "player2",
    "player2_bey",
    "player2_score",
    "winner",
    "date",
    "bursts",
    "knockouts",
    "extreme_knockouts",
    "spin_finishes",
];

const LEGACY_HEADER_ALIASES: [&str; 2] = ["scorea", "scoreb"];
const MIN_CELLS: usize = 8;

/// Where each logical column lives in a data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [usize; 13],
}

impl ColumnMap {
    pub fn positional() -> Self {
        let mut indices = [0; 13];
        for (position, slot) in indices.iter_mut().enumerate() {
            *slot = position;
        }
        Self { indices }
    }

    /// Resolve every column against a header line. Columns that cannot be
    /// found keep their positional index and add a warning.
    pub fn from_header(header: &[String], warnings: &mut Vec<String>) -> Self {
        let mut map = Self::positional();
        for (position, name) in CSV_COLUMNS.iter().enumerate() {
            match find_column(header, name) {
                Some(index) => map.indices[position] = index,
                None => warnings.push(format!(
                    "Warning: Column \"{}\" not found in CSV header. Available columns: {}",
                    name,
                    header.join(", ")
                )),
            }
        }
        map
    }

    fn cell<'a>(&self, cells: &'a StringRecord, position: usize) -> &'a str {
        cells.get(self.indices[position]).unwrap_or("")
    }
}

fn find_column(header: &[String], name: &str) -> Option<usize> {
    let squashed = name.replace('_', "");
    header
        .iter()
        .position(|cell| cell == name || cell.replace('_', "") == squashed)
        .or_else(|| match name {
            "player1_score" => header.iter().position(|cell| cell == "scorea"),
            "player2_score" => header.iter().position(|cell| cell == "scoreb"),
            _ => None,
        })
}

pub fn is_header_line(cells: &[String]) -> bool {
    cells.iter().any(|cell| {
        CSV_COLUMNS.contains(&cell.as_str()) || LEGACY_HEADER_ALIASES.contains(&cell.as_str())
    })
}

/// Parse a batch file into raw rows plus warnings. Malformed lines degrade to
/// warnings and never abort the batch.
pub fn parse_match_csv(content: &str, policy: AmbiguousWinnerPolicy) -> ParsedBatch {
    let lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();
    let mut batch = ParsedBatch::default();
    if lines.is_empty() {
        return batch;
    }

    let joined = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(joined.as_bytes());

    let mut records = Vec::with_capacity(lines.len());
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => records.push(record),
            Err(err) => {
                batch
                    .warnings
                    .push(format!("Row {}: Skipped ({})", index + 1, err));
                records.push(StringRecord::new());
            }
        }
    }

    let header = records
        .first()
        .map(|record| {
            record
                .iter()
                .map(|cell| cell.to_lowercase())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let has_header = is_header_line(&header);
    let columns = if has_header {
        ColumnMap::from_header(&header, &mut batch.warnings)
    } else {
        ColumnMap::positional()
    };

    let start = usize::from(has_header);
    for (index, cells) in records.iter().enumerate().skip(start) {
        let row_number = index + 1;
        if cells.len() < MIN_CELLS {
            if !cells.is_empty() {
                batch
                    .warnings
                    .push(format!("Row {row_number}: Skipped (not enough columns)"));
            }
            continue;
        }
        batch
            .rows
            .push(read_row(row_number, cells, &columns, policy, &mut batch.warnings));
    }
    batch
}

fn read_row(
    row_number: usize,
    cells: &StringRecord,
    columns: &ColumnMap,
    policy: AmbiguousWinnerPolicy,
    warnings: &mut Vec<String>,
) -> CsvRow {
    let text = |position: usize| columns.cell(cells, position).to_string();
    let or_default = |position: usize, fallback: &str| {
        let value = columns.cell(cells, position);
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    let player1 = text(1);
    let player2 = text(4);
    let winner = text(7);
    let winner_side = match resolve_winner(&winner, &player1, &player2) {
        Some(side) => Some(side),
        None => {
            let fallback = policy.fallback();
            let outcome = match fallback {
                Some(Side::A) => "defaulting to player1",
                Some(Side::B) => "defaulting to player2",
                None => "rejecting row",
            };
            warnings.push(format!(
                "Row {row_number}: Winner \"{winner}\" doesn't match player1 or player2, {outcome}"
            ));
            fallback
        }
    };

    CsvRow {
        row_number,
        match_id: text(0),
        player1,
        player1_bey: text(2),
        player1_score: or_default(3, "1"),
        player2,
        player2_bey: text(5),
        player2_score: or_default(6, "0"),
        winner,
        winner_side,
        date: text(8),
        bursts: or_default(9, "0"),
        knockouts: or_default(10, "0"),
        extreme_knockouts: or_default(11, "0"),
        spin_finishes: or_default(12, "0"),
    }
}

/// Side named by a winner cell. A side-B match takes precedence.
pub fn resolve_winner(raw: &str, player1: &str, player2: &str) -> Option<Side> {
    let raw = raw.trim();
    let names = |player: &str| {
        !raw.is_empty() && raw.to_lowercase() == player.trim().to_lowercase()
    };
    if raw.eq_ignore_ascii_case("b") || names(player2) {
        Some(Side::B)
    } else if raw.eq_ignore_ascii_case("a") || names(player1) {
        Some(Side::A)
    } else {
        None
    }
}
