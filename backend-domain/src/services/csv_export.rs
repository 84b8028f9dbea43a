use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::entities::CsvRow;
use crate::services::CSV_COLUMNS;

/// Render rows as a batch file. The header is always written and fields are
/// joined as-is, so commas inside a cell are not escaped.
pub fn render_match_csv(rows: &[CsvRow]) -> anyhow::Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.match_id.as_str(),
            row.player1.as_str(),
            row.player1_bey.as_str(),
            row.player1_score.as_str(),
            row.player2.as_str(),
            row.player2_bey.as_str(),
            row.player2_score.as_str(),
            row.winner.as_str(),
            row.date.as_str(),
            row.bursts.as_str(),
            row.knockouts.as_str(),
            row.extreme_knockouts.as_str(),
            row.spin_finishes.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
