use crate::{AppError, AppState};
use backend_domain::{build_league_report, LeagueReport, ReportFilter, ReportInput};

pub async fn league_report(
    state: &AppState,
    filter: ReportFilter,
) -> Result<LeagueReport, AppError> {
    let matches = state.repo.matches().await?;
    let participants = state.repo.participants(None).await?;
    let events = state.repo.events(None).await?;
    let players = state.repo.players().await?;
    let beyblades = state.repo.beyblades().await?;

    Ok(build_league_report(
        ReportInput {
            matches: &matches,
            participants: &participants,
            events: &events,
            players: &players,
            beyblades: &beyblades,
        },
        &filter,
    ))
}
