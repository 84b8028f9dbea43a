use backend_domain::{AmbiguousWinnerPolicy, ImportQuery, ImportReport};
use tracing::{error, info};

use crate::importer::{run_import, ImportOptions};
use crate::{AppError, AppState};

/// Import a batch file body. Sessions are serialized on `import_lock`.
pub async fn import_matches(
    state: &AppState,
    content: &str,
    query: ImportQuery,
) -> Result<ImportReport, AppError> {
    let options = import_options(state, &query)?;
    let _session = state.import_lock.lock().await;
    info!(
        bytes = content.len(),
        winner_policy = %options.winner_policy,
        "importing match batch"
    );
    match run_import(&state.repo, content, &options).await {
        Ok(report) => {
            state.metrics.record_import(&report);
            Ok(report)
        }
        Err(err) => {
            error!("failed to load reference data for import: {}", err);
            state.metrics.record_import_failure();
            Err(err.into())
        }
    }
}

/// Import the batch file configured at `batch_import_path`.
pub async fn import_bundled_batch(
    state: &AppState,
    query: ImportQuery,
) -> Result<ImportReport, AppError> {
    let content = state.batch_source.read_batch().await.map_err(|err| {
        error!(
            "failed to read batch file {}: {}",
            state.batch_source.describe(),
            err
        );
        AppError::BadRequest(format!("could not load {}", state.batch_source.describe()))
    })?;
    import_matches(state, &content, query).await
}

fn import_options(state: &AppState, query: &ImportQuery) -> Result<ImportOptions, AppError> {
    let winner_policy = match query.winner_policy.as_deref().map(str::trim) {
        None | Some("") => state.config.winner_policy,
        Some(value) => value
            .parse::<AmbiguousWinnerPolicy>()
            .map_err(AppError::BadRequest)?,
    };
    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    Ok(ImportOptions {
        winner_policy,
        rollback_failed_rows: state.config.rollback_failed_rows,
        summary_limit: state.config.summary_limit,
        location,
    })
}
