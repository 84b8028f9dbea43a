use crate::{AppError, AppState};
use backend_domain::{normalize_beyblade_name, Beyblade, BeybladeQuery};

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_LIMIT: usize = 200;

pub async fn list_beyblades(
    state: &AppState,
    query: BeybladeQuery,
) -> Result<Vec<Beyblade>, AppError> {
    let mut catalog = state.repo.beyblades().await?;
    catalog.sort_by_key(|bey| bey.name.to_lowercase());

    let needle = query
        .q
        .as_deref()
        .map(normalize_beyblade_name)
        .filter(|value| !value.is_empty());
    if let Some(needle) = needle.as_deref() {
        catalog.retain(|bey| {
            let normalized = bey
                .normalized_name
                .clone()
                .unwrap_or_else(|| normalize_beyblade_name(&bey.name));
            bey.name.to_lowercase().contains(needle) || normalized.contains(needle)
        });
    }

    let limit = match (query.limit, needle.is_some()) {
        (Some(limit), _) => Some(limit.clamp(1, MAX_LIMIT)),
        (None, true) => Some(DEFAULT_SEARCH_LIMIT),
        (None, false) => None,
    };
    if let Some(limit) = limit {
        catalog.truncate(limit);
    }
    Ok(catalog)
}
