use tracing::info;

use crate::{AppError, AppState};
use backend_domain::{normalize_beyblade_name, BeyType, Beyblade, BeybladeRecord, NewBeyblade};

pub async fn add_beyblade(state: &AppState, payload: NewBeyblade) -> Result<Beyblade, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is empty".to_string()));
    }
    let bey_type = match payload.bey_type.as_deref().map(str::trim) {
        None | Some("") => BeyType::Balance,
        Some(value) => BeyType::parse(value).ok_or_else(|| {
            AppError::BadRequest(format!(
                "type must be one of Attack, Defense, Stamina, Balance (got \"{}\")",
                value
            ))
        })?,
    };

    let record = BeybladeRecord::new(name, bey_type);
    let catalog = state.repo.beyblades().await?;
    if let Some(existing) = catalog.iter().find(|bey| {
        bey.normalized_name
            .clone()
            .unwrap_or_else(|| normalize_beyblade_name(&bey.name))
            == record.normalized_name
    }) {
        return Err(AppError::BadRequest(format!(
            "beyblade \"{}\" already exists",
            existing.name
        )));
    }

    let beyblade = state.repo.insert_beyblade(&record).await?;
    info!(
        beyblade_id = %beyblade.id,
        name = %beyblade.name,
        bey_type = bey_type.as_str(),
        "beyblade added to catalog"
    );
    Ok(beyblade)
}
