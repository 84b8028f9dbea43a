// Player inventory entities

use serde::{Deserialize, Serialize};

use crate::entities::{Beyblade, Player};
use crate::value_objects::{BeyType, BeybladeId, InventoryEntryId, PlayerId};

/// Ownership row linking a player to a catalog Beyblade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: InventoryEntryId,
    pub player_id: PlayerId,
    pub beyblade_id: BeybladeId,
    #[serde(default)]
    pub attack: Option<i64>,
    #[serde(default)]
    pub defense: Option<i64>,
    #[serde(default)]
    pub stamina: Option<i64>,
}

/// Owned Beyblade joined with its catalog name, used for name matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub beyblade_id: BeybladeId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedBeyblade {
    pub beyblade_id: BeybladeId,
    pub name: String,
    #[serde(rename = "type")]
    pub bey_type: BeyType,
    pub attack: Option<i64>,
    pub defense: Option<i64>,
    pub stamina: Option<i64>,
}

impl OwnedBeyblade {
    /// Owner overrides win over catalog stats.
    pub fn from_parts(entry: &InventoryEntry, catalog: &Beyblade) -> Self {
        Self {
            beyblade_id: catalog.id.clone(),
            name: catalog.name.clone(),
            bey_type: catalog.kind(),
            attack: entry.attack.or(catalog.attack),
            defense: entry.defense.or(catalog.defense),
            stamina: entry.stamina.or(catalog.stamina),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerInventory {
    pub player: Player,
    pub beyblades: Vec<OwnedBeyblade>,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: u32,
    pub available: Vec<Beyblade>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddInventoryRequest {
    pub beyblade_id: BeybladeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryStatsUpdate {
    pub attack: i64,
    pub defense: i64,
    pub stamina: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryQuery {
    #[serde(default, rename = "type")]
    pub bey_type: Option<String>,
}
