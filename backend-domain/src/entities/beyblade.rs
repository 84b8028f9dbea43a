// Beyblade catalog entity

use serde::{Deserialize, Serialize};

use crate::services::normalize_beyblade_name;
use crate::value_objects::{BeyType, BeybladeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beyblade {
    pub id: BeybladeId,
    pub name: String,
    #[serde(default)]
    pub normalized_name: Option<String>,
    #[serde(rename = "type", default)]
    pub bey_type: Option<String>,
    #[serde(default)]
    pub attack: Option<i64>,
    #[serde(default)]
    pub defense: Option<i64>,
    #[serde(default)]
    pub stamina: Option<i64>,
}

impl Beyblade {
    /// Type as stored, `"Unknown"` when the catalog row has none.
    pub fn type_label(&self) -> &str {
        self.bey_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn kind(&self) -> BeyType {
        BeyType::from(self.bey_type.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBeyblade {
    pub name: String,
    #[serde(rename = "type", default)]
    pub bey_type: Option<String>,
}

/// Row written to the catalog table; `normalized_name` is always derived from `name`.
#[derive(Debug, Clone, Serialize)]
pub struct BeybladeRecord {
    pub name: String,
    pub normalized_name: String,
    #[serde(rename = "type")]
    pub bey_type: String,
    pub attack: Option<i64>,
    pub defense: Option<i64>,
    pub stamina: Option<i64>,
}

impl BeybladeRecord {
    pub fn new(name: &str, bey_type: BeyType) -> Self {
        let name = name.trim().to_string();
        Self {
            normalized_name: normalize_beyblade_name(&name),
            name,
            bey_type: bey_type.as_str().to_string(),
            attack: None,
            defense: None,
            stamina: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BeybladeQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}
