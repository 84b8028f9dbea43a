// Beyblade type value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeyType {
    Attack,
    Defense,
    Stamina,
    Balance,
}

impl BeyType {
    pub const ALL: [BeyType; 4] = [
        BeyType::Attack,
        BeyType::Defense,
        BeyType::Stamina,
        BeyType::Balance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BeyType::Attack => "Attack",
            BeyType::Defense => "Defense",
            BeyType::Stamina => "Stamina",
            BeyType::Balance => "Balance",
        }
    }

    /// Strict lookup used when validating new catalog entries.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "attack" => Some(BeyType::Attack),
            "defense" => Some(BeyType::Defense),
            "stamina" => Some(BeyType::Stamina),
            "balance" => Some(BeyType::Balance),
            _ => None,
        }
    }
}

impl From<&str> for BeyType {
    fn from(s: &str) -> Self {
        BeyType::parse(s).unwrap_or(BeyType::Balance)
    }
}
