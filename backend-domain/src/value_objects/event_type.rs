// Match-ending event categories

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEventType {
    Burst,
    Knockout,
    ExtremeKnockout,
    SpinFinish,
}

impl MatchEventType {
    pub const ALL: [MatchEventType; 4] = [
        MatchEventType::Burst,
        MatchEventType::Knockout,
        MatchEventType::ExtremeKnockout,
        MatchEventType::SpinFinish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchEventType::Burst => "burst",
            MatchEventType::Knockout => "knockout",
            MatchEventType::ExtremeKnockout => "extreme_knockout",
            MatchEventType::SpinFinish => "spin_finish",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "burst" => Some(MatchEventType::Burst),
            "knockout" => Some(MatchEventType::Knockout),
            "extreme_knockout" => Some(MatchEventType::ExtremeKnockout),
            "spin_finish" => Some(MatchEventType::SpinFinish),
            _ => None,
        }
    }
}
