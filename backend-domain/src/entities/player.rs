// Player entity
// A registered blader; referenced by inventories and match participants

use serde::{Deserialize, Serialize};

use crate::value_objects::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayer {
    pub display_name: String,
}
