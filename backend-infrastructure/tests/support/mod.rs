#![allow(dead_code)]

use std::sync::Arc;

use backend_application::commands::{add_beyblade, add_to_inventory, register_player};
use backend_application::AppState;
use backend_domain::{
    AddInventoryRequest, Beyblade, NewBeyblade, NewPlayer, Player, RuntimeConfig,
};
use backend_infrastructure::{FileBatchSource, InMemoryStore};

pub struct League {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
}

impl League {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(
            config,
            store.clone(),
            Arc::new(FileBatchSource::new("./missing-batch-import.csv")),
        );
        Self { state, store }
    }

    pub async fn player(&self, name: &str) -> Player {
        register_player(
            &self.state,
            NewPlayer {
                display_name: name.to_string(),
            },
        )
        .await
        .expect("register player")
    }

    pub async fn beyblade(&self, name: &str, bey_type: &str) -> Beyblade {
        add_beyblade(
            &self.state,
            NewBeyblade {
                name: name.to_string(),
                bey_type: Some(bey_type.to_string()),
            },
        )
        .await
        .expect("add beyblade")
    }

    pub async fn give(&self, player: &Player, beyblade: &Beyblade) {
        add_to_inventory(
            &self.state,
            player.id.clone(),
            AddInventoryRequest {
                beyblade_id: beyblade.id.clone(),
            },
        )
        .await
        .expect("add to inventory");
    }
}

/// Alex owns Valkyrie Wing, Jordan owns Longinus Destroy.
pub async fn alex_and_jordan() -> (League, Player, Player, Beyblade, Beyblade) {
    let league = League::new();
    let alex = league.player("Alex").await;
    let jordan = league.player("Jordan").await;
    let valkyrie = league.beyblade("Valkyrie Wing", "Attack").await;
    let longinus = league.beyblade("Longinus Destroy", "Stamina").await;
    league.give(&alex, &valkyrie).await;
    league.give(&jordan, &longinus).await;
    (league, alex, jordan, valkyrie, longinus)
}
