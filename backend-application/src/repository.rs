use std::collections::HashMap;
use std::sync::Arc;

use backend_domain::ports::{tables, Filter, Row, StoreError, TableStore};
use backend_domain::{
    Beyblade, BeybladeId, BeybladeRecord, InventoryEntry, InventoryItem, InventoryStatsUpdate,
    MatchEvent, MatchId, MatchParticipant, MatchRecord, NewMatch, Player, PlayerId,
    ReferenceSnapshot,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// Store row ids of the participants and events attached to one match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildRowIds {
    pub participants: Vec<Value>,
    pub events: Vec<Value>,
}

impl ChildRowIds {
    /// Ids present here that `earlier` did not have.
    pub fn added_since(&self, earlier: &ChildRowIds) -> ChildRowIds {
        fn fresh(now: &[Value], before: &[Value]) -> Vec<Value> {
            now.iter()
                .filter(|id| !before.contains(id))
                .cloned()
                .collect()
        }
        ChildRowIds {
            participants: fresh(&self.participants, &earlier.participants),
            events: fresh(&self.events, &earlier.events),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty() && self.events.is_empty()
    }
}

/// Typed access to the league tables on top of a generic [`TableStore`].
#[derive(Clone)]
pub struct LeagueRepository {
    store: Arc<dyn TableStore>,
}

impl LeagueRepository {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    async fn select_as<T: DeserializeOwned>(
        &self,
        table: &str,
        filter: &Filter,
    ) -> Result<Vec<T>, StoreError> {
        self.store
            .select(table, filter)
            .await?
            .into_iter()
            .map(|row| from_row(table, row))
            .collect()
    }

    async fn insert_one<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        value: &T,
    ) -> Result<R, StoreError> {
        let row = to_row(table, value)?;
        let inserted = self.store.insert(table, vec![row]).await?;
        let first = inserted
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend(format!("insert into {table} returned no row")))?;
        from_row(table, first)
    }

    // Players

    pub async fn players(&self) -> Result<Vec<Player>, StoreError> {
        self.select_as(tables::PLAYERS, &Filter::all()).await
    }

    pub async fn find_player(&self, id: &PlayerId) -> Result<Option<Player>, StoreError> {
        let rows: Vec<Player> = self
            .select_as(tables::PLAYERS, &Filter::eq("id", id.as_str()))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_player(&self, display_name: &str) -> Result<Player, StoreError> {
        self.insert_one(tables::PLAYERS, &json!({ "display_name": display_name }))
            .await
    }

    // Catalog

    pub async fn beyblades(&self) -> Result<Vec<Beyblade>, StoreError> {
        self.select_as(tables::BEYBLADES, &Filter::all()).await
    }

    pub async fn find_beyblade(&self, id: &BeybladeId) -> Result<Option<Beyblade>, StoreError> {
        let rows: Vec<Beyblade> = self
            .select_as(tables::BEYBLADES, &Filter::eq("id", id.as_str()))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_beyblade(&self, record: &BeybladeRecord) -> Result<Beyblade, StoreError> {
        self.insert_one(tables::BEYBLADES, record).await
    }

    // Inventory

    pub async fn inventory_entries(
        &self,
        player_id: Option<&PlayerId>,
    ) -> Result<Vec<InventoryEntry>, StoreError> {
        let filter = match player_id {
            Some(id) => Filter::eq("player_id", id.as_str()),
            None => Filter::all(),
        };
        self.select_as(tables::PLAYER_BEYBLADES, &filter).await
    }

    pub async fn insert_inventory_entry(
        &self,
        player_id: &PlayerId,
        beyblade_id: &BeybladeId,
    ) -> Result<InventoryEntry, StoreError> {
        self.insert_one(
            tables::PLAYER_BEYBLADES,
            &json!({ "player_id": player_id, "beyblade_id": beyblade_id }),
        )
        .await
    }

    pub async fn update_inventory_stats(
        &self,
        player_id: &PlayerId,
        beyblade_id: &BeybladeId,
        stats: &InventoryStatsUpdate,
    ) -> Result<InventoryEntry, StoreError> {
        let filter = Filter::eq("player_id", player_id.as_str())
            .and_eq("beyblade_id", beyblade_id.as_str());
        let patch = to_row(tables::PLAYER_BEYBLADES, stats)?;
        let updated = self
            .store
            .update(tables::PLAYER_BEYBLADES, &filter, patch)
            .await?;
        let row = updated.into_iter().next().ok_or_else(|| {
            StoreError::NotFound(format!("beyblade {beyblade_id} in inventory of {player_id}"))
        })?;
        from_row(tables::PLAYER_BEYBLADES, row)
    }

    /// Players plus every inventory joined with catalog names, read once.
    pub async fn load_snapshot(&self) -> Result<ReferenceSnapshot, StoreError> {
        let players = self.players().await?;
        let catalog = self
            .beyblades()
            .await?
            .into_iter()
            .map(|bey| (bey.id, bey.name))
            .collect::<HashMap<_, _>>();

        let mut inventories: HashMap<PlayerId, Vec<InventoryItem>> = HashMap::new();
        for entry in self.inventory_entries(None).await? {
            let Some(name) = catalog.get(&entry.beyblade_id) else {
                continue;
            };
            inventories
                .entry(entry.player_id)
                .or_default()
                .push(InventoryItem {
                    beyblade_id: entry.beyblade_id,
                    name: name.clone(),
                });
        }
        Ok(ReferenceSnapshot::new(players, inventories))
    }

    // Matches

    pub async fn matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        self.select_as(tables::MATCHES, &Filter::all()).await
    }

    pub async fn find_match_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<MatchRecord>, StoreError> {
        let rows: Vec<MatchRecord> = self
            .select_as(tables::MATCHES, &Filter::eq("external_id", external_id))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_match(&self, record: &NewMatch) -> Result<MatchRecord, StoreError> {
        self.insert_one(tables::MATCHES, record).await
    }

    /// Insert or update in place, keyed on `external_id`.
    pub async fn upsert_match(&self, record: &NewMatch) -> Result<MatchRecord, StoreError> {
        let row = to_row(tables::MATCHES, record)?;
        let stored = self
            .store
            .upsert(tables::MATCHES, row, "external_id")
            .await?;
        from_row(tables::MATCHES, stored)
    }

    pub async fn delete_match(&self, match_id: &MatchId) -> Result<(), StoreError> {
        self.store
            .delete(tables::MATCHES, &Filter::eq("id", match_id.as_str()))
            .await
    }

    pub async fn delete_match_children(&self, match_id: &MatchId) -> Result<(), StoreError> {
        let filter = Filter::eq("match_id", match_id.as_str());
        self.store
            .delete(tables::MATCH_PARTICIPANTS, &filter)
            .await?;
        self.store.delete(tables::MATCH_EVENTS, &filter).await
    }

    pub async fn child_row_ids(&self, match_id: &MatchId) -> Result<ChildRowIds, StoreError> {
        let filter = Filter::eq("match_id", match_id.as_str());
        Ok(ChildRowIds {
            participants: row_ids(self.store.select(tables::MATCH_PARTICIPANTS, &filter).await?),
            events: row_ids(self.store.select(tables::MATCH_EVENTS, &filter).await?),
        })
    }

    /// Delete exactly the listed child rows.
    pub async fn delete_child_rows(&self, ids: &ChildRowIds) -> Result<(), StoreError> {
        if !ids.participants.is_empty() {
            self.store
                .delete(
                    tables::MATCH_PARTICIPANTS,
                    &Filter::any_of("id", ids.participants.iter().cloned()),
                )
                .await?;
        }
        if !ids.events.is_empty() {
            self.store
                .delete(
                    tables::MATCH_EVENTS,
                    &Filter::any_of("id", ids.events.iter().cloned()),
                )
                .await?;
        }
        Ok(())
    }

    pub async fn participants(
        &self,
        match_ids: Option<&[MatchId]>,
    ) -> Result<Vec<MatchParticipant>, StoreError> {
        self.select_as(tables::MATCH_PARTICIPANTS, &by_match_ids(match_ids))
            .await
    }

    pub async fn events(
        &self,
        match_ids: Option<&[MatchId]>,
    ) -> Result<Vec<MatchEvent>, StoreError> {
        self.select_as(tables::MATCH_EVENTS, &by_match_ids(match_ids))
            .await
    }

    pub async fn insert_participants(
        &self,
        participants: &[MatchParticipant],
    ) -> Result<(), StoreError> {
        let rows = participants
            .iter()
            .map(|participant| to_row(tables::MATCH_PARTICIPANTS, participant))
            .collect::<Result<Vec<_>, _>>()?;
        self.store.insert(tables::MATCH_PARTICIPANTS, rows).await?;
        Ok(())
    }

    /// No-op for an empty slice.
    pub async fn insert_events(&self, events: &[MatchEvent]) -> Result<(), StoreError> {
        if events.is_empty() {
            return Ok(());
        }
        let rows = events
            .iter()
            .map(|event| to_row(tables::MATCH_EVENTS, event))
            .collect::<Result<Vec<_>, _>>()?;
        self.store.insert(tables::MATCH_EVENTS, rows).await?;
        Ok(())
    }

    pub async fn count(&self, table: &str) -> Result<u64, StoreError> {
        Ok(self.store.select(table, &Filter::all()).await?.len() as u64)
    }
}

fn by_match_ids(match_ids: Option<&[MatchId]>) -> Filter {
    match match_ids {
        Some(ids) => Filter::any_of("match_id", ids.iter().map(|id| id.as_str())),
        None => Filter::all(),
    }
}

fn row_ids(rows: Vec<Row>) -> Vec<Value> {
    rows.into_iter()
        .filter_map(|mut row| row.remove("id"))
        .filter(|id| !id.is_null())
        .collect()
}

fn to_row<T: Serialize>(table: &str, value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::decode(
            table,
            format!("expected an object, got {other}"),
        )),
        Err(err) => Err(StoreError::decode(table, err)),
    }
}

fn from_row<T: DeserializeOwned>(table: &str, row: Row) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(row))
        .map_err(|err| StoreError::decode(table, err))
}
