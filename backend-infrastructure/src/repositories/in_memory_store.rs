use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use backend_domain::ports::{Filter, Row, StoreError, TableStore};

/// Process-local table store. Rows get a generated `id` when inserted
/// without one.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    failing_tables: RwLock<HashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every insert, upsert and update on `table` fail. Deletes still
    /// succeed so cleanup paths can be observed.
    pub async fn fail_writes_to(&self, table: &str) {
        self.failing_tables.write().await.insert(table.to_string());
    }

    pub async fn clear_failures(&self) {
        self.failing_tables.write().await.clear();
    }

    pub async fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    async fn check_writable(&self, table: &str) -> Result<(), StoreError> {
        if self.failing_tables.read().await.contains(table) {
            return Err(StoreError::Backend(format!(
                "write to {} rejected by store",
                table
            )));
        }
        Ok(())
    }
}

fn with_id(mut row: Row) -> Row {
    let missing = row.get("id").map_or(true, Value::is_null);
    if missing {
        row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    row
}

fn merge(target: &mut Row, patch: Row) {
    for (column, value) in patch {
        if column != "id" {
            target.insert(column, value);
        }
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        self.check_writable(table).await?;
        let inserted = rows.into_iter().map(with_id).collect::<Vec<_>>();
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn upsert(&self, table: &str, row: Row, conflict_key: &str) -> Result<Row, StoreError> {
        self.check_writable(table).await?;
        let key = row.get(conflict_key).filter(|value| !value.is_null()).cloned();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        if let Some(key) = key {
            if let Some(existing) = rows
                .iter_mut()
                .find(|candidate| candidate.get(conflict_key) == Some(&key))
            {
                merge(existing, row);
                return Ok(existing.clone());
            }
        }
        let row = with_id(row);
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        self.check_writable(table).await?;
        let mut tables = self.tables.write().await;
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| filter.matches(row)) {
                merge(row, patch.clone());
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError> {
        if let Some(rows) = self.tables.write().await.get_mut(table) {
            rows.retain(|row| !filter.matches(row));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_select_filters() {
        let store = InMemoryStore::new();
        let inserted = store
            .insert(
                "players",
                vec![
                    row(json!({"display_name": "Alex"})),
                    row(json!({"display_name": "Jordan"})),
                ],
            )
            .await
            .expect("insert");
        assert!(inserted.iter().all(|row| row["id"].is_string()));

        let alex = store
            .select("players", &Filter::eq("display_name", "Alex"))
            .await
            .expect("select");
        assert_eq!(alex.len(), 1);
        assert_eq!(alex[0]["id"], inserted[0]["id"]);
        assert!(store
            .select("missing", &Filter::all())
            .await
            .expect("select")
            .is_empty());
    }

    #[tokio::test]
    async fn upsert_merges_on_conflict_key() {
        let store = InMemoryStore::new();
        let first = store
            .upsert("matches", row(json!({"external_id": "m1", "format": "best_of"})), "external_id")
            .await
            .expect("first upsert");
        let second = store
            .upsert(
                "matches",
                row(json!({"external_id": "m1", "location": "Arena"})),
                "external_id",
            )
            .await
            .expect("second upsert");
        assert_eq!(first["id"], second["id"]);
        assert_eq!(second["format"], "best_of");
        assert_eq!(second["location"], "Arena");
        assert_eq!(store.rows("matches").await.len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_honour_filters() {
        let store = InMemoryStore::new();
        store
            .insert(
                "match_events",
                vec![
                    row(json!({"match_id": "m1", "count": 1})),
                    row(json!({"match_id": "m2", "count": 2})),
                ],
            )
            .await
            .expect("insert");
        let updated = store
            .update("match_events", &Filter::eq("match_id", "m2"), row(json!({"count": 5})))
            .await
            .expect("update");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["count"], 5);

        store
            .delete("match_events", &Filter::any_of("match_id", ["m1", "m3"]))
            .await
            .expect("delete");
        let left = store.rows("match_events").await;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0]["match_id"], "m2");
    }

    #[tokio::test]
    async fn failing_tables_reject_writes_but_allow_deletes() {
        let store = InMemoryStore::new();
        store.fail_writes_to("match_events").await;
        let err = store
            .insert("match_events", vec![row(json!({"match_id": "m1"}))])
            .await
            .expect_err("write rejected");
        assert_eq!(err.to_string(), "write to match_events rejected by store");
        store
            .delete("match_events", &Filter::all())
            .await
            .expect("delete still allowed");

        store.clear_failures().await;
        assert!(store
            .insert("match_events", vec![row(json!({"match_id": "m1"}))])
            .await
            .is_ok());
    }
}
