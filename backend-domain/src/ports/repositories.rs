use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A single record as the tabular store sees it.
pub type Row = Map<String, Value>;

pub mod tables {
    pub const PLAYERS: &str = "players";
    pub const BEYBLADES: &str = "beyblades";
    pub const PLAYER_BEYBLADES: &str = "player_beyblades";
    pub const MATCHES: &str = "matches";
    pub const MATCH_PARTICIPANTS: &str = "match_participants";
    pub const MATCH_EVENTS: &str = "match_events";
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Condition {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::Eq(column, expected) => row.get(column) == Some(expected),
            Condition::In(column, values) => row
                .get(column)
                .map(|value| values.contains(value))
                .unwrap_or(false),
        }
    }
}

/// Conjunction of column conditions. An empty filter selects every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::all().and_eq(column, value)
    }

    pub fn any_of<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self::all().and_in(column, values)
    }

    pub fn and_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(column.to_string(), value.into()));
        self
    }

    pub fn and_in<V: Into<Value>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|condition| condition.matches(row))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Message passed through verbatim from the backend.
    #[error("{0}")]
    Backend(String),
    #[error("store request timed out after {0}s")]
    Timeout(u64),
    #[error("failed to decode {table} row: {message}")]
    Decode { table: String, message: String },
    #[error("{0} not found")]
    NotFound(String),
}

impl StoreError {
    pub fn decode(table: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Decode {
            table: table.to_string(),
            message: err.to_string(),
        }
    }
}

/// Generic tabular store keyed by table name.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError>;
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError>;
    /// Insert, or merge into the existing row whose `conflict_key` column is equal.
    async fn upsert(&self, table: &str, row: Row, conflict_key: &str) -> Result<Row, StoreError>;
    async fn update(&self, table: &str, filter: &Filter, patch: Row)
        -> Result<Vec<Row>, StoreError>;
    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}
