use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use backend_domain::ports::{Condition, Filter, Row, StoreError, TableStore};
use backend_domain::StoreConfig;

const RETURN_ROWS: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Table store backed by a PostgREST-style HTTP endpoint.
pub struct RestStore {
    client: Client,
    base_url: String,
    timeout_seconds: u64,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref() {
            headers.insert("apikey", HeaderValue::from_str(key)?);
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
        }
        let timeout_seconds = config.timeout_seconds.max(1);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout_seconds,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await.map_err(|err| self.map_error(err))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Backend(error_message(status.as_u16(), &body)))
    }

    async fn rows(&self, table: &str, response: Response) -> Result<Vec<Row>, StoreError> {
        let value: Value = response
            .json()
            .await
            .map_err(|err| StoreError::decode(table, err))?;
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(row) => Ok(row),
                    other => Err(StoreError::decode(table, format!("unexpected row {other}"))),
                })
                .collect(),
            Value::Object(row) => Ok(vec![row]),
            other => Err(StoreError::decode(
                table,
                format!("unexpected response {other}"),
            )),
        }
    }

    fn map_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout_seconds)
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

/// PostgREST query parameters for a filter.
pub fn filter_params(filter: &Filter) -> Vec<(String, String)> {
    filter
        .conditions
        .iter()
        .map(|condition| match condition {
            Condition::Eq(column, value) => (column.clone(), format!("eq.{}", literal(value))),
            Condition::In(column, values) => {
                let list = values.iter().map(literal).collect::<Vec<_>>().join(",");
                (column.clone(), format!("in.({})", list))
            }
        })
        .collect()
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Prefer the backend's own `message` field when the body carries one.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("store responded {}: {}", status, body.trim()))
}

#[async_trait]
impl TableStore for RestStore {
    async fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        debug!(table, conditions = filter.conditions.len(), "store select");
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .query(&filter_params(filter));
        let response = self.send(request).await?;
        self.rows(table, response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", RETURN_ROWS)
            .json(&rows);
        let response = self.send(request).await?;
        self.rows(table, response).await
    }

    async fn upsert(&self, table: &str, row: Row, conflict_key: &str) -> Result<Row, StoreError> {
        let request = self
            .client
            .post(self.table_url(table))
            .query(&[("on_conflict", conflict_key)])
            .header("Prefer", MERGE_DUPLICATES)
            .json(&vec![row]);
        let response = self.send(request).await?;
        self.rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend(format!("upsert into {} returned no row", table)))
    }

    async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        let request = self
            .client
            .patch(self.table_url(table))
            .query(&filter_params(filter))
            .header("Prefer", RETURN_ROWS)
            .json(&patch);
        let response = self.send(request).await?;
        self.rows(table, response).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.table_url(table))
            .query(&filter_params(filter));
        self.send(request).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let request = self
            .client
            .get(self.table_url("players"))
            .query(&[("select", "id"), ("limit", "1")]);
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::StoreBackend;
    use serde_json::json;

    #[test]
    fn filters_become_postgrest_params() {
        let filter = Filter::eq("external_id", "match-001")
            .and_in("match_id", ["m1", "m2"])
            .and_eq("is_winner", true);
        assert_eq!(
            filter_params(&filter),
            vec![
                ("external_id".to_string(), "eq.match-001".to_string()),
                ("match_id".to_string(), "in.(m1,m2)".to_string()),
                ("is_winner".to_string(), "eq.true".to_string()),
            ]
        );
        assert!(filter_params(&Filter::all()).is_empty());
    }

    #[test]
    fn backend_message_is_passed_through() {
        let body = json!({"code": "23505", "message": "duplicate key value violates unique constraint"});
        assert_eq!(
            error_message(409, &body.to_string()),
            "duplicate key value violates unique constraint"
        );
        assert_eq!(error_message(502, "bad gateway"), "store responded 502: bad gateway");
    }

    #[tokio::test]
    async fn unresponsive_backend_maps_to_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let store = RestStore::new(&StoreConfig {
            backend: StoreBackend::Rest,
            url: format!("http://{addr}"),
            api_key: None,
            timeout_seconds: 0,
        })
        .expect("client");
        let err = store
            .select("matches", &Filter::all())
            .await
            .expect_err("no response");
        assert!(matches!(err, StoreError::Timeout(1)), "{err:?}");
        assert_eq!(err.to_string(), "store request timed out after 1s");
    }

    #[test]
    fn table_urls_join_without_double_slash() {
        let store = RestStore::new(&StoreConfig {
            backend: StoreBackend::Rest,
            url: "http://127.0.0.1:54321/rest/v1/".to_string(),
            api_key: Some("anon".to_string()),
            timeout_seconds: 15,
        })
        .expect("client");
        assert_eq!(
            store.table_url("matches"),
            "http://127.0.0.1:54321/rest/v1/matches"
        );
    }
}
