//! Common test utilities for the Avatica client tests
//!
//! Provides an in-memory Avatica server implementing `RpcChannel`:
//! - a single table of rows served through positional `fetch` pages
//! - update counts for non-query statements and batches
//! - request recording and injectable failures / delays

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use avatica_client::protocol::RequestKind;
use avatica_client::{AvaticaError, ConnectionFactory, Result, RpcChannel};
use serde_json::{json, Value};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn table_rows(n: usize) -> Vec<Vec<Value>> {
    (0..n)
        .map(|i| vec![json!(i), json!(format!("name-{}", i)), json!(i as f64 * 1.5)])
        .collect()
}

pub fn table_columns() -> Value {
    json!([
        {"ordinal": 0, "columnName": "ID", "label": "ID", "type": {"id": 4, "name": "INTEGER", "rep": "PRIMITIVE_INT"}},
        {"ordinal": 1, "columnName": "NAME", "label": "NAME", "type": {"id": 12, "name": "VARCHAR", "rep": "STRING"}},
        {"ordinal": 2, "columnName": "MONEY", "label": "MONEY", "type": {"id": 7, "name": "REAL", "rep": "DOUBLE"}}
    ])
}

fn is_row_query(sql: &str) -> bool {
    sql.trim_start().to_ascii_lowercase().starts_with("select")
}

/// Scripted Avatica server.
pub struct MockAvatica {
    rows: Mutex<Vec<Vec<Value>>>,
    update_count: Mutex<i64>,
    batch_counts: Mutex<Option<Vec<i64>>>,
    lazy_first_frame: Mutex<bool>,
    wrap_results: Mutex<bool>,
    execute_frame_size: u32,
    fetch_delay: Mutex<Option<Duration>>,
    failures: Mutex<HashMap<String, String>>,
    overrides: Mutex<HashMap<String, Value>>,
    prepared: Mutex<HashMap<u32, String>>,
    requests: Mutex<Vec<Value>>,
    next_statement_id: AtomicU32,
}

impl Default for MockAvatica {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            update_count: Mutex::new(1),
            batch_counts: Mutex::new(None),
            lazy_first_frame: Mutex::new(false),
            wrap_results: Mutex::new(true),
            execute_frame_size: 100,
            fetch_delay: Mutex::new(None),
            failures: Mutex::new(HashMap::new()),
            overrides: Mutex::new(HashMap::new()),
            prepared: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            next_statement_id: AtomicU32::new(1),
        }
    }
}

impl MockAvatica {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_rows(rows: Vec<Vec<Value>>) -> Arc<Self> {
        let mock = Self::default();
        *mock.rows.lock().unwrap() = rows;
        Arc::new(mock)
    }

    pub fn set_update_count(&self, count: i64) {
        *self.update_count.lock().unwrap() = count;
    }

    pub fn set_batch_counts(&self, counts: Vec<i64>) {
        *self.batch_counts.lock().unwrap() = Some(counts);
    }

    /// First frames carry no rows and are never final; every row comes from `fetch`.
    pub fn set_lazy_first_frame(&self, lazy: bool) {
        *self.lazy_first_frame.lock().unwrap() = lazy;
    }

    /// Whether execute results are wrapped in a `results` envelope.
    pub fn set_wrap_results(&self, wrap: bool) {
        *self.wrap_results.lock().unwrap() = wrap;
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    /// Makes every request named `request` fail with an HTTP 500.
    pub fn fail(&self, request: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(request.to_string(), message.to_string());
    }

    /// Replies to every request named `request` with `response`.
    pub fn respond(&self, request: &str, response: Value) {
        self.overrides
            .lock()
            .unwrap()
            .insert(request.to_string(), response);
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_named(&self, name: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r["request"] == name)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.requests_named(name).len()
    }

    pub fn request_names(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r["request"].as_str().map(|s| s.to_string()))
            .collect()
    }

    fn next_statement(&self) -> u32 {
        self.next_statement_id.fetch_add(1, Ordering::SeqCst)
    }

    fn frame(&self, offset: usize, max: usize) -> Value {
        let rows = self.rows.lock().unwrap();
        let end = (offset + max).min(rows.len());
        let page: Vec<Vec<Value>> = rows.get(offset..end).map(|p| p.to_vec()).unwrap_or_default();
        json!({"offset": offset, "done": end >= rows.len(), "rows": page})
    }

    fn first_frame(&self, max: usize) -> Value {
        if *self.lazy_first_frame.lock().unwrap() && !self.rows.lock().unwrap().is_empty() {
            json!({"offset": 0, "done": false, "rows": []})
        } else {
            self.frame(0, max)
        }
    }

    fn execute_result(&self, connection_id: &Value, statement_id: u32, sql: &str, max: usize) -> Value {
        let result = if is_row_query(sql) {
            json!({
                "response": "resultSet",
                "connectionId": connection_id,
                "statementId": statement_id,
                "ownStatement": true,
                "signature": {"columns": table_columns(), "sql": sql},
                "firstFrame": self.first_frame(max),
                "updateCount": -1
            })
        } else {
            json!({
                "response": "resultSet",
                "connectionId": connection_id,
                "statementId": statement_id,
                "ownStatement": true,
                "updateCount": *self.update_count.lock().unwrap()
            })
        };

        if *self.wrap_results.lock().unwrap() {
            json!({"response": "executeResults", "missingStatement": false, "results": [result]})
        } else {
            result
        }
    }

    fn metadata_result(&self, request: &Value, column: &str, rows: Value) -> Value {
        json!({
            "response": "resultSet",
            "connectionId": request["connectionId"],
            "statementId": self.next_statement(),
            "ownStatement": true,
            "signature": {"columns": [{"ordinal": 0, "columnName": column, "label": column}]},
            "firstFrame": {"offset": 0, "done": true, "rows": rows},
            "updateCount": -1
        })
    }

    fn handle(&self, request: &Value) -> Value {
        let connection_id = &request["connectionId"];
        let Some(kind) = RequestKind::of(request) else {
            return json!({"response": "error", "errorMessage": "unknown request"});
        };

        match kind {
            RequestKind::CreateStatement => json!({
                "response": "createStatement",
                "connectionId": connection_id,
                "statementId": self.next_statement()
            }),
            RequestKind::PrepareAndExecute => {
                let sql = request["sql"].as_str().unwrap_or_default();
                let max = request["maxRowsInFirstFrame"].as_u64().unwrap_or(100) as usize;
                let statement_id = request["statementId"].as_u64().unwrap_or_default() as u32;
                self.execute_result(connection_id, statement_id, sql, max)
            }
            RequestKind::Prepare => {
                let statement_id = self.next_statement();
                let sql = request["sql"].as_str().unwrap_or_default().to_string();
                self.prepared.lock().unwrap().insert(statement_id, sql.clone());
                json!({
                    "response": "prepare",
                    "statement": {
                        "connectionId": connection_id,
                        "id": statement_id,
                        "signature": {"columns": table_columns(), "sql": sql}
                    }
                })
            }
            RequestKind::Execute => {
                let handle = &request["statementHandle"];
                let statement_id = handle["id"].as_u64().unwrap_or_default() as u32;
                let sql = self
                    .prepared
                    .lock()
                    .unwrap()
                    .get(&statement_id)
                    .cloned()
                    .unwrap_or_default();
                self.execute_result(
                    &handle["connectionId"],
                    statement_id,
                    &sql,
                    self.execute_frame_size as usize,
                )
            }
            RequestKind::Fetch => {
                let offset = request["offset"].as_u64().unwrap_or_default() as usize;
                let max = request["fetchMaxRowCount"].as_u64().unwrap_or(100) as usize;
                json!({"response": "fetch", "frame": self.frame(offset, max)})
            }
            RequestKind::PrepareAndExecuteBatch => {
                let commands = request["sqlCommands"].as_array().cloned().unwrap_or_default();
                let counts = self
                    .batch_counts
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| vec![1; commands.len()]);
                json!({
                    "response": "executeBatch",
                    "connectionId": connection_id,
                    "statementId": request["statementId"],
                    "updateCounts": counts,
                    "missingStatement": false
                })
            }
            RequestKind::DatabaseProperties => json!({
                "response": "databaseProperties",
                "map": {
                    "GET_DRIVER_NAME": "SQLite JDBC",
                    "GET_DEFAULT_TRANSACTION_ISOLATION": 8
                }
            }),
            RequestKind::GetCatalogs => self.metadata_result(request, "TABLE_CAT", json!([["main"]])),
            RequestKind::GetSchemas => self.metadata_result(request, "TABLE_SCHEM", json!([["PUBLIC"]])),
            RequestKind::GetTables => self.metadata_result(request, "TABLE_NAME", json!([["test"]])),
            RequestKind::GetColumns => self.metadata_result(
                request,
                "COLUMN_NAME",
                json!([["id"], ["name"], ["money"]]),
            ),
            RequestKind::GetTableTypes => {
                self.metadata_result(request, "TABLE_TYPE", json!([["TABLE"], ["VIEW"]]))
            }
            _ => json!({"response": request["request"]}),
        }
    }
}

#[async_trait]
impl RpcChannel for MockAvatica {
    async fn post(&self, request: Value) -> Result<Value> {
        let name = request["request"].as_str().unwrap_or_default().to_string();
        self.requests.lock().unwrap().push(request.clone());

        if RequestKind::of(&request) == Some(RequestKind::Fetch) {
            let delay = *self.fetch_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }

        if let Some(message) = self.failures.lock().unwrap().get(&name).cloned() {
            return Err(AvaticaError::Server {
                status: 500,
                message,
            });
        }

        if let Some(response) = self.overrides.lock().unwrap().get(&name).cloned() {
            return Ok(response);
        }

        Ok(self.handle(&request))
    }
}

pub fn factory_for(mock: &Arc<MockAvatica>) -> ConnectionFactory {
    ConnectionFactory::builder("http://localhost:8765/")
        .channel(mock.clone())
        .build()
        .expect("factory should build")
}

/// Lets spawned close-statement notifications run.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
