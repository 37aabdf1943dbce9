use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::time::Instant;

use super::normalize::normalize;
use super::RpcChannel;
use crate::config::ConnectionConfig;
use crate::error::{AvaticaError, Result};
use crate::protocol::response::decode;
use crate::protocol::{DatabasePropertyResponse, MetadataFilter, Request};
use crate::result::ResultSet;

/// One public call on a connection, with the deadline shared by all of its
/// round trips.
pub(crate) struct Operation {
    pub(crate) name: &'static str,
    deadline: Option<Instant>,
}

/// A logical connection to an Avatica server.
///
/// Created by [`ConnectionFactory::connect`](super::ConnectionFactory::connect).
/// All methods take `&self`; independent statements may run concurrently on
/// the same connection, with no ordering between them. Once [`close`] has been
/// called every further call fails with [`AvaticaError::ConnectionClosed`]
/// without reaching the server.
///
/// [`close`]: Connection::close
pub struct Connection {
    id: String,
    pub(crate) channel: Arc<dyn RpcChannel>,
    config: ConnectionConfig,
    closed: AtomicBool,
}

impl Connection {
    pub(crate) fn new(id: String, channel: Arc<dyn RpcChannel>, config: ConnectionConfig) -> Self {
        Self {
            id,
            channel,
            config,
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn begin(&self, name: &'static str) -> Result<Operation> {
        if self.is_closed() {
            return Err(AvaticaError::ConnectionClosed(self.id.clone()));
        }
        Ok(Operation {
            name,
            deadline: self.config.timeout.map(|t| Instant::now() + t),
        })
    }

    /// Posts one request, bounded by the operation's deadline.
    pub(crate) async fn send(&self, op: &Operation, request: Request) -> Result<Value> {
        tracing::debug!(
            connection_id = %self.id,
            operation = op.name,
            request = request.name(),
            "Sending Avatica request"
        );

        let payload = serde_json::to_value(&request)?;
        let call = self.channel.post(payload);

        match op.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .map_err(|_| AvaticaError::Timeout {
                    operation: op.name.to_string(),
                    after: self.config.timeout.unwrap_or_default(),
                })?,
            None => call.await,
        }
    }

    async fn search(&self, op: &Operation, request: Request) -> Result<ResultSet> {
        let payload = self.send(op, request).await?;
        normalize(self, op, payload).await
    }

    /// Server and driver properties, keyed by property name.
    pub async fn db_info(&self) -> Result<Map<String, Value>> {
        let op = self.begin("db_info")?;
        let payload = self
            .send(
                &op,
                Request::DatabaseProperties {
                    connection_id: self.id.clone(),
                },
            )
            .await?;
        let properties: DatabasePropertyResponse = decode(payload, "database properties")?;
        Ok(properties.map)
    }

    pub async fn table_types(&self) -> Result<ResultSet> {
        let op = self.begin("table_types")?;
        self.search(
            &op,
            Request::GetTableTypes {
                connection_id: self.id.clone(),
            },
        )
        .await
    }

    pub async fn catalogs(&self) -> Result<ResultSet> {
        let op = self.begin("catalogs")?;
        self.search(
            &op,
            Request::GetCatalogs {
                connection_id: self.id.clone(),
            },
        )
        .await
    }

    /// Schemas matching the filter's catalog and schema pattern.
    pub async fn schemas(&self, filter: &MetadataFilter) -> Result<ResultSet> {
        let op = self.begin("schemas")?;
        let payload = filter.to_payload(&self.id).for_schemas();
        self.search(&op, Request::GetSchemas(payload)).await
    }

    /// Tables matching the filter's catalog, schema and table patterns.
    pub async fn tables(&self, filter: &MetadataFilter) -> Result<ResultSet> {
        let op = self.begin("tables")?;
        let payload = filter.to_payload(&self.id).for_tables();
        self.search(&op, Request::GetTables(payload)).await
    }

    pub async fn columns(&self, filter: &MetadataFilter) -> Result<ResultSet> {
        let op = self.begin("columns")?;
        let payload = filter.to_payload(&self.id);
        self.search(&op, Request::GetColumns(payload)).await
    }

    /// Commits the current transaction. The server reply is not inspected.
    pub async fn commit(&self) -> Result<ResultSet> {
        let op = self.begin("commit")?;
        self.send(
            &op,
            Request::Commit {
                connection_id: self.id.clone(),
            },
        )
        .await?;
        Ok(ResultSet::empty())
    }

    /// Rolls back the current transaction. The server reply is not inspected.
    pub async fn rollback(&self) -> Result<ResultSet> {
        let op = self.begin("rollback")?;
        self.send(
            &op,
            Request::Rollback {
                connection_id: self.id.clone(),
            },
        )
        .await?;
        Ok(ResultSet::empty())
    }

    /// Releases the connection on the server.
    ///
    /// The connection is marked closed before the request is sent, so it stays
    /// unusable even if the server call fails.
    pub async fn close(&self) -> Result<()> {
        let op = self.begin("close")?;
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(AvaticaError::ConnectionClosed(self.id.clone()));
        }

        self.send(
            &op,
            Request::CloseConnection {
                connection_id: self.id.clone(),
            },
        )
        .await?;

        tracing::info!(connection_id = %self.id, "Closed Avatica connection");
        Ok(())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if !self.is_closed() {
            tracing::debug!(connection_id = %self.id, "Connection dropped without close()");
        }
    }
}
