use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::builder::ConnectionFactoryBuilder;
use super::connection::Connection;
use super::RpcChannel;
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::protocol::{ConnectionInfo, Request};

pub const DEFAULT_CLIENT_LABEL: &str = "rust-client";

/// Opens connections against one Avatica endpoint.
///
/// The factory and every connection it opens share a single channel.
pub struct ConnectionFactory {
    channel: Arc<dyn RpcChannel>,
    info: ConnectionInfo,
    config: ConnectionConfig,
    client_label: String,
}

impl ConnectionFactory {
    /// Factory for `url` with optional credentials and default limits.
    pub fn new(url: &str, user: Option<&str>, password: Option<&str>) -> Result<Self> {
        let mut builder = ConnectionFactoryBuilder::new(url);
        if let Some(user) = user {
            builder = builder.user(user);
        }
        if let Some(password) = password {
            builder = builder.password(password);
        }
        builder.build()
    }

    pub fn builder(url: &str) -> ConnectionFactoryBuilder {
        ConnectionFactoryBuilder::new(url)
    }

    pub(crate) fn from_parts(
        channel: Arc<dyn RpcChannel>,
        info: ConnectionInfo,
        config: ConnectionConfig,
        client_label: String,
    ) -> Self {
        Self {
            channel,
            info,
            config,
            client_label,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Identifier for a new connection: a time-ordered UUID plus the client label.
    pub fn next_connection_id(&self) -> String {
        format!("{}@{}", Uuid::now_v7(), self.client_label)
    }

    /// Opens a new server-side connection.
    ///
    /// The returned connection should be closed with
    /// [`Connection::close`] once it is no longer needed.
    pub async fn connect(&self) -> Result<Connection> {
        let connection_id = self.next_connection_id();
        let conn = Connection::new(connection_id.clone(), Arc::clone(&self.channel), self.config);

        let op = conn.begin("connect")?;
        conn.send(
            &op,
            Request::OpenConnection {
                connection_id,
                info: self.info.clone(),
            },
        )
        .await?;

        tracing::info!(connection_id = %conn.id(), "Opened Avatica connection");
        Ok(conn)
    }
}

impl fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("user", &self.info.user)
            .field("config", &self.config)
            .field("client_label", &self.client_label)
            .finish()
    }
}
