use std::sync::Arc;
use std::time::Duration;

use super::factory::{ConnectionFactory, DEFAULT_CLIENT_LABEL};
use super::{HttpChannel, RpcChannel};
use crate::config::{env_var, ConnectionConfig};
use crate::error::{AvaticaError, Result};
use crate::protocol::ConnectionInfo;

pub struct ConnectionFactoryBuilder {
    url: String,
    info: ConnectionInfo,
    config: ConnectionConfig,
    client_label: String,
    channel: Option<Arc<dyn RpcChannel>>,
}

impl ConnectionFactoryBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            info: ConnectionInfo::default(),
            config: ConnectionConfig::default(),
            client_label: DEFAULT_CLIENT_LABEL.to_string(),
            channel: None,
        }
    }

    /// Builder seeded from `AVATICA_*` environment variables.
    ///
    /// `AVATICA_URL` is required. `AVATICA_USER`, `AVATICA_PASSWORD`,
    /// `AVATICA_MAX_FRAME_SIZE`, `AVATICA_MAX_ROW_COUNT` and
    /// `AVATICA_TIMEOUT_MS` are optional.
    pub fn from_env() -> Result<Self> {
        let url: String = env_var("AVATICA_URL")?
            .ok_or_else(|| AvaticaError::Config("AVATICA_URL is not set".to_string()))?;

        let mut builder = Self::new(&url);
        if let Some(user) = env_var::<String>("AVATICA_USER")? {
            builder = builder.user(&user);
        }
        if let Some(password) = env_var::<String>("AVATICA_PASSWORD")? {
            builder = builder.password(&password);
        }
        if let Some(rows) = env_var("AVATICA_MAX_FRAME_SIZE")? {
            builder = builder.max_frame_size(rows);
        }
        if let Some(rows) = env_var("AVATICA_MAX_ROW_COUNT")? {
            builder = builder.max_row_count(rows);
        }
        if let Some(ms) = env_var("AVATICA_TIMEOUT_MS")? {
            builder = builder.timeout_ms(ms);
        }
        Ok(builder)
    }

    pub fn auth(self, user: &str, password: &str) -> Self {
        self.user(user).password(password)
    }

    pub fn user(mut self, user: &str) -> Self {
        self.info.user = Some(user.to_string());
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.info.password = Some(password.to_string());
        self
    }

    pub fn max_frame_size(mut self, rows: u32) -> Self {
        self.config.max_frame_size = rows;
        self
    }

    pub fn max_row_count(mut self, rows: i64) -> Self {
        self.config.max_row_count = rows;
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout = Some(Duration::from_millis(ms));
        self
    }

    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Host label appended to generated connection ids.
    pub fn client_label(mut self, label: &str) -> Self {
        self.client_label = label.to_string();
        self
    }

    /// Uses a custom transport instead of HTTP. The URL is then ignored.
    pub fn channel(mut self, channel: Arc<dyn RpcChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn build(self) -> Result<ConnectionFactory> {
        self.config.validate()?;
        if self.client_label.trim().is_empty() {
            return Err(AvaticaError::Config(
                "client label must not be empty".to_string(),
            ));
        }

        let channel: Arc<dyn RpcChannel> = match self.channel {
            Some(channel) => channel,
            None => Arc::new(HttpChannel::new(&self.url)?),
        };

        Ok(ConnectionFactory::from_parts(
            channel,
            self.info,
            self.config,
            self.client_label,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let factory = ConnectionFactoryBuilder::new("http://localhost:8765/")
            .build()
            .unwrap();
        assert_eq!(factory.config(), &ConnectionConfig::default());
        assert!(factory.next_connection_id().ends_with("@rust-client"));
    }

    #[test]
    fn test_builder_chained() {
        let factory = ConnectionFactoryBuilder::new("http://127.0.0.1:8765")
            .auth("sa", "secret")
            .max_frame_size(10)
            .max_row_count(500)
            .timeout_ms(2500)
            .client_label("batch-host")
            .build()
            .unwrap();
        let config = factory.config();
        assert_eq!(config.max_frame_size, 10);
        assert_eq!(config.max_row_count, 500);
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
        assert!(factory.next_connection_id().ends_with("@batch-host"));
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        assert!(ConnectionFactoryBuilder::new("http://localhost:8765/")
            .max_frame_size(0)
            .build()
            .is_err());
        assert!(ConnectionFactoryBuilder::new("localhost:8765")
            .build()
            .is_err());
        assert!(ConnectionFactoryBuilder::new("http://localhost:8765/")
            .client_label(" ")
            .build()
            .is_err());
    }

    #[test]
    fn test_connection_ids_are_unique() {
        let factory = ConnectionFactoryBuilder::new("http://localhost:8765/")
            .build()
            .unwrap();
        let first = factory.next_connection_id();
        let second = factory.next_connection_id();
        assert_ne!(first, second);
    }
}
