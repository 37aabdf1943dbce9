use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use super::RpcChannel;
use crate::error::{AvaticaError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_MAX_IDLE_PER_HOST: usize = 16;

/// `RpcChannel` posting JSON to a single Avatica HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpChannel {
    url: String,
    client: reqwest::Client,
}

impl HttpChannel {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(url)
            .map_err(|e| AvaticaError::Config(format!("Invalid endpoint URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AvaticaError::Config(format!(
                "Unsupported URL scheme '{}' in '{}'",
                parsed.scheme(),
                url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .default_headers(headers)
            .build()
            .map_err(|e| AvaticaError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RpcChannel for HttpChannel {
    async fn post(&self, request: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AvaticaError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AvaticaError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(AvaticaError::from_error_body(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            AvaticaError::Protocol(format!("Failed to parse response: {} - Text: {}", e, text))
        })
    }
}
