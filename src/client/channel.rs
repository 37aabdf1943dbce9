use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Opaque request/response transport to an Avatica endpoint.
///
/// One call posts one JSON request and yields the decoded JSON reply. A channel
/// is shared by every connection and statement created from the same factory,
/// so implementations must be safe to call concurrently.
#[async_trait]
pub trait RpcChannel: Send + Sync {
    async fn post(&self, request: Value) -> Result<Value>;
}
