use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{null_as_default, ColumnMetaData, StatementHandle};
use crate::error::{AvaticaError, Result};

/// One page of rows plus the completion flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<ColumnMetaData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

/// One logical result of an execute-style request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_frame: Option<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_count: Option<i64>,
}

impl ExecuteResult {
    pub fn columns(&self) -> Vec<ColumnMetaData> {
        self.signature
            .as_ref()
            .map(|s| s.columns.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ResultsEnvelope {
    results: Vec<ExecuteResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_id: Option<u32>,
    pub update_counts: Vec<i64>,
}

/// The shapes an execute-style response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Per-statement update counts of a batch.
    Batch(BatchResponse),
    /// A `results` envelope with at least one entry.
    Results(Vec<ExecuteResult>),
    /// Result fields at the top level, no envelope.
    Single(ExecuteResult),
}

impl ResponseShape {
    /// Decides the shape of a raw payload, then decodes it as that shape.
    ///
    /// A payload whose `results` list is empty is read as a single result made
    /// of its own top-level fields.
    pub fn classify(payload: Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(AvaticaError::Protocol(format!(
                "Expected a JSON object response, got: {}",
                payload
            )));
        }

        let has_update_counts = payload
            .get("updateCounts")
            .map(Value::is_array)
            .unwrap_or(false);
        let has_results = payload
            .get("results")
            .and_then(Value::as_array)
            .map(|results| !results.is_empty())
            .unwrap_or(false);

        if has_update_counts {
            let batch = decode::<BatchResponse>(payload, "batch response")?;
            Ok(ResponseShape::Batch(batch))
        } else if has_results {
            let envelope = decode::<ResultsEnvelope>(payload, "results envelope")?;
            Ok(ResponseShape::Results(envelope.results))
        } else {
            let single = decode::<ExecuteResult>(payload, "execute result")?;
            Ok(ResponseShape::Single(single))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResponseShape::Batch(_) => "batch",
            ResponseShape::Results(_) => "results",
            ResponseShape::Single(_) => "single",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStatementResponse {
    pub statement_id: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrepareResponse {
    pub statement: StatementHandle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchResponse {
    pub frame: Frame,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabasePropertyResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub map: Map<String, Value>,
}

/// Decodes a typed response, reporting failures as protocol errors.
pub(crate) fn decode<T>(payload: Value, what: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(payload)
        .map_err(|e| AvaticaError::Protocol(format!("Invalid {}: {}", what, e)))
}
