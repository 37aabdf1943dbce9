//! Result Normalizer: turns any execute-style response into one [`ResultSet`].

use serde_json::Value;

use super::connection::{Connection, Operation};
use super::frames::FrameReader;
use crate::error::Result;
use crate::protocol::{ExecuteResult, ResponseShape};
use crate::result::{ResultSet, QUERY_UPDATE_COUNT};

/// Classifies `payload` and materializes its first logical result.
///
/// Row-returning results are paged in through the [`FrameReader`]; later
/// results of a multi-result response are dropped.
pub(crate) async fn normalize(conn: &Connection, op: &Operation, payload: Value) -> Result<ResultSet> {
    let shape = ResponseShape::classify(payload)?;
    tracing::debug!(
        connection_id = %conn.id(),
        operation = op.name,
        shape = shape.kind(),
        "Normalizing response"
    );

    match shape {
        ResponseShape::Batch(batch) => Ok(ResultSet::batch(batch.update_counts)),
        ResponseShape::Results(results) => {
            let first = results.into_iter().next().unwrap_or_default();
            normalize_result(conn, op, first).await
        }
        ResponseShape::Single(result) => normalize_result(conn, op, result).await,
    }
}

async fn normalize_result(conn: &Connection, op: &Operation, result: ExecuteResult) -> Result<ResultSet> {
    let columns = result.columns();

    if let Some(first_frame) = result.first_frame {
        let acc = ResultSet::new(
            columns,
            Vec::new(),
            result.update_count.unwrap_or(QUERY_UPDATE_COUNT),
        );
        return FrameReader::new(conn, op, result.statement_id)
            .read(first_frame, acc)
            .await;
    }

    match result.update_count {
        Some(count) if count != 0 => Ok(ResultSet::update_only(count)),
        _ => Ok(ResultSet::empty()),
    }
}
