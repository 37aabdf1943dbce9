//! Frame Reader: pulls every page of an executed statement.
//!
//! Pagination is positional. After each non-final frame the offset advances by
//! the number of rows just received and the next page is requested with
//! `fetch`. Pages are fetched strictly one after another. When the final frame
//! arrives the statement is closed in the background; that notification is
//! best-effort and its failure only logged.

use std::sync::Arc;

use super::connection::{Connection, Operation};
use super::RpcChannel;
use crate::error::{AvaticaError, Result};
use crate::protocol::response::decode;
use crate::protocol::{FetchResponse, Frame, Request};
use crate::result::ResultSet;

pub(crate) struct FrameReader<'a> {
    conn: &'a Connection,
    op: &'a Operation,
    statement_id: Option<u32>,
}

impl<'a> FrameReader<'a> {
    pub(crate) fn new(conn: &'a Connection, op: &'a Operation, statement_id: Option<u32>) -> Self {
        Self {
            conn,
            op,
            statement_id,
        }
    }

    /// Appends `first` and all following pages to `acc`.
    ///
    /// Transport failures abort the loop immediately; the statement is then
    /// left open on the server.
    pub(crate) async fn read(self, first: Frame, mut acc: ResultSet) -> Result<ResultSet> {
        let mut frame = first;
        let mut offset: u64 = 0;

        loop {
            tracing::trace!(
                connection_id = %self.conn.id(),
                statement_id = ?self.statement_id,
                offset,
                rows = frame.rows.len(),
                done = frame.done,
                "Received frame"
            );

            let received = frame.rows.len() as u64;
            acc.rows.extend(frame.rows);

            if frame.done {
                self.close_statement();
                return Ok(acc);
            }

            let statement_id = self.statement_id.ok_or_else(|| {
                AvaticaError::Protocol(
                    "Result has more frames but no statementId to fetch them with".to_string(),
                )
            })?;

            offset += received;
            let payload = self
                .conn
                .send(
                    self.op,
                    Request::Fetch {
                        connection_id: self.conn.id().to_string(),
                        statement_id,
                        offset,
                        fetch_max_row_count: self.conn.config().max_frame_size,
                    },
                )
                .await?;
            frame = decode::<FetchResponse>(payload, "fetch response")?.frame;
        }
    }

    fn close_statement(&self) {
        let Some(statement_id) = self.statement_id else {
            tracing::debug!(
                connection_id = %self.conn.id(),
                "Result carried no statementId; nothing to close"
            );
            return;
        };
        close_statement_in_background(
            Arc::clone(&self.conn.channel),
            self.conn.id().to_string(),
            statement_id,
        );
    }
}

/// Sends `closeStatement` without waiting for the reply.
pub(crate) fn close_statement_in_background(
    channel: Arc<dyn RpcChannel>,
    connection_id: String,
    statement_id: u32,
) {
    let request = Request::CloseStatement {
        connection_id: connection_id.clone(),
        statement_id,
    };
    let payload = match serde_json::to_value(&request) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(%connection_id, statement_id, error = %e, "Failed to encode closeStatement");
            return;
        }
    };

    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        tracing::warn!(
            %connection_id,
            statement_id,
            "No tokio runtime available; statement left open"
        );
        return;
    };

    runtime.spawn(async move {
        if let Err(e) = channel.post(payload).await {
            tracing::warn!(%connection_id, statement_id, error = %e, "Failed to close statement");
        }
    });
}
