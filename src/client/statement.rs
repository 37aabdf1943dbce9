use std::sync::Arc;

use super::connection::{Connection, Operation};
use super::frames::close_statement_in_background;
use super::normalize::normalize;
use crate::error::{AvaticaError, Result};
use crate::params::Parameters;
use crate::protocol::response::decode;
use crate::protocol::{CreateStatementResponse, PrepareResponse, Request, ResponseShape};
use crate::result::ResultSet;

impl Connection {
    async fn create_statement(&self, op: &Operation) -> Result<u32> {
        let payload = self
            .send(
                op,
                Request::CreateStatement {
                    connection_id: self.id().to_string(),
                },
            )
            .await?;
        let created: CreateStatementResponse = decode(payload, "createStatement response")?;
        Ok(created.statement_id)
    }

    /// Runs a SQL string directly and returns every row it produces.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example(conn: &avatica_client::Connection) -> avatica_client::Result<()> {
    /// let rs = conn.query("select * from test").await?;
    /// for row in &rs.rows {
    ///     println!("{:?}", row);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn query(&self, sql: &str) -> Result<ResultSet> {
        let op = self.begin("query")?;
        let statement_id = self.create_statement(&op).await?;
        let config = *self.config();

        let payload = self
            .send(
                &op,
                Request::PrepareAndExecute {
                    connection_id: self.id().to_string(),
                    statement_id,
                    sql: sql.to_string(),
                    max_rows_in_first_frame: config.max_frame_size,
                    max_row_count: config.max_row_count,
                },
            )
            .await?;
        normalize(self, &op, payload).await
    }

    /// Prepares `sql` and executes it with positional parameters.
    ///
    /// `params` accepts a `Vec`, an array, a single parameter, `()` or the
    /// output of [`params!`](crate::params). An empty list is sent when there
    /// are no parameters.
    ///
    /// ```rust,no_run
    /// # async fn example(conn: &avatica_client::Connection) -> avatica_client::Result<()> {
    /// use avatica_client::{params, StatementParameter};
    ///
    /// let rs = conn
    ///     .execute(
    ///         "select * from test where name = ? and id > ?",
    ///         params![StatementParameter::str("Test Name"), StatementParameter::int(0)],
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(&self, sql: &str, params: impl Into<Parameters>) -> Result<ResultSet> {
        let op = self.begin("execute")?;
        let parameter_values = params.into().into_vec();
        let max_row_count = self.config().max_row_count;

        let payload = self
            .send(
                &op,
                Request::Prepare {
                    connection_id: self.id().to_string(),
                    sql: sql.to_string(),
                    max_row_count,
                },
            )
            .await?;
        let prepared: PrepareResponse = decode(payload, "prepare response")?;

        let payload = self
            .send(
                &op,
                Request::Execute {
                    statement_handle: prepared.statement,
                    parameter_values,
                    max_row_count,
                },
            )
            .await?;
        normalize(self, &op, payload).await
    }

    /// Executes several update statements in one round trip.
    ///
    /// The returned set has no rows; `update_counts` holds one entry per
    /// command, in submission order. Row-returning statements are not
    /// supported here by the server.
    pub async fn batch<I, S>(&self, sqls: I) -> Result<ResultSet>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let op = self.begin("batch")?;
        let sql_commands: Vec<String> = sqls.into_iter().map(Into::into).collect();
        let statement_id = self.create_statement(&op).await?;

        let payload = self
            .send(
                &op,
                Request::PrepareAndExecuteBatch {
                    connection_id: self.id().to_string(),
                    statement_id,
                    sql_commands,
                },
            )
            .await?;

        match ResponseShape::classify(payload)? {
            ResponseShape::Batch(batch) => {
                close_statement_in_background(
                    Arc::clone(&self.channel),
                    self.id().to_string(),
                    statement_id,
                );
                Ok(ResultSet::batch(batch.update_counts))
            }
            other => Err(AvaticaError::Protocol(format!(
                "Expected updateCounts from prepareAndExecuteBatch, got a {} response",
                other.kind()
            ))),
        }
    }
}
