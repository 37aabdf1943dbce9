use serde::{Deserialize, Serialize};

use super::filter::FilterPayload;
use super::types::{ConnectionInfo, StatementHandle};
use crate::params::StatementParameter;

/// Every request understood by an Avatica JSON endpoint.
///
/// Serializes to a flat object whose `request` field names the operation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "request", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    OpenConnection {
        connection_id: String,
        info: ConnectionInfo,
    },
    CloseConnection {
        connection_id: String,
    },
    CreateStatement {
        connection_id: String,
    },
    CloseStatement {
        connection_id: String,
        statement_id: u32,
    },
    PrepareAndExecute {
        connection_id: String,
        statement_id: u32,
        sql: String,
        max_rows_in_first_frame: u32,
        max_row_count: i64,
    },
    Prepare {
        connection_id: String,
        sql: String,
        max_row_count: i64,
    },
    Execute {
        statement_handle: StatementHandle,
        parameter_values: Vec<StatementParameter>,
        max_row_count: i64,
    },
    PrepareAndExecuteBatch {
        connection_id: String,
        statement_id: u32,
        sql_commands: Vec<String>,
    },
    Fetch {
        connection_id: String,
        statement_id: u32,
        offset: u64,
        fetch_max_row_count: u32,
    },
    Commit {
        connection_id: String,
    },
    Rollback {
        connection_id: String,
    },
    DatabaseProperties {
        connection_id: String,
    },
    GetCatalogs {
        connection_id: String,
    },
    GetSchemas(FilterPayload),
    GetTables(FilterPayload),
    GetColumns(FilterPayload),
    GetTableTypes {
        connection_id: String,
    },
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::OpenConnection { .. } => RequestKind::OpenConnection,
            Request::CloseConnection { .. } => RequestKind::CloseConnection,
            Request::CreateStatement { .. } => RequestKind::CreateStatement,
            Request::CloseStatement { .. } => RequestKind::CloseStatement,
            Request::PrepareAndExecute { .. } => RequestKind::PrepareAndExecute,
            Request::Prepare { .. } => RequestKind::Prepare,
            Request::Execute { .. } => RequestKind::Execute,
            Request::PrepareAndExecuteBatch { .. } => RequestKind::PrepareAndExecuteBatch,
            Request::Fetch { .. } => RequestKind::Fetch,
            Request::Commit { .. } => RequestKind::Commit,
            Request::Rollback { .. } => RequestKind::Rollback,
            Request::DatabaseProperties { .. } => RequestKind::DatabaseProperties,
            Request::GetCatalogs { .. } => RequestKind::GetCatalogs,
            Request::GetSchemas(_) => RequestKind::GetSchemas,
            Request::GetTables(_) => RequestKind::GetTables,
            Request::GetColumns(_) => RequestKind::GetColumns,
            Request::GetTableTypes { .. } => RequestKind::GetTableTypes,
        }
    }

    /// The wire discriminator, used for logging and error context.
    pub fn name(&self) -> &'static str {
        self.kind().wire_name()
    }
}

/// Discriminator of a request, without its payload.
///
/// Also usable on the receiving side: [`RequestKind::of`] reads the kind of an
/// already encoded request, as a server or a test double would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestKind {
    OpenConnection,
    CloseConnection,
    CreateStatement,
    CloseStatement,
    PrepareAndExecute,
    Prepare,
    Execute,
    PrepareAndExecuteBatch,
    Fetch,
    Commit,
    Rollback,
    DatabaseProperties,
    GetCatalogs,
    GetSchemas,
    GetTables,
    GetColumns,
    GetTableTypes,
}

impl RequestKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            RequestKind::OpenConnection => "openConnection",
            RequestKind::CloseConnection => "closeConnection",
            RequestKind::CreateStatement => "createStatement",
            RequestKind::CloseStatement => "closeStatement",
            RequestKind::PrepareAndExecute => "prepareAndExecute",
            RequestKind::Prepare => "prepare",
            RequestKind::Execute => "execute",
            RequestKind::PrepareAndExecuteBatch => "prepareAndExecuteBatch",
            RequestKind::Fetch => "fetch",
            RequestKind::Commit => "commit",
            RequestKind::Rollback => "rollback",
            RequestKind::DatabaseProperties => "databaseProperties",
            RequestKind::GetCatalogs => "getCatalogs",
            RequestKind::GetSchemas => "getSchemas",
            RequestKind::GetTables => "getTables",
            RequestKind::GetColumns => "getColumns",
            RequestKind::GetTableTypes => "getTableTypes",
        }
    }

    /// Reads the `request` discriminator of an encoded request.
    pub fn of(payload: &serde_json::Value) -> Option<Self> {
        payload
            .get("request")
            .cloned()
            .and_then(|name| serde_json::from_value(name).ok())
    }
}
