//! Wire protocol definitions for the Avatica JSON endpoint
//!
//! Requests are flat JSON objects discriminated by their `request` field.
//! Responses are decoded per request kind; execute-style responses go through
//! [`ResponseShape::classify`] first.

pub mod filter;
pub mod request;
pub mod response;
pub mod types;

pub use filter::{FilterPayload, MetadataFilter};
pub use request::{Request, RequestKind};
pub use response::{
    BatchResponse, CreateStatementResponse, DatabasePropertyResponse, ExecuteResult,
    FetchResponse, Frame, PrepareResponse, ResponseShape, Signature,
};
pub use types::{AvaticaType, ColumnMetaData, ConnectionInfo, StatementHandle};
