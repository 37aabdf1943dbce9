//! Avatica Rust Client
//!
//! Async client for SQL servers speaking the Avatica JSON-over-HTTP protocol
//! (Apache Calcite and compatible servers).
//!
//! # Example
//!
//! ```rust,no_run
//! use avatica_client::{params, ConnectionFactory, StatementParameter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), avatica_client::AvaticaError> {
//!     let factory = ConnectionFactory::builder("http://localhost:8765/")
//!         .auth("sa", "")
//!         .max_frame_size(500)
//!         .build()?;
//!
//!     let conn = factory.connect().await?;
//!
//!     let rs = conn.query("select * from test").await?;
//!     println!("{} rows", rs.row_count());
//!
//!     let rs = conn
//!         .execute(
//!             "select * from test where name = ?",
//!             params![StatementParameter::str("Test Name")],
//!         )
//!         .await?;
//!     println!("{:?}", rs.rows);
//!
//!     let rs = conn
//!         .batch([
//!             "INSERT INTO test (id, name, money) VALUES (2, 'a', 1.0)",
//!             "INSERT INTO test (id, name, money) VALUES (3, 'b', 2.0)",
//!         ])
//!         .await?;
//!     println!("Update counts: {:?}", rs.update_counts);
//!
//!     conn.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! Operations never retry. A failed call leaves the connection open; callers
//! close it on their error paths. Set a timeout with
//! [`ConnectionFactoryBuilder::timeout_ms`] to bound every operation,
//! including long pagination loops, or drop the future to abandon it.

pub mod client;
pub mod config;
pub mod error;
pub mod params;
pub mod protocol;
pub mod result;

pub use client::{
    Connection, ConnectionFactory, ConnectionFactoryBuilder, HttpChannel, RpcChannel,
};
pub use config::ConnectionConfig;
pub use error::{AvaticaError, Result};
pub use params::{Parameters, Rep, StatementParameter};
pub use protocol::{ColumnMetaData, MetadataFilter};
pub use result::ResultSet;
