//! Metadata search filters.
//!
//! A filter is sparse: fields left unset are omitted from the request, never
//! replaced by wildcards.

use serde::{Deserialize, Serialize};

/// Optional patterns for catalog, schema, table and column searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: Option<String>,
    pub column: Option<String>,
}

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(mut self, catalog: &str) -> Self {
        self.catalog = Some(catalog.to_string());
        self
    }

    pub fn schema(mut self, pattern: &str) -> Self {
        self.schema = Some(pattern.to_string());
        self
    }

    pub fn table(mut self, pattern: &str) -> Self {
        self.table = Some(pattern.to_string());
        self
    }

    pub fn column(mut self, pattern: &str) -> Self {
        self.column = Some(pattern.to_string());
        self
    }

    /// Builds the request fields for this filter. Only present fields are copied.
    pub fn to_payload(&self, connection_id: &str) -> FilterPayload {
        FilterPayload {
            connection_id: connection_id.to_string(),
            catalog: self.catalog.clone(),
            schema_pattern: self.schema.clone(),
            table_name_pattern: self.table.clone(),
            column_name_pattern: self.column.clone(),
        }
    }
}

/// Wire fields of a metadata request, minus the `request` discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPayload {
    pub connection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name_pattern: Option<String>,
}

impl FilterPayload {
    /// `getSchemas` accepts catalog and schema pattern only.
    pub fn for_schemas(mut self) -> Self {
        self.table_name_pattern = None;
        self.column_name_pattern = None;
        self
    }

    /// `getTables` accepts everything but the column pattern.
    pub fn for_tables(mut self) -> Self {
        self.column_name_pattern = None;
        self
    }
}
