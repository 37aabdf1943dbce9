use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::params::Rep;

/// Reads an explicit JSON `null` as the field's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Server-side handle of a prepared statement, echoed back verbatim on `execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementHandle {
    pub connection_id: String,
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Credentials sent with `openConnection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// SQL type as described by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvaticaType {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep: Option<String>,
}

impl AvaticaType {
    /// The column's representation as a parameter tag, when it is one of the
    /// bindable reps. Structured reps such as `ARRAY` or `OBJECT` yield `None`.
    pub fn parameter_rep(&self) -> Option<Rep> {
        self.rep.as_deref().and_then(Rep::from_wire_name)
    }
}

/// Metadata of one result column. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetaData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ordinal: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub column_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_class_name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<AvaticaType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
