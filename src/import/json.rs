//! JSON schema parser
//!
//! The root is either an array of tables or an object with a `tables` array:
//!
//! ```json
//! [
//!   {
//!     "tableName": "order",
//!     "columns": [
//!       { "name": "id", "type": "INT", "primaryKey": true },
//!       { "name": "customer_id", "type": "INT" }
//!     ],
//!     "relationships": [
//!       { "relationshipType": "one-to-many", "relatedTable": "customer",
//!         "foreignKey": "customer_id", "relatedForeignKey": "id" }
//!     ]
//!   }
//! ]
//! ```

use super::{
    ColumnData, RelationshipData, SchemaFormat, SchemaParser, SchemaParsingError, TableData,
    build_model, parse_flag,
};
use crate::models::SchemaModel;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parser for JSON schema files
#[derive(Debug, Default)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaParser for JsonParser {
    fn format(&self) -> SchemaFormat {
        SchemaFormat::Json
    }

    fn parse(&self, bytes: &[u8]) -> Result<SchemaModel, SchemaParsingError> {
        tracing::info!("Starting JSON schema parsing ({} bytes)", bytes.len());

        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let root: Value = serde_json::from_slice(bytes)
            .map_err(|e| SchemaParsingError::with_source("Error reading the JSON schema", e))?;

        let entries = match root {
            Value::Array(entries) => entries,
            Value::Object(mut object) => match object.remove("tables") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(root_error()),
            },
            _ => return Err(root_error()),
        };

        let mut tables = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let label = entry
                .get("tableName")
                .or_else(|| entry.get("name"))
                .and_then(Value::as_str)
                .map(|name| format!("table '{}'", name))
                .unwrap_or_else(|| format!("table #{}", index + 1));
            let table: JsonTable = serde_json::from_value(entry).map_err(|e| {
                SchemaParsingError::with_source(format!("Invalid JSON format in {}: {}", label, e), e)
            })?;
            tracing::debug!("Table {} has {} columns.", table.table_name, table.columns.len());
            tables.push(table.into());
        }

        let model = build_model(tables)?;
        tracing::info!("JSON schema parsing completed with {} tables", model.len());
        Ok(model)
    }
}

fn root_error() -> SchemaParsingError {
    SchemaParsingError::new("Invalid JSON format: Root node must be an array of tables.")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonTable {
    #[serde(alias = "name")]
    table_name: String,
    columns: Vec<JsonColumn>,
    #[serde(default)]
    relationships: Option<Vec<JsonRelationship>>,
    #[serde(default, alias = "isJoinTable", deserialize_with = "flag")]
    join_table: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonColumn {
    name: String,
    #[serde(rename = "type", alias = "dataType")]
    data_type: String,
    #[serde(default, alias = "primary_key", deserialize_with = "flag")]
    primary_key: bool,
    #[serde(default, alias = "auto_increment", deserialize_with = "flag")]
    auto_increment: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonRelationship {
    #[serde(default, alias = "kind", alias = "type")]
    relationship_type: Option<String>,
    related_table: String,
    foreign_key: String,
    #[serde(default)]
    related_foreign_key: Option<String>,
    #[serde(default)]
    through_table: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    junction: bool,
}

impl From<JsonTable> for TableData {
    fn from(table: JsonTable) -> Self {
        TableData {
            name: table.table_name,
            columns: table
                .columns
                .into_iter()
                .map(|c| ColumnData {
                    name: c.name,
                    data_type: c.data_type,
                    primary_key: c.primary_key,
                    auto_increment: c.auto_increment,
                })
                .collect(),
            relationships: table
                .relationships
                .unwrap_or_default()
                .into_iter()
                .map(|r| RelationshipData {
                    kind: r.relationship_type,
                    related_table: r.related_table,
                    foreign_key: r.foreign_key,
                    related_foreign_key: r.related_foreign_key,
                    through_table: r.through_table,
                    junction: r.junction,
                })
                .collect(),
            join_table: table.join_table,
        }
    }
}

/// Flags accept JSON booleans, 0/1, null and the usual textual spellings.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(value) => Ok(value),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(D::Error::custom(format!("invalid boolean flag: {}", n))),
        },
        Value::String(s) => {
            parse_flag(&s).ok_or_else(|| D::Error::custom(format!("invalid boolean flag: \"{}\"", s)))
        }
        other => Err(D::Error::custom(format!("invalid boolean flag: {}", other))),
    }
}
