//! Import functionality
//!
//! Provides parsers for reading schema descriptions into a [`SchemaModel`]:
//! - JSON
//! - XML
//!
//! Both parsers reduce their input to the format-neutral [`TableData`]
//! records below and hand them to [`build_model`], so relationship
//! classification, join-table marking and name validation behave identically
//! for every format.

pub mod json;
pub mod xml;

use crate::models::{Column, Relationship, RelationshipKind, SchemaModel, Table};
use crate::validation::TableValidator;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use json::JsonParser;
pub use xml::XmlParser;

/// Error raised when a schema cannot be parsed
///
/// Parsing is all-or-nothing: a partial model is never returned.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SchemaParsingError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SchemaParsingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// No parser is registered for the requested format key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported schema format: {0}")]
pub struct UnsupportedFormatError(pub String);

/// Parses the raw bytes of one input format into a schema model
pub trait SchemaParser: Send + Sync {
    fn format(&self) -> SchemaFormat;

    fn parse(&self, bytes: &[u8]) -> Result<SchemaModel, SchemaParsingError>;
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaFormat {
    Json,
    Xml,
}

impl SchemaFormat {
    pub fn all() -> Vec<Self> {
        vec![Self::Json, Self::Xml]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Derive the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, UnsupportedFormatError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| UnsupportedFormatError(path.display().to_string()))?;
        extension.parse()
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaFormat {
    type Err = UnsupportedFormatError;

    /// Accepts a file extension (with or without the leading dot) or a
    /// content type; content-type parameters such as `; charset=utf-8` are
    /// ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.split(';').next().unwrap_or_default().trim().to_lowercase();
        match key.trim_start_matches('.') {
            "json" | "application/json" | "text/json" => Ok(Self::Json),
            "xml" | "application/xml" | "text/xml" => Ok(Self::Xml),
            _ => Err(UnsupportedFormatError(s.trim().to_string())),
        }
    }
}

static PARSERS: Lazy<HashMap<SchemaFormat, Box<dyn SchemaParser>>> = Lazy::new(|| {
    let parsers: Vec<Box<dyn SchemaParser>> = vec![Box::new(JsonParser::new()), Box::new(XmlParser::new())];
    parsers.into_iter().map(|p| (p.format(), p)).collect()
});

/// Look up the parser registered for a format key (extension or content type)
pub fn select_parser(key: &str) -> Result<&'static dyn SchemaParser, UnsupportedFormatError> {
    tracing::debug!("Requesting parser for format: {}", key);
    let format: SchemaFormat = key.parse()?;
    PARSERS
        .get(&format)
        .map(|p| p.as_ref())
        .ok_or_else(|| UnsupportedFormatError(key.to_string()))
}

/// Table data from import
#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<ColumnData>,
    pub relationships: Vec<RelationshipData>,
    /// Explicit join-table marker from the source
    pub join_table: bool,
}

/// Column data from import
#[derive(Debug, Clone, Default)]
pub struct ColumnData {
    pub name: String,
    pub data_type: String,
    pub primary_key: bool,
    pub auto_increment: bool,
}

/// Relationship data from import, before classification
#[derive(Debug, Clone, Default)]
pub struct RelationshipData {
    /// Explicit relationship kind, if the source declared one
    pub kind: Option<String>,
    pub related_table: String,
    pub foreign_key: String,
    /// Defaults to `foreign_key` when absent
    pub related_foreign_key: Option<String>,
    pub through_table: Option<String>,
    /// Junction marker: the association is realized through a join table
    pub junction: bool,
}

/// Build a schema model from format-neutral table records.
///
/// Classifies every relationship, rejects empty or duplicate names and marks
/// the tables that relationships name as their through-table.
pub fn build_model(tables: Vec<TableData>) -> Result<SchemaModel, SchemaParsingError> {
    let mut built = Vec::with_capacity(tables.len());
    for data in tables {
        built.push(build_table(data)?);
    }

    TableValidator::new()
        .validate_all(&built)
        .map_err(|e| SchemaParsingError::with_source(format!("Invalid schema: {}", e), e))?;

    let mut model = SchemaModel::new();
    for table in built {
        model
            .add_table(table)
            .map_err(|e| SchemaParsingError::with_source(format!("Invalid schema: {}", e), e))?;
    }
    model.mark_through_tables();
    Ok(model)
}

fn build_table(data: TableData) -> Result<Table, SchemaParsingError> {
    let mut table = Table::new(data.name.trim()).with_join_table(data.join_table);
    for column in data.columns {
        table.columns.push(
            Column::new(column.name.trim(), column.data_type.trim())
                .with_primary_key(column.primary_key)
                .with_auto_increment(column.auto_increment),
        );
    }
    for relationship in data.relationships {
        let relationship = classify(relationship, &table.name)?;
        tracing::debug!(
            "Added relationship: {} with table: {} and foreignKey: {} to table: {}",
            relationship.kind,
            relationship.related_table,
            relationship.foreign_key,
            table.name
        );
        table.relationships.push(relationship);
    }
    Ok(table)
}

/// Decide the relationship kind.
///
/// An explicit kind wins; otherwise a through-table or junction marker means
/// many-to-many and a plain key pair means one-to-many.
fn classify(data: RelationshipData, table: &str) -> Result<Relationship, SchemaParsingError> {
    let related_table = required(&data.related_table, "related table", table)?;
    let foreign_key = required(&data.foreign_key, "foreign key", table)?;
    let related_foreign_key = non_empty(data.related_foreign_key).unwrap_or_else(|| foreign_key.clone());
    let through_table = non_empty(data.through_table);

    let kind = match non_empty(data.kind) {
        Some(kind) => kind.parse::<RelationshipKind>().map_err(|e| {
            SchemaParsingError::new(format!("Invalid relationship in table '{}': {}", table, e))
        })?,
        None if through_table.is_some() || data.junction => RelationshipKind::ManyToMany,
        None => RelationshipKind::OneToMany,
    };

    if kind == RelationshipKind::OneToMany && through_table.is_some() {
        return Err(SchemaParsingError::new(format!(
            "Invalid relationship in table '{}': one-to-many relationship to '{}' cannot name a through-table",
            table, related_table
        )));
    }

    Ok(Relationship {
        kind,
        related_table,
        foreign_key,
        related_foreign_key,
        through_table,
    })
}

fn required(value: &str, field: &str, table: &str) -> Result<String, SchemaParsingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SchemaParsingError::new(format!(
            "Missing {} in relationships of table: {}",
            field, table
        )));
    }
    Ok(value.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Interpret a textual flag. `None` means the text is not a recognized boolean.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
