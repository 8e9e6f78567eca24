//! XML schema parser
//!
//! ```xml
//! <schema>
//!   <table name="order">
//!     <column name="id" type="INT" primary-key="true"/>
//!     <column name="customer_id" type="INT"/>
//!     <relationship related-table="customer" foreign-key="customer_id" related-foreign-key="id"/>
//!   </table>
//! </schema>
//! ```
//!
//! Attribute names are compared case-insensitively with `-` and `_` ignored,
//! so `primary-key`, `primary_key` and `primaryKey` all name the same flag.

use super::{
    ColumnData, RelationshipData, SchemaFormat, SchemaParser, SchemaParsingError, TableData,
    build_model, parse_flag,
};
use crate::models::SchemaModel;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use std::collections::HashMap;

/// Parser for XML schema files
#[derive(Debug, Default)]
pub struct XmlParser;

impl XmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaParser for XmlParser {
    fn format(&self) -> SchemaFormat {
        SchemaFormat::Xml
    }

    fn parse(&self, bytes: &[u8]) -> Result<SchemaModel, SchemaParsingError> {
        tracing::info!("Starting XML schema parsing ({} bytes)", bytes.len());

        let text = std::str::from_utf8(bytes)
            .map_err(|e| SchemaParsingError::with_source("Error reading the XML schema: input is not valid UTF-8", e))?;
        let tables = read_tables(text.trim_start_matches('\u{feff}'))?;

        let model = build_model(tables)?;
        tracing::info!("XML schema parsing completed with {} tables", model.len());
        Ok(model)
    }
}

fn read_tables(xml: &str) -> Result<Vec<TableData>, SchemaParsingError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut tables = Vec::new();
    let mut current: Option<TableData> = None;
    let mut root: Option<String> = None;
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            SchemaParsingError::with_source(
                format!("Malformed XML at position {}: {}", reader.error_position(), e),
                e,
            )
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = element_name(e);

                if root.is_none() {
                    tracing::debug!("XML schema root element: <{}>", name);
                    root = Some(name);
                    if !is_empty {
                        depth += 1;
                    }
                    continue;
                }
                if depth == 0 {
                    return Err(SchemaParsingError::new(format!(
                        "Invalid XML format: <{}> found after the root element",
                        name
                    )));
                }

                match name.as_str() {
                    "table" => {
                        if let Some(open) = &current {
                            return Err(SchemaParsingError::new(format!(
                                "Invalid XML format: nested <table> inside table '{}'",
                                open.name
                            )));
                        }
                        let table = read_table(e)?;
                        if is_empty {
                            tables.push(table);
                        } else {
                            current = Some(table);
                        }
                    }
                    "column" => {
                        let table = open_table(&mut current, "column")?;
                        let column = read_column(e, &table.name)?;
                        tracing::debug!(
                            "Added column: {} with type: {} to table: {}",
                            column.name,
                            column.data_type,
                            table.name
                        );
                        table.columns.push(column);
                    }
                    "relationship" => {
                        let table = open_table(&mut current, "relationship")?;
                        let relationship = read_relationship(e, &table.name)?;
                        table.relationships.push(relationship);
                    }
                    "tables" | "columns" | "relationships" => {}
                    other => {
                        tracing::warn!("Skipping unknown XML element <{}>", other);
                        if !is_empty {
                            let end = e.name().as_ref().to_vec();
                            reader.read_to_end(QName(&end)).map_err(|err| {
                                SchemaParsingError::with_source(
                                    format!("Malformed XML inside <{}>: {}", other, err),
                                    err,
                                )
                            })?;
                        }
                        continue;
                    }
                }
                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                if local_name(e.local_name().as_ref()) == "table" {
                    if let Some(table) = current.take() {
                        tracing::debug!("Table {} has {} columns.", table.name, table.columns.len());
                        tables.push(table);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if root.is_none() {
        return Err(SchemaParsingError::new("Invalid XML format: document has no root element"));
    }
    if let Some(table) = current {
        return Err(SchemaParsingError::new(format!(
            "Invalid XML format: table '{}' is not terminated",
            table.name
        )));
    }
    if depth > 0 {
        return Err(SchemaParsingError::new("Invalid XML format: unexpected end of document"));
    }
    Ok(tables)
}

fn open_table<'a>(
    current: &'a mut Option<TableData>,
    element: &str,
) -> Result<&'a mut TableData, SchemaParsingError> {
    current.as_mut().ok_or_else(|| {
        SchemaParsingError::new(format!(
            "Invalid XML format: <{}> must appear inside a <table>",
            element
        ))
    })
}

fn read_table(e: &BytesStart) -> Result<TableData, SchemaParsingError> {
    let attrs = Attributes::read(e, "table")?;
    let name = attrs.required(&["name", "tablename"], "table", None)?;
    Ok(TableData {
        join_table: attrs.flag(&["jointable", "isjointable"], "table")?,
        name,
        ..TableData::default()
    })
}

fn read_column(e: &BytesStart, table: &str) -> Result<ColumnData, SchemaParsingError> {
    let attrs = Attributes::read(e, "column")?;
    Ok(ColumnData {
        name: attrs.required(&["name"], "column", Some(table))?,
        data_type: attrs.required(&["type", "datatype"], "column", Some(table))?,
        primary_key: attrs.flag(&["primarykey"], "column")?,
        auto_increment: attrs.flag(&["autoincrement"], "column")?,
    })
}

fn read_relationship(e: &BytesStart, table: &str) -> Result<RelationshipData, SchemaParsingError> {
    let attrs = Attributes::read(e, "relationship")?;
    Ok(RelationshipData {
        kind: attrs.optional(&["type", "kind", "relationshiptype"]),
        related_table: attrs.required(&["relatedtable"], "relationship", Some(table))?,
        foreign_key: attrs.required(&["foreignkey"], "relationship", Some(table))?,
        related_foreign_key: attrs.optional(&["relatedforeignkey"]),
        through_table: attrs.optional(&["throughtable"]),
        junction: attrs.flag(&["junction"], "relationship")?,
    })
}

/// Attributes of one element, keyed by normalized name
struct Attributes(HashMap<String, String>);

impl Attributes {
    fn read(e: &BytesStart, element: &str) -> Result<Self, SchemaParsingError> {
        let mut values = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| {
                SchemaParsingError::with_source(format!("Malformed attribute on <{}>: {}", element, err), err)
            })?;
            let value = attr.unescape_value().map_err(|err| {
                SchemaParsingError::with_source(format!("Malformed attribute on <{}>: {}", element, err), err)
            })?;
            values.insert(normalize_key(attr.key.local_name().as_ref()), value.into_owned());
        }
        Ok(Self(values))
    }

    fn get(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.0.get(*k)).map(String::as_str)
    }

    fn optional(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).map(str::to_string)
    }

    fn required(&self, keys: &[&str], element: &str, table: Option<&str>) -> Result<String, SchemaParsingError> {
        match self.get(keys) {
            Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
            _ => Err(SchemaParsingError::new(match table {
                Some(table) => format!(
                    "Missing attribute '{}' on <{}> in table: {}",
                    keys[0], element, table
                ),
                None => format!("Missing attribute '{}' on <{}>", keys[0], element),
            })),
        }
    }

    /// Present-but-empty counts as set.
    fn flag(&self, keys: &[&str], element: &str) -> Result<bool, SchemaParsingError> {
        match self.get(keys) {
            None => Ok(false),
            Some(value) if value.trim().is_empty() => Ok(true),
            Some(value) => parse_flag(value).ok_or_else(|| {
                SchemaParsingError::new(format!(
                    "Invalid boolean value '{}' for attribute '{}' on <{}>",
                    value, keys[0], element
                ))
            }),
        }
    }
}

fn element_name(e: &BytesStart) -> String {
    local_name(e.local_name().as_ref())
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_lowercase()
}

fn normalize_key(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
