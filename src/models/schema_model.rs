//! Schema model - the root aggregate produced by a parser

use super::column::Column;
use super::relationship::Relationship;
use super::table::Table;
use super::ModelError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Format-agnostic, parsed representation of a schema file
///
/// Tables keep parse order. Table names are unique within a model; every
/// mutation path goes through methods that enforce this.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaModel {
    tables: Vec<Table>,
    /// Source file, kept for diagnostics only
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn set_source(&mut self, source: impl Into<PathBuf>) {
        self.source = Some(source.into());
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    /// Tables explicitly marked as, or referenced as, join tables
    pub fn join_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| t.is_join_table())
    }

    /// Same tables, columns, flags and relationships, ignoring where the model came from.
    pub fn same_structure(&self, other: &SchemaModel) -> bool {
        self.tables == other.tables
    }

    pub fn add_table(&mut self, table: Table) -> Result<(), ModelError> {
        if self.table(&table.name).is_some() {
            return Err(ModelError::DuplicateTable(table.name));
        }
        tracing::debug!(table = %table.name, columns = table.columns.len(), "table added to schema model");
        self.tables.push(table);
        Ok(())
    }

    pub fn remove_table(&mut self, name: &str) -> Result<Table, ModelError> {
        let position = self
            .tables
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| ModelError::TableNotFound(name.to_string()))?;
        Ok(self.tables.remove(position))
    }

    /// Rename a table and rewrite every relationship that refers to it.
    pub fn rename_table(&mut self, old_name: &str, new_name: &str) -> Result<(), ModelError> {
        if old_name == new_name {
            return Ok(());
        }
        if self.table(new_name).is_some() {
            return Err(ModelError::DuplicateTable(new_name.to_string()));
        }
        let table = self
            .table_mut(old_name)
            .ok_or_else(|| ModelError::TableNotFound(old_name.to_string()))?;
        table.name = new_name.to_string();

        for relationship in self.tables.iter_mut().flat_map(|t| t.relationships.iter_mut()) {
            if relationship.related_table == old_name {
                relationship.related_table = new_name.to_string();
            }
            if relationship.through_table.as_deref() == Some(old_name) {
                relationship.through_table = Some(new_name.to_string());
            }
        }
        tracing::info!("Table name changed from {} to {}", old_name, new_name);
        Ok(())
    }

    pub fn add_column(&mut self, table_name: &str, column: Column) -> Result<(), ModelError> {
        let table = self.existing_table_mut(table_name)?;
        if table.has_column(&column.name) {
            return Err(ModelError::DuplicateColumn {
                table: table_name.to_string(),
                column: column.name,
            });
        }
        table.columns.push(column);
        Ok(())
    }

    pub fn remove_column(&mut self, table_name: &str, column_name: &str) -> Result<Column, ModelError> {
        let table = self.existing_table_mut(table_name)?;
        let position = table
            .columns
            .iter()
            .position(|c| c.name == column_name)
            .ok_or_else(|| ModelError::ColumnNotFound {
                table: table_name.to_string(),
                column: column_name.to_string(),
            })?;
        Ok(table.columns.remove(position))
    }

    /// Replace a column in place, keeping its position in the declaration order.
    pub fn replace_column(
        &mut self,
        table_name: &str,
        column_name: &str,
        column: Column,
    ) -> Result<Column, ModelError> {
        let table = self.existing_table_mut(table_name)?;
        if column.name != column_name && table.has_column(&column.name) {
            return Err(ModelError::DuplicateColumn {
                table: table_name.to_string(),
                column: column.name,
            });
        }
        let slot = table
            .columns
            .iter_mut()
            .find(|c| c.name == column_name)
            .ok_or_else(|| ModelError::ColumnNotFound {
                table: table_name.to_string(),
                column: column_name.to_string(),
            })?;
        Ok(std::mem::replace(slot, column))
    }

    pub fn add_relationship(
        &mut self,
        table_name: &str,
        relationship: Relationship,
    ) -> Result<(), ModelError> {
        let table = self.existing_table_mut(table_name)?;
        table.relationships.push(relationship);
        self.mark_through_tables();
        Ok(())
    }

    /// Remove every relationship from `table_name` to `related_table`,
    /// returning how many were removed.
    pub fn remove_relationships(
        &mut self,
        table_name: &str,
        related_table: &str,
    ) -> Result<usize, ModelError> {
        let table = self.existing_table_mut(table_name)?;
        let before = table.relationships.len();
        table.relationships.retain(|r| r.related_table != related_table);
        let removed = before - table.relationships.len();
        if removed == 0 {
            return Err(ModelError::RelationshipNotFound {
                table: table_name.to_string(),
                related_table: related_table.to_string(),
            });
        }
        Ok(removed)
    }

    /// Replace the first relationship from `table_name` to `related_table`.
    pub fn replace_relationship(
        &mut self,
        table_name: &str,
        related_table: &str,
        relationship: Relationship,
    ) -> Result<Relationship, ModelError> {
        let table = self.existing_table_mut(table_name)?;
        let slot = table
            .relationships
            .iter_mut()
            .find(|r| r.related_table == related_table)
            .ok_or_else(|| ModelError::RelationshipNotFound {
                table: table_name.to_string(),
                related_table: related_table.to_string(),
            })?;
        let previous = std::mem::replace(slot, relationship);
        self.mark_through_tables();
        Ok(previous)
    }

    /// Flag every table that some relationship names as its through-table.
    pub(crate) fn mark_through_tables(&mut self) {
        let through: Vec<String> = self
            .tables
            .iter()
            .flat_map(|t| t.relationships.iter())
            .filter_map(|r| r.through_table.clone())
            .collect();
        for table in self.tables.iter_mut() {
            if !table.join_table && through.contains(&table.name) {
                table.join_table = true;
                tracing::debug!("Marked table {} as a join table.", table.name);
            }
        }
    }

    fn existing_table_mut(&mut self, name: &str) -> Result<&mut Table, ModelError> {
        self.table_mut(name)
            .ok_or_else(|| ModelError::TableNotFound(name.to_string()))
    }
}
