//! Table validation functionality
//!
//! Validates table and column naming: empty names, duplicate table names
//! within a schema, duplicate column names within a table.

use crate::models::Table;
use std::collections::HashSet;

/// Naming conflict between two tables with the same name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConflict {
    pub name: String,
    /// Declaration index of the first table using the name
    pub first_index: usize,
    /// Declaration index of the table that repeats it
    pub duplicate_index: usize,
}

/// Error during table validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableValidationError {
    #[error("Table name cannot be empty")]
    EmptyTableName,
    #[error("Column name cannot be empty in table '{0}'")]
    EmptyColumnName(String),
    #[error("Column '{column}' in table '{table}' has an empty type")]
    EmptyColumnType { table: String, column: String },
    #[error("Duplicate table name '{}' (tables {} and {})", .0.name, .0.first_index + 1, .0.duplicate_index + 1)]
    DuplicateTable(NamingConflict),
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
}

/// Table validator
#[derive(Debug, Default)]
pub struct TableValidator;

impl TableValidator {
    pub fn new() -> Self {
        Self
    }

    /// Detect tables that reuse a name already taken earlier in the list.
    pub fn detect_naming_conflicts(&self, tables: &[Table]) -> Vec<NamingConflict> {
        let mut conflicts = Vec::new();
        for (index, table) in tables.iter().enumerate() {
            if let Some(first_index) = tables[..index].iter().position(|t| t.name == table.name) {
                conflicts.push(NamingConflict {
                    name: table.name.clone(),
                    first_index,
                    duplicate_index: index,
                });
            }
        }
        conflicts
    }

    /// Check a single table: non-empty names and types, unique column names.
    pub fn validate_table(&self, table: &Table) -> Result<(), TableValidationError> {
        if table.name.trim().is_empty() {
            return Err(TableValidationError::EmptyTableName);
        }

        let mut seen = HashSet::new();
        for column in &table.columns {
            if column.name.trim().is_empty() {
                return Err(TableValidationError::EmptyColumnName(table.name.clone()));
            }
            if column.data_type.trim().is_empty() {
                return Err(TableValidationError::EmptyColumnType {
                    table: table.name.clone(),
                    column: column.name.clone(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(TableValidationError::DuplicateColumn {
                    table: table.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate every table, then the uniqueness of names across the schema.
    pub fn validate_all(&self, tables: &[Table]) -> Result<(), TableValidationError> {
        for table in tables {
            self.validate_table(table)?;
        }
        match self.detect_naming_conflicts(tables).into_iter().next() {
            Some(conflict) => Err(TableValidationError::DuplicateTable(conflict)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    #[test]
    fn test_detect_naming_conflicts() {
        let tables = vec![
            Table::new("users"),
            Table::new("orders"),
            Table::new("users"),
        ];
        let conflicts = TableValidator::new().detect_naming_conflicts(&tables);
        assert_eq!(
            conflicts,
            vec![NamingConflict {
                name: "users".to_string(),
                first_index: 0,
                duplicate_index: 2,
            }]
        );
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let table = Table::new("users")
            .with_column(Column::new("id", "INT"))
            .with_column(Column::new("id", "BIGINT"));
        let err = TableValidator::new().validate_table(&table).unwrap_err();
        assert_eq!(
            err,
            TableValidationError::DuplicateColumn {
                table: "users".to_string(),
                column: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_names_rejected() {
        let validator = TableValidator::new();
        assert_eq!(
            validator.validate_table(&Table::new("  ")),
            Err(TableValidationError::EmptyTableName)
        );
        let table = Table::new("t").with_column(Column::new("", "INT"));
        assert!(matches!(
            validator.validate_table(&table),
            Err(TableValidationError::EmptyColumnName(_))
        ));
        let table = Table::new("t").with_column(Column::new("c", " "));
        assert!(matches!(
            validator.validate_table(&table),
            Err(TableValidationError::EmptyColumnType { .. })
        ));
    }

    #[test]
    fn test_validate_all_reports_first_conflict() {
        let tables = vec![
            Table::new("a").with_column(Column::new("id", "INT")),
            Table::new("a").with_column(Column::new("id", "INT")),
        ];
        let err = TableValidator::new().validate_all(&tables).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate table name 'a' (tables 1 and 2)");
    }
}
