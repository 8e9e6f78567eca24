//! SQL DDL generator
//!
//! One generator serves every dialect: it resolves relationships, orders the
//! tables and lays out the statements, asking its [`SqlDialect`] only for
//! identifier quoting, type names and the few clauses that differ.
//!
//! ```text
//! CREATE TABLE employee (
//!     id INT,
//!     name VARCHAR(100),
//!     PRIMARY KEY (id)
//! );
//! ```
//!
//! Foreign keys that close a cycle cannot be declared inline; they follow all
//! `CREATE TABLE` statements as `ALTER TABLE ... ADD FOREIGN KEY`.

use super::dialect::SqlDialect;
use super::{DialectKind, GenerationError, SchemaGenerator};
use crate::models::{Column, SchemaModel, Table};
use crate::validation::{ForeignKey, RelationshipResolver};
use std::collections::HashSet;

const INDENT: &str = "    ";

/// DDL generator for one dialect
#[derive(Debug, Default, Clone)]
pub struct SqlGenerator<D> {
    dialect: D,
}

impl<D: SqlDialect> SqlGenerator<D> {
    pub fn new(dialect: D) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    fn create_table(
        &self,
        table: &Table,
        keys: &[ForeignKey],
        names: &mut ConstraintNames,
    ) -> Result<String, GenerationError> {
        if table.name.trim().is_empty() {
            return Err(GenerationError::EmptyTableName);
        }
        if table.columns.is_empty() {
            return Err(GenerationError::EmptyTable(table.name.clone()));
        }

        let mut lines = Vec::with_capacity(table.columns.len() + keys.len() + 1);
        for column in &table.columns {
            lines.push(self.column_definition(table, column)?);
        }

        let primary: Vec<&Column> = table.primary_key_columns().collect();
        if !primary.is_empty() {
            let columns = self.column_list(primary.iter().map(|c| c.name.as_str()));
            if self.dialect.names_constraints() {
                let name = names.claim(format!("pk_{}", table.name));
                lines.push(format!(
                    "CONSTRAINT {} PRIMARY KEY ({})",
                    self.dialect.quote_identifier(&name),
                    columns
                ));
            } else {
                lines.push(format!("PRIMARY KEY ({})", columns));
            }
        }

        for key in keys {
            lines.push(self.foreign_key_clause(key, names));
        }

        let mut sql = format!("CREATE TABLE {} (\n", self.dialect.quote_identifier(&table.name));
        for (i, line) in lines.iter().enumerate() {
            sql.push_str(INDENT);
            sql.push_str(line);
            if i + 1 < lines.len() {
                sql.push(',');
            }
            sql.push('\n');
        }
        sql.push_str(");\n\n");
        Ok(sql)
    }

    fn column_definition(&self, table: &Table, column: &Column) -> Result<String, GenerationError> {
        let native = self
            .dialect
            .map_type(&column.data_type)
            .ok_or_else(|| GenerationError::UnmappedType {
                table: table.name.clone(),
                column: column.name.clone(),
                type_name: column.data_type.clone(),
                dialect: self.dialect.kind(),
            })?;

        let mut definition = format!("{} {}", self.dialect.quote_identifier(&column.name), native);
        if column.auto_increment {
            definition.push(' ');
            definition.push_str(self.dialect.identity_clause());
        }
        Ok(definition)
    }

    fn foreign_key_clause(&self, key: &ForeignKey, names: &mut ConstraintNames) -> String {
        let clause = format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            self.dialect.quote_identifier(&key.column),
            self.dialect.quote_identifier(&key.referenced_table),
            self.dialect.quote_identifier(&key.referenced_column)
        );
        if self.dialect.names_constraints() {
            let name = names.claim(format!("fk_{}_{}", key.table, key.referenced_table));
            format!("CONSTRAINT {} {}", self.dialect.quote_identifier(&name), clause)
        } else {
            clause
        }
    }

    fn alter_table(&self, key: &ForeignKey, names: &mut ConstraintNames) -> String {
        format!(
            "ALTER TABLE {} ADD {};\n\n",
            self.dialect.quote_identifier(&key.table),
            self.foreign_key_clause(key, names)
        )
    }

    fn column_list<'c>(&self, columns: impl Iterator<Item = &'c str>) -> String {
        columns
            .map(|c| self.dialect.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<D: SqlDialect> SchemaGenerator for SqlGenerator<D> {
    fn kind(&self) -> DialectKind {
        self.dialect.kind()
    }

    fn generate(&self, model: &SchemaModel) -> Result<String, GenerationError> {
        tracing::info!(
            "Generating {} script for {} tables",
            self.dialect.kind(),
            model.len()
        );

        let resolved = RelationshipResolver::new(model).resolve()?;
        let mut names = ConstraintNames::default();
        let mut script = String::new();

        for (table, keys) in resolved.ordered_tables() {
            tracing::debug!(
                "Creating table {} with {} columns and {} foreign keys",
                table.name,
                table.columns.len(),
                keys.len()
            );
            script.push_str(&self.create_table(table, keys, &mut names)?);
        }
        for key in resolved.deferred_foreign_keys() {
            tracing::debug!(
                "Adding foreign key {}.{} -> {}.{} after table creation",
                key.table,
                key.column,
                key.referenced_table,
                key.referenced_column
            );
            script.push_str(&self.alter_table(key, &mut names));
        }
        if let Some(footer) = self.dialect.script_footer() {
            script.push_str(footer);
        }

        tracing::info!("Generated {} statements", resolved.len() + resolved.deferred_foreign_keys().len());
        Ok(script)
    }
}

/// Constraint names already used in the script
#[derive(Default)]
struct ConstraintNames(HashSet<String>);

impl ConstraintNames {
    /// Claim `base`, or `base_2`, `base_3`, ... when it is taken.
    fn claim(&mut self, base: String) -> String {
        let mut name = base.clone();
        let mut n = 2;
        while self.0.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        self.0.insert(name.clone());
        name
    }
}
