//! Export functionality
//!
//! Provides generators that turn a [`SchemaModel`] into a DDL script:
//! - generic SQL
//! - Oracle
//! - PostgreSQL
//! - MySQL
//!
//! and a JSON exporter for saving the model itself.

pub mod dialect;
pub mod json;
pub mod sql;
pub mod types;

use crate::models::SchemaModel;
use crate::validation::UnresolvedRelationshipError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub use dialect::{GenericDialect, MySqlDialect, OracleDialect, PostgresDialect, SqlDialect};
pub use json::JsonSchemaExporter;
pub use sql::SqlGenerator;
pub use types::{LogicalType, TypeKind};

/// Error during script generation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    UnresolvedRelationship(#[from] UnresolvedRelationshipError),
    #[error("Column '{column}' in table '{table}' has type '{type_name}', which has no {dialect} mapping")]
    UnmappedType {
        table: String,
        column: String,
        type_name: String,
        dialect: DialectKind,
    },
    #[error("Table '{0}' has no columns")]
    EmptyTable(String),
    #[error("Table name cannot be empty")]
    EmptyTableName,
}

/// No generator is registered for the requested dialect key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported SQL dialect: {0}")]
pub struct UnsupportedDialectError(pub String);

/// Generates a DDL script from a schema model
pub trait SchemaGenerator: Send + Sync {
    fn kind(&self) -> DialectKind;

    fn generate(&self, model: &SchemaModel) -> Result<String, GenerationError>;
}

/// Supported target dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Generic,
    Oracle,
    Postgres,
    MySql,
}

impl DialectKind {
    pub fn all() -> Vec<Self> {
        vec![Self::Generic, Self::Oracle, Self::Postgres, Self::MySql]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Oracle => "oracle",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
        }
    }

    /// Alternative keys accepted for this dialect
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Generic => &["sql", "ansi"],
            Self::Oracle => &[],
            Self::Postgres => &["postgresql", "pg"],
            Self::MySql => &["mariadb"],
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = UnsupportedDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|d| d.name() == key || d.aliases().contains(&key.as_str()))
            .ok_or_else(|| UnsupportedDialectError(s.trim().to_string()))
    }
}

static GENERATORS: Lazy<HashMap<DialectKind, Box<dyn SchemaGenerator>>> = Lazy::new(|| {
    let generators: Vec<Box<dyn SchemaGenerator>> = vec![
        Box::new(SqlGenerator::new(GenericDialect)),
        Box::new(SqlGenerator::new(OracleDialect)),
        Box::new(SqlGenerator::new(PostgresDialect)),
        Box::new(SqlGenerator::new(MySqlDialect)),
    ];
    generators.into_iter().map(|g| (g.kind(), g)).collect()
});

/// Look up the generator registered for a dialect key
pub fn select_generator(key: &str) -> Result<&'static dyn SchemaGenerator, UnsupportedDialectError> {
    tracing::debug!("Requesting generator for dialect: {}", key);
    let dialect: DialectKind = key.parse()?;
    GENERATORS
        .get(&dialect)
        .map(|g| g.as_ref())
        .ok_or_else(|| UnsupportedDialectError(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_keys() {
        assert_eq!("generic".parse(), Ok(DialectKind::Generic));
        assert_eq!("SQL".parse(), Ok(DialectKind::Generic));
        assert_eq!(" Oracle ".parse(), Ok(DialectKind::Oracle));
        assert_eq!("postgresql".parse(), Ok(DialectKind::Postgres));
        assert_eq!("pg".parse(), Ok(DialectKind::Postgres));
        assert_eq!("mariadb".parse(), Ok(DialectKind::MySql));
        assert_eq!(
            "db2".parse::<DialectKind>(),
            Err(UnsupportedDialectError("db2".to_string()))
        );
    }

    #[test]
    fn test_select_generator() {
        for dialect in DialectKind::all() {
            assert_eq!(select_generator(dialect.name()).unwrap().kind(), dialect);
        }
        let err = select_generator("sybase").err().unwrap();
        assert_eq!(err.to_string(), "Unsupported SQL dialect: sybase");
    }
}
