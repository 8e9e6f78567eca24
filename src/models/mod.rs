//! Schema models
//!
//! Defines the format-agnostic schema representation shared by every parser
//! and generator.

pub mod column;
pub mod relationship;
pub mod schema_model;
pub mod table;

pub use column::Column;
pub use relationship::{Relationship, RelationshipKind};
pub use schema_model::SchemaModel;
pub use table::Table;

/// Error raised by the model editing API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),
    #[error("Table '{0}' not found")]
    TableNotFound(String),
    #[error("Column '{column}' already exists in table '{table}'")]
    DuplicateColumn { table: String, column: String },
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },
    #[error("No relationship from '{table}' to '{related_table}'")]
    RelationshipNotFound { table: String, related_table: String },
}
