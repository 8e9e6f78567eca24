//! Validation functionality
//!
//! Provides validation logic for:
//! - Table validation (empty names, naming conflicts, duplicate columns)
//! - Relationship resolution (unknown tables and columns, join-table
//!   synthesis, dependency ordering and cycles)

pub mod relationships;
pub mod tables;

pub use relationships::{ForeignKey, RelationshipResolver, ResolvedSchema, UnresolvedRelationshipError};
pub use tables::{NamingConflict, TableValidationError, TableValidator};
