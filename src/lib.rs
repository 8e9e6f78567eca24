//! schema2script - SQL DDL generation from portable schema descriptions
//!
//! Provides unified interfaces for:
//! - Parsing XML and JSON schema files into a format-agnostic model
//! - Relationship resolution and join-table synthesis
//! - Dependency-ordered DDL generation per SQL dialect
//! - Model editing and JSON export
//!
//! # Example
//!
//! ```rust
//! use schema2script::{select_generator, select_parser};
//!
//! let xml = br#"<schema>
//!   <table name="employee">
//!     <column name="id" type="INT" primary-key="true"/>
//!     <column name="name" type="VARCHAR(100)"/>
//!   </table>
//! </schema>"#;
//!
//! let model = select_parser("xml").unwrap().parse(xml).unwrap();
//! let script = select_generator("generic").unwrap().generate(&model).unwrap();
//! assert_eq!(
//!     script,
//!     "CREATE TABLE employee (\n    id INT,\n    name VARCHAR(100),\n    PRIMARY KEY (id)\n);\n\n"
//! );
//! ```

pub mod cli;
pub mod export;
pub mod import;
pub mod models;
pub mod pipeline;
pub mod validation;

pub use export::{
    DialectKind, GenerationError, JsonSchemaExporter, SchemaGenerator, SqlGenerator,
    UnsupportedDialectError, select_generator,
};
pub use import::{
    JsonParser, SchemaFormat, SchemaParser, SchemaParsingError, UnsupportedFormatError, XmlParser,
    select_parser,
};
pub use models::{Column, ModelError, Relationship, RelationshipKind, SchemaModel, Table};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineOutput, generate_script};
pub use validation::{
    ForeignKey, RelationshipResolver, ResolvedSchema, TableValidationError, UnresolvedRelationshipError,
};
