//! JSON exporter
//!
//! Writes a [`SchemaModel`] back out in the JSON input format, so an edited
//! model can be saved and parsed again.

use crate::models::SchemaModel;

/// Exporter for the JSON schema format
#[derive(Debug, Default)]
pub struct JsonSchemaExporter;

impl JsonSchemaExporter {
    pub fn new() -> Self {
        Self
    }

    /// Pretty-printed array of tables
    pub fn export(&self, model: &SchemaModel) -> Result<String, serde_json::Error> {
        tracing::debug!("Exporting {} tables as JSON", model.len());
        let mut json = serde_json::to_string_pretty(model.tables())?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{JsonParser, SchemaParser};
    use crate::models::{Column, Relationship, Table};

    #[test]
    fn test_export_shape() {
        let mut model = SchemaModel::new();
        model
            .add_table(
                Table::new("order")
                    .with_column(Column::primary("id", "INT"))
                    .with_column(Column::new("customer_id", "INT"))
                    .with_relationship(Relationship::one_to_many("customer", "customer_id", "id")),
            )
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&JsonSchemaExporter::new().export(&model).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "tableName": "order",
                "columns": [
                    { "name": "id", "type": "INT", "primaryKey": true },
                    { "name": "customer_id", "type": "INT" }
                ],
                "relationships": [{
                    "relationshipType": "one-to-many",
                    "relatedTable": "customer",
                    "foreignKey": "customer_id",
                    "relatedForeignKey": "id"
                }]
            }])
        );
    }

    #[test]
    fn test_edited_model_reparses() {
        let mut model = JsonParser::new()
            .parse(br#"[{"tableName": "t", "columns": [{"name": "id", "type": "INT", "primaryKey": true}]},
                        {"tableName": "u", "columns": [{"name": "t_id", "type": "INT"}]}]"#)
            .unwrap();
        model.add_column("t", Column::new("label", "VARCHAR(20)")).unwrap();
        model
            .add_relationship("u", Relationship::one_to_many("t", "t_id", "id"))
            .unwrap();

        let saved = JsonSchemaExporter::new().export(&model).unwrap();
        let reparsed = JsonParser::new().parse(saved.as_bytes()).unwrap();
        assert!(reparsed.same_structure(&model));
    }
}
