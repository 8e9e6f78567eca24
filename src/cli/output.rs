//! Output formatting for CLI

use crate::export::DialectKind;
use crate::import::SchemaFormat;
use crate::models::SchemaModel;

/// Summary of a parsed model, one block per table
pub fn format_model(model: &SchemaModel) -> String {
    let mut output = String::new();

    match model.source() {
        Some(source) => output.push_str(&format!(
            "✅ Parsed {} table(s) from {}:\n",
            model.len(),
            source.display()
        )),
        None => output.push_str(&format!("✅ Parsed {} table(s):\n", model.len())),
    }

    for (idx, table) in model.tables().iter().enumerate() {
        output.push_str(&format!("\nTable {}: {}", idx + 1, table.name));
        if table.is_join_table() {
            output.push_str(" (join table)");
        }
        output.push('\n');

        output.push_str(&format!("  Columns: {}\n", table.columns.len()));
        for col in &table.columns {
            output.push_str(&format!("    - {} ({})", col.name, col.data_type));
            if col.primary_key {
                output.push_str(" [PK]");
            }
            if col.auto_increment {
                output.push_str(" [auto-increment]");
            }
            output.push('\n');
        }

        if !table.relationships.is_empty() {
            output.push_str("  Relationships:\n");
            for rel in &table.relationships {
                output.push_str(&format!(
                    "    - {} {} → {}.{}",
                    rel.kind, rel.foreign_key, rel.related_table, rel.related_foreign_key
                ));
                if let Some(through) = &rel.through_table {
                    output.push_str(&format!(" via {}", through));
                }
                output.push('\n');
            }
        }
    }

    output
}

/// Registered input formats and target dialects
pub fn format_registry() -> String {
    let mut output = String::from("Input formats:\n");
    for format in SchemaFormat::all() {
        output.push_str(&format!("  - {}\n", format));
    }

    output.push_str("\nDialects:\n");
    for dialect in DialectKind::all() {
        output.push_str(&format!("  - {}", dialect));
        if !dialect.aliases().is_empty() {
            output.push_str(&format!(" (aliases: {})", dialect.aliases().join(", ")));
        }
        output.push('\n');
    }
    output
}
