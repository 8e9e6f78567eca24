//! Column model

use serde::{Deserialize, Serialize};

/// Column model representing a field in a table
///
/// A column carries the logical type name exactly as it appeared in the source
/// schema. Mapping it to a native type is the generator's job, so the same
/// column can be rendered for any dialect.
///
/// # Example
///
/// ```rust
/// use schema2script::models::Column;
///
/// let column = Column::new("id", "INT").with_primary_key(true);
/// assert!(column.primary_key);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// Logical type name as declared in the source (e.g., "INT", "VARCHAR(100)")
    #[serde(rename = "type")]
    pub data_type: String,
    /// Whether this column is part of the primary key (default: false)
    #[serde(default, skip_serializing_if = "is_false")]
    pub primary_key: bool,
    /// Whether the database should generate values for this column (default: false)
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_increment: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Column {
    /// Create a new column with the given name and logical type
    ///
    /// # Returns
    ///
    /// A new `Column` with `primary_key` and `auto_increment` both false.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
            auto_increment: false,
        }
    }

    /// Shorthand for a primary-key column
    pub fn primary(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::new(name, data_type).with_primary_key(true)
    }

    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_column_defaults() {
        let col = Column::new("name", "VARCHAR(100)");
        assert_eq!(col.name, "name");
        assert_eq!(col.data_type, "VARCHAR(100)");
        assert!(!col.primary_key);
        assert!(!col.auto_increment);
    }

    #[test]
    fn test_serialized_shape_omits_false_flags() {
        let col = Column::new("title", "TEXT");
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "title", "type": "TEXT" }));

        let pk = Column::primary("id", "INT").with_auto_increment(true);
        let json = serde_json::to_value(&pk).unwrap();
        assert_eq!(json["primaryKey"], true);
        assert_eq!(json["autoIncrement"], true);
    }
}
