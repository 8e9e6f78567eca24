//! Export module tests

use schema2script::export::{DialectKind, GenerationError, select_generator};
use schema2script::import::{JsonParser, SchemaParser, XmlParser};
use schema2script::models::{Column, Relationship, SchemaModel, Table};
use schema2script::validation::UnresolvedRelationshipError;
use sqlparser::dialect::{GenericDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

fn model(tables: Vec<Table>) -> SchemaModel {
    let mut model = SchemaModel::new();
    for table in tables {
        model.add_table(table).unwrap();
    }
    model
}

fn generate(dialect: &str, model: &SchemaModel) -> Result<String, GenerationError> {
    select_generator(dialect).unwrap().generate(model)
}

/// Student and Course joined many-to-many without a declared through-table
fn student_course() -> SchemaModel {
    JsonParser::new()
        .parse(
            br#"[
              { "tableName": "Student",
                "columns": [ { "name": "id", "type": "INT", "primaryKey": true },
                             { "name": "name", "type": "VARCHAR(100)" } ],
                "relationships": [ { "relationshipType": "many-to-many", "relatedTable": "Course",
                                     "foreignKey": "id", "relatedForeignKey": "id" } ] },
              { "tableName": "Course",
                "columns": [ { "name": "id", "type": "INT", "primaryKey": true },
                             { "name": "title", "type": "VARCHAR(200)" } ] }
            ]"#,
        )
        .unwrap()
}

fn shop() -> SchemaModel {
    XmlParser::new()
        .parse(
            br#"<schema>
              <table name="order_line">
                <column name="order_id" type="INT" primary-key="true"/>
                <column name="product_id" type="INT" primary-key="true"/>
                <column name="quantity" type="INT"/>
                <relationship related-table="orders" foreign-key="order_id" related-foreign-key="id"/>
                <relationship related-table="product" foreign-key="product_id" related-foreign-key="id"/>
              </table>
              <table name="orders">
                <column name="id" type="BIGINT" primary-key="true"/>
                <column name="customer_id" type="INT"/>
                <column name="placed_at" type="TIMESTAMP"/>
                <relationship related-table="customer" foreign-key="customer_id" related-foreign-key="id"/>
              </table>
              <table name="product">
                <column name="id" type="INT" primary-key="true"/>
                <column name="price" type="DECIMAL(10,2)"/>
                <column name="active" type="BOOLEAN"/>
              </table>
              <table name="customer">
                <column name="id" type="INT" primary-key="true"/>
                <column name="email" type="VARCHAR(255)"/>
              </table>
            </schema>"#,
        )
        .unwrap()
}

fn position(script: &str, table: &str) -> usize {
    script
        .find(&format!("CREATE TABLE {} (", table))
        .unwrap_or_else(|| panic!("no CREATE TABLE for {}", table))
}

mod join_table_tests {
    use super::*;

    #[test]
    fn test_student_course_synthesizes_join_table() {
        let script = generate("generic", &student_course()).unwrap();
        let statements: Vec<&str> = script.split("\n\n").filter(|s| !s.is_empty()).collect();
        assert_eq!(statements.len(), 3);

        assert_eq!(
            statements[0],
            "CREATE TABLE Student (\n    id INT,\n    name VARCHAR(100),\n    PRIMARY KEY (id)\n);"
        );
        assert_eq!(
            statements[1],
            "CREATE TABLE Course (\n    id INT,\n    title VARCHAR(200),\n    PRIMARY KEY (id)\n);"
        );
        assert_eq!(
            statements[2],
            "CREATE TABLE Student_Course (\n    \
                Student_id INT,\n    \
                Course_id INT,\n    \
                PRIMARY KEY (Student_id, Course_id),\n    \
                FOREIGN KEY (Student_id) REFERENCES Student(id),\n    \
                FOREIGN KEY (Course_id) REFERENCES Course(id)\n);"
        );
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let model = student_course();
        let first = generate("postgres", &model).unwrap();
        let second = generate("postgres", &model).unwrap();
        assert_eq!(first, second);
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_declared_through_table_is_used() {
        let model = model(vec![
            Table::new("student")
                .with_column(Column::primary("student_id", "INT"))
                .with_relationship(
                    Relationship::many_to_many("course", "student_id", "course_id").through("enrollment"),
                ),
            Table::new("course").with_column(Column::primary("course_id", "INT")),
            Table::new("enrollment")
                .with_column(Column::primary("student_id", "INT"))
                .with_column(Column::primary("course_id", "INT")),
        ]);
        let script = generate("generic", &model).unwrap();
        assert_eq!(script.matches("CREATE TABLE").count(), 3);
        assert!(script.contains("FOREIGN KEY (student_id) REFERENCES student(student_id)"));
        assert!(script.contains("FOREIGN KEY (course_id) REFERENCES course(course_id)"));
        assert!(position(&script, "enrollment") > position(&script, "course"));
    }

    #[test]
    fn test_missing_through_table_is_an_error() {
        let model = model(vec![
            Table::new("student")
                .with_column(Column::primary("student_id", "INT"))
                .with_relationship(
                    Relationship::many_to_many("course", "student_id", "course_id").through("enrollment"),
                ),
            Table::new("course").with_column(Column::primary("course_id", "INT")),
        ]);
        for dialect in DialectKind::all() {
            let err = generate(dialect.name(), &model).unwrap_err();
            assert_eq!(
                err,
                GenerationError::UnresolvedRelationship(UnresolvedRelationshipError::UnknownThroughTable {
                    table: "student".to_string(),
                    related_table: "course".to_string(),
                    through_table: "enrollment".to_string(),
                })
            );
        }
    }
}

mod ordering_tests {
    use super::*;

    #[test]
    fn test_referenced_tables_come_first() {
        let script = generate("generic", &shop()).unwrap();
        assert!(position(&script, "customer") < position(&script, "orders"));
        assert!(position(&script, "orders") < position(&script, "order_line"));
        assert!(position(&script, "product") < position(&script, "order_line"));
        assert!(!script.contains("ALTER TABLE"));
    }

    #[test]
    fn test_column_order_follows_declaration() {
        let script = generate("generic", &shop()).unwrap();
        let start = position(&script, "orders");
        let statement = &script[start..start + script[start..].find(");").unwrap()];
        let id = statement.find("    id BIGINT").unwrap();
        let customer = statement.find("    customer_id INT").unwrap();
        let placed = statement.find("    placed_at TIMESTAMP").unwrap();
        assert!(id < customer && customer < placed);
    }

    #[test]
    fn test_composite_primary_key() {
        let script = generate("generic", &shop()).unwrap();
        assert!(script.contains("    PRIMARY KEY (order_id, product_id),\n"));
    }

    #[test]
    fn test_unresolved_related_table_never_dropped() {
        let model = model(vec![
            Table::new("orders")
                .with_column(Column::new("customer_id", "INT"))
                .with_relationship(Relationship::one_to_many("customer", "customer_id", "id")),
        ]);
        assert!(matches!(
            generate("generic", &model),
            Err(GenerationError::UnresolvedRelationship(UnresolvedRelationshipError::UnknownTable { .. }))
        ));
    }
}

mod dialect_tests {
    use super::*;

    #[test]
    fn test_unrecognized_type_fails_only_under_typed_dialects() {
        let model = model(vec![Table::new("place").with_column(Column::new("location", "GEOMETRY"))]);
        assert!(generate("generic", &model).is_ok());
        for dialect in ["oracle", "postgres", "mysql"] {
            assert!(matches!(
                generate(dialect, &model),
                Err(GenerationError::UnmappedType { ref type_name, .. }) if type_name == "GEOMETRY"
            ));
        }
    }

    #[test]
    fn test_oracle_type_mapping() {
        let script = generate("oracle", &shop()).unwrap();
        assert!(script.contains("    price NUMBER(10,2),\n"));
        assert!(script.contains("    active NUMBER(1),\n"));
        assert!(script.contains("    email VARCHAR2(255),\n"));
        assert!(script.contains("    id NUMBER(19),\n"));
        assert!(script.contains("CONSTRAINT fk_orders_customer FOREIGN KEY (customer_id) REFERENCES customer(id)"));
        assert!(script.ends_with(");\n\nCOMMIT;\n"));
    }

    #[test]
    fn test_quoting_per_dialect() {
        let model = model(vec![Table::new("order").with_column(Column::primary("user", "INT"))]);
        assert!(generate("generic", &model).unwrap().starts_with("CREATE TABLE \"order\" (\n    \"user\" INT,"));
        assert!(generate("postgres", &model).unwrap().starts_with("CREATE TABLE \"order\" (\n    \"user\" INTEGER,"));
        assert!(generate("mysql", &model).unwrap().starts_with("CREATE TABLE `order` (\n    `user` INT,"));
        assert!(generate("oracle", &model).unwrap().starts_with("CREATE TABLE \"order\" (\n    \"user\" NUMBER,"));
    }
}

mod syntax_tests {
    use super::*;

    #[test]
    fn test_generic_script_parses() {
        let script = generate("generic", &shop()).unwrap();
        let statements = Parser::parse_sql(&GenericDialect {}, &script).unwrap();
        assert_eq!(statements.len(), 4);

        let script = generate("generic", &student_course()).unwrap();
        assert_eq!(Parser::parse_sql(&GenericDialect {}, &script).unwrap().len(), 3);
    }

    #[test]
    fn test_postgres_script_parses() {
        let script = generate("postgres", &shop()).unwrap();
        assert_eq!(Parser::parse_sql(&PostgreSqlDialect {}, &script).unwrap().len(), 4);
    }

    #[test]
    fn test_mysql_script_parses() {
        let script = generate("mysql", &shop()).unwrap();
        assert_eq!(Parser::parse_sql(&MySqlDialect {}, &script).unwrap().len(), 4);
    }

    #[test]
    fn test_cycle_script_parses() {
        let model = model(vec![
            Table::new("employee")
                .with_column(Column::primary("id", "INT"))
                .with_column(Column::new("department_id", "INT"))
                .with_relationship(Relationship::one_to_many("department", "department_id", "id")),
            Table::new("department")
                .with_column(Column::primary("id", "INT"))
                .with_column(Column::new("manager_id", "INT"))
                .with_relationship(Relationship::one_to_many("employee", "manager_id", "id")),
        ]);
        let script = generate("postgres", &model).unwrap();
        let statements = Parser::parse_sql(&PostgreSqlDialect {}, &script).unwrap();
        assert_eq!(statements.len(), 3);
    }
}
