//! SQL dialects
//!
//! A dialect decides only how names and types are spelled. Statement layout,
//! ordering and relationship resolution live in [`SqlGenerator`](super::SqlGenerator)
//! and are shared by every dialect.

use super::DialectKind;
use super::types::{LogicalType, TypeKind};
use once_cell::sync::Lazy;
use regex::Regex;

static SIMPLE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Keywords that cannot be used as bare identifiers in portable SQL
const SQL_RESERVED: &[&str] = &[
    "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "CROSS", "CURRENT", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP",
    "ELSE", "END", "EXISTS", "FALSE", "FOR", "FOREIGN", "FROM", "FULL", "GRANT", "GROUP",
    "HAVING", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE",
    "NOT", "NULL", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "SELECT",
    "SET", "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE", "USER", "USING", "VALUES",
    "WHEN", "WHERE", "WITH",
];

const ORACLE_RESERVED: &[&str] = &[
    "ACCESS", "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUDIT", "BETWEEN", "BY", "CHAR",
    "CHECK", "CLUSTER", "COLUMN", "COMMENT", "COMPRESS", "CONNECT", "CREATE", "CURRENT", "DATE",
    "DECIMAL", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "EXCLUSIVE", "EXISTS",
    "FILE", "FLOAT", "FOR", "FROM", "GRANT", "GROUP", "HAVING", "IDENTIFIED", "IMMEDIATE", "IN",
    "INCREMENT", "INDEX", "INITIAL", "INSERT", "INTEGER", "INTERSECT", "INTO", "IS", "LEVEL",
    "LIKE", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MLSLABEL", "MODE", "MODIFY", "NOAUDIT",
    "NOCOMPRESS", "NOT", "NOWAIT", "NULL", "NUMBER", "OF", "OFFLINE", "ON", "ONLINE", "OPTION",
    "OR", "ORDER", "PCTFREE", "PRIOR", "PUBLIC", "RAW", "RENAME", "RESOURCE", "REVOKE", "ROW",
    "ROWID", "ROWNUM", "ROWS", "SELECT", "SESSION", "SET", "SHARE", "SIZE", "SMALLINT", "START",
    "SUCCESSFUL", "SYNONYM", "SYSDATE", "TABLE", "THEN", "TO", "TRIGGER", "UID", "UNION", "UNIQUE",
    "UPDATE", "USER", "VALIDATE", "VALUES", "VARCHAR", "VARCHAR2", "VIEW", "WHENEVER", "WHERE",
    "WITH",
];

const IDENTITY: &str = "GENERATED BY DEFAULT AS IDENTITY";

/// Dialect-specific spelling of DDL
pub trait SqlDialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    /// Quote and escape an identifier.
    fn quote_identifier(&self, identifier: &str) -> String;

    /// Native type for a column type name, `None` when the dialect has no mapping.
    fn map_type(&self, type_name: &str) -> Option<String>;

    /// Column clause for auto-increment columns
    fn identity_clause(&self) -> &'static str {
        IDENTITY
    }

    /// Whether primary and foreign key constraints carry explicit names
    fn names_constraints(&self) -> bool {
        false
    }

    /// Text appended after the last statement
    fn script_footer(&self) -> Option<&'static str> {
        None
    }
}

/// Double-quote when the identifier is not simple or collides with a keyword
fn quote_if_needed(identifier: &str, reserved: &[&str]) -> String {
    let upper = identifier.to_uppercase();
    if SIMPLE_IDENTIFIER.is_match(identifier) && !reserved.contains(&upper.as_str()) {
        identifier.to_string()
    } else {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }
}

/// Portable SQL: type names pass through untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl SqlDialect for GenericDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Generic
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote_if_needed(identifier, SQL_RESERVED)
    }

    fn map_type(&self, type_name: &str) -> Option<String> {
        Some(type_name.trim().to_string())
    }
}

/// Oracle Database
///
/// Constraints are named `pk_<table>` / `fk_<table>_<referenced>` and the
/// script ends with `COMMIT;`. `TIME` has no Oracle counterpart.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl SqlDialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        quote_if_needed(identifier, ORACLE_RESERVED)
    }

    fn map_type(&self, type_name: &str) -> Option<String> {
        let logical = LogicalType::parse(type_name)?;
        let native = match logical.kind {
            TypeKind::SmallInt => "NUMBER(5)".to_string(),
            TypeKind::Integer => "NUMBER".to_string(),
            TypeKind::BigInt => "NUMBER(19)".to_string(),
            TypeKind::Decimal => logical.with_args("NUMBER"),
            TypeKind::Float => "BINARY_FLOAT".to_string(),
            TypeKind::Double => "BINARY_DOUBLE".to_string(),
            TypeKind::Char => logical.with_args("CHAR"),
            TypeKind::Varchar => logical.with_length("VARCHAR2", 255),
            TypeKind::Text | TypeKind::Json => "CLOB".to_string(),
            TypeKind::Boolean => "NUMBER(1)".to_string(),
            TypeKind::Date => "DATE".to_string(),
            TypeKind::Time => return None,
            TypeKind::Timestamp => "TIMESTAMP".to_string(),
            TypeKind::Binary => "BLOB".to_string(),
            TypeKind::Uuid => "RAW(16)".to_string(),
        };
        Some(native)
    }

    fn names_constraints(&self) -> bool {
        true
    }

    fn script_footer(&self) -> Option<&'static str> {
        Some("COMMIT;\n")
    }
}

/// PostgreSQL
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    fn map_type(&self, type_name: &str) -> Option<String> {
        let logical = LogicalType::parse(type_name)?;
        let native = match logical.kind {
            TypeKind::SmallInt => "SMALLINT".to_string(),
            TypeKind::Integer => "INTEGER".to_string(),
            TypeKind::BigInt => "BIGINT".to_string(),
            TypeKind::Decimal => logical.with_args("NUMERIC"),
            TypeKind::Float => "REAL".to_string(),
            TypeKind::Double => "DOUBLE PRECISION".to_string(),
            TypeKind::Char => logical.with_args("CHAR"),
            TypeKind::Varchar => logical.with_args("VARCHAR"),
            TypeKind::Text => "TEXT".to_string(),
            TypeKind::Boolean => "BOOLEAN".to_string(),
            TypeKind::Date => "DATE".to_string(),
            TypeKind::Time => "TIME".to_string(),
            TypeKind::Timestamp => "TIMESTAMP".to_string(),
            TypeKind::Binary => "BYTEA".to_string(),
            TypeKind::Uuid => "UUID".to_string(),
            TypeKind::Json => "JSONB".to_string(),
        };
        Some(native)
    }
}

/// MySQL / MariaDB
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    fn map_type(&self, type_name: &str) -> Option<String> {
        let logical = LogicalType::parse(type_name)?;
        let native = match logical.kind {
            TypeKind::SmallInt => "SMALLINT".to_string(),
            TypeKind::Integer => "INT".to_string(),
            TypeKind::BigInt => "BIGINT".to_string(),
            TypeKind::Decimal => logical.with_args("DECIMAL"),
            TypeKind::Float => "FLOAT".to_string(),
            TypeKind::Double => "DOUBLE".to_string(),
            TypeKind::Char => logical.with_args("CHAR"),
            TypeKind::Varchar => logical.with_length("VARCHAR", 255),
            TypeKind::Text => "TEXT".to_string(),
            TypeKind::Boolean => "TINYINT(1)".to_string(),
            TypeKind::Date => "DATE".to_string(),
            TypeKind::Time => "TIME".to_string(),
            TypeKind::Timestamp => "DATETIME".to_string(),
            TypeKind::Binary => "BLOB".to_string(),
            TypeKind::Uuid => "CHAR(36)".to_string(),
            TypeKind::Json => "JSON".to_string(),
        };
        Some(native)
    }

    fn identity_clause(&self) -> &'static str {
        "AUTO_INCREMENT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_quoting() {
        let dialect = GenericDialect;
        assert_eq!(dialect.quote_identifier("employee"), "employee");
        assert_eq!(dialect.quote_identifier("order"), "\"order\"");
        assert_eq!(dialect.quote_identifier("first name"), "\"first name\"");
        assert_eq!(dialect.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(dialect.map_type(" VARCHAR(100) "), Some("VARCHAR(100)".to_string()));
        assert_eq!(dialect.map_type("geometry"), Some("geometry".to_string()));
    }

    #[test]
    fn test_oracle_types() {
        let dialect = OracleDialect;
        assert_eq!(dialect.map_type("INT").as_deref(), Some("NUMBER"));
        assert_eq!(dialect.map_type("VARCHAR(100)").as_deref(), Some("VARCHAR2(100)"));
        assert_eq!(dialect.map_type("string").as_deref(), Some("VARCHAR2(255)"));
        assert_eq!(dialect.map_type("decimal(10,2)").as_deref(), Some("NUMBER(10,2)"));
        assert_eq!(dialect.map_type("boolean").as_deref(), Some("NUMBER(1)"));
        assert_eq!(dialect.map_type("text").as_deref(), Some("CLOB"));
        assert_eq!(dialect.map_type("TIME"), None);
        assert_eq!(dialect.map_type("geometry"), None);
    }

    #[test]
    fn test_oracle_quoting() {
        let dialect = OracleDialect;
        assert_eq!(dialect.quote_identifier("student"), "student");
        assert_eq!(dialect.quote_identifier("comment"), "\"comment\"");
        assert_eq!(dialect.quote_identifier("Level"), "\"Level\"");
    }

    #[test]
    fn test_postgres_and_mysql() {
        assert_eq!(PostgresDialect.quote_identifier("id"), "\"id\"");
        assert_eq!(PostgresDialect.map_type("datetime").as_deref(), Some("TIMESTAMP"));
        assert_eq!(PostgresDialect.map_type("json").as_deref(), Some("JSONB"));
        assert_eq!(PostgresDialect.map_type("varchar").as_deref(), Some("VARCHAR"));

        assert_eq!(MySqlDialect.quote_identifier("a`b"), "`a``b`");
        assert_eq!(MySqlDialect.map_type("bool").as_deref(), Some("TINYINT(1)"));
        assert_eq!(MySqlDialect.map_type("uuid").as_deref(), Some("CHAR(36)"));
        assert_eq!(MySqlDialect.identity_clause(), "AUTO_INCREMENT");
    }
}
