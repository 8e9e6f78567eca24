//! Logical column types
//!
//! Column type names in a schema file are free text (`INT`, `varchar(100)`,
//! `double precision`, ...). Dialects that translate types first reduce the
//! text to a [`LogicalType`]: a recognized [`TypeKind`] plus up to two numeric
//! arguments.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9 _]*?)\s*(?:\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\))?\s*$").unwrap()
});

/// Family of a logical type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Float,
    Double,
    Char,
    Varchar,
    Text,
    Boolean,
    Date,
    Time,
    Timestamp,
    Binary,
    Uuid,
    Json,
}

impl TypeKind {
    fn from_base(base: &str) -> Option<Self> {
        let kind = match base {
            "smallint" | "int2" | "tinyint" => Self::SmallInt,
            "int" | "integer" | "int4" | "mediumint" => Self::Integer,
            "bigint" | "int8" | "long" => Self::BigInt,
            "decimal" | "numeric" | "number" => Self::Decimal,
            "float" | "real" | "float4" => Self::Float,
            "double" | "double precision" | "float8" => Self::Double,
            "char" | "character" => Self::Char,
            "varchar" | "character varying" | "string" | "varchar2" | "nvarchar" => Self::Varchar,
            "text" | "clob" | "longtext" => Self::Text,
            "boolean" | "bool" | "bit" => Self::Boolean,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" | "datetime" => Self::Timestamp,
            "blob" | "binary" | "varbinary" | "bytea" => Self::Binary,
            "uuid" => Self::Uuid,
            "json" | "jsonb" => Self::Json,
            _ => return None,
        };
        Some(kind)
    }
}

/// A recognized type name with its size arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalType {
    pub kind: TypeKind,
    /// Length for character types, precision for decimals
    pub size: Option<u32>,
    /// Scale for decimals
    pub scale: Option<u32>,
}

impl LogicalType {
    /// Parse a type name. Returns `None` when the name is not a known
    /// logical type or its arguments are malformed.
    pub fn parse(type_name: &str) -> Option<Self> {
        let captures = TYPE_PATTERN.captures(type_name)?;
        let base = captures[1].split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let kind = TypeKind::from_base(&base)?;
        let size = match captures.get(2) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        let scale = match captures.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some(Self { kind, size, scale })
    }

    /// Render `BASE`, `BASE(size)` or `BASE(size,scale)` with whatever
    /// arguments are present.
    pub fn with_args(&self, base: &str) -> String {
        match (self.size, self.scale) {
            (Some(size), Some(scale)) => format!("{}({},{})", base, size, scale),
            (Some(size), None) => format!("{}({})", base, size),
            _ => base.to_string(),
        }
    }

    /// Render `BASE(size)`, falling back to `default` when no length was given.
    pub fn with_length(&self, base: &str, default: u32) -> String {
        format!("{}({})", base, self.size.unwrap_or(default))
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
