//! Relationship model and kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How two tables are associated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// The owning table holds a foreign key into the related table
    #[serde(rename = "one-to-many")]
    OneToMany,
    /// Realized through a join table holding a foreign key to each side
    #[serde(rename = "many-to-many")]
    ManyToMany,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToMany => "one-to-many",
            Self::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    /// Accepts the spellings found in hand-written schema files.
    ///
    /// `many-to-one` is the same association seen from the table that holds the
    /// foreign key, so it classifies as [`RelationshipKind::OneToMany`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "one-to-many" | "many-to-one" | "1:n" | "n:1" | "1-n" | "n-1" => Ok(Self::OneToMany),
            "many-to-many" | "n:m" | "m:n" | "n-m" | "m-n" => Ok(Self::ManyToMany),
            _ => Err(format!("Unknown relationship type: {}", s.trim())),
        }
    }
}

/// A directed association from the owning table to a related table
///
/// Tables are referenced by name, never by pointer, so a relationship may name
/// a table that is declared later in the source file. Names are resolved in a
/// separate pass before generation (see [`crate::validation::relationships`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(rename = "relationshipType")]
    pub kind: RelationshipKind,
    pub related_table: String,
    /// Foreign-key column on the owning side
    pub foreign_key: String,
    /// Column on the related table that the foreign key points at
    pub related_foreign_key: String,
    /// Join table realizing a many-to-many association. `None` on a
    /// many-to-many relationship means one is synthesized at generation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through_table: Option<String>,
}

impl Relationship {
    pub fn one_to_many(
        related_table: impl Into<String>,
        foreign_key: impl Into<String>,
        related_foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationshipKind::OneToMany,
            related_table: related_table.into(),
            foreign_key: foreign_key.into(),
            related_foreign_key: related_foreign_key.into(),
            through_table: None,
        }
    }

    pub fn many_to_many(
        related_table: impl Into<String>,
        foreign_key: impl Into<String>,
        related_foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationshipKind::ManyToMany,
            ..Self::one_to_many(related_table, foreign_key, related_foreign_key)
        }
    }

    /// Name the join table realizing this association. Only meaningful for
    /// many-to-many relationships; the kind is upgraded accordingly.
    pub fn through(mut self, through_table: impl Into<String>) -> Self {
        self.kind = RelationshipKind::ManyToMany;
        self.through_table = Some(through_table.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_aliases() {
        assert_eq!("one-to-many".parse(), Ok(RelationshipKind::OneToMany));
        assert_eq!("Many_To_One".parse(), Ok(RelationshipKind::OneToMany));
        assert_eq!("1:n".parse(), Ok(RelationshipKind::OneToMany));
        assert_eq!("many-to-many".parse(), Ok(RelationshipKind::ManyToMany));
        assert_eq!("M:N".parse(), Ok(RelationshipKind::ManyToMany));
        assert!("one-to-one".parse::<RelationshipKind>().is_err());
    }

    #[test]
    fn test_through_upgrades_kind() {
        let rel = Relationship::one_to_many("course", "student_id", "course_id").through("enrollment");
        assert_eq!(rel.kind, RelationshipKind::ManyToMany);
        assert_eq!(rel.through_table.as_deref(), Some("enrollment"));
    }
}
