//! Relationship resolution
//!
//! Turns the by-name relationships of a [`SchemaModel`] into concrete
//! foreign-key constraints, ready for DDL generation:
//!
//! - every related table, through-table and key column must exist
//! - many-to-many relationships without a through-table get a synthesized
//!   join table (the parsed model is never mutated)
//! - tables are ordered so that a referenced table precedes the tables that
//!   reference it
//!
//! Cycles are broken deterministically: the foreign-key graph is condensed
//! into strongly connected components, components are emitted in dependency
//! order (ties go to the smallest declaration index) and the tables of one
//! component in declaration order. A foreign key pointing at a table that has
//! not been emitted yet can then only occur inside a cycle; it is reported
//! through [`ResolvedSchema::deferred_foreign_keys`] so generators can add it
//! after all tables exist.

use crate::models::{Column, RelationshipKind, SchemaModel, Table};
use petgraph::Direction;
use petgraph::algo::condensation;
use petgraph::graph::{DiGraph, NodeIndex};
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Foreign-key constraint derived from a relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    /// Table carrying the constraint
    pub table: String,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// A relationship that cannot be resolved against the model
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedRelationshipError {
    #[error("Table '{table}' has a relationship to unknown table '{related_table}'")]
    UnknownTable { table: String, related_table: String },

    #[error(
        "Relationship '{table}' -> '{related_table}' names through-table '{through_table}', which does not exist"
    )]
    UnknownThroughTable {
        table: String,
        related_table: String,
        through_table: String,
    },

    #[error(
        "Relationship '{table}' -> '{related_table}' needs column '{column}' on table '{missing_in}', which does not exist"
    )]
    UnknownColumn {
        table: String,
        related_table: String,
        missing_in: String,
        column: String,
    },
}

/// Effective, ordered table list with its foreign keys
#[derive(Debug)]
pub struct ResolvedSchema<'a> {
    tables: Vec<Cow<'a, Table>>,
    inline_keys: Vec<Vec<ForeignKey>>,
    deferred_keys: Vec<ForeignKey>,
    order: Vec<usize>,
    cycles: Vec<Vec<String>>,
}

impl<'a> ResolvedSchema<'a> {
    /// Tables in emission order, each with the foreign keys that can be
    /// declared inline in its `CREATE TABLE`.
    pub fn ordered_tables(&self) -> impl Iterator<Item = (&Table, &[ForeignKey])> {
        self.order
            .iter()
            .map(|&i| (self.tables[i].as_ref(), self.inline_keys[i].as_slice()))
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.tables[i].name.as_str()).collect()
    }

    /// Foreign keys that close a cycle and must be added after every table exists
    pub fn deferred_foreign_keys(&self) -> &[ForeignKey] {
        &self.deferred_keys
    }

    /// Join tables created for many-to-many relationships without a through-table
    pub fn synthesized_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter_map(|t| match t {
            Cow::Owned(table) => Some(table),
            Cow::Borrowed(_) => None,
        })
    }

    /// Groups of tables that reference each other in a cycle
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Foreign keys per effective table, with the index of the referenced table
#[derive(Default)]
struct KeyPlan {
    per_table: Vec<Vec<(usize, ForeignKey)>>,
    seen: HashSet<ForeignKey>,
}

impl KeyPlan {
    fn add(&mut self, owner: usize, target: usize, key: ForeignKey) {
        if self.seen.insert(key.clone()) {
            self.per_table[owner].push((target, key));
        }
    }
}

/// Resolves the relationships of one schema model
pub struct RelationshipResolver<'a> {
    model: &'a SchemaModel,
    index: HashMap<&'a str, usize>,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(model: &'a SchemaModel) -> Self {
        let index = model
            .tables()
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), i))
            .collect();
        Self { model, index }
    }

    pub fn resolve(&self) -> Result<ResolvedSchema<'a>, UnresolvedRelationshipError> {
        let parsed = self.model.tables();
        let mut tables: Vec<Cow<'a, Table>> = parsed.iter().map(Cow::Borrowed).collect();
        let mut plan = KeyPlan {
            per_table: vec![Vec::new(); parsed.len()],
            ..KeyPlan::default()
        };
        let mut taken: HashSet<String> = parsed.iter().map(|t| t.name.to_lowercase()).collect();
        let mut synthesized_pairs: HashSet<[(String, String); 2]> = HashSet::new();

        for (owner_idx, owner) in parsed.iter().enumerate() {
            for rel in &owner.relationships {
                let related_idx = self.lookup(&rel.related_table).ok_or_else(|| {
                    UnresolvedRelationshipError::UnknownTable {
                        table: owner.name.clone(),
                        related_table: rel.related_table.clone(),
                    }
                })?;
                let related = &parsed[related_idx];
                let missing = |in_table: &Table, column: &str| UnresolvedRelationshipError::UnknownColumn {
                    table: owner.name.clone(),
                    related_table: related.name.clone(),
                    missing_in: in_table.name.clone(),
                    column: column.to_string(),
                };
                let owner_col = owner
                    .column(&rel.foreign_key)
                    .ok_or_else(|| missing(owner, &rel.foreign_key))?;
                let related_col = related
                    .column(&rel.related_foreign_key)
                    .ok_or_else(|| missing(related, &rel.related_foreign_key))?;

                match (rel.kind, rel.through_table.as_deref()) {
                    (RelationshipKind::OneToMany, _) => {
                        plan.add(
                            owner_idx,
                            related_idx,
                            foreign_key(owner, owner_col, related, related_col),
                        );
                    }
                    (RelationshipKind::ManyToMany, Some(through_name)) => {
                        let through_idx = self.lookup(through_name).ok_or_else(|| {
                            UnresolvedRelationshipError::UnknownThroughTable {
                                table: owner.name.clone(),
                                related_table: related.name.clone(),
                                through_table: through_name.to_string(),
                            }
                        })?;
                        let through = &parsed[through_idx];
                        let left = through
                            .column(&rel.foreign_key)
                            .ok_or_else(|| missing(through, &rel.foreign_key))?;
                        let right = through
                            .column(&rel.related_foreign_key)
                            .ok_or_else(|| missing(through, &rel.related_foreign_key))?;
                        plan.add(through_idx, owner_idx, foreign_key(through, left, owner, owner_col));
                        plan.add(through_idx, related_idx, foreign_key(through, right, related, related_col));
                    }
                    (RelationshipKind::ManyToMany, None) => {
                        let mut pair = [
                            (owner.name.clone(), owner_col.name.clone()),
                            (related.name.clone(), related_col.name.clone()),
                        ];
                        pair.sort();
                        if !synthesized_pairs.insert(pair) {
                            tracing::debug!(
                                "Join table for {} <-> {} already synthesized",
                                owner.name,
                                related.name
                            );
                            continue;
                        }

                        let join = synthesize_join_table(owner, owner_col, related, related_col, &mut taken);
                        tracing::debug!(
                            "Synthesized join table {} for {} <-> {}",
                            join.name,
                            owner.name,
                            related.name
                        );
                        let join_idx = tables.len();
                        plan.per_table.push(Vec::new());
                        plan.add(join_idx, owner_idx, foreign_key(&join, &join.columns[0], owner, owner_col));
                        plan.add(join_idx, related_idx, foreign_key(&join, &join.columns[1], related, related_col));
                        tables.push(Cow::Owned(join));
                    }
                }
            }
        }

        let (order, components) = dependency_order(&plan.per_table);
        let cycles: Vec<Vec<String>> = components
            .iter()
            .map(|members| members.iter().map(|&i| tables[i].name.clone()).collect())
            .collect();
        for cycle in &cycles {
            tracing::warn!(
                "Foreign-key cycle among tables [{}]; emitting them in declaration order",
                cycle.join(", ")
            );
        }

        let mut emitted = HashSet::new();
        let mut inline_keys = vec![Vec::new(); tables.len()];
        let mut deferred_keys = Vec::new();
        for &i in &order {
            for (target, key) in std::mem::take(&mut plan.per_table[i]) {
                if target == i || emitted.contains(&target) {
                    inline_keys[i].push(key);
                } else {
                    deferred_keys.push(key);
                }
            }
            emitted.insert(i);
        }

        Ok(ResolvedSchema {
            tables,
            inline_keys,
            deferred_keys,
            order,
            cycles,
        })
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

fn foreign_key(table: &Table, column: &Column, referenced: &Table, referenced_column: &Column) -> ForeignKey {
    ForeignKey {
        table: table.name.clone(),
        column: column.name.clone(),
        referenced_table: referenced.name.clone(),
        referenced_column: referenced_column.name.clone(),
    }
}

fn synthesize_join_table(
    owner: &Table,
    owner_col: &Column,
    related: &Table,
    related_col: &Column,
    taken: &mut HashSet<String>,
) -> Table {
    let name = unique_name(format!("{}_{}", owner.name, related.name), taken);

    let (mut left, mut right) = (owner_col.name.clone(), related_col.name.clone());
    if left == right {
        left = format!("{}_{}", owner.name, owner_col.name);
        right = format!("{}_{}", related.name, related_col.name);
    }
    if left == right {
        right.push_str("_2");
    }

    Table::new(name)
        .with_column(Column::primary(left, owner_col.data_type.clone()))
        .with_column(Column::primary(right, related_col.data_type.clone()))
        .with_join_table(true)
}

/// Claim `base`, or the first free `base_N`. Names compare case-insensitively.
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let name = if taken.contains(&base.to_lowercase()) {
        (2..)
            .map(|n| format!("{}_{}", base, n))
            .find(|candidate| !taken.contains(&candidate.to_lowercase()))
            .unwrap_or(base)
    } else {
        base
    };
    taken.insert(name.to_lowercase());
    name
}

/// Emission order over table indices plus the multi-table cycles found.
///
/// Edges run from the referenced table to the referencing one. Self-references
/// add no edge.
fn dependency_order(keys: &[Vec<(usize, ForeignKey)>]) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut graph = DiGraph::<usize, ()>::with_capacity(keys.len(), 0);
    let nodes: Vec<NodeIndex> = (0..keys.len()).map(|i| graph.add_node(i)).collect();
    for (owner, table_keys) in keys.iter().enumerate() {
        for (target, _) in table_keys {
            if *target != owner {
                graph.add_edge(nodes[*target], nodes[owner], ());
            }
        }
    }

    let condensed = condensation(graph, true);
    let mut in_degree: Vec<usize> = condensed
        .node_indices()
        .map(|n| condensed.neighbors_directed(n, Direction::Incoming).count())
        .collect();
    let first_declared = |n: NodeIndex| condensed[n].iter().copied().min().unwrap_or(usize::MAX);

    let mut ready: BinaryHeap<Reverse<(usize, NodeIndex)>> = condensed
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .map(|n| Reverse((first_declared(n), n)))
        .collect();

    let mut order = Vec::with_capacity(keys.len());
    let mut cycles = Vec::new();
    while let Some(Reverse((_, component))) = ready.pop() {
        let mut members = condensed[component].clone();
        members.sort_unstable();
        if members.len() > 1 {
            cycles.push(members.clone());
        }
        order.extend(members);

        for next in condensed.neighbors(component) {
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                ready.push(Reverse((first_declared(next), next)));
            }
        }
    }
    (order, cycles)
}
