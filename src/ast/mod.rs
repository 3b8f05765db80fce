//! Abstract Syntax Tree produced by the compiler.
//!
//! The node vocabulary (`select`, `from`, `where`, `join`, `group_by`,
//! `order_by`, `limit`, `offset`, `field`, `literal`, `operator`, `aggregate`)
//! is the contract with downstream planners and SQL generators. Optional
//! clauses are `None` when the query did not carry them and are left out of
//! the serialized form entirely.

mod nodes;
mod operators;

pub use nodes::*;
pub use operators::*;

use serde::{Deserialize, Serialize};

/// A compiled query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    pub select: SelectNode,
    pub from: FromNode,
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joins: Option<Vec<JoinNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupByNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<LimitNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<OffsetNode>,
}

impl Ast {
    /// An AST selecting `columns` from `table` with no other clauses.
    pub fn new(table: impl Into<String>, columns: Vec<SelectItem>) -> Self {
        Self {
            select: SelectNode { columns },
            from: FromNode {
                table: table.into(),
            },
            where_clause: None,
            joins: None,
            group_by: None,
            order_by: None,
            limit: None,
            offset: None,
        }
    }
}

impl std::fmt::Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.select, self.from)?;
        for join in self.joins.iter().flatten() {
            write!(f, " {}", join)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " {}", where_clause)?;
        }
        if let Some(group_by) = &self.group_by {
            write!(f, " {}", group_by)?;
        }
        if let Some(order_by) = &self.order_by {
            write!(f, " {}", order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {}", limit.value)?;
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {}", offset.value)?;
        }
        Ok(())
    }
}

/// Projection: field nodes first, then aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectNode {
    pub columns: Vec<SelectItem>,
}

impl std::fmt::Display for SelectNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SELECT ")?;
        write_list(f, &self.columns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromNode {
    pub table: String,
}

impl std::fmt::Display for FromNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FROM {}", self.table)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereNode {
    pub condition: OperatorNode,
}

impl std::fmt::Display for WhereNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WHERE {}", self.condition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupByNode {
    pub fields: Vec<FieldNode>,
}

impl std::fmt::Display for GroupByNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GROUP BY ")?;
        write_list(f, &self.fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByNode {
    pub items: Vec<OrderItem>,
}

impl std::fmt::Display for OrderByNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ORDER BY ")?;
        write_list(f, &self.items)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitNode {
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetNode {
    pub value: u64,
}

fn write_list<T: std::fmt::Display>(
    f: &mut std::fmt::Formatter<'_>,
    items: &[T],
) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
