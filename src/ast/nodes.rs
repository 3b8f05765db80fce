use serde::{Deserialize, Serialize};

use super::operators::{LiteralType, Operator, SortOrder};
use crate::value::Value;

/// Column reference with an optional table or alias qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub name: String,
}

impl FieldNode {
    pub fn new(table: Option<String>, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
        }
    }

    pub fn unqualified(name: impl Into<String>) -> Self {
        Self::new(None, name)
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Some(table.into()), name)
    }

    /// The `*` projection.
    pub fn wildcard() -> Self {
        Self::unqualified("*")
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

impl std::fmt::Display for FieldNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A typed constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    pub value: Value,
    pub data_type: LiteralType,
}

impl std::fmt::Display for LiteralNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// An operator applied to an ordered list of operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorNode {
    pub operator: Operator,
    pub operands: Vec<Operand>,
}

impl OperatorNode {
    pub fn new(operator: Operator, operands: Vec<Operand>) -> Self {
        Self { operator, operands }
    }

    /// `left = right` over two fields, the shape of every join predicate.
    pub fn field_eq(left: FieldNode, right: FieldNode) -> Self {
        Self::new(Operator::Eq, vec![Operand::Field(left), Operand::Field(right)])
    }
}

impl std::fmt::Display for OperatorNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.operator, self.operands.as_slice()) {
            (Operator::And, []) => write!(f, "TRUE"),
            (Operator::Or, []) => write!(f, "FALSE"),
            (Operator::Not, []) => write!(f, "NOT (TRUE)"),
            (Operator::Not, operands) => {
                write!(f, "NOT (")?;
                write_joined(f, operands, " AND ")?;
                write!(f, ")")
            }
            (Operator::And | Operator::Or, [single]) => write!(f, "{}", single),
            (op @ (Operator::And | Operator::Or), operands) => {
                write!(f, "(")?;
                write_joined(f, operands, &format!(" {} ", op))?;
                write!(f, ")")
            }
            (op, [left, right]) => write!(f, "{} {} {}", left, op, right),
            (op, operands) => {
                write!(f, "{}(", op.symbol())?;
                write_joined(f, operands, ", ")?;
                write!(f, ")")
            }
        }
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    operands: &[Operand],
    sep: &str,
) -> std::fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", operand)?;
    }
    Ok(())
}

/// Operand of an operator node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operand {
    Operator(OperatorNode),
    Field(FieldNode),
    Literal(LiteralNode),
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Operator(node) => write!(f, "{}", node),
            Operand::Field(node) => write!(f, "{}", node),
            Operand::Literal(node) => write!(f, "{}", node),
        }
    }
}

impl From<OperatorNode> for Operand {
    fn from(node: OperatorNode) -> Self {
        Operand::Operator(node)
    }
}

impl From<FieldNode> for Operand {
    fn from(node: FieldNode) -> Self {
        Operand::Field(node)
    }
}

impl From<LiteralNode> for Operand {
    fn from(node: LiteralNode) -> Self {
        Operand::Literal(node)
    }
}

/// Aggregate function call in the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateNode {
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub distinct: bool,
}

impl std::fmt::Display for AggregateNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.function.to_uppercase())?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        match &self.field {
            Some(field) => write!(f, "{}", field)?,
            None => write!(f, "*")?,
        }
        write!(f, ")")?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

/// One projected item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectItem {
    Field(FieldNode),
    Aggregate(AggregateNode),
}

impl std::fmt::Display for SelectItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectItem::Field(node) => write!(f, "{}", node),
            SelectItem::Aggregate(node) => write!(f, "{}", node),
        }
    }
}

/// A compiled join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinNode {
    /// Join kind as supplied (`inner`, `left`, ...); not validated.
    pub kind: String,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub on: OperatorNode,
}

impl std::fmt::Display for JoinNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} JOIN {}", self.kind.to_uppercase(), self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        write!(f, " ON {}", self.on)
    }
}

/// A sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub field: FieldNode,
    pub direction: SortOrder,
}

impl std::fmt::Display for OrderItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}
