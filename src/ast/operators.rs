use serde::{Deserialize, Serialize};

/// Operator symbol carried by an operator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "nin")]
    NotIn,
    #[serde(rename = "like")]
    Like,
}

impl Operator {
    /// The symbol used in the serialized AST.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "in",
            Operator::NotIn => "nin",
            Operator::Like => "like",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::And | Operator::Or | Operator::Not)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
            Operator::Not => write!(f, "NOT"),
            Operator::In => write!(f, "IN"),
            Operator::NotIn => write!(f, "NOT IN"),
            Operator::Like => write!(f, "LIKE"),
            other => write!(f, "{}", other.symbol()),
        }
    }
}

/// Boolean combinator of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    #[default]
    And,
    Or,
    Not,
}

impl From<LogicalOp> for Operator {
    fn from(op: LogicalOp) -> Self {
        match op {
            LogicalOp::And => Operator::And,
            LogicalOp::Or => Operator::Or,
            LogicalOp::Not => Operator::Not,
        }
    }
}

/// Comparison a leaf condition may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[default]
    #[serde(rename = "=", alias = "eq", alias = "==")]
    Eq,
    #[serde(rename = "!=", alias = "ne", alias = "<>")]
    Ne,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "gte")]
    Gte,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "lte")]
    Lte,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "nin", alias = "not in")]
    NotIn,
    #[serde(rename = "like", alias = "contains")]
    Like,
}

impl ComparisonOp {
    /// Canonical spelling, as serialized.
    pub fn as_str(&self) -> &'static str {
        Operator::from(*self).symbol()
    }
}

impl std::str::FromStr for ComparisonOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" => Ok(ComparisonOp::Eq),
            "!=" | "<>" | "ne" => Ok(ComparisonOp::Ne),
            ">" | "gt" => Ok(ComparisonOp::Gt),
            ">=" | "gte" => Ok(ComparisonOp::Gte),
            "<" | "lt" => Ok(ComparisonOp::Lt),
            "<=" | "lte" => Ok(ComparisonOp::Lte),
            "in" => Ok(ComparisonOp::In),
            "nin" | "not in" => Ok(ComparisonOp::NotIn),
            "like" | "contains" => Ok(ComparisonOp::Like),
            _ => Err(format!("unknown comparison operator '{}'", s)),
        }
    }
}

impl From<ComparisonOp> for Operator {
    fn from(op: ComparisonOp) -> Self {
        match op {
            ComparisonOp::Eq => Operator::Eq,
            ComparisonOp::Ne => Operator::Ne,
            ComparisonOp::Gt => Operator::Gt,
            ComparisonOp::Gte => Operator::Gte,
            ComparisonOp::Lt => Operator::Lt,
            ComparisonOp::Lte => Operator::Lte,
            ComparisonOp::In => Operator::In,
            ComparisonOp::NotIn => Operator::NotIn,
            ComparisonOp::Like => Operator::Like,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc", alias = "ascending", alias = "ASC")]
    Asc,
    #[serde(rename = "desc", alias = "descending", alias = "DESC")]
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Type tag assigned to a literal by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralType {
    String,
    Number,
    Boolean,
    Date,
    Null,
}

impl std::fmt::Display for LiteralType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralType::String => write!(f, "string"),
            LiteralType::Number => write!(f, "number"),
            LiteralType::Boolean => write!(f, "boolean"),
            LiteralType::Date => write!(f, "date"),
            LiteralType::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_spellings() {
        assert_eq!("gte".parse::<ComparisonOp>(), Ok(ComparisonOp::Gte));
        assert_eq!("NOT IN".parse::<ComparisonOp>(), Ok(ComparisonOp::NotIn));
        assert_eq!("<>".parse::<ComparisonOp>(), Ok(ComparisonOp::Ne));
        assert!("startsWith".parse::<ComparisonOp>().is_err());
        assert_eq!(ComparisonOp::NotIn.as_str(), "nin");
    }
}
