//! Filter tree compilation.
//!
//! A group becomes an operator node whose operands are its compiled
//! conditions followed by its compiled nested groups. A leaf becomes a
//! two-operand comparison `[field, literal]`. Groups with nothing in them are
//! still emitted, so an empty filter and a missing filter stay distinct.

use crate::ast::{Operand, Operator, OperatorNode};
use crate::error::{QastError, QastResult};
use crate::field::resolve_field;
use crate::literal::classify;
use crate::query::{ConditionTree, FilterCondition, FilterGroup};

/// Default nesting limit for filter groups.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Compile a filter tree with the default limits and fixed equality.
pub fn compile_filter(node: &ConditionTree) -> QastResult<OperatorNode> {
    FilterCompiler::default().compile(node)
}

/// Filter compiler with its recursion guards.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler {
    /// Deepest group nesting accepted; the root is depth 1.
    pub max_depth: usize,
    /// Upper bound on groups plus conditions, if any.
    pub max_nodes: Option<usize>,
    /// Use each condition's declared operator instead of `=`.
    pub honor_operators: bool,
}

impl Default for FilterCompiler {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: None,
            honor_operators: false,
        }
    }
}

impl FilterCompiler {
    pub fn compile(&self, node: &ConditionTree) -> QastResult<OperatorNode> {
        let mut visited = 0;
        match node {
            ConditionTree::Leaf(condition) => {
                self.count(&mut visited)?;
                Ok(self.compile_condition(condition))
            }
            ConditionTree::Group(group) => self.compile_group(group, 1, &mut visited),
        }
    }

    fn compile_group(
        &self,
        group: &FilterGroup,
        depth: usize,
        visited: &mut usize,
    ) -> QastResult<OperatorNode> {
        if depth > self.max_depth {
            return Err(QastError::FilterTooDeep {
                limit: self.max_depth,
            });
        }
        self.count(visited)?;

        let mut operands = Vec::with_capacity(group.conditions.len() + group.groups.len());
        for condition in &group.conditions {
            self.count(visited)?;
            operands.push(Operand::Operator(self.compile_condition(condition)));
        }
        for nested in &group.groups {
            let compiled = self.compile_group(nested, depth + 1, visited)?;
            operands.push(Operand::Operator(compiled));
        }

        Ok(OperatorNode::new(group.operator.into(), operands))
    }

    fn compile_condition(&self, condition: &FilterCondition) -> OperatorNode {
        let operator = match condition.declared_operator() {
            Some(Ok(op)) if self.honor_operators => op.into(),
            Some(Err(message)) if self.honor_operators => {
                tracing::warn!(field = %condition.field, %message, "falling back to '='");
                Operator::Eq
            }
            _ => Operator::Eq,
        };
        OperatorNode::new(
            operator,
            vec![
                Operand::Field(resolve_field(&condition.field, None)),
                Operand::Literal(classify(&condition.value)),
            ],
        )
    }

    fn count(&self, visited: &mut usize) -> QastResult<()> {
        *visited += 1;
        match self.max_nodes {
            Some(limit) if *visited > limit => Err(QastError::FilterTooLarge { limit }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOp, FieldNode, LiteralType, LogicalOp};
    use crate::value::Value;

    fn leaf_count(node: &OperatorNode) -> usize {
        node.operands
            .iter()
            .map(|operand| match operand {
                Operand::Operator(inner) if inner.operator == Operator::Eq => 1,
                Operand::Operator(inner) => leaf_count(inner),
                _ => 0,
            })
            .sum()
    }

    fn nested(depth: usize) -> FilterGroup {
        let mut group = FilterGroup::and().equals("leaf", depth as i64);
        for _ in 1..depth {
            group = FilterGroup::or().group(group);
        }
        group
    }

    #[test]
    fn test_leaf_compiles_to_equality() {
        let node = compile_filter(&FilterCondition::new("status", "paid").into()).unwrap();
        assert_eq!(node.operator, Operator::Eq);
        assert_eq!(node.operands.len(), 2);
        assert_eq!(node.operands[0], Operand::Field(FieldNode::unqualified("status")));
        match &node.operands[1] {
            Operand::Literal(lit) => assert_eq!(lit.data_type, LiteralType::String),
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_conditions_precede_groups() {
        let group = FilterGroup::or()
            .group(FilterGroup::and().equals("a", 1))
            .equals("b", 2);
        let node = compile_filter(&group.into()).unwrap();

        assert_eq!(node.operator, Operator::Or);
        let first = match &node.operands[0] {
            Operand::Operator(op) => op,
            other => panic!("expected operator, got {:?}", other),
        };
        assert_eq!(first.operator, Operator::Eq);
        assert_eq!(first.operands[0], Operand::Field(FieldNode::unqualified("b")));
        assert!(matches!(&node.operands[1], Operand::Operator(op) if op.operator == Operator::And));
    }

    #[test]
    fn test_empty_group_is_kept() {
        let node = compile_filter(&FilterGroup::or().into()).unwrap();
        assert_eq!(node, OperatorNode::new(Operator::Or, vec![]));
    }

    #[test]
    fn test_default_operator_is_and() {
        let group: FilterGroup = serde_json::from_str(r#"{ "conditions": [] }"#).unwrap();
        assert_eq!(group.operator, LogicalOp::And);
        let node = compile_filter(&group.into()).unwrap();
        assert_eq!(node.operator, Operator::And);
    }

    #[test]
    fn test_missing_value_is_null_literal() {
        let condition: FilterCondition =
            serde_json::from_str(r#"{ "field": "deleted_at" }"#).unwrap();
        let node = compile_filter(&condition.into()).unwrap();
        match &node.operands[1] {
            Operand::Literal(lit) => {
                assert_eq!(lit.value, Value::Null);
                assert_eq!(lit.data_type, LiteralType::Null);
            }
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_not_group() {
        let node = compile_filter(&FilterGroup::not().equals("archived", true).into()).unwrap();
        assert_eq!(node.operator, Operator::Not);
        assert_eq!(node.operands.len(), 1);
    }

    #[test]
    fn test_lossless_leaf_count() {
        let group = FilterGroup::and()
            .equals("a", 1)
            .equals("b", 2)
            .group(FilterGroup::or().equals("c", 3).group(FilterGroup::not().equals("d", 4)))
            .group(FilterGroup::or());
        let node = compile_filter(&group.into()).unwrap();
        assert_eq!(leaf_count(&node), 4);
    }

    #[test]
    fn test_declared_operator_ignored_by_default() {
        let condition = FilterCondition::new("total", 100).with_operator(ComparisonOp::Gt);
        let node = compile_filter(&condition.clone().into()).unwrap();
        assert_eq!(node.operator, Operator::Eq);

        let honoring = FilterCompiler {
            honor_operators: true,
            ..Default::default()
        };
        let node = honoring.compile(&condition.into()).unwrap();
        assert_eq!(node.operator, Operator::Gt);
    }

    #[test]
    fn test_unrecognised_operator_compiles_to_equality() {
        let query = crate::query::QueryDescription::from_json(
            r#"{ "target": "users", "filter": { "operator": "and", "groups": [
                 { "operator": "or", "conditions": [
                   { "field": "name", "operator": "startsWith", "value": "a" } ] } ] } }"#,
        )
        .unwrap();
        let filter = query.filter.unwrap();

        let honoring = FilterCompiler {
            honor_operators: true,
            ..Default::default()
        };
        for compiler in [FilterCompiler::default(), honoring] {
            let node = compiler.compile(&filter).unwrap();
            let Operand::Operator(or) = &node.operands[0] else {
                panic!("expected nested group, got {:?}", node.operands[0]);
            };
            let Operand::Operator(leaf) = &or.operands[0] else {
                panic!("expected leaf, got {:?}", or.operands[0]);
            };
            assert_eq!(leaf.operator, Operator::Eq);
            assert_eq!(leaf.operands[0], Operand::Field(FieldNode::unqualified("name")));
        }
    }

    #[test]
    fn test_depth_guard() {
        let compiler = FilterCompiler {
            max_depth: 8,
            ..Default::default()
        };
        assert!(compiler.compile(&nested(8).into()).is_ok());
        assert!(matches!(
            compiler.compile(&nested(9).into()),
            Err(QastError::FilterTooDeep { limit: 8 })
        ));
    }

    #[test]
    fn test_default_depth_handles_deep_trees() {
        assert!(compile_filter(&nested(200).into()).is_ok());
    }

    #[test]
    fn test_node_guard() {
        let compiler = FilterCompiler {
            max_nodes: Some(3),
            ..Default::default()
        };
        let ok = FilterGroup::and().equals("a", 1).equals("b", 2);
        assert!(compiler.compile(&ok.into()).is_ok());

        let too_big = FilterGroup::and().equals("a", 1).equals("b", 2).equals("c", 3);
        assert!(matches!(
            compiler.compile(&too_big.into()),
            Err(QastError::FilterTooLarge { limit: 3 })
        ));
    }
}
