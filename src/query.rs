//! Query descriptions: the declarative input of the compiler.
//!
//! These types mirror the JSON documents produced by query-builder front ends
//! and are trusted to be schema-valid. Absent collections deserialize as
//! empty, absent scalars as `None`.

use serde::{Deserialize, Serialize};

use crate::ast::{ComparisonOp, LogicalOp, SortOrder};
use crate::error::QastResult;
use crate::value::Value;

/// A declarative query over one collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryDescription {
    /// Collection or table being queried.
    #[serde(alias = "object")]
    pub target: String,
    /// Projected field references; empty means `*`.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ConditionTree>,
    #[serde(default)]
    pub joins: Vec<JoinConfig>,
    #[serde(default, alias = "groupBy")]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub sort: Vec<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default)]
    pub aggregations: Vec<AggregationSpec>,
}

impl QueryDescription {
    /// Start a query over `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Decode a query description from JSON text.
    ///
    /// Nesting is bounded by the filter compiler's depth guard, not by the
    /// JSON reader.
    pub fn from_json(json: &str) -> QastResult<Self> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let query = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(query)
    }

    /// Set the projected fields.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Set the filter root.
    pub fn filter(mut self, filter: impl Into<ConditionTree>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Append a join.
    pub fn join(mut self, join: JoinConfig) -> Self {
        self.joins.push(join);
        self
    }

    pub fn group_by(mut self, fields: &[&str]) -> Self {
        self.group_by = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Append an ascending sort key.
    pub fn sort_asc(mut self, field: &str) -> Self {
        self.sort.push(SortSpec::new(field, SortOrder::Asc));
        self
    }

    /// Append a descending sort key.
    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort.push(SortSpec::new(field, SortOrder::Desc));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Append an aggregation.
    pub fn aggregate(mut self, aggregation: AggregationSpec) -> Self {
        self.aggregations.push(aggregation);
        self
    }
}

/// A node of the filter tree: a single condition or a boolean group.
///
/// A node carrying `field` is a leaf; anything else is a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionTree {
    Leaf(FilterCondition),
    Group(FilterGroup),
}

impl From<FilterCondition> for ConditionTree {
    fn from(condition: FilterCondition) -> Self {
        ConditionTree::Leaf(condition)
    }
}

impl From<FilterGroup> for ConditionTree {
    fn from(group: FilterGroup) -> Self {
        ConditionTree::Group(group)
    }
}

/// A boolean group of conditions and nested groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Combinator; `and` when omitted.
    #[serde(default)]
    pub operator: LogicalOp,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
}

impl FilterGroup {
    pub fn new(operator: LogicalOp) -> Self {
        Self {
            operator,
            ..Default::default()
        }
    }

    pub fn and() -> Self {
        Self::new(LogicalOp::And)
    }

    pub fn or() -> Self {
        Self::new(LogicalOp::Or)
    }

    pub fn not() -> Self {
        Self::new(LogicalOp::Not)
    }

    /// Append an equality condition.
    pub fn equals(self, field: &str, value: impl Into<Value>) -> Self {
        self.condition(FilterCondition::new(field, value))
    }

    pub fn condition(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Append a nested group.
    pub fn group(mut self, group: FilterGroup) -> Self {
        self.groups.push(group);
        self
    }
}

/// A single `field <op> value` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    /// Compared value; absent means null.
    #[serde(default)]
    pub value: Value,
    /// Declared comparison, kept verbatim. Only honoured when the compiler is
    /// configured to; unrecognised spellings never fail decoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: None,
        }
    }

    pub fn with_operator(mut self, op: ComparisonOp) -> Self {
        self.operator = Some(op.as_str().to_string());
        self
    }

    /// The declared comparison, if present and recognised.
    pub fn declared_operator(&self) -> Option<Result<ComparisonOp, String>> {
        self.operator.as_deref().map(str::parse)
    }
}

/// A join against another collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Join kind, passed through verbatim.
    #[serde(rename = "type", default = "default_join_kind")]
    pub kind: String,
    /// Joined collection.
    #[serde(alias = "target")]
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub on: JoinOn,
}

fn default_join_kind() -> String {
    "inner".to_string()
}

impl JoinConfig {
    pub fn new(
        kind: impl Into<String>,
        object: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            object: object.into(),
            alias: None,
            on: JoinOn {
                local_field: local_field.into(),
                foreign_field: foreign_field.into(),
                local_alias: None,
            },
        }
    }

    pub fn inner(
        object: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> Self {
        Self::new("inner", object, local_field, foreign_field)
    }

    pub fn left(
        object: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> Self {
        Self::new("left", object, local_field, foreign_field)
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Qualify the local side of the predicate.
    pub fn local_alias(mut self, alias: impl Into<String>) -> Self {
        self.on.local_alias = Some(alias.into());
        self
    }
}

/// Equality predicate of a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinOn {
    pub local_field: String,
    pub foreign_field: String,
    /// Table or alias for an unqualified `local_field`. Without it the local
    /// side stays unqualified, which is only unambiguous for single-hop joins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_alias: Option<String>,
}

/// A sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default, alias = "direction")]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// An aggregate in the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSpec {
    /// Function name (`sum`, `count`, ...); not validated.
    #[serde(alias = "func")]
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub distinct: bool,
}

impl AggregationSpec {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            field: None,
            alias: None,
            distinct: false,
        }
    }

    pub fn count() -> Self {
        Self::new("count")
    }

    pub fn sum(field: &str) -> Self {
        Self::new("sum").field(field)
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal() {
        let q = QueryDescription::from_json(r#"{ "target": "orders" }"#).unwrap();
        assert_eq!(q, QueryDescription::new("orders"));
        assert!(q.filter.is_none());
    }

    #[test]
    fn test_decode_object_alias_and_group_by() {
        let q = QueryDescription::from_json(
            r#"{ "object": "orders", "groupBy": ["status"], "sort": [{ "field": "id", "order": "desc" }] }"#,
        )
        .unwrap();
        assert_eq!(q.target, "orders");
        assert_eq!(q.group_by, vec!["status"]);
        assert_eq!(q.sort, vec![SortSpec::new("id", SortOrder::Desc)]);
    }

    #[test]
    fn test_filter_root_leaf_or_group() {
        let leaf: ConditionTree =
            serde_json::from_str(r#"{ "field": "status", "value": "paid" }"#).unwrap();
        assert_eq!(leaf, ConditionTree::Leaf(FilterCondition::new("status", "paid")));

        let group: ConditionTree = serde_json::from_str(
            r#"{ "operator": "or", "conditions": [{ "field": "a", "value": 1 }] }"#,
        )
        .unwrap();
        assert_eq!(group, ConditionTree::Group(FilterGroup::or().equals("a", 1)));

        let empty: ConditionTree = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ConditionTree::Group(FilterGroup::and()));
    }

    #[test]
    fn test_condition_without_value_is_null() {
        let c: FilterCondition = serde_json::from_str(r#"{ "field": "deleted_at" }"#).unwrap();
        assert!(c.value.is_null());
        assert_eq!(c.operator, None);
    }

    #[test]
    fn test_unknown_operator_still_decodes() {
        let q = QueryDescription::from_json(
            r#"{ "target": "users", "filter": { "operator": "and", "conditions": [
                 { "field": "name", "operator": "startsWith", "value": "a" } ] } }"#,
        )
        .unwrap();
        let Some(ConditionTree::Group(group)) = &q.filter else {
            panic!("expected group, got {:?}", q.filter);
        };
        assert_eq!(group.conditions[0].operator.as_deref(), Some("startsWith"));
        assert!(matches!(group.conditions[0].declared_operator(), Some(Err(_))));

        let leaf: ConditionTree =
            serde_json::from_str(r#"{ "field": "n", "operator": "between", "value": [1, 2] }"#)
                .unwrap();
        assert!(matches!(leaf, ConditionTree::Leaf(_)));
    }

    #[test]
    fn test_decode_deeply_nested_filter() {
        let depth = 200;
        let mut json = String::from(r#"{ "field": "x", "value": 1 }"#);
        json = format!(r#"{{ "conditions": [{}] }}"#, json);
        for _ in 1..depth {
            json = format!(r#"{{ "operator": "or", "groups": [{}] }}"#, json);
        }
        let q = QueryDescription::from_json(&format!(r#"{{ "target": "t", "filter": {} }}"#, json))
            .unwrap();

        let mut levels = 0;
        let mut current = match &q.filter {
            Some(ConditionTree::Group(group)) => group,
            other => panic!("expected group, got {:?}", other),
        };
        loop {
            levels += 1;
            match current.groups.first() {
                Some(next) => current = next,
                None => break,
            }
        }
        assert_eq!(levels, depth);
        assert_eq!(current.conditions.len(), 1);
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert!(QueryDescription::from_json(r#"{ "target": "t" } x"#).is_err());
    }

    #[test]
    fn test_join_decode() {
        let j: JoinConfig = serde_json::from_str(
            r#"{ "type": "left", "object": "customers", "alias": "c",
                 "on": { "local_field": "customer_id", "foreign_field": "id" } }"#,
        )
        .unwrap();
        assert_eq!(j, JoinConfig::left("customers", "customer_id", "id").alias("c"));

        let j: JoinConfig = serde_json::from_str(
            r#"{ "object": "items", "on": { "local_field": "id", "foreign_field": "order_id" } }"#,
        )
        .unwrap();
        assert_eq!(j.kind, "inner");
    }

    #[test]
    fn test_aggregation_decode() {
        let a: AggregationSpec =
            serde_json::from_str(r#"{ "func": "count", "distinct": true }"#).unwrap();
        assert_eq!(a, AggregationSpec::count().distinct());
    }

    #[test]
    fn test_builder() {
        let q = QueryDescription::new("orders")
            .fields(&["id", "total"])
            .sort_desc("id")
            .limit(10)
            .offset(20);
        assert_eq!(q.fields, vec!["id", "total"]);
        assert_eq!(q.limit, Some(10));
        assert_eq!(q.offset, Some(20));
    }
}
