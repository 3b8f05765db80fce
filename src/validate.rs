//! Strict field-reference checks.
//!
//! Runs before compilation when strict mode is on. Only reference syntax is
//! checked; names are not looked up in any catalog.

use crate::error::{QastError, QastResult};
use crate::parser::parse_field_ref;
use crate::query::{ConditionTree, FilterGroup, QueryDescription};

/// Check every field reference in `query`, reporting the first bad one.
pub fn check_field_refs(query: &QueryDescription) -> QastResult<()> {
    for (i, field) in query.fields.iter().enumerate() {
        check(field, || format!("fields[{}]", i))?;
    }
    if let Some(filter) = &query.filter {
        check_filter(filter)?;
    }
    for (i, join) in query.joins.iter().enumerate() {
        check(&join.on.local_field, || format!("joins[{}].on.local_field", i))?;
        check(&join.on.foreign_field, || format!("joins[{}].on.foreign_field", i))?;
    }
    for (i, field) in query.group_by.iter().enumerate() {
        check(field, || format!("group_by[{}]", i))?;
    }
    for (i, sort) in query.sort.iter().enumerate() {
        check(&sort.field, || format!("sort[{}].field", i))?;
    }
    for (i, agg) in query.aggregations.iter().enumerate() {
        if let Some(field) = &agg.field {
            check(field, || format!("aggregations[{}].field", i))?;
        }
    }
    Ok(())
}

fn check_filter(tree: &ConditionTree) -> QastResult<()> {
    match tree {
        ConditionTree::Leaf(condition) => check(&condition.field, || "filter".to_string()),
        ConditionTree::Group(group) => {
            // Iterative walk; depth is not bounded at this point.
            let mut pending: Vec<(&FilterGroup, String)> = vec![(group, "filter".to_string())];
            while let Some((group, path)) = pending.pop() {
                for (i, condition) in group.conditions.iter().enumerate() {
                    check(&condition.field, || format!("{}.conditions[{}]", path, i))?;
                }
                for (i, nested) in group.groups.iter().enumerate().rev() {
                    pending.push((nested, format!("{}.groups[{}]", path, i)));
                }
            }
            Ok(())
        }
    }
}

fn check(reference: &str, location: impl FnOnce() -> String) -> QastResult<()> {
    parse_field_ref(reference)
        .map(|_| ())
        .map_err(|message| QastError::invalid_field(reference, location(), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{AggregationSpec, FilterGroup, JoinConfig};

    fn location(result: QastResult<()>) -> String {
        match result {
            Err(QastError::InvalidFieldRef { location, .. }) => location,
            other => panic!("expected InvalidFieldRef, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_query_passes() {
        let query = QueryDescription::new("orders")
            .fields(&["id", "orders.total", "c.*"])
            .filter(FilterGroup::and().equals("status", "paid"))
            .join(JoinConfig::left("customers", "customer_id", "id").alias("c"))
            .group_by(&["status"])
            .sort_desc("id")
            .aggregate(AggregationSpec::sum("total"));
        assert!(check_field_refs(&query).is_ok());
    }

    #[test]
    fn test_reports_projection() {
        let query = QueryDescription::new("orders").fields(&["id", "a.b.c"]);
        assert_eq!(location(check_field_refs(&query)), "fields[1]");
    }

    #[test]
    fn test_reports_nested_filter_path() {
        let query = QueryDescription::new("orders").filter(
            FilterGroup::and()
                .equals("ok", 1)
                .group(FilterGroup::or().equals("fine", 2).equals("not ok", 3)),
        );
        assert_eq!(
            location(check_field_refs(&query)),
            "filter.groups[0].conditions[1]"
        );
    }

    #[test]
    fn test_reports_join_side() {
        let query =
            QueryDescription::new("orders").join(JoinConfig::inner("customers", "customer_id", ""));
        assert_eq!(location(check_field_refs(&query)), "joins[0].on.foreign_field");
    }

    #[test]
    fn test_reports_aggregation() {
        let query = QueryDescription::new("orders").aggregate(AggregationSpec::sum("x..y"));
        assert_eq!(location(check_field_refs(&query)), "aggregations[0].field");
    }
}
