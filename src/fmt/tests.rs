use super::Formatter;
use crate::build;
use crate::query::{AggregationSpec, FilterGroup, JoinConfig, QueryDescription};

fn render(query: &QueryDescription) -> String {
    Formatter::new().format(&build(query).unwrap()).unwrap()
}

#[test]
fn test_minimal() {
    assert_eq!(render(&QueryDescription::new("users")), "select\n  field *\nfrom users\n");
}

#[test]
fn test_where_tree() {
    let query = QueryDescription::new("orders")
        .fields(&["id"])
        .filter(
            FilterGroup::and()
                .equals("status", "paid")
                .group(FilterGroup::or().equals("total", 100)),
        )
        .limit(10);

    let expected = "\
select
  field id
from orders
where
  operator and
    operator =
      field status
      literal 'paid' : string
    operator or
      operator =
        field total
        literal 100 : number
limit 10
";
    assert_eq!(render(&query), expected);
}

#[test]
fn test_join_group_order() {
    let query = QueryDescription::new("orders")
        .join(JoinConfig::left("customers", "customer_id", "id").alias("c"))
        .group_by(&["c.region"])
        .aggregate(AggregationSpec::count().alias("n"))
        .sort_desc("n")
        .offset(20);

    let expected = "\
select
  field *
  aggregate COUNT(*) AS n
from orders
join left customers as c
  on
    operator =
      field customer_id
      field c.id
group_by
  field c.region
order_by
  field n DESC
offset 20
";
    assert_eq!(render(&query), expected);
}
