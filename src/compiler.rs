//! AST assembly.
//!
//! Sections are built in a fixed order: select, from, where, joins,
//! group_by, order_by, limit, offset. A section absent from the query stays
//! `None`; it is never materialized as an empty node.

use crate::ast::{
    AggregateNode, Ast, FieldNode, GroupByNode, LimitNode, OffsetNode, OrderByNode, OrderItem,
    SelectItem, WhereNode,
};
use crate::config::CompilerConfig;
use crate::error::QastResult;
use crate::field::resolve_field;
use crate::join::compile_join;
use crate::optimizer::{IdentityOptimizer, Optimizer};
use crate::query::{AggregationSpec, QueryDescription};
use crate::validate::check_field_refs;

/// Compile a query description with the default configuration.
///
/// # Example
///
/// ```
/// use qast::{build, QueryDescription};
///
/// let ast = build(&QueryDescription::new("orders").fields(&["id"]).limit(10)).unwrap();
/// assert_eq!(ast.to_string(), "SELECT id FROM orders LIMIT 10");
/// ```
pub fn build(query: &QueryDescription) -> QastResult<Ast> {
    QueryCompiler::new().build(query)
}

/// Compiles query descriptions into ASTs.
///
/// Holds no per-call state; one compiler can serve any number of threads.
pub struct QueryCompiler {
    config: CompilerConfig,
    optimizer: Box<dyn Optimizer>,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            config,
            optimizer: Box::new(IdentityOptimizer),
        }
    }

    /// Replace the optimizer run after assembly.
    pub fn with_optimizer(mut self, optimizer: impl Optimizer + 'static) -> Self {
        self.optimizer = Box::new(optimizer);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `query` into an AST.
    ///
    /// Fails only when a filter guard trips or, in strict mode, when a field
    /// reference is malformed. Nothing else is validated.
    pub fn build(&self, query: &QueryDescription) -> QastResult<Ast> {
        tracing::debug!(table = %query.target, "compiling query");

        if self.config.strict_field_refs {
            check_field_refs(query)?;
        }

        let mut ast = Ast::new(query.target.clone(), select_columns(query));

        if let Some(filter) = &query.filter {
            let condition = self.config.filter_compiler().compile(filter)?;
            ast.where_clause = Some(WhereNode { condition });
        }

        if !query.joins.is_empty() {
            ast.joins = Some(query.joins.iter().map(compile_join).collect());
        }

        if !query.group_by.is_empty() {
            ast.group_by = Some(GroupByNode {
                fields: query
                    .group_by
                    .iter()
                    .map(|field| resolve_field(field, None))
                    .collect(),
            });
        }

        if !query.sort.is_empty() {
            ast.order_by = Some(OrderByNode {
                items: query
                    .sort
                    .iter()
                    .map(|sort| OrderItem {
                        field: resolve_field(&sort.field, None),
                        direction: sort.order,
                    })
                    .collect(),
            });
        }

        ast.limit = query.limit.map(|value| LimitNode { value });
        ast.offset = query.offset.map(|value| OffsetNode { value });

        tracing::trace!(optimizer = self.optimizer.name(), "optimizing");
        Ok(self.optimizer.optimize(ast))
    }
}

impl std::fmt::Debug for QueryCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCompiler")
            .field("config", &self.config)
            .field("optimizer", &self.optimizer.name())
            .finish()
    }
}

fn select_columns(query: &QueryDescription) -> Vec<SelectItem> {
    let mut columns: Vec<SelectItem> = if query.fields.is_empty() {
        vec![SelectItem::Field(FieldNode::wildcard())]
    } else {
        query
            .fields
            .iter()
            .map(|field| SelectItem::Field(resolve_field(field, None)))
            .collect()
    };
    columns.extend(
        query
            .aggregations
            .iter()
            .map(|agg| SelectItem::Aggregate(compile_aggregation(agg))),
    );
    columns
}

/// Compile an aggregation spec. The function name is passed through as given.
pub fn compile_aggregation(spec: &AggregationSpec) -> AggregateNode {
    AggregateNode {
        function: spec.function.clone(),
        field: spec.field.as_deref().map(|f| resolve_field(f, None)),
        alias: spec.alias.clone(),
        distinct: spec.distinct,
    }
}
