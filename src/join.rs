//! Join compilation.

use crate::ast::{JoinNode, OperatorNode};
use crate::field::resolve_field;
use crate::query::JoinConfig;

/// Compile one join into a node with an equality `on` predicate.
///
/// The foreign field is qualified with the join's alias, or its table when no
/// alias is given. The local field is qualified only by an explicit
/// `on.local_alias`; otherwise it is left for the outer scope to bind.
pub fn compile_join(spec: &JoinConfig) -> JoinNode {
    let foreign_scope = spec.alias.as_deref().unwrap_or(&spec.object);

    let local = resolve_field(&spec.on.local_field, spec.on.local_alias.as_deref());
    let foreign = resolve_field(&spec.on.foreign_field, Some(foreign_scope));

    JoinNode {
        kind: spec.kind.clone(),
        table: spec.object.clone(),
        alias: spec.alias.clone(),
        on: OperatorNode::field_eq(local, foreign),
    }
}
