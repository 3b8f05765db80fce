//! Field reference resolution.
//!
//! `table.column` splits on the first `.`; anything after it, further dots
//! included, is the column name. Resolution never fails. Callers that need
//! malformed references rejected run [`crate::validate`] first.

use crate::ast::FieldNode;

/// Resolve a field reference, qualifying bare names with `implicit_table`.
///
/// An explicit qualifier always wins over `implicit_table`.
///
/// # Example
///
/// ```
/// use qast::resolve_field;
///
/// let f = resolve_field("orders.total", None);
/// assert_eq!(f.table.as_deref(), Some("orders"));
/// assert_eq!(f.name, "total");
///
/// let f = resolve_field("total", Some("orders"));
/// assert_eq!(f.table.as_deref(), Some("orders"));
/// ```
pub fn resolve_field(reference: &str, implicit_table: Option<&str>) -> FieldNode {
    match reference.split_once('.') {
        Some((table, name)) => FieldNode::qualified(table, name),
        None => FieldNode::new(implicit_table.map(str::to_string), reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified() {
        assert_eq!(
            resolve_field("orders.total", None),
            FieldNode::qualified("orders", "total")
        );
    }

    #[test]
    fn test_unqualified() {
        assert_eq!(resolve_field("total", None), FieldNode::unqualified("total"));
    }

    #[test]
    fn test_implicit_table() {
        assert_eq!(
            resolve_field("total", Some("orders")),
            FieldNode::qualified("orders", "total")
        );
    }

    #[test]
    fn test_explicit_qualifier_wins() {
        assert_eq!(
            resolve_field("o.total", Some("orders")),
            FieldNode::qualified("o", "total")
        );
    }

    #[test]
    fn test_multiple_dots_split_on_first() {
        assert_eq!(
            resolve_field("public.orders.total", None),
            FieldNode::qualified("public", "orders.total")
        );
    }

    #[test]
    fn test_wildcard() {
        assert!(resolve_field("*", None).is_wildcard());
        assert_eq!(resolve_field("c.*", None), FieldNode::qualified("c", "*"));
    }
}
