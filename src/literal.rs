//! Literal classification.

use crate::ast::{LiteralNode, LiteralType};
use crate::value::Value;

/// Tag a raw value with its AST-level type.
///
/// First match wins: null, number, boolean, date, and everything else
/// (arrays and objects included) is carried as an opaque `string` literal.
pub fn classify(value: &Value) -> LiteralNode {
    let data_type = match value {
        Value::Null => LiteralType::Null,
        Value::Int(_) | Value::Float(_) => LiteralType::Number,
        Value::Bool(_) => LiteralType::Boolean,
        Value::Date(_) => LiteralType::Date,
        Value::String(_) | Value::Array(_) | Value::Object(_) => LiteralType::String,
    };
    LiteralNode {
        value: value.clone(),
        data_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn tag(v: impl Into<Value>) -> LiteralType {
        classify(&v.into()).data_type
    }

    #[test]
    fn test_classification() {
        assert_eq!(tag(Value::Null), LiteralType::Null);
        assert_eq!(tag(42), LiteralType::Number);
        assert_eq!(tag(2.5), LiteralType::Number);
        assert_eq!(tag(true), LiteralType::Boolean);
        assert_eq!(tag("x"), LiteralType::String);
        assert_eq!(tag(Utc::now()), LiteralType::Date);
    }

    #[test]
    fn test_composites_are_strings() {
        assert_eq!(tag(Value::from(json!([1, 2]))), LiteralType::String);
        assert_eq!(tag(Value::from(json!({ "a": 1 }))), LiteralType::String);
    }

    #[test]
    fn test_value_is_kept() {
        let lit = classify(&Value::from("paid"));
        assert_eq!(lit.value, Value::String("paid".to_string()));
    }
}
