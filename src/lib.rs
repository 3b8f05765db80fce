//! # qast — query descriptions to typed ASTs
//!
//! qast compiles a declarative, JSON-serializable query description into a
//! normalized abstract syntax tree for planners, SQL generators, or
//! in-memory evaluators. It executes nothing and talks to no database.
//!
//! ## Quick Example
//!
//! ```
//! use qast::prelude::*;
//!
//! let query = QueryDescription::from_json(r#"{
//!     "target": "orders",
//!     "fields": ["id", "total"],
//!     "filter": { "operator": "and", "conditions": [
//!         { "field": "status", "value": "paid" },
//!         { "field": "total", "value": 100 }
//!     ] },
//!     "sort": [{ "field": "id", "order": "desc" }],
//!     "limit": 10
//! }"#).unwrap();
//!
//! let ast = qast::build(&query).unwrap();
//! assert_eq!(
//!     ast.to_string(),
//!     "SELECT id, total FROM orders WHERE (status = 'paid' AND total = 100) ORDER BY id DESC LIMIT 10"
//! );
//! ```
//!
//! ## Components
//!
//! | Module       | Role                                             |
//! |--------------|--------------------------------------------------|
//! | [`field`]    | `table.column` references to field nodes         |
//! | [`literal`]  | Type tags for raw values                         |
//! | [`filter`]   | Boolean condition trees to operator trees        |
//! | [`join`]     | Join specs to join nodes with `on` predicates    |
//! | [`compiler`] | Assembles the AST and runs the optimizer         |

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod fmt;
pub mod join;
pub mod literal;
pub mod optimizer;
pub mod parser;
pub mod query;
pub mod validate;
pub mod value;

pub use compiler::{QueryCompiler, build};
pub use field::resolve_field;
pub use filter::compile_filter;
pub use join::compile_join;
pub use literal::classify;
pub use optimizer::optimize;
pub use query::QueryDescription;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::compiler::{QueryCompiler, build, compile_aggregation};
    pub use crate::config::CompilerConfig;
    pub use crate::error::*;
    pub use crate::field::resolve_field;
    pub use crate::filter::{FilterCompiler, compile_filter};
    pub use crate::join::compile_join;
    pub use crate::literal::classify;
    pub use crate::optimizer::{IdentityOptimizer, Optimizer, OptimizerChain, optimize};
    pub use crate::query::*;
    pub use crate::value::Value;
}
