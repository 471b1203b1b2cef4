//! # Expression trees consumed by the translator
//!
//! Queries, updates, sorts and projections arrive already parsed. Each is a
//! closed enum so translation is an exhaustive `match`.
//!
//! - **[query]** - query expressions ([`QueryExpr`])
//! - **[update]** - update expressions ([`UpdateExpr`])
//! - **[sort]** - sort keys ([`Sort`])
//! - **[projection]** - projections ([`Projection`])
//! - **[operators]** - operator enums and their native/script spellings
//!
//! ## Example
//!
//! ```
//! use mongo_translator::ast::{BinaryComparisonOperator, QueryExpr};
//! use mongo_translator::Path;
//! use serde_json::json;
//!
//! // age >= 18
//! let q = QueryExpr::ValueComparison {
//!     field: Path::parse("age").unwrap(),
//!     op: BinaryComparisonOperator::Gte,
//!     rvalue: json!(18),
//! };
//! assert!(q.is_required(&Path::parse("age").unwrap()));
//! ```
pub mod operators;
pub mod projection;
pub mod query;
pub mod sort;
pub mod update;

pub use operators::{
    BinaryComparisonOperator, ContainsOperator, NaryLogicalOperator, NaryRelationalOperator,
    UnaryLogicalOperator, UpdateOperator,
};
pub use projection::Projection;
pub use query::{QueryExpr, RegexOptions};
pub use sort::{Sort, SortKey};
pub use update::{ArrayUpdateExpr, FieldAndRValue, RValue, UpdateExpr};
