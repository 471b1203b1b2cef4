use serde_json::Value;

use crate::ast::UpdateOperator;
use crate::path::Path;

/// Right-hand side of a set-style update.
#[derive(Debug, Clone, PartialEq)]
pub enum RValue {
    /// Literal value
    Value(Value),
    /// Value copied from another field
    Field(Path),
    /// `{}`
    EmptyObject,
    /// `[]`
    EmptyArray,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAndRValue {
    pub field: Path,
    pub rvalue: RValue,
}

impl FieldAndRValue {
    /// Literal assignment `field := value`.
    pub fn value(field: Path, value: Value) -> Self {
        FieldAndRValue {
            field,
            rvalue: RValue::Value(value),
        }
    }
}

/// Array modifications, never translated natively.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayUpdateExpr {
    Append { field: Path, values: Vec<RValue> },
    Insert { field: Path, values: Vec<RValue> },
    /// Apply `update` to elements of `field` matching `filter`
    ForEach {
        field: Path,
        filter: Box<crate::ast::QueryExpr>,
        update: Box<UpdateExpr>,
    },
}

impl ArrayUpdateExpr {
    /// The array being modified.
    pub fn field(&self) -> &Path {
        match self {
            ArrayUpdateExpr::Append { field, .. }
            | ArrayUpdateExpr::Insert { field, .. }
            | ArrayUpdateExpr::ForEach { field, .. } => field,
        }
    }
}

/// A parsed update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateExpr {
    /// `$set` / `$add` of one or more fields
    Set {
        op: UpdateOperator,
        fields: Vec<FieldAndRValue>,
    },
    /// `$unset` of one or more fields
    Unset { fields: Vec<Path> },
    Array(ArrayUpdateExpr),
    /// Updates applied in order
    List(Vec<UpdateExpr>),
}
