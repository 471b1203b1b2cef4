use serde_json::Value;

use crate::ast::{
    BinaryComparisonOperator, ContainsOperator, NaryLogicalOperator, NaryRelationalOperator,
    UnaryLogicalOperator,
};
use crate::path::{Path, Segment};

/// Flags of a regular-expression match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexOptions {
    pub case_insensitive: bool,
    pub multiline: bool,
    pub extended: bool,
    pub dot_all: bool,
}

impl RegexOptions {
    /// Option letters in `imxs` order.
    pub fn flags(&self) -> String {
        [
            (self.case_insensitive, 'i'),
            (self.multiline, 'm'),
            (self.extended, 'x'),
            (self.dot_all, 's'),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, c)| *c)
        .collect()
    }
}

/// A parsed query.
///
/// Field paths inside [`QueryExpr::ArrayMatch::elem_match`] are relative to
/// the array element.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    /// `field op literal`
    ///
    /// # Example
    /// ```text
    /// {"field": "age", "op": ">=", "rvalue": 18}
    /// ```
    ValueComparison {
        field: Path,
        op: BinaryComparisonOperator,
        rvalue: Value,
    },

    /// `field op rfield`
    FieldComparison {
        field: Path,
        op: BinaryComparisonOperator,
        rfield: Path,
    },

    /// `and` / `or` over child queries
    NaryLogical {
        op: NaryLogicalOperator,
        queries: Vec<QueryExpr>,
    },

    /// `not` of a child query
    UnaryLogical {
        op: UnaryLogicalOperator,
        query: Box<QueryExpr>,
    },

    /// `field in [values]` / `field not in [values]`
    NaryValueRelational {
        field: Path,
        op: NaryRelationalOperator,
        values: Vec<Value>,
    },

    /// `field in rfield` where `rfield` is an array
    NaryFieldRelational {
        field: Path,
        op: NaryRelationalOperator,
        rfield: Path,
    },

    /// `field` matches `regex`
    RegexMatch {
        field: Path,
        regex: String,
        options: RegexOptions,
    },

    /// `array` contains all/any/none of `values`
    ArrayContains {
        array: Path,
        op: ContainsOperator,
        values: Vec<Value>,
    },

    /// Some element of `array` matches `elem_match`
    ArrayMatch {
        array: Path,
        elem_match: Box<QueryExpr>,
    },
}

impl QueryExpr {
    /// True when evaluating the query needs the value of `field`.
    pub fn is_required(&self, field: &Path) -> bool {
        let mut referenced = Vec::new();
        self.referenced_fields(&Path::root(), &mut referenced);
        referenced.iter().any(|r| r.overlaps(field))
    }

    /// Absolute paths of every field the query reads.
    pub fn referenced_fields(&self, prefix: &Path, out: &mut Vec<Path>) {
        match self {
            QueryExpr::ValueComparison { field, .. }
            | QueryExpr::NaryValueRelational { field, .. }
            | QueryExpr::RegexMatch { field, .. } => out.push(prefix.join(field)),
            QueryExpr::FieldComparison { field, rfield, .. }
            | QueryExpr::NaryFieldRelational { field, rfield, .. } => {
                out.push(prefix.join(field));
                out.push(prefix.join(rfield));
            }
            QueryExpr::NaryLogical { queries, .. } => {
                for q in queries {
                    q.referenced_fields(prefix, out);
                }
            }
            QueryExpr::UnaryLogical { query, .. } => query.referenced_fields(prefix, out),
            QueryExpr::ArrayContains { array, .. } => out.push(prefix.join(array)),
            QueryExpr::ArrayMatch { array, elem_match } => {
                let array = prefix.join(array);
                elem_match.referenced_fields(&array.child(Segment::Any), out);
                out.push(array);
            }
        }
    }
}
