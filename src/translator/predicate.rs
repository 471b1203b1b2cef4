//! Predicate generation for field-to-field comparisons.
//!
//! Each wildcard of an operand path becomes a loop variable. With wildcards
//! on both sides the right operand's loops are outermost:
//!
//! ```text
//! a.*.x == b.*  ->  for(r0 over b) { for(l0 over a) { if(a[l0].x == b[r0]) return true } } return false
//! ```

use crate::ast::{BinaryComparisonOperator, NaryRelationalOperator, QueryExpr};
use crate::error::{Result, TranslateError};
use crate::metadata::{EntityMetadata, FieldKind};
use crate::path::{Path, Segment};
use crate::script::{Accessor, Expr, FieldRef, Predicate, Stmt};
use crate::translator::resolve;

/// Loop variable of the membership scan.
const MEMBER_VAR: &str = "nfr";
/// Loop variable of element-wise array comparisons.
const ELEMENT_VAR: &str = "i";

/// A path with its wildcards replaced by loop variables.
struct Unrolled {
    /// `(variable, array iterated)` outermost first
    loops: Vec<(String, FieldRef)>,
    /// Accessor for the current iteration
    field: FieldRef,
}

fn unroll(path: &Path, var_prefix: &str) -> Unrolled {
    let mut field = FieldRef::default();
    let mut loops = Vec::new();
    for segment in path.segments() {
        match segment {
            Segment::Any => {
                let var = format!("{var_prefix}{}", loops.len());
                loops.push((var.clone(), field.clone()));
                field.push(Accessor::Var(var));
            }
            Segment::Index(i) => field.push(Accessor::Index(*i)),
            Segment::Name(name) => field.push(Accessor::Name(name.clone())),
        }
    }
    Unrolled { loops, field }
}

/// Wraps `body` in `loops`, the first loop outermost.
fn nest(loops: Vec<(String, FieldRef)>, body: Vec<Stmt>) -> Vec<Stmt> {
    loops
        .into_iter()
        .rev()
        .fold(body, |body, (var, over)| vec![Stmt::For { var, over, body }])
}

fn is_whole_array(md: &EntityMetadata, path: &Path) -> Result<bool> {
    let id = resolve(md, md.root(), path)?;
    Ok(matches!(md.node(id).kind(), FieldKind::Array(_)))
}

/// The generated predicate of a field comparison or field membership query.
///
/// Other query forms have native operators and are a `TRANSLATION_ERROR`
/// here.
pub fn compile(md: &EntityMetadata, query: &QueryExpr) -> Result<Predicate> {
    match query {
        QueryExpr::FieldComparison { field, op, rfield } => {
            field_comparison(md, field, *op, rfield)
        }
        QueryExpr::NaryFieldRelational { field, op, rfield } => {
            field_membership(md, field, *op, rfield)
        }
        other => Err(TranslateError::Translation(format!(
            "no generated predicate for {other:?}"
        ))),
    }
}

/// Compiles `field op rfield` into a predicate.
fn field_comparison(
    md: &EntityMetadata,
    field: &Path,
    op: BinaryComparisonOperator,
    rfield: &Path,
) -> Result<Predicate> {
    let l_array = is_whole_array(md, field)?;
    let r_array = is_whole_array(md, rfield)?;
    let (ln, rn) = (field.n_anys(), rfield.n_anys());
    tracing::debug!(%field, %rfield, ln, rn, l_array, r_array, "compiling field comparison");

    let mut body = if ln > 0 && rn > 0 {
        let r = unroll(rfield, "r");
        let l = unroll(field, "l");
        let test = comparison(l.field, l_array, r.field, r_array, op);
        nest(r.loops.into_iter().chain(l.loops).collect(), test)
    } else if ln > 0 || rn > 0 {
        let (l, r, loops) = if ln > 0 {
            let l = unroll(field, "i");
            (l.field, FieldRef::from_path(rfield)?, l.loops)
        } else {
            let r = unroll(rfield, "i");
            (FieldRef::from_path(field)?, r.field, r.loops)
        };
        nest(loops, comparison(l, l_array, r, r_array, op))
    } else {
        comparison(
            FieldRef::from_path(field)?,
            l_array,
            FieldRef::from_path(rfield)?,
            r_array,
            op,
        )
    };
    body.push(Stmt::return_bool(false));
    Ok(Predicate::new(body))
}

/// Compiles `field in rfield` / `field not in rfield` into a predicate.
fn field_membership(
    md: &EntityMetadata,
    field: &Path,
    op: NaryRelationalOperator,
    rfield: &Path,
) -> Result<Predicate> {
    let id = resolve(md, md.root(), field)?;
    if !md
        .node(id)
        .field_type()
        .is_some_and(|t| t.supports_equality())
    {
        return Err(TranslateError::InvalidField(field.to_string()));
    }
    resolve(md, md.root(), rfield)?;

    let l = FieldRef::from_path(field)?;
    let r = FieldRef::from_path(rfield)?;
    let found = op == NaryRelationalOperator::In;
    Ok(Predicate::new(vec![
        Stmt::For {
            var: MEMBER_VAR.to_string(),
            over: r.clone(),
            body: vec![Stmt::when(
                Expr::compare(
                    BinaryComparisonOperator::Eq,
                    Expr::Field(l),
                    Expr::Field(r.indexed(MEMBER_VAR)),
                ),
                vec![Stmt::return_bool(found)],
            )],
        },
        Stmt::return_bool(!found),
    ]))
}

/// Statements that return true when `l op r` holds for one iteration.
fn comparison(
    l: FieldRef,
    l_array: bool,
    r: FieldRef,
    r_array: bool,
    op: BinaryComparisonOperator,
) -> Vec<Stmt> {
    match (l_array, r_array) {
        (true, true) => array_array(l, r, op),
        // a[i] op s  is  s op' a[i]
        (true, false) => array_scalar(r, l, op.invert()),
        (false, true) => array_scalar(l, r, op),
        (false, false) => vec![Stmt::when(
            Expr::compare(op, Expr::Field(l), Expr::Field(r)),
            vec![Stmt::return_bool(true)],
        )],
    }
}

/// Same length, then element-wise comparison.
fn array_array(l: FieldRef, r: FieldRef, op: BinaryComparisonOperator) -> Vec<Stmt> {
    use BinaryComparisonOperator::*;

    let same_length = Expr::compare(Eq, Expr::Length(l.clone()), Expr::Length(r.clone()));
    let l_el = Expr::Field(l.indexed(ELEMENT_VAR));
    let r_el = Expr::Field(r.indexed(ELEMENT_VAR));

    let (flag, mismatch) = match op {
        Eq | Neq => ("allEq", Expr::compare(Neq, l_el, r_el)),
        _ => ("allOk", Expr::not(Expr::compare(op, l_el, r_el))),
    };
    let scan = vec![
        Stmt::Let {
            var: flag.to_string(),
            value: Expr::Bool(true),
        },
        Stmt::For {
            var: ELEMENT_VAR.to_string(),
            over: l,
            body: vec![Stmt::when(
                mismatch,
                vec![
                    Stmt::Assign {
                        var: flag.to_string(),
                        value: Expr::Bool(false),
                    },
                    Stmt::Break,
                ],
            )],
        },
    ];

    let verdict = if op == Neq {
        Expr::not(Expr::Var(flag.to_string()))
    } else {
        Expr::Var(flag.to_string())
    };
    let mut then = scan;
    then.push(Stmt::when(verdict, vec![Stmt::return_bool(true)]));

    let otherwise = if op == Neq {
        vec![Stmt::return_bool(true)]
    } else {
        Vec::new()
    };
    vec![Stmt::If {
        cond: same_length,
        then,
        otherwise,
    }]
}

/// True when `scalar op a` holds for every element `a` of `array`.
fn array_scalar(scalar: FieldRef, array: FieldRef, op: BinaryComparisonOperator) -> Vec<Stmt> {
    vec![
        Stmt::Let {
            var: "allOk".to_string(),
            value: Expr::Bool(true),
        },
        Stmt::For {
            var: ELEMENT_VAR.to_string(),
            over: array.clone(),
            body: vec![Stmt::when(
                Expr::not(Expr::compare(
                    op,
                    Expr::Field(scalar),
                    Expr::Field(array.indexed(ELEMENT_VAR)),
                )),
                vec![
                    Stmt::Assign {
                        var: "allOk".to_string(),
                        value: Expr::Bool(false),
                    },
                    Stmt::Break,
                ],
            )],
        },
        Stmt::when(Expr::Var("allOk".to_string()), vec![Stmt::return_bool(true)]),
    ]
}
