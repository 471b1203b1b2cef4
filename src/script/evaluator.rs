use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::ast::BinaryComparisonOperator;
use crate::script::{Accessor, Expr, FieldRef, Predicate, Stmt};

/// Errors raised while running a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// `.length` or a loop over something that is not an array
    #[error("not an array: {0}")]
    NotAnArray(String),

    /// Reference to a variable that was never declared
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    /// A loop variable used as an index holds a non-integer
    #[error("invalid index in {0}")]
    InvalidIndex(String),
}

enum Flow {
    Next,
    Break,
    Return(bool),
}

/// Returns a human-readable name for an accessor chain
fn describe(field: &FieldRef) -> String {
    let mut s = "this".to_string();
    for accessor in &field.accessors {
        match accessor {
            Accessor::Name(n) => {
                s.push('.');
                s.push_str(n);
            }
            Accessor::Index(i) => s.push_str(&format!("[{i}]")),
            Accessor::Var(v) => s.push_str(&format!("[{v}]")),
        }
    }
    s
}

/// Runs generated predicates against a JSON document.
///
/// Comparison follows the loose rules of the target scripting language:
/// numbers compare numerically (numeric strings are coerced), strings
/// lexicographically, and arrays or objects are never equal to anything.
/// A missing field reads as null. Null equals only null, and orders as 0
/// under `<`, `>`, `<=` and `>=`.
pub struct ScriptEvaluator<'a> {
    this: &'a Value,
    vars: HashMap<String, Value>,
}

impl<'a> ScriptEvaluator<'a> {
    pub fn new(this: &'a Value) -> Self {
        ScriptEvaluator {
            this,
            vars: HashMap::new(),
        }
    }

    /// Runs the predicate body. Falling off the end yields `false`.
    pub fn run(&mut self, predicate: &Predicate) -> Result<bool, ScriptError> {
        match self.eval_block(&predicate.body)? {
            Flow::Return(b) => Ok(b),
            Flow::Next | Flow::Break => Ok(false),
        }
    }

    fn eval_block(&mut self, stmts: &[Stmt]) -> Result<Flow, ScriptError> {
        for stmt in stmts {
            match self.eval_stmt(stmt)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Flow, ScriptError> {
        match stmt {
            Stmt::Let { var, value } | Stmt::Assign { var, value } => {
                let v = self.eval_expr(value)?;
                self.vars.insert(var.clone(), v);
                Ok(Flow::Next)
            }
            Stmt::For { var, over, body } => {
                let len = self.length(over)?;
                for i in 0..len {
                    self.vars.insert(var.clone(), Value::from(i));
                    match self.eval_block(body)? {
                        Flow::Next => {}
                        Flow::Break => break,
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Next)
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                if is_truthy(&self.eval_expr(cond)?) {
                    self.eval_block(then)
                } else {
                    self.eval_block(otherwise)
                }
            }
            Stmt::Return(value) => Ok(Flow::Return(is_truthy(&self.eval_expr(value)?))),
            Stmt::Break => Ok(Flow::Break),
        }
    }

    fn eval_expr(&self, expr: &Expr) -> Result<Value, ScriptError> {
        match expr {
            Expr::Field(field) => Ok(self.lookup(field)?.cloned().unwrap_or(Value::Null)),
            Expr::Length(field) => Ok(Value::from(self.length(field)?)),
            Expr::Var(name) => self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| ScriptError::UndefinedVariable(name.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Compare { op, left, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                Ok(Value::Bool(apply_compare(*op, &l, &r)))
            }
            Expr::Not(inner) => Ok(Value::Bool(!is_truthy(&self.eval_expr(inner)?))),
        }
    }

    /// Follows an accessor chain; `None` when a step is missing.
    fn lookup(&self, field: &FieldRef) -> Result<Option<&'a Value>, ScriptError> {
        let mut at = Some(self.this);
        for accessor in &field.accessors {
            let Some(current) = at else {
                return Ok(None);
            };
            at = match accessor {
                Accessor::Name(name) => current.get(name.as_str()),
                Accessor::Index(i) => current.get(*i),
                Accessor::Var(v) => {
                    let index = self
                        .vars
                        .get(v)
                        .ok_or_else(|| ScriptError::UndefinedVariable(v.clone()))?
                        .as_u64()
                        .ok_or_else(|| ScriptError::InvalidIndex(describe(field)))?;
                    current.get(index as usize)
                }
            };
        }
        Ok(at)
    }

    fn length(&self, field: &FieldRef) -> Result<usize, ScriptError> {
        match self.lookup(field)? {
            Some(Value::Array(items)) => Ok(items.len()),
            _ => Err(ScriptError::NotAnArray(describe(field))),
        }
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Loose equality ordering; `None` when the values are not comparable.
///
/// Null only equals null.
fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => None,
        (Value::Null, _) | (_, Value::Null) => None,
        (a, b) => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}

/// Relational ordering, where null converts to 0.
fn relational_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    let number = |v: &Value| match v {
        Value::Null => Some(0.0),
        v => as_number(v),
    };
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => None,
        (a, b) => number(a)?.partial_cmp(&number(b)?),
    }
}

fn apply_compare(op: BinaryComparisonOperator, left: &Value, right: &Value) -> bool {
    use BinaryComparisonOperator::*;
    match op {
        Eq => loose_cmp(left, right) == Some(Ordering::Equal),
        Neq => loose_cmp(left, right) != Some(Ordering::Equal),
        Lt => relational_cmp(left, right) == Some(Ordering::Less),
        Gt => relational_cmp(left, right) == Some(Ordering::Greater),
        Lte => matches!(relational_cmp(left, right), Some(Ordering::Less | Ordering::Equal)),
        Gte => matches!(
            relational_cmp(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}
