//! # Generated predicates
//!
//! Comparisons the native operator language cannot express are compiled into
//! a small statement tree and shipped to the store as the text of a
//! `function() {...}` predicate evaluated against `this` (the stored record).
//!
//! The tree is built by the query translator, rendered by [`printer`], and can
//! be run in-process by [`evaluator`] against a JSON document.
//!
//! ```text
//! function() {for(var i0=0;i0<this.a.length;i0++) {if(this.a[i0] == this.b) {return true;}}return false;}
//! ```
pub mod evaluator;
pub mod printer;

pub use evaluator::{ScriptError, ScriptEvaluator};
pub use printer::ScriptPrinter;

use crate::ast::BinaryComparisonOperator;
use crate::error::TranslateError;
use crate::path::{Path, Segment};

/// One step of a field accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// `.name`
    Name(String),
    /// `[n]`
    Index(usize),
    /// `[var]`, a loop variable
    Var(String),
}

/// Accessor chain starting at `this`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRef {
    pub accessors: Vec<Accessor>,
}

impl FieldRef {
    /// Accessor for a path without wildcards.
    pub fn from_path(path: &Path) -> Result<Self, TranslateError> {
        let accessors = path
            .segments()
            .iter()
            .map(|s| match s {
                Segment::Name(name) => Ok(Accessor::Name(name.clone())),
                Segment::Index(i) => Ok(Accessor::Index(*i)),
                Segment::Any => Err(TranslateError::Translation(path.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FieldRef { accessors })
    }

    /// `self[var]`
    pub fn indexed(&self, var: &str) -> Self {
        let mut accessors = self.accessors.clone();
        accessors.push(Accessor::Var(var.to_string()));
        FieldRef { accessors }
    }

    pub fn push(&mut self, accessor: Accessor) {
        self.accessors.push(accessor);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Field(FieldRef),
    /// `field.length`
    Length(FieldRef),
    Var(String),
    Bool(bool),
    Compare {
        op: BinaryComparisonOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
}

impl Expr {
    pub fn compare(op: BinaryComparisonOperator, left: Expr, right: Expr) -> Self {
        Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `var name=value;`
    Let { var: String, value: Expr },
    /// `name=value;`
    Assign { var: String, value: Expr },
    /// `for(var v=0;v<this.over.length;v++) {body}`
    For {
        var: String,
        over: FieldRef,
        body: Vec<Stmt>,
    },
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    Return(Expr),
    Break,
}

impl Stmt {
    /// `if(cond) {then}`
    pub fn when(cond: Expr, then: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then,
            otherwise: Vec::new(),
        }
    }

    pub fn return_bool(b: bool) -> Self {
        Stmt::Return(Expr::Bool(b))
    }
}

/// A complete boolean predicate over `this`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub body: Vec<Stmt>,
}

impl Predicate {
    pub fn new(body: Vec<Stmt>) -> Self {
        Predicate { body }
    }

    /// Script text, `function() {...}`.
    pub fn render(&self) -> String {
        ScriptPrinter::new().print(self)
    }

    /// Runs the predicate with `this` bound to `document`.
    pub fn evaluate(&self, document: &serde_json::Value) -> Result<bool, ScriptError> {
        ScriptEvaluator::new(document).run(self)
    }

    /// Runs the predicate against a physical record.
    pub fn evaluate_record(&self, record: &bson::Document) -> Result<bool, ScriptError> {
        let document = bson::Bson::Document(record.clone()).into_relaxed_extjson();
        self.evaluate(&document)
    }
}
