//! Script text rendering.
//!
//! Output is compact and deterministic: no indentation, one space around
//! comparison operators, and a space before every opening brace.

use crate::script::{Accessor, Expr, FieldRef, Predicate, Stmt};

#[derive(Debug, Default)]
pub struct ScriptPrinter {
    out: String,
}

impl ScriptPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(mut self, predicate: &Predicate) -> String {
        self.out.push_str("function() {");
        self.print_block(&predicate.body);
        self.out.push('}');
        self.out
    }

    fn print_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.print_stmt(stmt);
        }
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let { var, value } => {
                self.out.push_str("var ");
                self.out.push_str(var);
                self.out.push('=');
                self.print_expr(value);
                self.out.push(';');
            }
            Stmt::Assign { var, value } => {
                self.out.push_str(var);
                self.out.push('=');
                self.print_expr(value);
                self.out.push(';');
            }
            Stmt::For { var, over, body } => {
                self.out.push_str(&format!("for(var {var}=0;{var}<"));
                self.print_field(over);
                self.out.push_str(&format!(".length;{var}++) {{"));
                self.print_block(body);
                self.out.push('}');
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                self.out.push_str("if(");
                self.print_expr(cond);
                self.out.push_str(") {");
                self.print_block(then);
                self.out.push('}');
                if !otherwise.is_empty() {
                    self.out.push_str(" else {");
                    self.print_block(otherwise);
                    self.out.push('}');
                }
            }
            Stmt::Return(value) => {
                self.out.push_str("return ");
                self.print_expr(value);
                self.out.push(';');
            }
            Stmt::Break => self.out.push_str("break;"),
        }
    }

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Field(field) => self.print_field(field),
            Expr::Length(field) => {
                self.print_field(field);
                self.out.push_str(".length");
            }
            Expr::Var(name) => self.out.push_str(name),
            Expr::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Expr::Compare { op, left, right } => {
                self.print_expr(left);
                self.out.push(' ');
                self.out.push_str(op.script_symbol());
                self.out.push(' ');
                self.print_expr(right);
            }
            Expr::Not(inner) => {
                self.out.push_str("!(");
                self.print_expr(inner);
                self.out.push(')');
            }
        }
    }

    fn print_field(&mut self, field: &FieldRef) {
        self.out.push_str("this");
        for accessor in &field.accessors {
            match accessor {
                Accessor::Name(name) => {
                    self.out.push('.');
                    self.out.push_str(name);
                }
                Accessor::Index(i) => self.out.push_str(&format!("[{i}]")),
                Accessor::Var(v) => self.out.push_str(&format!("[{v}]")),
            }
        }
    }
}
