//! Syntax tree produced by the parser.
//!
//! Every node exclusively owns its children: the tree has no sharing and no back references.
//! The evaluator borrows from it for as long as the program runs.

use std::fmt;
use std::mem;

/// Root of the tree: the top-level declarations, in source order.
#[derive(Debug, PartialEq)]
pub struct Program {
    pub declarations: Vec<Decl>,
}

#[derive(Debug, PartialEq)]
pub enum Decl {
    Function(FunctionDecl),
    Variable(VariableDecl),
}

#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq)]
pub struct VariableDecl {
    pub kind: VariableKind,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Binding {
    pub name: String,
    pub initializer: Expr,
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Return(Expr),
    Declaration(Box<Decl>),
}

#[derive(Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Identifier(String),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call(Box::new(callee), args)
    }
}

/// Operator chains nest as deep as they are long, so children are detached and dropped from a
/// work list instead of recursively.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = self.take_children();
        while let Some(mut expr) = pending.pop() {
            pending.append(&mut expr.take_children());
        }
    }
}

impl Expr {
    /// Moves the children out, leaving number leaves in their place.
    fn take_children(&mut self) -> Vec<Expr> {
        match self {
            Expr::Binary(_, lhs, rhs) => vec![
                mem::replace(&mut **lhs, Expr::Number(0.0)),
                mem::replace(&mut **rhs, Expr::Number(0.0)),
            ],
            Expr::Call(callee, args) => {
                let mut children = mem::take(args);
                children.push(mem::replace(&mut **callee, Expr::Number(0.0)));
                children
            }
            Expr::Number(_) | Expr::Identifier(_) => vec![],
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
}

impl BinaryOp {
    /// Maps an operator symbol to its operation.
    pub fn from_symbol(text: &str) -> Option<BinaryOp> {
        match text {
            "+" => Some(BinaryOp::Plus),
            "-" => Some(BinaryOp::Minus),
            "*" => Some(BinaryOp::Times),
            "/" => Some(BinaryOp::Divide),
            _ => None,
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Plus => lhs + rhs,
            BinaryOp::Minus => lhs - rhs,
            BinaryOp::Times => lhs * rhs,
            BinaryOp::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Plus => write!(f, "+"),
            BinaryOp::Minus => write!(f, "-"),
            BinaryOp::Times => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
        }
    }
}
