//! Tree-walking evaluator.
//!
//! Values borrow function bodies from the `Program` they were declared in, so the program must
//! outlive the evaluation.  Environments are shared through `Rc`: a closure and every call made
//! through it keep the environment the closure was declared in alive.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{Decl, Expr, FunctionDecl, Program, Stmt, VariableKind};

#[derive(Debug, PartialEq, Clone)]
pub enum Value<'p> {
    Number(f64),
    Closure(Closure<'p>),
}

impl Value<'_> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Closure(_) => "function",
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Closure(c) => write!(f, "function {}/{}", c.name(), c.arity()),
        }
    }
}

/// A function declaration paired with the environment it was declared in.
#[derive(Clone)]
pub struct Closure<'p> {
    env: Rc<Env<'p>>,
    decl: &'p FunctionDecl,
}

impl<'p> Closure<'p> {
    pub fn name(&self) -> &'p str {
        &self.decl.name
    }

    pub fn arity(&self) -> usize {
        self.decl.parameters.len()
    }
}

impl fmt::Debug for Closure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.decl.name)
            .field("arity", &self.arity())
            .finish()
    }
}

/// Two closures are equal when they come from the same declaration evaluated in the same scope.
impl PartialEq for Closure<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.decl, other.decl) && Rc::ptr_eq(&self.env, &other.env)
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum InterpretError {
    #[error("no main function")]
    NoMainFunction,

    #[error("cannot call a value of type {0}")]
    CallOnNonFunction(&'static str),

    #[error("unbound identifier: {0}")]
    UnboundIdentifier(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("function {name} expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("function {0} ended without returning a value")]
    MissingReturn(String),

    #[error("redeclared binding: {0}")]
    Redeclared(String),

    #[error("interpreter crash: {0}")]
    Crash(String),
}

/// Runs a program: binds its declarations then calls `main` without arguments.
pub fn interpret(program: &Program) -> Result<f64, InterpretError> {
    Evaluator::new().run(program)
}

#[derive(Debug)]
pub struct Evaluator<'p> {
    globals: Rc<Env<'p>>,
    is_returning: Option<Value<'p>>,
    /// Call scopes kept alive by the closures their calls returned.
    retained: Vec<Weak<Env<'p>>>,
}

/// Scopes and the closures bound in them point at each other, so they are emptied here rather
/// than left to reference counting.
impl Drop for Evaluator<'_> {
    fn drop(&mut self) {
        for scope in self.retained.drain(..).filter_map(|s| s.upgrade()) {
            scope.release();
        }
        self.globals.release();
    }
}

impl Default for Evaluator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> Evaluator<'p> {
    pub fn new() -> Evaluator<'p> {
        Evaluator {
            globals: Env::new(),
            is_returning: None,
            retained: vec![],
        }
    }

    pub fn run(&mut self, program: &'p Program) -> Result<f64, InterpretError> {
        let globals = self.globals.clone();
        for decl in &program.declarations {
            self.eval_decl(decl, &globals)?;
        }
        if self.is_returning.is_some() {
            return Err(InterpretError::Crash(
                "return escaped a function body".to_string(),
            ));
        }

        let main = match globals.get("main") {
            Some(Value::Closure(main)) => main,
            _ => return Err(InterpretError::NoMainFunction),
        };
        debug!(declarations = program.declarations.len(), "calling main");
        match self.call(&main, vec![])? {
            Value::Number(n) => Ok(n),
            other => Err(InterpretError::TypeMismatch {
                expected: "number",
                found: other.type_name(),
            }),
        }
    }

    fn eval_decl(&mut self, decl: &'p Decl, env: &Rc<Env<'p>>) -> Result<(), InterpretError> {
        match decl {
            Decl::Function(f) => {
                trace!(name = %f.name, "binding function");
                env.define(
                    &f.name,
                    Value::Closure(Closure {
                        env: env.clone(),
                        decl: f,
                    }),
                );
            }
            Decl::Variable(v) => {
                for binding in &v.bindings {
                    let value = self.eval_expr(&binding.initializer, env)?;
                    trace!(name = %binding.name, keyword = v.kind.keyword(), "binding variable");
                    match v.kind {
                        VariableKind::Var => env.define(&binding.name, value),
                        VariableKind::Let | VariableKind::Const => {
                            env.declare(&binding.name, value)?
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn eval_stmts(&mut self, stmts: &'p [Stmt], env: &Rc<Env<'p>>) -> Result<(), InterpretError> {
        for stmt in stmts {
            if self.is_returning.is_some() {
                break;
            }
            self.eval_stmt(stmt, env)?;
        }
        Ok(())
    }

    fn eval_stmt(&mut self, stmt: &'p Stmt, env: &Rc<Env<'p>>) -> Result<(), InterpretError> {
        match stmt {
            Stmt::Expression(e) => {
                self.eval_expr(e, env)?;
            }
            Stmt::Return(e) => {
                debug_assert!(self.is_returning.is_none());
                self.is_returning = Some(self.eval_expr(e, env)?);
            }
            Stmt::Declaration(d) => self.eval_decl(d, env)?,
        }
        Ok(())
    }

    fn eval_expr(
        &mut self,
        expr: &'p Expr,
        env: &Rc<Env<'p>>,
    ) -> Result<Value<'p>, InterpretError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Identifier(name) => env
                .get(name)
                .ok_or_else(|| InterpretError::UnboundIdentifier(name.clone())),
            Expr::Binary(..) => self.eval_operators(expr, env),
            Expr::Call(callee, args) => {
                let function = match self.eval_expr(callee, env)? {
                    Value::Closure(c) => c,
                    other => return Err(InterpretError::CallOnNonFunction(other.type_name())),
                };
                let values = args
                    .iter()
                    .map(|a| self.eval_expr(a, env))
                    .collect::<Result<Vec<Value<'p>>, InterpretError>>()?;
                self.call(&function, values)
            }
        }
    }

    /// Evaluates a chain of operators without recursing down its left spine.
    ///
    /// Operands are evaluated left to right and each operation is applied as soon as its right
    /// operand is known, so `a + b * c` is `(a + b) * c`.
    fn eval_operators(
        &mut self,
        expr: &'p Expr,
        env: &Rc<Env<'p>>,
    ) -> Result<Value<'p>, InterpretError> {
        let mut tails = vec![];
        let mut leftmost = expr;
        while let Expr::Binary(op, lhs, rhs) = leftmost {
            tails.push((*op, &**rhs));
            leftmost = &**lhs;
        }

        let mut acc = self.eval_expr(leftmost, env)?;
        for (op, rhs) in tails.into_iter().rev() {
            let r = self.eval_expr(rhs, env)?;
            acc = match (acc, r) {
                (Value::Number(l), Value::Number(r)) => Value::Number(op.apply(l, r)),
                (Value::Number(_), other) | (other, _) => {
                    return Err(InterpretError::TypeMismatch {
                        expected: "number",
                        found: other.type_name(),
                    })
                }
            };
        }
        Ok(acc)
    }

    /// Calls `function` with already evaluated arguments.
    ///
    /// The body runs in a fresh scope whose parent is the scope the function was declared in,
    /// never the caller's.
    fn call(
        &mut self,
        function: &Closure<'p>,
        args: Vec<Value<'p>>,
    ) -> Result<Value<'p>, InterpretError> {
        if args.len() != function.arity() {
            return Err(InterpretError::ArityMismatch {
                name: function.name().to_string(),
                expected: function.arity(),
                found: args.len(),
            });
        }
        debug!(name = function.name(), arity = function.arity(), "call");

        let decl = function.decl;
        let call_env = Env::with_parent(Some(function.env.clone()));
        for (param, value) in decl.parameters.iter().zip(args) {
            call_env.define(param, value);
        }
        self.eval_stmts(&decl.body, &call_env)?;

        let result = self
            .is_returning
            .take()
            .ok_or_else(|| InterpretError::MissingReturn(function.name().to_string()))?;
        // Nothing declared during the call can outlive it unless it is returned.
        match result {
            Value::Number(_) => call_env.release(),
            Value::Closure(_) => self.retain(&call_env),
        }
        Ok(result)
    }

    fn retain(&mut self, scope: &Rc<Env<'p>>) {
        if self.retained.len() == self.retained.capacity() {
            self.retained.retain(|s| s.strong_count() > 0);
        }
        self.retained.push(Rc::downgrade(scope));
    }
}

#[derive(Debug)]
struct Env<'p> {
    parent: Option<Rc<Env<'p>>>,
    // Lookups are by name only, so binding order is never observed.
    bindings: RefCell<HashMap<String, Value<'p>>>,
}

impl<'p> Env<'p> {
    fn new() -> Rc<Env<'p>> {
        Self::with_parent(None)
    }

    fn with_parent(parent: Option<Rc<Env<'p>>>) -> Rc<Env<'p>> {
        Rc::new(Env {
            parent,
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Binds `name` in this scope, replacing any previous binding.
    fn define(&self, name: &str, val: Value<'p>) {
        self.bindings.borrow_mut().insert(name.to_string(), val);
    }

    /// Binds `name` in this scope, failing if it is already bound here.
    fn declare(&self, name: &str, val: Value<'p>) -> Result<(), InterpretError> {
        if let Entry::Vacant(entry) = self.bindings.borrow_mut().entry(name.to_string()) {
            entry.insert(val);
            Ok(())
        } else {
            Err(InterpretError::Redeclared(name.to_string()))
        }
    }

    fn get(&self, name: &str) -> Option<Value<'p>> {
        match self.bindings.borrow().get(name) {
            Some(v) => Some(v.clone()),
            None => self.parent.as_ref().and_then(|p| p.get(name)),
        }
    }

    /// Drops every binding, breaking cycles between this scope and closures declared in it.
    fn release(&self) {
        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        drop(bindings);
    }
}
