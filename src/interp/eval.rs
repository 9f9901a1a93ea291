//! Tree-walking evaluator

use std::rc::Rc;

use crate::ast::{BinaryOp, Callee, Expr, UnaryOp};
use crate::config::{EvalConfig, PowSemantics};
use crate::diagnostics::{Diagnostics, RuntimeError};

use super::env::Environment;
use super::stack::ensure_sufficient_stack;
use super::value::{FunctionValue, Number, Value};

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;

/// Binary operators that compute a number
#[derive(Debug, Clone, Copy)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl ArithOp {
    fn from_binary(op: BinaryOp) -> Option<Self> {
        match op {
            BinaryOp::Add => Some(ArithOp::Add),
            BinaryOp::Sub => Some(ArithOp::Sub),
            BinaryOp::Mul => Some(ArithOp::Mul),
            BinaryOp::Div => Some(ArithOp::Div),
            BinaryOp::Pow => Some(ArithOp::Pow),
            BinaryOp::Assign => None,
        }
    }
}

/// Tree-walking interpreter.
///
/// Holds no bindings of its own: every evaluation runs against the
/// [`Environment`] passed in, so one interpreter can serve any number of
/// sessions one after another.
pub struct Interpreter {
    config: EvalConfig,
    /// Errors recovered so far
    diagnostics: Diagnostics,
    /// Number of calls currently active
    depth: usize,
}

impl Interpreter {
    /// Create an interpreter with the default configuration
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Interpreter {
            config,
            diagnostics: Diagnostics::new(),
            depth: 0,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Errors recovered since the last [`take_diagnostics`](Self::take_diagnostics)
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// Evaluate an expression against `env`.
    ///
    /// Recoverable errors are recorded and replaced by a default value unless
    /// the interpreter is strict. Fatal errors are returned.
    pub fn eval(&mut self, expr: &Expr, env: &mut Environment) -> Result<Value> {
        ensure_sufficient_stack(|| self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Expr, env: &mut Environment) -> Result<Value> {
        tracing::trace!(node = expr.kind_name(), depth = self.depth, "eval");

        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Ident(name) => Ok(Value::Ident(name.clone())),

            Expr::Unary { op, operand } => {
                let val = self.eval(operand, env)?;
                self.eval_unary(*op, val, env)
            }

            Expr::Binary { op, left, right } => match ArithOp::from_binary(*op) {
                Some(arith) => {
                    let lhs = self.eval(left, env)?;
                    let rhs = self.eval(right, env)?;
                    self.eval_arith(arith, &lhs, &rhs, env)
                }
                None => self.eval_assign(left, right, env),
            },

            Expr::Sequence(items) => {
                // An empty sequence yields integer zero
                let mut result = Value::Int(0);
                for item in items {
                    result = self.eval(item, env)?;
                }
                Ok(result)
            }

            Expr::FuncDef { params, body } => {
                let func = FunctionValue::new(
                    env.snapshot_globals(),
                    params.clone(),
                    Rc::new(body.as_ref().clone()),
                );
                tracing::debug!(
                    arity = func.arity(),
                    captured = func.captured.len(),
                    "function defined"
                );
                Ok(Value::Function(func))
            }

            Expr::FuncCall { callee, args } => self.eval_call(callee, args, env),
        }
    }

    /// Resolve a value to a number (the reference rule).
    ///
    /// Numbers are used as they are; identifiers are looked up and the rule
    /// is applied again to whatever they are bound to. Anything else is a
    /// recoverable error with `Float(0.0)` as the default.
    pub fn resolve_number(&mut self, value: &Value, env: &Environment) -> Result<Number> {
        match deref_number(value, env) {
            Ok(n) => Ok(n),
            Err(err) => self.recover(err, Number::Float(0.0)),
        }
    }

    /// Record a recoverable error and return the default, or fail when strict
    fn recover<T>(&mut self, err: RuntimeError, default: T) -> Result<T> {
        if self.config.strict {
            return Err(err);
        }
        tracing::warn!("{}", err);
        self.diagnostics.record(err);
        Ok(default)
    }

    fn eval_unary(&mut self, op: UnaryOp, val: Value, env: &Environment) -> Result<Value> {
        match op {
            UnaryOp::Plus => Ok(val),
            UnaryOp::Minus => match self.resolve_number(&val, env)? {
                Number::Int(n) => Ok(Value::Int(n.wrapping_neg())),
                Number::Float(f) => Ok(Value::Float(-f)),
            },
        }
    }

    fn eval_arith(
        &mut self,
        op: ArithOp,
        lhs: &Value,
        rhs: &Value,
        env: &Environment,
    ) -> Result<Value> {
        let l = self.resolve_number(lhs, env)?;
        let r = self.resolve_number(rhs, env)?;

        let result = match (l, r) {
            (Number::Int(a), Number::Int(b)) => self.int_arith(op, a, b)?,
            (l, r) => Number::Float(float_arith(op, l.to_f64(), r.to_f64())),
        };
        Ok(result.into())
    }

    fn int_arith(&self, op: ArithOp, a: i64, b: i64) -> Result<Number> {
        match op {
            ArithOp::Add => Ok(Number::Int(a.wrapping_add(b))),
            ArithOp::Sub => Ok(Number::Int(a.wrapping_sub(b))),
            ArithOp::Mul => Ok(Number::Int(a.wrapping_mul(b))),
            ArithOp::Div => int_div(a, b),
            ArithOp::Pow => match self.config.pow {
                PowSemantics::Exponent => Ok(int_pow(a, b)),
                PowSemantics::LegacyDivide => int_div(a, b),
            },
        }
    }

    fn eval_assign(&mut self, left: &Expr, right: &Expr, env: &mut Environment) -> Result<Value> {
        let value = self.eval(right, env)?;
        let target = self.eval(left, env)?;

        match target {
            Value::Ident(name) => {
                if env.global(&name).is_none() {
                    tracing::debug!(%name, "new variable");
                }
                env.assign_global(name, value.clone());
                Ok(value)
            }
            other => {
                let err = RuntimeError::InvalidAssignTarget {
                    found: other.type_name(),
                };
                self.recover(err, Value::Float(0.0))
            }
        }
    }

    fn eval_call(&mut self, callee: &Callee, args: &[Expr], env: &mut Environment) -> Result<Value> {
        let func = match callee {
            Callee::Function(func) => func.clone(),
            Callee::Name(name) => match env.resolve(name) {
                Some(Value::Function(func)) => func.clone(),
                Some(other) => {
                    let err = RuntimeError::NotCallable {
                        name: name.clone(),
                        found: other.type_name(),
                    };
                    return self.recover(err, Value::Int(0));
                }
                None => {
                    let err = RuntimeError::UnresolvedReference { name: name.clone() };
                    return self.recover(err, Value::Int(0));
                }
            },
        };

        if func.arity() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                expected: func.arity(),
                found: args.len(),
            });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }

        // Arguments see the caller's scope
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval(arg, env)?);
        }

        let FunctionValue {
            captured,
            params,
            body,
        } = func;
        let mut local = captured;
        for (param, value) in params.into_iter().zip(arg_values) {
            local.insert(param, value);
        }

        tracing::trace!(arity = args.len(), depth = self.depth, "enter call");
        self.depth += 1;
        let result = {
            let mut frame = env.call_frame(local);
            self.eval(&body, &mut frame)
        };
        self.depth -= 1;
        tracing::trace!(depth = self.depth, ok = result.is_ok(), "exit call");

        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Follow identifier bindings until a number turns up
fn deref_number<'a>(value: &'a Value, env: &'a Environment) -> Result<Number> {
    let mut current = value;
    let mut seen: Vec<&'a str> = Vec::new();

    loop {
        match current {
            Value::Int(n) => return Ok(Number::Int(*n)),
            Value::Float(f) => return Ok(Number::Float(*f)),
            Value::Function(_) => {
                return Err(RuntimeError::NotNumeric {
                    found: current.type_name(),
                });
            }
            Value::Ident(name) => {
                if seen.contains(&name.as_str()) {
                    return Err(RuntimeError::CyclicReference { name: name.clone() });
                }
                seen.push(name);
                current = env
                    .resolve(name)
                    .ok_or_else(|| RuntimeError::UnresolvedReference { name: name.clone() })?;
            }
        }
    }
}

/// Truncating division; zero divisor is fatal
fn int_div(a: i64, b: i64) -> Result<Number> {
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Number::Int(a.wrapping_div(b)))
}

/// Integer power for exponents that fit `u32`, float power otherwise
fn int_pow(base: i64, exp: i64) -> Number {
    match u32::try_from(exp) {
        Ok(e) => Number::Int(base.wrapping_pow(e)),
        Err(_) => Number::Float((base as f64).powf(exp as f64)),
    }
}

fn float_arith(op: ArithOp, a: f64, b: f64) -> f64 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::Pow => a.powf(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &Expr) -> Value {
        let mut env = Environment::new();
        Interpreter::new().eval(expr, &mut env).unwrap()
    }

    #[test]
    fn test_int_pow_negative_exponent_is_float() {
        assert_eq!(int_pow(2, -1), Number::Float(0.5));
        assert_eq!(int_pow(3, 4), Number::Int(81));
    }

    #[test]
    fn test_int_div_truncates_toward_zero() {
        assert_eq!(int_div(-7, 2).unwrap(), Number::Int(-3));
        assert_eq!(int_div(i64::MIN, -1).unwrap(), Number::Int(i64::MIN));
        assert_eq!(int_div(1, 0), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn test_leaves_pass_through() {
        assert_eq!(eval(&Expr::ident("x")), Value::Ident("x".into()));
        assert_eq!(eval(&Expr::float(1.25)), Value::Float(1.25));
    }

    #[test]
    fn test_unary_plus_does_not_resolve() {
        assert_eq!(eval(&Expr::plus(Expr::ident("x"))), Value::Ident("x".into()));
    }

    #[test]
    fn test_deref_detects_cycles() {
        let mut env = Environment::new();
        env.assign_global("a", Value::Ident("b".into()));
        env.assign_global("b", Value::Ident("a".into()));
        let err = deref_number(&Value::Ident("a".into()), &env).unwrap_err();
        assert_eq!(err, RuntimeError::CyclicReference { name: "a".into() });
    }

    #[test]
    fn test_depth_restored_after_error() {
        let mut env = Environment::new();
        let mut interp = Interpreter::new();
        let prog = Expr::seq([
            Expr::assign("f", Expr::def(["x"], Expr::div(Expr::ident("x"), Expr::int(0)))),
            Expr::call("f", [Expr::int(1)]),
        ]);
        assert_eq!(interp.eval(&prog, &mut env), Err(RuntimeError::DivisionByZero));
        assert_eq!(interp.depth, 0);
        assert!(env.locals().is_empty());
    }
}
