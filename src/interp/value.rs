//! Runtime values for the interpreter

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::ast::Expr;

use super::env::Store;

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Identifier passed through unresolved
    Ident(String),
    /// Function closure
    Function(FunctionValue),
}

/// Function closure.
///
/// Captures a snapshot of the *global* store taken when the definition was
/// evaluated. Locals of an enclosing call are never captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionValue {
    /// Global bindings at definition time
    pub captured: Store,
    /// Formal parameter names, in order
    pub params: Vec<String>,
    pub body: Rc<Expr>,
}

impl FunctionValue {
    pub fn new(captured: Store, params: Vec<String>, body: impl Into<Rc<Expr>>) -> Self {
        Self {
            captured,
            params,
            body: body.into(),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Numeric operand produced by the reference rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Widen to a float
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::Int(n),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Ident(_) => "identifier",
            Value::Function(_) => "function",
        }
    }

    /// Try to get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Try to get as identifier name
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Value::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Try to get as function
    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Ident(name) => write!(f, "{}", name),
            Value::Function(func) => write!(f, "<fn/{}>", func.arity()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Float(1.0).type_name(), "float");
        assert_eq!(Value::Ident("x".into()).type_name(), "identifier");
    }

    #[test]
    fn test_as_float_widens_ints() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Ident("x".into()).as_float(), None);
    }

    #[test]
    fn test_display() {
        let func = FunctionValue::new(Store::default(), vec!["a".into(), "b".into()], Expr::Int(0));
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Ident("y".into()).to_string(), "y");
        assert_eq!(Value::Function(func).to_string(), "<fn/2>");
    }

    #[test]
    fn test_number_widening() {
        assert_eq!(Number::Int(7).to_f64(), 7.0);
        assert_eq!(Value::from(Number::Float(0.5)), Value::Float(0.5));
    }
}
