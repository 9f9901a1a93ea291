//! Expression tree for the fncalc language
//!
//! Trees are built by an external parser (or by hand with the constructor
//! helpers below) and are only ever read afterwards: the evaluator and the
//! debug printer walk them without mutation. Every composite node owns its
//! children, so a tree has no sharing and no cycles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interp::FunctionValue;

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// Bare identifier; resolved lazily by the operators that need a number
    Ident(String),
    /// Prefix `+` / `-`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Arithmetic or assignment
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Ordered list of expressions; yields the value of the last one
    Sequence(Vec<Expr>),
    /// Function definition
    FuncDef { params: Vec<String>, body: Box<Expr> },
    /// Function call
    FuncCall { callee: Callee, args: Vec<Expr> },
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Assign,
}

/// Target of a function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    /// Name looked up in the environment at call time
    Name(String),
    /// Function value embedded directly in the tree
    Function(FunctionValue),
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Plus => "Plus",
            UnaryOp::Minus => "Minus",
        }
    }
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "Add",
            BinaryOp::Sub => "Sub",
            BinaryOp::Mul => "Mul",
            BinaryOp::Div => "Div",
            BinaryOp::Pow => "Pow",
            BinaryOp::Assign => "Assign",
        }
    }
}

impl Expr {
    pub fn int(n: i64) -> Self {
        Expr::Int(n)
    }

    pub fn float(f: f64) -> Self {
        Expr::Float(f)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn plus(operand: Expr) -> Self {
        Self::unary(UnaryOp::Plus, operand)
    }

    pub fn neg(operand: Expr) -> Self {
        Self::unary(UnaryOp::Minus, operand)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Sub, left, right)
    }

    pub fn mul(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Mul, left, right)
    }

    pub fn div(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Div, left, right)
    }

    pub fn pow(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Pow, left, right)
    }

    /// `name = value`
    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Self::binary(BinaryOp::Assign, Expr::Ident(name.into()), value)
    }

    pub fn seq(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Sequence(items.into_iter().collect())
    }

    /// Function definition with the given parameter names
    pub fn def<S: Into<String>>(params: impl IntoIterator<Item = S>, body: Expr) -> Self {
        Expr::FuncDef {
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        }
    }

    /// Call of a function bound to `name`
    pub fn call(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::FuncCall {
            callee: Callee::Name(name.into()),
            args: args.into_iter().collect(),
        }
    }

    /// Call of a function value embedded in the tree
    pub fn call_value(func: FunctionValue, args: impl IntoIterator<Item = Expr>) -> Self {
        Expr::FuncCall {
            callee: Callee::Function(func),
            args: args.into_iter().collect(),
        }
    }

    /// Append `other` to this expression as a sequence.
    ///
    /// Sequences are flattened: appending a sequence splices its items rather
    /// than nesting it.
    pub fn append(self, other: Expr) -> Self {
        let mut items = match self {
            Expr::Sequence(items) => items,
            single => vec![single],
        };
        match other {
            Expr::Sequence(more) => items.extend(more),
            single => items.push(single),
        }
        Expr::Sequence(items)
    }

    /// Short node-kind name, used in traces
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Int(_) => "Int",
            Expr::Float(_) => "Float",
            Expr::Ident(_) => "Identifier",
            Expr::Unary { op, .. } => op.name(),
            Expr::Binary { op, .. } => op.name(),
            Expr::Sequence(_) => "Sequence",
            Expr::FuncDef { .. } => "FuncDef",
            Expr::FuncCall { .. } => "FuncCall",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::printer::write_expr(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_flattens_sequences() {
        let left = Expr::seq([Expr::int(1), Expr::int(2)]);
        let right = Expr::seq([Expr::int(3)]);
        assert_eq!(
            left.append(right),
            Expr::seq([Expr::int(1), Expr::int(2), Expr::int(3)])
        );
    }

    #[test]
    fn test_append_wraps_single_nodes() {
        let joined = Expr::int(1).append(Expr::ident("x"));
        assert_eq!(joined, Expr::seq([Expr::int(1), Expr::ident("x")]));
    }

    #[test]
    fn test_assign_builds_identifier_target() {
        match Expr::assign("x", Expr::int(5)) {
            Expr::Binary {
                op: BinaryOp::Assign,
                left,
                right,
            } => {
                assert_eq!(*left, Expr::ident("x"));
                assert_eq!(*right, Expr::int(5));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_structural_equality() {
        let a = Expr::def(["x"], Expr::add(Expr::ident("x"), Expr::int(1)));
        let b = Expr::def(["x"], Expr::add(Expr::ident("x"), Expr::int(1)));
        let c = Expr::def(["y"], Expr::add(Expr::ident("y"), Expr::int(1)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Expr::neg(Expr::int(1)).kind_name(), "Minus");
        assert_eq!(Expr::pow(Expr::int(1), Expr::int(2)).kind_name(), "Pow");
        assert_eq!(Expr::call("f", Vec::new()).kind_name(), "FuncCall");
    }
}
