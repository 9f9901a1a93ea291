//! Debug printer
//!
//! Renders trees and values in a nested function-call notation such as
//! `Add(Int(1), Identifier(x))`. Output is for humans only; nothing parses
//! it back.

use std::fmt::{self, Write};

use crate::ast::{Callee, Expr};
use crate::interp::{FunctionValue, Value};

/// Render an expression tree
pub fn print_expr(expr: &Expr) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_expr(&mut out, expr);
    out
}

/// Render a value
pub fn print_value(value: &Value) -> String {
    let mut out = String::new();
    let _ = write_value(&mut out, value);
    out
}

/// Render an expression tree into any text sink
pub fn write_expr<W: Write + ?Sized>(out: &mut W, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Int(n) => write!(out, "Int({})", n),
        Expr::Float(f) => write!(out, "Float({:?})", f),
        Expr::Ident(name) => write!(out, "Identifier({})", name),
        Expr::Unary { op, operand } => {
            write!(out, "{}(", op.name())?;
            write_expr(out, operand)?;
            out.write_char(')')
        }
        Expr::Binary { op, left, right } => {
            write!(out, "{}(", op.name())?;
            write_expr(out, left)?;
            out.write_str(", ")?;
            write_expr(out, right)?;
            out.write_char(')')
        }
        Expr::Sequence(items) => {
            out.write_str("Sequence(")?;
            write_list(out, items)?;
            out.write_char(')')
        }
        Expr::FuncDef { params, body } => {
            out.write_str("FuncDef(")?;
            write_signature(out, params, body)?;
            out.write_char(')')
        }
        Expr::FuncCall { callee, args } => {
            out.write_str("FuncCall(")?;
            match callee {
                Callee::Name(name) => out.write_str(name)?,
                Callee::Function(func) => write_function(out, func)?,
            }
            out.write_str(", Args(")?;
            write_list(out, args)?;
            out.write_str("))")
        }
    }
}

/// Render a value into any text sink
pub fn write_value<W: Write + ?Sized>(out: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::Int(n) => write!(out, "Int({})", n),
        Value::Float(f) => write!(out, "Float({:?})", f),
        Value::Ident(name) => write!(out, "Identifier({})", name),
        Value::Function(func) => write_function(out, func),
    }
}

fn write_function<W: Write + ?Sized>(out: &mut W, func: &FunctionValue) -> fmt::Result {
    out.write_str("Function(")?;
    write_signature(out, &func.params, &func.body)?;
    out.write_char(')')
}

fn write_signature<W: Write + ?Sized>(out: &mut W, params: &[String], body: &Expr) -> fmt::Result {
    write!(out, "Params({}), Body(", params.join(", "))?;
    write_expr(out, body)?;
    out.write_char(')')
}

fn write_list<W: Write + ?Sized>(out: &mut W, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_expr(out, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Store;
    use insta::assert_snapshot;

    #[test]
    fn test_print_binary() {
        let expr = Expr::add(Expr::int(1), Expr::int(2));
        assert_snapshot!(print_expr(&expr), @"Add(Int(1), Int(2))");
    }

    #[test]
    fn test_print_nested() {
        let expr = Expr::assign(
            "y",
            Expr::neg(Expr::pow(Expr::ident("x"), Expr::float(0.5))),
        );
        assert_snapshot!(
            print_expr(&expr),
            @"Assign(Identifier(y), Minus(Pow(Identifier(x), Float(0.5))))"
        );
    }

    #[test]
    fn test_print_function_definition_and_call() {
        let expr = Expr::seq([
            Expr::assign(
                "f",
                Expr::def(["a", "b"], Expr::mul(Expr::ident("a"), Expr::ident("b"))),
            ),
            Expr::call("f", [Expr::int(2), Expr::plus(Expr::int(3))]),
        ]);
        assert_snapshot!(
            print_expr(&expr),
            @"Sequence(Assign(Identifier(f), FuncDef(Params(a, b), Body(Mul(Identifier(a), Identifier(b))))), FuncCall(f, Args(Int(2), Plus(Int(3)))))"
        );
    }

    #[test]
    fn test_print_values() {
        let func = FunctionValue::new(
            Store::default(),
            vec!["x".into()],
            Expr::sub(Expr::ident("x"), Expr::int(1)),
        );
        assert_eq!(print_value(&Value::Int(5)), "Int(5)");
        assert_eq!(print_value(&Value::Float(3.0)), "Float(3.0)");
        assert_eq!(print_value(&Value::Ident("q".into())), "Identifier(q)");
        assert_eq!(
            print_value(&Value::Function(func.clone())),
            "Function(Params(x), Body(Sub(Identifier(x), Int(1))))"
        );
        assert_eq!(
            print_expr(&Expr::call_value(func, [Expr::int(0)])),
            "FuncCall(Function(Params(x), Body(Sub(Identifier(x), Int(1)))), Args(Int(0)))"
        );
    }

    #[test]
    fn test_display_matches_printer() {
        let expr = Expr::seq([Expr::int(1), Expr::float(2.0)]);
        assert_eq!(expr.to_string(), "Sequence(Int(1), Float(2.0))");
    }
}
