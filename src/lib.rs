//! fncalc: evaluation core of a minimal expression and function language
//!
//! The language has integer and float arithmetic, global variables, and
//! first-class functions whose closures capture the global store as it was
//! when they were defined.
//!
//! # Architecture
//!
//! ```text
//! (external parser) → Expr tree → Interpreter ⇄ Environment { global, local } → Value
//!                                    ↘ printer (debug dump)
//! ```
//!
//! # Example
//!
//! ```
//! use fncalc::{Environment, Expr, Value, evaluate};
//!
//! let program = Expr::seq([
//!     Expr::assign("inc", Expr::def(["x"], Expr::add(Expr::ident("x"), Expr::int(1)))),
//!     Expr::call("inc", [Expr::int(4)]),
//! ]);
//!
//! let mut env = Environment::new();
//! assert_eq!(evaluate(&program, &mut env).unwrap(), Value::Int(5));
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod interp;
pub mod printer;

// Re-exports for convenience
pub use ast::{BinaryOp, Callee, Expr, UnaryOp};
pub use config::{EvalConfig, PowSemantics};
pub use diagnostics::{Diagnostics, RuntimeError};
pub use interp::{Environment, FunctionValue, Interpreter, Value};
pub use printer::{print_expr, print_value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Evaluate `expr` against `env` with the default configuration.
///
/// Recoverable errors are logged and replaced by default values; only fatal
/// errors are returned. Use [`Interpreter`] directly to inspect what was
/// recovered or to change the configuration.
pub fn evaluate(expr: &Expr, env: &mut Environment) -> Result<Value, RuntimeError> {
    Interpreter::new().eval(expr, env)
}

/// Program file contents: one tree or a list of trees
/// Parse a program from its JSON form.
///
/// The document is either a single expression or an array of expressions
/// meant to run in order against one environment.
pub fn parse_program(json: &str) -> miette::Result<Vec<Expr>> {
    let parsed = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Expr>>(json)
    } else {
        serde_json::from_str::<Expr>(json).map(|expr| vec![expr])
    };
    parsed.map_err(|e| miette::miette!("Failed to parse program: {}", e))
}

/// Run a JSON program in a fresh environment and return the last value
pub fn interpret(json: &str) -> miette::Result<Value> {
    let program = parse_program(json)?;
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new();
    let mut result = Value::Int(0);
    for expr in &program {
        result = interpreter.eval(expr, &mut env)?;
    }
    Ok(result)
}
