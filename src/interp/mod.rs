//! Tree-walking interpreter
//!
//! Evaluates expression trees against a two-tier [`Environment`].

pub mod env;
pub mod eval;
pub mod frame;
pub(crate) mod stack;
pub mod value;

pub use env::{Environment, Store};
pub use eval::Interpreter;
pub use frame::CallFrame;
pub use value::{FunctionValue, Number, Value};
