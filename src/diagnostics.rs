//! Runtime diagnostics
//!
//! Errors raised while evaluating a tree, reported through miette. Some
//! errors are recovered on the spot: the evaluator records them here,
//! substitutes a default value, and keeps going. The rest abort evaluation.

use miette::Diagnostic;
use thiserror::Error;

/// Evaluation error
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum RuntimeError {
    // === Recoverable ===
    #[error("Unresolved reference `{name}`")]
    #[diagnostic(
        code(eval::unresolved),
        help("assign a value to this name before using it")
    )]
    UnresolvedReference { name: String },

    #[error("`{name}` is not a function, found {found}")]
    #[diagnostic(code(eval::not_callable))]
    NotCallable { name: String, found: &'static str },

    #[error("Cannot assign to {found}")]
    #[diagnostic(
        code(eval::invalid_assign),
        help("the left side of an assignment must be an identifier")
    )]
    InvalidAssignTarget { found: &'static str },

    #[error("Expected a number, found {found}")]
    #[diagnostic(code(eval::not_numeric))]
    NotNumeric { found: &'static str },

    #[error("Reference cycle through `{name}`")]
    #[diagnostic(
        code(eval::cyclic_reference),
        help("these identifiers are bound to each other and never reach a number")
    )]
    CyclicReference { name: String },

    // === Fatal ===
    #[error("Function takes {expected} argument(s) but {found} were supplied")]
    #[diagnostic(code(eval::arity_mismatch))]
    ArityMismatch { expected: usize, found: usize },

    #[error("Integer division by zero")]
    #[diagnostic(code(eval::division_by_zero))]
    DivisionByZero,

    #[error("Call depth exceeded the limit of {limit}")]
    #[diagnostic(
        code(eval::call_depth),
        help("raise `max_call_depth` in the configuration if the recursion is intended")
    )]
    CallDepthExceeded { limit: usize },
}

impl RuntimeError {
    /// Whether the evaluator may substitute a default value and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RuntimeError::UnresolvedReference { .. }
                | RuntimeError::NotCallable { .. }
                | RuntimeError::InvalidAssignTarget { .. }
                | RuntimeError::NotNumeric { .. }
                | RuntimeError::CyclicReference { .. }
        )
    }
}

/// Collects the errors recovered during evaluation, in order
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    recovered: Vec<RuntimeError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, error: RuntimeError) {
        self.recovered.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.recovered.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recovered.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuntimeError> {
        self.recovered.iter()
    }

    /// Get recovered errors by reference
    pub fn errors(&self) -> &[RuntimeError] {
        &self.recovered
    }

    pub fn clear(&mut self) {
        self.recovered.clear();
    }

    /// Print all diagnostics
    pub fn emit_all(&self) {
        for error in &self.recovered {
            eprintln!("{:?}", miette::Report::new(error.clone()));
        }
    }

    /// Consume and return errors
    pub fn into_errors(self) -> Vec<RuntimeError> {
        self.recovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(RuntimeError::UnresolvedReference { name: "x".into() }.is_recoverable());
        assert!(RuntimeError::InvalidAssignTarget { found: "int" }.is_recoverable());
        assert!(
            !RuntimeError::ArityMismatch {
                expected: 1,
                found: 2
            }
            .is_recoverable()
        );
        assert!(!RuntimeError::DivisionByZero.is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = RuntimeError::NotCallable {
            name: "x".into(),
            found: "int",
        };
        assert_eq!(err.to_string(), "`x` is not a function, found int");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("eval::not_callable".to_string())
        );
    }

    #[test]
    fn test_collector_keeps_order() {
        let mut diags = Diagnostics::new();
        diags.record(RuntimeError::UnresolvedReference { name: "a".into() });
        diags.record(RuntimeError::NotNumeric { found: "function" });
        assert_eq!(diags.len(), 2);
        assert!(matches!(
            diags.errors()[0],
            RuntimeError::UnresolvedReference { .. }
        ));
        diags.clear();
        assert!(diags.is_empty());
    }
}
