//! Runtime errors for the interpreter

use crate::ast::Location;
use std::fmt;
use thiserror::Error;

/// Runtime error during interpretation
///
/// Every error aborts the whole run. `location` is the innermost node that
/// failed, filled in as the error leaves that node.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub location: Option<Location>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Variable not bound in the current environment
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    /// Operand or scrutinee of the wrong kind
    #[error("type mismatch: expected {0}")]
    TypeMismatch(String),
    /// Argument count differs from the closure's parameter count
    #[error("arity mismatch: expected {expected} argument(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    /// Integer division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Call nesting exceeded the configured depth
    #[error("stack overflow: too deep recursion")]
    StackOverflow,
    /// Writing print output failed
    #[error("IO error: {0}")]
    Io(String),
}

impl ErrorKind {
    /// Short category name used as a report headline
    pub fn category(&self) -> &'static str {
        match self {
            ErrorKind::UnboundVariable(_) => "Unbound variable",
            ErrorKind::TypeMismatch(_) => "Type",
            ErrorKind::ArityMismatch { .. } => "Arity",
            ErrorKind::DivisionByZero => "Arithmetic",
            ErrorKind::StackOverflow => "Stack overflow",
            ErrorKind::Io(_) => "IO",
        }
    }
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> Self {
        RuntimeError {
            kind,
            location: None,
        }
    }

    pub fn unbound_variable(name: &str) -> Self {
        Self::new(ErrorKind::UnboundVariable(name.to_string()))
    }

    pub fn type_mismatch(expected: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch(expected.into()))
    }

    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero)
    }

    pub fn stack_overflow() -> Self {
        Self::new(ErrorKind::StackOverflow)
    }

    pub fn io_error(msg: &str) -> Self {
        Self::new(ErrorKind::Io(msg.to_string()))
    }

    /// Attach a location unless a more precise one is already set
    pub fn at(mut self, location: &Location) -> Self {
        if self.location.is_none() {
            self.location = Some(location.clone());
        }
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.kind)?;
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
