//! Runtime values for the interpreter

use super::env::Environment;
use crate::ast::Term;
use std::fmt;
use std::rc::Rc;

/// Runtime value
///
/// Values are immutable once built, so every payload that is not `Copy` sits
/// behind an `Rc` and cloning a value never copies a string, tuple or closure.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit integer
    Int(i64),
    /// Immutable string
    Str(Rc<str>),
    /// Boolean
    Bool(bool),
    /// Pair of values
    Tuple(Rc<(Value, Value)>),
    /// Function value with its captured environment
    Closure(Rc<Closure>),
}

/// A function value: body, parameter names and the environment in effect
/// when the function literal was evaluated
#[derive(Debug)]
pub struct Closure {
    pub parameters: Vec<String>,
    pub body: Rc<Term>,
    pub env: Environment,
}

impl Closure {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl Value {
    /// Build a string value
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    /// Build a tuple value
    pub fn tuple(first: Value, second: Value) -> Self {
        Value::Tuple(Rc::new((first, second)))
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Tuple(_) => "tuple",
            Value::Closure(_) => "closure",
        }
    }

    /// Try to convert to i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to convert to bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to view as a pair
    pub fn as_tuple(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Tuple(pair) => Some((&pair.0, &pair.1)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Tuple(pair) => write!(f, "({},{})", pair.0, pair.1),
            Value::Closure(_) => write!(f, "<#closure>"),
        }
    }
}

/// Host-side structural equality, used by tests and tooling.
///
/// This is not the language's `==`, which lives in the operator evaluator and
/// rejects tuples and closures. Closures compare by identity here.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a.0 == b.0 && a.1 == b.1,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
