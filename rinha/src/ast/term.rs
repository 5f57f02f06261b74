//! Term AST nodes

use super::Location;
use serde::{Deserialize, Serialize};
use std::mem;
use std::rc::Rc;

/// Term (expression) node, tagged by its `kind` field in the JSON tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Term {
    /// Integer literal
    Int {
        value: i64,
        #[serde(default)]
        location: Location,
    },
    /// String literal
    Str {
        value: String,
        #[serde(default)]
        location: Location,
    },
    /// Boolean literal
    Bool {
        value: bool,
        #[serde(default)]
        location: Location,
    },

    /// Variable reference
    Var {
        text: String,
        #[serde(default)]
        location: Location,
    },

    /// Conditional: if condition then `then` else `otherwise`
    If {
        #[serde(with = "guarded")]
        condition: Box<Term>,
        #[serde(with = "guarded")]
        then: Box<Term>,
        #[serde(with = "guarded")]
        otherwise: Box<Term>,
        #[serde(default)]
        location: Location,
    },

    /// Let binding: let name = value; next
    Let {
        name: Parameter,
        #[serde(with = "guarded")]
        value: Box<Term>,
        #[serde(with = "guarded")]
        next: Box<Term>,
        #[serde(default)]
        location: Location,
    },

    /// Binary operation
    Binary {
        #[serde(with = "guarded")]
        lhs: Box<Term>,
        op: BinaryOp,
        #[serde(with = "guarded")]
        rhs: Box<Term>,
        #[serde(default)]
        location: Location,
    },

    /// Function call
    Call {
        #[serde(with = "guarded")]
        callee: Box<Term>,
        #[serde(with = "guarded")]
        arguments: Vec<Term>,
        #[serde(default)]
        location: Location,
    },

    /// Function literal: fn (parameters) => value
    ///
    /// The body is shared so closures can hold it without copying the subtree.
    Function {
        parameters: Vec<Parameter>,
        #[serde(with = "guarded")]
        value: Rc<Term>,
        #[serde(default)]
        location: Location,
    },

    /// First projection of a tuple
    First {
        #[serde(with = "guarded")]
        value: Box<Term>,
        #[serde(default)]
        location: Location,
    },
    /// Second projection of a tuple
    Second {
        #[serde(with = "guarded")]
        value: Box<Term>,
        #[serde(default)]
        location: Location,
    },
    /// Tuple construction: (first, second)
    Tuple {
        #[serde(with = "guarded")]
        first: Box<Term>,
        #[serde(with = "guarded")]
        second: Box<Term>,
        #[serde(default)]
        location: Location,
    },

    /// Print the display form of a value and return it
    Print {
        #[serde(with = "guarded")]
        value: Box<Term>,
        #[serde(default)]
        location: Location,
    },
}

impl Term {
    /// Source location of this node
    pub fn location(&self) -> &Location {
        match self {
            Term::Int { location, .. }
            | Term::Str { location, .. }
            | Term::Bool { location, .. }
            | Term::Var { location, .. }
            | Term::If { location, .. }
            | Term::Let { location, .. }
            | Term::Binary { location, .. }
            | Term::Call { location, .. }
            | Term::Function { location, .. }
            | Term::First { location, .. }
            | Term::Second { location, .. }
            | Term::Tuple { location, .. }
            | Term::Print { location, .. } => location,
        }
    }

    /// Node kind name, as it appears in the JSON tree
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Int { .. } => "Int",
            Term::Str { .. } => "Str",
            Term::Bool { .. } => "Bool",
            Term::Var { .. } => "Var",
            Term::If { .. } => "If",
            Term::Let { .. } => "Let",
            Term::Binary { .. } => "Binary",
            Term::Call { .. } => "Call",
            Term::Function { .. } => "Function",
            Term::First { .. } => "First",
            Term::Second { .. } => "Second",
            Term::Tuple { .. } => "Tuple",
            Term::Print { .. } => "Print",
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(
            self,
            Term::Int { .. } | Term::Str { .. } | Term::Bool { .. } | Term::Var { .. }
        )
    }

    /// Move every non-leaf child of this node onto `pending`
    fn detach_children(&mut self, pending: &mut Vec<Term>) {
        match self {
            Term::Int { .. } | Term::Str { .. } | Term::Bool { .. } | Term::Var { .. } => {}
            Term::If {
                condition,
                then,
                otherwise,
                ..
            } => {
                detach(condition, pending);
                detach(then, pending);
                detach(otherwise, pending);
            }
            Term::Let { value, next, .. } => {
                detach(value, pending);
                detach(next, pending);
            }
            Term::Binary { lhs, rhs, .. } => {
                detach(lhs, pending);
                detach(rhs, pending);
            }
            Term::Call {
                callee, arguments, ..
            } => {
                detach(callee, pending);
                pending.extend(arguments.drain(..));
            }
            // A body still shared with a closure is torn down by its last owner
            Term::Function { value, .. } => {
                if let Some(body) = Rc::get_mut(value) {
                    detach(body, pending);
                }
            }
            Term::First { value, .. } | Term::Second { value, .. } | Term::Print { value, .. } => {
                detach(value, pending)
            }
            Term::Tuple { first, second, .. } => {
                detach(first, pending);
                detach(second, pending);
            }
        }
    }
}

fn detach(child: &mut Term, pending: &mut Vec<Term>) {
    if !child.is_leaf() {
        let placeholder = Term::Bool {
            value: false,
            location: Location::default(),
        };
        pending.push(mem::replace(child, placeholder));
    }
}

/// Let-chains nest one level per binding, so the derived drop glue would
/// recurse as deep as the program is long. Children are unlinked onto a
/// worklist instead; each node is then dropped with only leaves below it.
impl Drop for Term {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut term) = pending.pop() {
            term.detach_children(&mut pending);
        }
    }
}

/// Serde adapters for child terms that grow the stack before recursing
mod guarded {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const STACK_RED_ZONE: usize = 128 * 1024;
    const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            value.serialize(serializer)
        })
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            T::deserialize(deserializer)
        })
    }
}

/// A bound name: let target or function parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub text: String,
    #[serde(default)]
    pub location: Location,
}

impl Parameter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: Location::default(),
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Comparison
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,

    // Logical
    And,
    Or,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Rem => write!(f, "%"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::Neq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::Lte => write!(f, "<="),
            BinaryOp::Gte => write!(f, ">="),
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Or => write!(f, "||"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_int() {
        let term: Term = serde_json::from_str(r#"{"kind":"Int","value":42}"#).unwrap();
        assert!(matches!(term, Term::Int { value: 42, .. }));
    }

    #[test]
    fn test_deserialize_negative_int() {
        let term: Term = serde_json::from_str(r#"{"kind":"Int","value":-7}"#).unwrap();
        assert!(matches!(term, Term::Int { value: -7, .. }));
    }

    #[test]
    fn test_deserialize_let_with_locations() {
        let json = r#"{
            "kind": "Let",
            "name": {"text": "x", "location": {"start": 4, "end": 5, "filename": "t.rinha"}},
            "value": {"kind": "Int", "value": 1, "location": {"start": 8, "end": 9, "filename": "t.rinha"}},
            "next": {"kind": "Var", "text": "x", "location": {"start": 11, "end": 12, "filename": "t.rinha"}},
            "location": {"start": 0, "end": 12, "filename": "t.rinha"}
        }"#;
        let term: Term = serde_json::from_str(json).unwrap();
        match &term {
            Term::Let { name, value, next, location } => {
                assert_eq!(name.text, "x");
                assert_eq!(name.location, Location::new(4, 5, "t.rinha"));
                assert!(matches!(**value, Term::Int { value: 1, .. }));
                assert!(matches!(&**next, Term::Var { text, .. } if text == "x"));
                assert_eq!(*location, Location::new(0, 12, "t.rinha"));
            }
            other => panic!("expected Let, got {}", other.kind()),
        }
    }

    #[test]
    fn test_deserialize_binary_ops() {
        for (name, op) in [
            ("Add", BinaryOp::Add),
            ("Rem", BinaryOp::Rem),
            ("Neq", BinaryOp::Neq),
            ("Lte", BinaryOp::Lte),
            ("Gte", BinaryOp::Gte),
            ("Or", BinaryOp::Or),
        ] {
            let json = format!(
                r#"{{"kind":"Binary","lhs":{{"kind":"Int","value":1}},"op":"{name}","rhs":{{"kind":"Int","value":2}}}}"#
            );
            let term: Term = serde_json::from_str(&json).unwrap();
            match &term {
                Term::Binary { op: parsed, .. } => assert_eq!(*parsed, op),
                other => panic!("expected Binary, got {}", other.kind()),
            }
        }
    }

    #[test]
    fn test_deserialize_function() {
        let json = r#"{
            "kind": "Function",
            "parameters": [{"text": "a"}, {"text": "b"}],
            "value": {"kind": "Var", "text": "a"}
        }"#;
        let term: Term = serde_json::from_str(json).unwrap();
        match &term {
            Term::Function { parameters, value, .. } => {
                let names: Vec<_> = parameters.iter().map(|p| p.text.as_str()).collect();
                assert_eq!(names, ["a", "b"]);
                assert_eq!(value.kind(), "Var");
            }
            other => panic!("expected Function, got {}", other.kind()),
        }
    }

    /// `depth` nested prints around an integer, built without recursion
    fn nested_prints(depth: usize) -> Term {
        let mut term = Term::Int {
            value: 0,
            location: Location::default(),
        };
        for _ in 0..depth {
            term = Term::Print {
                value: Box::new(term),
                location: Location::default(),
            };
        }
        term
    }

    #[test]
    fn test_drop_deep_tree() {
        drop(nested_prints(200_000));
    }

    #[test]
    fn test_drop_keeps_shared_function_body() {
        let body = Rc::new(nested_prints(3));
        let function = Term::Function {
            parameters: vec![Parameter::new("x")],
            value: Rc::clone(&body),
            location: Location::default(),
        };
        drop(function);
        assert_eq!(Rc::strong_count(&body), 1);
        match &*body {
            Term::Print { value, .. } => assert_eq!(value.kind(), "Print"),
            other => panic!("expected Print, got {}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Term, _> = serde_json::from_str(r#"{"kind":"Loop","value":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let json = r#"{"kind":"Binary","lhs":{"kind":"Int","value":1},"op":"Pow","rhs":{"kind":"Int","value":2}}"#;
        let result: Result<Term, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_term_location() {
        let term = Term::Str {
            value: "hi".to_string(),
            location: Location::new(2, 6, "s.rinha"),
        };
        assert_eq!(term.location(), &Location::new(2, 6, "s.rinha"));
    }

    #[test]
    fn test_binary_op_display() {
        assert_eq!(BinaryOp::Add.to_string(), "+");
        assert_eq!(BinaryOp::Rem.to_string(), "%");
        assert_eq!(BinaryOp::Neq.to_string(), "!=");
        assert_eq!(BinaryOp::Lte.to_string(), "<=");
        assert_eq!(BinaryOp::And.to_string(), "&&");
        assert_eq!(BinaryOp::Or.to_string(), "||");
    }
}
