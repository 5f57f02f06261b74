//! Environment for variable bindings
//!
//! An environment is a flat, finished snapshot. Extending one copies its
//! bindings into a fresh map, so a closure holding an older snapshot can never
//! observe bindings introduced after it was captured.

use super::error::{InterpResult, RuntimeError};
use super::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Immutable mapping from variable name to value
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: Rc<HashMap<String, Value>>,
}

impl Environment {
    /// Environment with no bindings
    pub fn empty() -> Self {
        Self::default()
    }

    /// New environment equal to `self` plus `name ↦ value`, shadowing any
    /// prior binding of `name`
    pub fn extend(&self, name: impl Into<String>, value: Value) -> Self {
        self.extend_many([(name.into(), value)])
    }

    /// New environment with several bindings added in order; later entries
    /// shadow earlier ones
    pub fn extend_many<I>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut map = HashMap::clone(&self.bindings);
        map.extend(bindings);
        Environment {
            bindings: Rc::new(map),
        }
    }

    /// Look up a variable
    pub fn lookup(&self, name: &str) -> InterpResult<Value> {
        self.get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::unbound_variable(name))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Number of distinct names bound
    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    #[test]
    fn test_empty() {
        let env = Environment::empty();
        assert_eq!(env.len(), 0);
        assert_eq!(env.get("anything"), None);
    }

    #[test]
    fn test_extend_and_lookup() {
        let env = Environment::empty().extend("x", Value::Int(42));
        assert_eq!(env.lookup("x").unwrap(), Value::Int(42));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_lookup_unbound() {
        let err = Environment::empty().lookup("y").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnboundVariable("y".to_string()));
    }

    #[test]
    fn test_extend_does_not_touch_original() {
        let base = Environment::empty().extend("x", Value::Int(1));
        let extended = base.extend("y", Value::Int(2));

        assert_eq!(base.get("y"), None);
        assert_eq!(base.len(), 1);
        assert_eq!(extended.lookup("x").unwrap(), Value::Int(1));
        assert_eq!(extended.lookup("y").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_shadowing() {
        let outer = Environment::empty().extend("x", Value::Int(1));
        let inner = outer.extend("x", Value::Int(100));

        assert_eq!(inner.lookup("x").unwrap(), Value::Int(100));
        assert_eq!(inner.len(), 1);
        // Original snapshot keeps its binding
        assert_eq!(outer.lookup("x").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_siblings_are_independent() {
        let base = Environment::empty().extend("shared", Value::Int(0));
        let a = base.extend("a", Value::Int(1));
        let b = base.extend("b", Value::Int(2));

        assert_eq!(a.get("b"), None);
        assert_eq!(b.get("a"), None);
        assert_eq!(a.get("shared"), Some(&Value::Int(0)));
        assert_eq!(b.get("shared"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_extend_many_in_order() {
        let env = Environment::empty().extend_many([
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::Bool(true)),
            ("a".to_string(), Value::Int(3)),
        ]);
        assert_eq!(env.len(), 2);
        assert_eq!(env.lookup("a").unwrap(), Value::Int(3));
        assert_eq!(env.lookup("b").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_extend_many_empty_keeps_bindings() {
        let base = Environment::empty().extend("x", Value::str("s"));
        let same = base.extend_many(std::iter::empty());
        assert_eq!(same.lookup("x").unwrap(), Value::str("s"));
    }

    #[test]
    fn test_clone_shares_snapshot() {
        let env = Environment::empty().extend("x", Value::Int(7));
        let copy = env.clone();
        let _ = env.extend("x", Value::Int(8));
        assert_eq!(copy.lookup("x").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_many_bindings() {
        let mut env = Environment::empty();
        for i in 0..100 {
            env = env.extend(format!("var_{i}"), Value::Int(i));
        }
        assert_eq!(env.len(), 100);
        assert_eq!(env.lookup("var_0").unwrap(), Value::Int(0));
        assert_eq!(env.lookup("var_99").unwrap(), Value::Int(99));
    }
}
