//! Term evaluator

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::ops::apply_binary;
use super::value::{Closure, Value};
use crate::ast::{File, Term};
use std::io::{self, Stdout, Write};
use std::rc::Rc;

/// Maximum closure call nesting
const MAX_RECURSION_DEPTH: usize = 100_000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// Interpreter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Closure calls allowed to be in flight at once
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: MAX_RECURSION_DEPTH,
        }
    }
}

/// The interpreter
///
/// `out` receives one line per evaluated `Print`, in program order.
pub struct Interpreter<W: Write = Stdout> {
    out: W,
    config: Config,
    /// Current closure call depth
    depth: usize,
}

impl Interpreter<Stdout> {
    /// Create an interpreter that prints to stdout
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Create an interpreter that prints to `out`
    pub fn with_output(out: W) -> Self {
        Interpreter {
            out,
            config: Config::default(),
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the interpreter, returning its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run a program file in the empty environment
    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.name))]
    pub fn run(&mut self, file: &File) -> InterpResult<Value> {
        let result = self.eval(&file.expression, &Environment::empty());
        match &result {
            Ok(value) => tracing::debug!(kind = value.type_name(), "program finished"),
            Err(e) => tracing::debug!(error = %e, "program aborted"),
        }
        result
    }

    /// Evaluate a term with automatic stack growth for deep recursion
    pub fn eval(&mut self, term: &Term, env: &Environment) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(term, env))
            .map_err(|e| e.at(term.location()))
    }

    fn eval_inner(&mut self, term: &Term, env: &Environment) -> InterpResult<Value> {
        match term {
            Term::Int { value, .. } => Ok(Value::Int(*value)),
            Term::Str { value, .. } => Ok(Value::str(value)),
            Term::Bool { value, .. } => Ok(Value::Bool(*value)),

            Term::Var { text, .. } => env.lookup(text),

            // Only the chosen branch is evaluated
            Term::If {
                condition,
                then,
                otherwise,
                ..
            } => {
                let cond = self.eval(condition, env)?;
                match cond.as_bool() {
                    Some(true) => self.eval(then, env),
                    Some(false) => self.eval(otherwise, env),
                    None => Err(RuntimeError::type_mismatch("boolean")),
                }
            }

            Term::Tuple { first, second, .. } => {
                let first = self.eval(first, env)?;
                let second = self.eval(second, env)?;
                Ok(Value::tuple(first, second))
            }

            Term::First { value, .. } => {
                let pair = self.eval(value, env)?;
                match pair.as_tuple() {
                    Some((first, _)) => Ok(first.clone()),
                    None => Err(RuntimeError::type_mismatch("tuple")),
                }
            }

            Term::Second { value, .. } => {
                let pair = self.eval(value, env)?;
                match pair.as_tuple() {
                    Some((_, second)) => Ok(second.clone()),
                    None => Err(RuntimeError::type_mismatch("tuple")),
                }
            }

            Term::Binary { lhs, op, rhs, .. } => {
                let left = self.eval(lhs, env)?;
                let right = self.eval(rhs, env)?;
                apply_binary(*op, left, right)
            }

            Term::Print { value, .. } => {
                let value = self.eval(value, env)?;
                self.print(&value)?;
                Ok(value)
            }

            // The value is evaluated before `name` is bound, so a let-bound
            // function cannot refer to itself.
            Term::Let {
                name, value, next, ..
            } => {
                let bound = self.eval(value, env)?;
                tracing::trace!(name = %name.text, kind = bound.type_name(), "let");
                let inner = env.extend(name.text.clone(), bound);
                self.eval(next, &inner)
            }

            Term::Function {
                parameters, value, ..
            } => Ok(Value::Closure(Rc::new(Closure {
                parameters: parameters.iter().map(|p| p.text.clone()).collect(),
                body: Rc::clone(value),
                env: env.clone(),
            }))),

            Term::Call {
                callee, arguments, ..
            } => {
                let closure = match self.eval(callee, env)? {
                    Value::Closure(closure) => closure,
                    _ => return Err(RuntimeError::type_mismatch("closure")),
                };
                if arguments.len() != closure.arity() {
                    return Err(RuntimeError::arity_mismatch(
                        closure.arity(),
                        arguments.len(),
                    ));
                }
                // Arguments resolve in the caller's environment
                let args = arguments
                    .iter()
                    .map(|a| self.eval(a, env))
                    .collect::<InterpResult<Vec<_>>>()?;
                self.call_closure(&closure, args)
            }
        }
    }

    /// Call a closure value with its captured environment
    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> InterpResult<Value> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            self.depth -= 1;
            return Err(RuntimeError::stack_overflow());
        }
        // Extend a copy of the captured environment, never the caller's
        let call_env = closure
            .env
            .extend_many(closure.parameters.iter().cloned().zip(args));
        tracing::trace!(
            depth = self.depth,
            arity = closure.arity(),
            bindings = call_env.len(),
            "call"
        );

        let result = self.eval(&closure.body, &call_env);
        self.depth -= 1;
        result
    }

    fn print(&mut self, value: &Value) -> InterpResult<()> {
        writeln!(self.out, "{value}")
            .and_then(|()| self.out.flush())
            .map_err(|e| RuntimeError::io_error(&e.to_string()))
    }
}

/// Evaluate a term in the empty environment, printing to stdout
pub fn interpret(term: &Term) -> InterpResult<Value> {
    Interpreter::new().eval(term, &Environment::empty())
}

/// Evaluate a program file, printing to stdout
pub fn interpret_file(file: &File) -> InterpResult<Value> {
    Interpreter::new().run(file)
}
