//! Rinha Interpreter Library
//!
//! Evaluates programs of a small expression language from the JSON syntax
//! tree produced by its parser.

pub mod ast;
pub mod error;
pub mod interp;

pub use ast::{File, Location, Term};
pub use error::{LoadError, Result};
pub use interp::{interpret, interpret_file, Interpreter, RuntimeError, Value};
