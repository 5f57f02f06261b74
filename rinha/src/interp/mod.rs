//! Tree-walking interpreter

mod env;
mod error;
mod eval;
mod ops;
mod value;

pub use env::Environment;
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{interpret, interpret_file, Config, Interpreter};
pub use ops::{apply_binary, floor_div, floor_rem};
pub use value::{Closure, Value};
