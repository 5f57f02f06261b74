//! Abstract Syntax Tree definitions
//!
//! The tree is produced by an external parser and handed over as JSON.

mod location;
mod term;

pub use location::*;
pub use term::*;

use crate::error::{LoadError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stack growth parameters while walking deeply nested JSON
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

/// A program file: a single root expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub expression: Term,
    #[serde(default)]
    pub location: Location,
}

impl File {
    /// Parse a JSON AST document
    pub fn from_json(source: &str) -> Result<Self> {
        // Long let-chains nest one level per binding, far past serde_json's
        // recursion limit. Every nested JSON value is read on a stack that
        // grows on demand.
        let mut de = serde_json::Deserializer::from_str(source);
        de.disable_recursion_limit();
        let mut guarded = serde_stacker::Deserializer::new(&mut de);
        guarded.red_zone = STACK_RED_ZONE;
        guarded.stack_size = STACK_GROW_SIZE;
        let file = File::deserialize(guarded)?;
        de.end()?;
        Ok(file)
    }

    /// Read and parse a JSON AST file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let file = Self::from_json(&source)?;
        tracing::debug!(path = %path.display(), name = %file.name, "loaded program");
        Ok(file)
    }
}
