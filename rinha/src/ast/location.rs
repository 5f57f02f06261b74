//! Source location tracking

use serde::{Deserialize, Serialize};

/// A span in the original source file, as reported by the parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub filename: String,
}

impl Location {
    pub fn new(start: usize, end: usize, filename: impl Into<String>) -> Self {
        Self {
            start,
            end,
            filename: filename.into(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}..{}", self.filename, self.start, self.end)
    }
}

impl From<&Location> for std::ops::Range<usize> {
    fn from(location: &Location) -> Self {
        location.start..location.end
    }
}
