//! Error types and reporting

use crate::ast::Location;
use crate::interp::RuntimeError;
use std::ops::Range;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, LoadError>;

/// Failure to obtain a program tree
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed AST: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report a runtime error with ariadne
///
/// Points at the failing node when the source file named in its location can
/// be read; otherwise prints a single line to stderr.
pub fn report_runtime_error(error: &RuntimeError) -> std::io::Result<()> {
    let Some(location) = &error.location else {
        eprintln!("{error}");
        return Ok(());
    };
    let Ok(source) = std::fs::read_to_string(&location.filename) else {
        eprintln!("{error}");
        return Ok(());
    };

    write_report(error, location, &source, true, std::io::stderr())
}

/// Render `error` against `source` to any writer
fn write_report<W: std::io::Write>(
    error: &RuntimeError,
    location: &Location,
    source: &str,
    color: bool,
    out: W,
) -> std::io::Result<()> {
    use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

    let filename = location.filename.as_str();
    let span = byte_span(location, source);
    // Parser locations are byte offsets into the source text
    let config = Config::default()
        .with_index_type(IndexType::Byte)
        .with_color(color);

    Report::build(ReportKind::Error, (filename, span.clone()))
        .with_config(config)
        .with_message(format!("{} error", error.kind.category()))
        .with_label(
            Label::new((filename, span))
                .with_message(error.kind.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), out)
}

/// Byte range of `location` clamped into `source` and onto char boundaries
fn byte_span(location: &Location, source: &str) -> Range<usize> {
    let floor = |mut index: usize| {
        while !source.is_char_boundary(index) {
            index -= 1;
        }
        index
    };
    let Range { start, end } = Range::from(location);
    let end = floor(end.min(source.len()));
    let start = floor(start.min(end));
    start..end
}
