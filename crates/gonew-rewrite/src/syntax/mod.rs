//! Structural-only Go syntax
//!
//! Just enough of the Go grammar to find a file's package clause and its
//! import declarations: a lexer for the token kinds that can appear before
//! the first top-level declaration, and a header parser on top of it.
//! Nothing after the import block is ever tokenized.

pub mod header;
pub mod ident;
pub mod lexer;
pub mod quote;

pub use header::{parse_header, FileHeader, ImportSpec, PackageClause};

use thiserror::Error;

/// A half-open byte range into a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text covered by this span
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// A lexical or structural error at a byte offset
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Convert a byte offset to line and column numbers (1-based)
///
/// Columns count bytes, as Go's token positions do.
pub fn offset_to_line_column(source: &[u8], offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}
