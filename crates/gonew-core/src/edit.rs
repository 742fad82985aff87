//! Span-based source editing over an immutable original buffer
//!
//! Edits are recorded against offsets of the original text and only
//! rendered when the buffer is consumed, so offsets computed up front
//! stay valid no matter how many edits are registered.

use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors that can occur while registering an edit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edit span {start}..{end} ends before it starts")]
    InvertedSpan { start: usize, end: usize },
}

/// A single edit: replace the bytes in `start..end` with `replacement`
///
/// An insertion is an edit whose range is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte offset where the replaced range starts
    pub start: usize,
    /// Byte offset where the replaced range ends (exclusive)
    pub end: usize,
    /// The replacement text
    pub replacement: String,
}

impl Edit {
    /// Create an edit replacing `start..end`
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Create an edit inserting text at `at`
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    /// Whether this edit only inserts text
    pub fn is_insert(&self) -> bool {
        self.start == self.end
    }

    /// Whether two edits touch each other's interior
    ///
    /// Two insertions never conflict, and an insertion may sit exactly on
    /// the boundary of a replaced range.
    pub fn overlaps(&self, other: &Edit) -> bool {
        match (self.is_insert(), other.is_insert()) {
            (true, true) => false,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }
}

/// A set of pending edits over an original byte buffer
///
/// The original is never mutated. `into_bytes` visits edits in ascending
/// start offset; edits sharing a start offset are emitted in the order
/// they were registered, so an insertion followed by a replacement at the
/// same offset renders as `inserted + replacement`.
#[derive(Debug)]
pub struct EditBuffer<'a> {
    source: &'a [u8],
    edits: Vec<Edit>,
}

impl<'a> EditBuffer<'a> {
    /// Create a buffer over `source` with no edits
    pub fn new<S: AsRef<[u8]> + ?Sized>(source: &'a S) -> Self {
        Self {
            source: source.as_ref(),
            edits: Vec::new(),
        }
    }

    /// The original, unedited text
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Edits registered so far, in registration order
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Whether no edit has been registered
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Replace `start..end` of the original with `text`
    pub fn replace(
        &mut self,
        start: usize,
        end: usize,
        text: impl Into<String>,
    ) -> Result<(), EditError> {
        self.push(Edit::replace(start, end, text))
    }

    /// Insert `text` at offset `at` of the original
    pub fn insert(&mut self, at: usize, text: impl Into<String>) -> Result<(), EditError> {
        self.push(Edit::insert(at, text))
    }

    /// Register an edit after checking it against the buffer and prior edits
    pub fn push(&mut self, edit: Edit) -> Result<(), EditError> {
        if edit.start > edit.end {
            return Err(EditError::InvertedSpan {
                start: edit.start,
                end: edit.end,
            });
        }

        let len = self.source.len();
        if edit.end > len {
            return Err(EditError::SpanOutOfBounds {
                start: edit.start,
                end: edit.end,
                len,
            });
        }

        if let Some(existing) = self.edits.iter().find(|e| e.overlaps(&edit)) {
            return Err(EditError::OverlappingEdits(edit.start.max(existing.start)));
        }

        self.edits.push(edit);
        Ok(())
    }

    /// Render the edited text, consuming the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        if self.edits.is_empty() {
            return self.source.to_vec();
        }

        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        // Stable: equal starts keep registration order
        ordered.sort_by_key(|e| e.start);

        let extra: usize = ordered.iter().map(|e| e.replacement.len()).sum();
        let mut out = Vec::with_capacity(self.source.len() + extra);
        let mut cursor = 0;

        for edit in ordered {
            if edit.start > cursor {
                out.extend_from_slice(&self.source[cursor..edit.start]);
            }
            out.extend_from_slice(edit.replacement.as_bytes());
            cursor = cursor.max(edit.end);
        }
        out.extend_from_slice(&self.source[cursor..]);

        out
    }

    /// Render the edited text as a `String`
    pub fn into_string(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.into_bytes())
    }
}
