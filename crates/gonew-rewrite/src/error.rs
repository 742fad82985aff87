//! Error types for gonew-rewrite
//!
//! Source rewriting fails hard: a file whose structure cannot be
//! determined, or a package rename producing an invalid identifier, must
//! stop the run. Manifest problems are a separate, recoverable kind
//! (`ModfileError`) that callers answer by keeping the original text.

use gonew_core::EditError;
use thiserror::Error;

pub use crate::modfile::ModfileError;

/// Fatal errors raised while rewriting a Go source file
#[derive(Error, Debug)]
pub enum RewriteError {
    /// The package clause or imports could not be parsed
    #[error("{file}:{line}:{column}: {message}")]
    Parse {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// The renamed package clause would not be a valid identifier
    #[error("{file}: cannot rename package {old} to package {new}: invalid package name")]
    InvalidPackageName {
        file: String,
        old: String,
        new: String,
    },

    /// An edit violated the edit buffer contract
    #[error("{file}: {source}")]
    Edit {
        file: String,
        #[source]
        source: EditError,
    },
}

impl RewriteError {
    /// Create a parse error at a byte offset of `source`
    pub fn parse(file: impl Into<String>, source: &[u8], offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = crate::syntax::offset_to_line_column(source, offset);
        Self::Parse {
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an invalid package name error
    pub fn invalid_package_name(
        file: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self::InvalidPackageName {
            file: file.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    /// Create an edit error
    pub fn edit(file: impl Into<String>, source: EditError) -> Self {
        Self::Edit {
            file: file.into(),
            source,
        }
    }

    /// The file the error refers to
    pub fn file(&self) -> &str {
        match self {
            Self::Parse { file, .. }
            | Self::InvalidPackageName { file, .. }
            | Self::Edit { file, .. } => file,
        }
    }
}

/// A destination module path that cannot be used as an import path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed module path {path:?}: {reason}")]
pub struct ModulePathError {
    pub path: String,
    pub reason: String,
}
