//! Module identity rewriting for Go source trees
//!
//! Given a source module path and a destination module path, this crate
//! rewrites:
//! - import paths naming the source module or its subpackages
//! - the package clause of files at the module root
//! - the `module` statement of the root go.mod
//!
//! Go files are edited in place through a byte-level edit buffer, so
//! formatting and comments outside the rewritten spans are untouched.
//! go.mod files are parsed and reprinted in canonical layout.

pub mod error;
pub mod manifest;
pub mod modfile;
pub mod module_path;
pub mod source;
pub mod syntax;

pub use error::{ModfileError, ModulePathError, RewriteError};
pub use manifest::{rewrite_manifest, try_rewrite_manifest};
pub use module_path::{check_import_path, leaf, ModuleIdentity};
pub use source::{rewrite_source, Change, ChangeKind, SourceRewrite};
