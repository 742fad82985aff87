//! Identity rewrite for a single Go source file
//!
//! Only two kinds of span ever change: the package name of files at the
//! module root, and import path literals that refer to the source module
//! or one of its subpackages. Everything else is copied byte for byte.

use std::fmt;

use gonew_core::EditBuffer;
use tracing::debug;

use crate::error::RewriteError;
use crate::module_path::ModuleIdentity;
use crate::syntax::ident::is_identifier;
use crate::syntax::quote::quote;
use crate::syntax::{offset_to_line_column, parse_header};

/// What a single rewrite decision did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    PackageRenamed { from: String, to: String },
    ImportRewritten { from: String, to: String },
    /// The old package name was added as an explicit import name
    AliasInserted { alias: String },
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::PackageRenamed { from, to } => {
                write!(f, "package {} -> package {}", from, to)
            }
            ChangeKind::ImportRewritten { from, to } => write!(f, "import {:?} -> {:?}", from, to),
            ChangeKind::AliasInserted { alias } => {
                write!(f, "import keeps local name {}", alias)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// 1-based line of the edited span
    pub line: usize,
    pub kind: ChangeKind,
}

/// Result of rewriting one source file
#[derive(Debug, Clone)]
pub struct SourceRewrite {
    pub text: Vec<u8>,
    pub changes: Vec<Change>,
}

impl SourceRewrite {
    /// Whether the output is identical to the input
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Rewrite the package clause and imports of one Go file
///
/// `is_root` marks files directly in the module's root directory; only
/// those have their package clause renamed. `file` is used in messages.
pub fn rewrite_source(
    data: &[u8],
    file: &str,
    identity: &ModuleIdentity,
    is_root: bool,
) -> Result<SourceRewrite, RewriteError> {
    let source = std::str::from_utf8(data).map_err(|e| {
        RewriteError::parse(file, data, e.valid_up_to(), "invalid UTF-8 encoding")
    })?;
    let header = parse_header(source)
        .map_err(|e| RewriteError::parse(file, data, e.offset, e.message))?;

    let mut buf = EditBuffer::new(data);
    let mut changes = Vec::new();
    let line_of = |offset: usize| offset_to_line_column(data, offset).0;

    let src_name = identity.source_leaf();
    let dst_name = identity.dest_leaf();

    if is_root {
        let package = &header.package;
        if let Some(new_name) = renamed_package(&package.name, src_name, dst_name) {
            if !is_identifier(&new_name) {
                return Err(RewriteError::invalid_package_name(
                    file,
                    &package.name,
                    new_name,
                ));
            }
            if new_name != package.name {
                buf.replace(package.span.start, package.span.end, new_name.as_str())
                    .map_err(|e| RewriteError::edit(file, e))?;
                changes.push(Change {
                    line: line_of(package.span.start),
                    kind: ChangeKind::PackageRenamed {
                        from: package.name.clone(),
                        to: new_name,
                    },
                });
            }
        }
    }

    for spec in &header.imports {
        let Some(path) = spec.path() else {
            debug!("{}: skipping undecodable import {}", file, spec.literal);
            continue;
        };
        let Some(target) = identity.retarget(&path) else {
            continue;
        };
        let line = line_of(spec.span.start);

        if path == identity.source() && src_name != dst_name && spec.alias.is_none() {
            // Code in this file still refers to the package by its old name.
            // Naming the import keeps it compiling without touching uses.
            buf.insert(spec.span.start, format!("{} ", src_name))
                .map_err(|e| RewriteError::edit(file, e))?;
            changes.push(Change {
                line,
                kind: ChangeKind::AliasInserted {
                    alias: src_name.to_string(),
                },
            });
        }

        buf.replace(spec.span.start, spec.span.end, quote(&target))
            .map_err(|e| RewriteError::edit(file, e))?;
        debug!("{}:{}: import {} -> {}", file, line, path, target);
        changes.push(Change {
            line,
            kind: ChangeKind::ImportRewritten {
                from: path,
                to: target,
            },
        });
    }

    Ok(SourceRewrite {
        text: buf.into_bytes(),
        changes,
    })
}

/// New package name for a root file declaring `name`, if it follows the
/// source module's leaf (`old` or `old_test`)
fn renamed_package(name: &str, src_name: &str, dst_name: &str) -> Option<String> {
    let suffix = name.strip_prefix(src_name)?;
    match suffix {
        "" | "_test" => Some(format!("{}{}", dst_name, suffix)),
        _ => None,
    }
}
