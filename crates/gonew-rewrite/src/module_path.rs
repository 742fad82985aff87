//! Module paths and the source/destination identity pair

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ModulePathError;

/// Final element of a slash-separated path
///
/// Trailing slashes are ignored; an empty path yields `"."` and a path made
/// only of slashes yields `"/"`.
pub fn leaf(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

/// Check that `path` is syntactically usable as an import path
pub fn check_import_path(path: &str) -> Result<(), ModulePathError> {
    static ELEMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let element_re =
        ELEMENT_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9._~+\-]+$").unwrap());

    let invalid = |reason: &str| ModulePathError {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("empty string"));
    }
    if path.starts_with('-') {
        return Err(invalid("leading dash"));
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err(invalid("leading or trailing slash"));
    }

    for element in path.split('/') {
        if element.is_empty() {
            return Err(invalid("double slash"));
        }
        if !element_re.is_match(element) {
            return Err(invalid(&format!("invalid char in path element {:?}", element)));
        }
        if element.starts_with('.') || element.ends_with('.') {
            return Err(invalid(&format!(
                "leading or trailing dot in path element {:?}",
                element
            )));
        }
    }

    Ok(())
}

/// The module being cloned and the module it becomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentity {
    source: String,
    dest: String,
}

impl ModuleIdentity {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// Module path of the template
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Module path of the new module
    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn source_leaf(&self) -> &str {
        leaf(&self.source)
    }

    pub fn dest_leaf(&self) -> &str {
        leaf(&self.dest)
    }

    /// Map an import path into the destination module
    ///
    /// Returns `None` for paths outside the source module. A path that
    /// merely shares a string prefix (no `/` boundary) is outside it.
    pub fn retarget(&self, import_path: &str) -> Option<String> {
        if import_path == self.source {
            return Some(self.dest.clone());
        }
        import_path
            .strip_prefix(self.source.as_str())
            .filter(|rest| rest.starts_with('/'))
            .map(|rest| format!("{}{}", self.dest, rest))
    }
}
