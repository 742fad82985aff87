//! Module manifest (go.mod) identity rewrite

use tracing::warn;

use crate::modfile::{ModFile, ModfileError};

/// Set the module path of a go.mod file and return the reformatted text
pub fn try_rewrite_manifest(data: &[u8], dest: &str) -> Result<Vec<u8>, ModfileError> {
    let mut file = ModFile::parse_lax(data)?;
    file.set_module_path(dest);
    Ok(file.format().into_bytes())
}

/// Like [`try_rewrite_manifest`], but keeps the original bytes on failure
///
/// A manifest that cannot be parsed is copied unchanged; the template is
/// still usable and the user can fix the module line by hand.
pub fn rewrite_manifest(data: &[u8], dest: &str) -> Vec<u8> {
    match try_rewrite_manifest(data, dest) {
        Ok(text) => text,
        Err(e) => {
            warn!("{}; copying go.mod unchanged", e);
            data.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_module_line() {
        let out = rewrite_manifest(
            b"module example.com/hello\n\ngo 1.21\n\nrequire golang.org/x/mod v0.14.0\n",
            "your.domain/myprog",
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "module your.domain/myprog\n\ngo 1.21\n\nrequire golang.org/x/mod v0.14.0\n"
        );
    }

    #[test]
    fn test_inserts_missing_module() {
        let out = rewrite_manifest(b"go 1.21\n", "example.com/new");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "module example.com/new\n\ngo 1.21\n"
        );
    }

    #[test]
    fn test_normalizes_layout() {
        let out = rewrite_manifest(b"module   old\ngo 1.21\nrequire (\n    a v1\n)", "new");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "module new\n\ngo 1.21\n\nrequire (\n\ta v1\n)\n"
        );
    }

    #[test]
    fn test_malformed_manifest_is_kept() {
        let data = b"module example.com/hello\nrequire (\n\ta v1\n";
        assert!(try_rewrite_manifest(data, "x").is_err());
        assert_eq!(rewrite_manifest(data, "x"), data.to_vec());

        let block_comment = b"/* no */\nmodule m\n";
        assert_eq!(rewrite_manifest(block_comment, "x"), block_comment.to_vec());
    }

    #[test]
    fn test_error_message() {
        let err = try_rewrite_manifest(b"module a\nmodule b\n", "x").unwrap_err();
        assert_eq!(err.to_string(), "go.mod:2:1: repeated module statement");
    }
}
