//! Rewriting a freshly cloned module tree
//!
//! Three phases, so a failure never leaves a half-rewritten tree behind:
//! 1. walk the tree and classify entries
//! 2. rewrite every Go file and the root go.mod in memory (in parallel)
//! 3. write changed files back, then remove version-control metadata

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use gonew_rewrite::{rewrite_source, try_rewrite_manifest, Change, ModuleIdentity};

use crate::config::Config;

const MANIFEST: &str = "go.mod";
const METADATA: &str = ".git";

/// What a directory entry means for the rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// The module's go.mod
    Manifest,
    /// A Go source file
    Source,
    /// A `.git` directory or file
    Metadata,
    Other,
}

/// Classify an entry by its path relative to the tree root
pub fn classify(rel: &Path, is_dir: bool) -> EntryKind {
    let name = rel.file_name().map(|n| n.to_string_lossy());
    match name.as_deref() {
        Some(METADATA) => EntryKind::Metadata,
        Some(MANIFEST) if !is_dir && is_root(rel) => EntryKind::Manifest,
        Some(_) if !is_dir && rel.extension().is_some_and(|ext| ext == "go") => EntryKind::Source,
        _ => EntryKind::Other,
    }
}

/// Whether a relative path names an entry directly in the tree root
pub fn is_root(rel: &Path) -> bool {
    rel.components().count() == 1
}

/// Entries of interest found by the walk, relative to the root
#[derive(Debug, Default)]
pub struct Scan {
    pub manifest: Option<PathBuf>,
    pub sources: Vec<PathBuf>,
    pub metadata: Vec<PathBuf>,
    pub excluded: Vec<PathBuf>,
}

/// Check that `dir` can receive a clone: missing, or an empty directory
pub fn check_target_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        bail!("target {} exists and is not a directory", dir.display());
    }
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    if entries.next().is_some() {
        bail!("target directory {} exists and is non-empty", dir.display());
    }
    Ok(())
}

/// Walk the tree under `root`
pub fn scan(root: &Path, config: &Config) -> Result<Scan> {
    let mut result = Scan::default();
    let mut entries = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = entries.next() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let is_dir = entry.file_type().is_dir();
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {}", entry.path().display(), root.display()))?
            .to_path_buf();

        match classify(&rel, is_dir) {
            EntryKind::Metadata => {
                if is_dir {
                    entries.skip_current_dir();
                }
                result.metadata.push(rel);
            }
            EntryKind::Manifest => result.manifest = Some(rel),
            EntryKind::Source if config.should_exclude(&rel) => {
                debug!("excluded {}", rel.display());
                result.excluded.push(rel);
            }
            EntryKind::Source => result.sources.push(rel),
            EntryKind::Other => {}
        }
    }

    Ok(result)
}

/// A Go file after the in-memory rewrite
#[derive(Debug)]
pub struct SourceOutcome {
    pub path: PathBuf,
    /// New contents, present only when something changed
    pub rewritten: Option<Vec<u8>>,
    pub changes: Vec<Change>,
}

/// The root go.mod after the in-memory rewrite
#[derive(Debug)]
pub struct ManifestOutcome {
    pub path: PathBuf,
    pub rewritten: Option<Vec<u8>>,
    /// Why the manifest was kept as is
    pub warning: Option<String>,
}

/// Everything a run did to the tree
#[derive(Debug, Default)]
pub struct TreeReport {
    pub sources: Vec<SourceOutcome>,
    pub manifest: Option<ManifestOutcome>,
    pub excluded: Vec<PathBuf>,
    pub removed_metadata: Vec<PathBuf>,
    pub files_written: usize,
}

/// Rewrite one Go file in memory
fn transform_source(root: &Path, rel: &Path, identity: &ModuleIdentity) -> Result<SourceOutcome> {
    let path = root.join(rel);
    let data = std::fs::read(&path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let result = rewrite_source(&data, &rel.to_string_lossy(), identity, is_root(rel))?;
    let rewritten = if result.is_unchanged() {
        None
    } else {
        Some(result.text)
    };

    Ok(SourceOutcome {
        path: rel.to_path_buf(),
        rewritten,
        changes: result.changes,
    })
}

/// Rewrite the go.mod in memory, keeping it on any manifest error
fn transform_manifest(root: &Path, rel: &Path, dest: &str) -> Result<ManifestOutcome> {
    let path = root.join(rel);
    let data = std::fs::read(&path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let (rewritten, warning) = match try_rewrite_manifest(&data, dest) {
        Ok(text) if text == data => (None, None),
        Ok(text) => (Some(text), None),
        Err(e) => (None, Some(format!("{}; kept unchanged", e))),
    };

    Ok(ManifestOutcome {
        path: rel.to_path_buf(),
        rewritten,
        warning,
    })
}

/// Write a file's new contents
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Remove a `.git` directory or file
fn remove_metadata(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.with_context(|| format!("Failed to remove {}", path.display()))
}

/// Retarget the module tree under `root` to the identity's destination
///
/// No file is written unless every Go file was rewritten successfully.
pub fn rewrite_tree(
    root: &Path,
    identity: &ModuleIdentity,
    config: &Config,
    keep_git: bool,
) -> Result<TreeReport> {
    let scan = scan(root, config)?;
    info!(
        "found {} Go file(s) under {}",
        scan.sources.len(),
        root.display()
    );

    let sources: Vec<SourceOutcome> = scan
        .sources
        .par_iter()
        .map(|rel| transform_source(root, rel, identity))
        .collect::<Result<_>>()?;

    let manifest = scan
        .manifest
        .as_deref()
        .map(|rel| transform_manifest(root, rel, identity.dest()))
        .transpose()?;

    let mut files_written = 0;
    for outcome in &sources {
        if let Some(text) = &outcome.rewritten {
            write_file(&root.join(&outcome.path), text)?;
            files_written += 1;
        }
    }
    if let Some(text) = manifest.as_ref().and_then(|m| m.rewritten.as_ref()) {
        write_file(&root.join(MANIFEST), text)?;
        files_written += 1;
    }

    let mut removed_metadata = Vec::new();
    if !keep_git {
        for rel in scan.metadata {
            remove_metadata(&root.join(&rel))?;
            debug!("removed {}", rel.display());
            removed_metadata.push(rel);
        }
    }

    Ok(TreeReport {
        sources,
        manifest,
        excluded: scan.excluded,
        removed_metadata,
        files_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(rel)).unwrap()
    }

    fn template(root: &Path) {
        write(root, "go.mod", "module github.com/example/hello\n\ngo 1.21\n");
        write(
            root,
            "hello.go",
            "package hello\n\nimport \"github.com/example/hello/internal/greet\"\n\nvar Greeting = greet.Hello\n",
        );
        write(
            root,
            "hello_test.go",
            "package hello_test\n\nimport \"github.com/example/hello\"\n",
        );
        write(
            root,
            "cmd/hello/main.go",
            "package main\n\nimport \"github.com/example/hello\"\n\nfunc main() { println(hello.Greeting()) }\n",
        );
        write(root, "internal/greet/greet.go", "package greet\n\nfunc Hello() string { return \"hi\" }\n");
        write(root, "README.md", "github.com/example/hello\n");
        write(root, ".git/HEAD", "ref: refs/heads/main\n");
    }

    #[test]
    fn test_is_root() {
        assert!(is_root(Path::new("main.go")));
        assert!(!is_root(Path::new("cmd/main.go")));
    }

    #[test]
    fn test_check_target_dir() {
        let temp = TempDir::new().unwrap();
        assert!(check_target_dir(&temp.path().join("missing")).is_ok());
        assert!(check_target_dir(temp.path()).is_ok());

        write(temp.path(), "file.txt", "x");
        let err = check_target_dir(temp.path()).unwrap_err();
        assert!(err.to_string().ends_with("exists and is non-empty"));
        assert!(check_target_dir(&temp.path().join("file.txt")).is_err());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(Path::new("go.mod"), false), EntryKind::Manifest);
        assert_eq!(classify(Path::new("sub/go.mod"), false), EntryKind::Other);
        assert_eq!(classify(Path::new("a/b.go"), false), EntryKind::Source);
        assert_eq!(classify(Path::new("a.go"), true), EntryKind::Other);
        assert_eq!(classify(Path::new(".git"), true), EntryKind::Metadata);
        assert_eq!(classify(Path::new("sub/.git"), false), EntryKind::Metadata);
        assert_eq!(classify(Path::new("notes.txt"), false), EntryKind::Other);
    }

    #[test]
    fn test_rewrite_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        template(root);

        let identity = ModuleIdentity::new("github.com/example/hello", "your.domain/myprog");
        let report = rewrite_tree(root, &identity, &Config::default(), false).unwrap();

        assert_eq!(read(root, "go.mod"), "module your.domain/myprog\n\ngo 1.21\n");
        assert_eq!(
            read(root, "hello.go"),
            "package myprog\n\nimport \"your.domain/myprog/internal/greet\"\n\nvar Greeting = greet.Hello\n"
        );
        assert_eq!(
            read(root, "hello_test.go"),
            "package myprog_test\n\nimport hello \"your.domain/myprog\"\n"
        );
        assert_eq!(
            read(root, "cmd/hello/main.go"),
            "package main\n\nimport hello \"your.domain/myprog\"\n\nfunc main() { println(hello.Greeting()) }\n"
        );
        assert_eq!(
            read(root, "internal/greet/greet.go"),
            "package greet\n\nfunc Hello() string { return \"hi\" }\n"
        );
        assert_eq!(read(root, "README.md"), "github.com/example/hello\n");
        assert!(!root.join(".git").exists());

        assert_eq!(report.sources.len(), 4);
        assert_eq!(report.files_written, 4);
        assert_eq!(report.removed_metadata, vec![PathBuf::from(".git")]);
    }

    #[test]
    fn test_keep_git() {
        let temp = TempDir::new().unwrap();
        template(temp.path());

        let identity = ModuleIdentity::new("github.com/example/hello", "your.domain/myprog");
        let report = rewrite_tree(temp.path(), &identity, &Config::default(), true).unwrap();

        assert!(temp.path().join(".git/HEAD").exists());
        assert!(report.removed_metadata.is_empty());
    }

    #[test]
    fn test_invalid_package_name_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module example.com/app\n");
        write(root, "a/util.go", "package util\n\nimport \"example.com/app/b\"\n");
        write(root, "app.go", "package app\n");
        write(root, ".git/HEAD", "ref: refs/heads/main\n");

        let identity = ModuleIdentity::new("example.com/app", "example.com/1app");
        let err = rewrite_tree(root, &identity, &Config::default(), false).unwrap_err();

        assert!(format!("{:#}", err).contains("cannot rename package app to package 1app"));
        assert_eq!(read(root, "go.mod"), "module example.com/app\n");
        assert_eq!(read(root, "a/util.go"), "package util\n\nimport \"example.com/app/b\"\n");
        assert!(root.join(".git/HEAD").exists());
    }

    #[test]
    fn test_malformed_manifest_is_kept() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module a\nmodule b\n");
        write(root, "main.go", "package main\n\nimport \"a/x\"\n");

        let identity = ModuleIdentity::new("a", "b");
        let report = rewrite_tree(root, &identity, &Config::default(), false).unwrap();

        assert_eq!(read(root, "go.mod"), "module a\nmodule b\n");
        assert_eq!(read(root, "main.go"), "package main\n\nimport \"b/x\"\n");
        let manifest = report.manifest.unwrap();
        assert!(manifest.rewritten.is_none());
        assert!(manifest.warning.unwrap().contains("repeated module statement"));
    }

    #[test]
    fn test_nested_manifest_untouched() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module example.com/m\n");
        write(root, "tools/go.mod", "module example.com/m/tools\n");

        let identity = ModuleIdentity::new("example.com/m", "example.com/n");
        rewrite_tree(root, &identity, &Config::default(), false).unwrap();

        assert_eq!(read(root, "go.mod"), "module example.com/n\n");
        assert_eq!(read(root, "tools/go.mod"), "module example.com/m/tools\n");
    }

    #[test]
    fn test_excluded_files_untouched() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "testdata/old.go", "package x\n\nimport \"example.com/m\"\n");
        write(root, "lib/new.go", "package x\n\nimport \"example.com/m\"\n");

        let config = Config {
            paths: PathsConfig {
                exclude: vec!["testdata/".to_string()],
            },
            ..Default::default()
        };
        let identity = ModuleIdentity::new("example.com/m", "example.com/n");
        let report = rewrite_tree(root, &identity, &config, false).unwrap();

        assert_eq!(read(root, "testdata/old.go"), "package x\n\nimport \"example.com/m\"\n");
        assert_eq!(read(root, "lib/new.go"), "package x\n\nimport m \"example.com/n\"\n");
        assert_eq!(report.excluded, vec![PathBuf::from("testdata/old.go")]);
    }

    #[test]
    fn test_unparsable_go_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module example.com/m\n");
        write(root, "broken.go", "this is not go\n");

        let identity = ModuleIdentity::new("example.com/m", "example.com/n");
        let err = rewrite_tree(root, &identity, &Config::default(), false).unwrap_err();

        assert!(format!("{:#}", err).starts_with("broken.go:1:1:"));
        assert_eq!(read(root, "go.mod"), "module example.com/m\n");
    }
}
