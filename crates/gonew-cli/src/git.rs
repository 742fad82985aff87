//! Git integration for gonew
//!
//! Clones the template repository that holds the source module:
//! - `host/owner/repo` maps to `git@host:owner/repo.git` or
//!   `https://host/owner/repo.git`
//! - a version other than `latest` selects a branch or tag

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// How the template repository is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Ssh,
    Https,
}

impl Protocol {
    pub fn from_str(s: &str) -> Option<Protocol> {
        match s.to_lowercase().as_str() {
            "ssh" => Some(Protocol::Ssh),
            "https" => Some(Protocol::Https),
            _ => None,
        }
    }
}

/// Split `module@version` into the module path and its version
pub fn split_version(src: &str) -> (&str, Option<&str>) {
    match src.split_once('@') {
        Some((module, version)) => (module, Some(version)),
        None => (src, None),
    }
}

/// Derive the repository URL for a module path
pub fn clone_url(module: &str, protocol: Protocol) -> Result<String> {
    let Some((host, repo)) = module.split_once('/') else {
        bail!(
            "Cannot derive a repository URL from {}: expected host/owner/repo",
            module
        );
    };
    if host.is_empty() || repo.is_empty() {
        bail!(
            "Cannot derive a repository URL from {}: expected host/owner/repo",
            module
        );
    }

    Ok(match protocol {
        Protocol::Ssh => format!("git@{}:{}.git", host, repo),
        Protocol::Https => format!("https://{}/{}.git", host, repo),
    })
}

/// Arguments passed to `git` for a clone
pub fn clone_args(url: &str, dir: &Path, version: Option<&str>, depth: Option<u32>) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    if let Some(depth) = depth {
        args.push("--depth".to_string());
        args.push(depth.to_string());
    }
    if let Some(version) = version.filter(|v| !v.is_empty() && *v != "latest") {
        args.push("--branch".to_string());
        args.push(version.to_string());
    }
    args.push(url.to_string());
    args.push(dir.to_string_lossy().into_owned());
    args
}

/// Clone `url` into `dir`
pub fn clone_repository(
    url: &str,
    dir: &Path,
    version: Option<&str>,
    depth: Option<u32>,
) -> Result<()> {
    let args = clone_args(url, dir, version, depth);
    info!("git {}", args.join(" "));

    let output = Command::new("git")
        .args(&args)
        .output()
        .context("Failed to execute git clone")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        bail!(
            "git clone {} failed: {}{}",
            url,
            stderr.trim(),
            stdout.trim()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_from_str() {
        assert_eq!(Protocol::from_str("ssh"), Some(Protocol::Ssh));
        assert_eq!(Protocol::from_str("HTTPS"), Some(Protocol::Https));
        assert_eq!(Protocol::from_str("ftp"), None);
    }

    #[test]
    fn test_split_version() {
        assert_eq!(
            split_version("github.com/example/hello@v1.2.0"),
            ("github.com/example/hello", Some("v1.2.0"))
        );
        assert_eq!(
            split_version("github.com/example/hello"),
            ("github.com/example/hello", None)
        );
    }

    #[test]
    fn test_clone_url() {
        assert_eq!(
            clone_url("github.com/example/hello", Protocol::Ssh).unwrap(),
            "git@github.com:example/hello.git"
        );
        assert_eq!(
            clone_url("github.com/example/hello", Protocol::Https).unwrap(),
            "https://github.com/example/hello.git"
        );
        assert!(clone_url("hello", Protocol::Ssh).is_err());
        assert!(clone_url("github.com/", Protocol::Ssh).is_err());
    }

    #[test]
    fn test_clone_args() {
        let args = clone_args(
            "git@github.com:example/hello.git",
            Path::new("myprog"),
            Some("v1.0.0"),
            Some(1),
        );
        assert_eq!(
            args,
            vec![
                "clone",
                "--depth",
                "1",
                "--branch",
                "v1.0.0",
                "git@github.com:example/hello.git",
                "myprog"
            ]
        );
    }

    #[test]
    fn test_clone_args_latest_is_default_branch() {
        let args = clone_args("u", Path::new("d"), Some("latest"), None);
        assert_eq!(args, vec!["clone", "u", "d"]);
    }
}
