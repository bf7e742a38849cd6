//! Remote content repositories
//!
//! A remote source is cloned with the system `git` into a temporary directory
//! that lives as long as the returned [`ClonedRepo`].

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use thiserror::Error;

/// Cloning error
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git clone of {url} failed: {stderr}")]
    Git { url: String, stderr: String },

    #[error("can't find cloned repo directory for {0}")]
    NoCheckout(String),
}

/// Check if a source looks like a git remote rather than a local path
pub fn is_remote(source: &str) -> bool {
    let source = source.trim();
    ["http://", "https://", "ssh://", "git@"]
        .iter()
        .any(|prefix| source.starts_with(prefix))
}

/// A checkout in a temporary directory, removed on drop
#[derive(Debug)]
pub struct ClonedRepo {
    _temp: TempDir,
    path: PathBuf,
}

impl ClonedRepo {
    /// Root of the checked-out working tree
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Clone `url` into a fresh temporary directory
pub fn clone_to_temp(url: &str) -> Result<ClonedRepo, CloneError> {
    let temp = tempfile::Builder::new().prefix("content-lint").tempdir()?;

    log::info!("cloning {} into {}", url, temp.path().display());
    let output = Command::new("git")
        .arg("-C")
        .arg(temp.path())
        .args(["clone", "--quiet", url])
        .output()?;

    if !output.status.success() {
        return Err(CloneError::Git {
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let path = find_checkout(temp.path())?.ok_or_else(|| CloneError::NoCheckout(url.to_string()))?;
    log::debug!("cloned {} to {}", url, path.display());

    Ok(ClonedRepo { _temp: temp, path })
}

fn find_checkout(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://github.com/org/blueprint.git"));
        assert!(is_remote("http://example.com/repo"));
        assert!(is_remote("git@github.com:org/blueprint.git"));
        assert!(is_remote("ssh://git@example.com/repo.git"));
        assert!(!is_remote("./blueprint"));
        assert!(!is_remote("/tmp/https-mirror"));
        assert!(!is_remote("C:\\content"));
    }

    #[test]
    fn test_find_checkout() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_checkout(temp.path()).unwrap(), None);

        std::fs::write(temp.path().join("stray.txt"), "").unwrap();
        assert_eq!(find_checkout(temp.path()).unwrap(), None);

        std::fs::create_dir(temp.path().join("blueprint")).unwrap();
        assert_eq!(
            find_checkout(temp.path()).unwrap(),
            Some(temp.path().join("blueprint"))
        );
    }
}
