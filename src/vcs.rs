//! Version control backend for the catalog mirror
//!
//! The synchronizer only needs three operations, so they sit behind a small
//! trait. `GitCli` drives the `git` binary with explicit argument lists.

use crate::error::{StockpotError, StockpotResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Operations the catalog synchronizer performs on a working copy
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Whether `path` is the top level of a working copy
    async fn is_repository(&self, path: &Path) -> StockpotResult<bool>;

    /// Clone `remote` into `path` (which must be missing or empty)
    async fn clone_into(&self, remote: &str, path: &Path) -> StockpotResult<()>;

    /// Fast-forward `path` to the latest upstream state
    async fn pull(&self, path: &Path) -> StockpotResult<()>;

    /// Human-readable backend name
    fn name(&self) -> &'static str;
}

/// Git backend using the system `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    /// Create a backend using `git` from PATH
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Check if git is installed
    pub async fn is_installed() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Execute a git command and return the output
    async fn exec(&self, args: &[&str]) -> StockpotResult<std::process::Output> {
        debug!("Executing: {} {:?}", self.program, args);

        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| StockpotError::command_failed(format!("{} {:?}", self.program, args), e))
    }

    /// URL of `origin` for error reporting
    async fn remote_url(&self, path: &Path) -> Option<String> {
        let path_str = path.to_string_lossy();
        let output = self
            .exec(&["-C", &path_str, "remote", "get-url", "origin"])
            .await
            .ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn is_repository(&self, path: &Path) -> StockpotResult<bool> {
        if !path.is_dir() {
            return Ok(false);
        }

        let path_str = path.to_string_lossy();
        let output = self
            .exec(&["-C", &path_str, "rev-parse", "--show-toplevel"])
            .await?;

        if !output.status.success() {
            return Ok(false);
        }

        // A mirror nested inside some other work tree is not a mirror
        let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let expected = path
            .canonicalize()
            .map_err(|e| StockpotError::io(format!("resolving {}", path.display()), e))?;
        let actual = Path::new(&toplevel)
            .canonicalize()
            .unwrap_or_else(|_| Path::new(&toplevel).to_path_buf());

        Ok(actual == expected)
    }

    async fn clone_into(&self, remote: &str, path: &Path) -> StockpotResult<()> {
        let path_str = path.to_string_lossy();
        let output = self.exec(&["clone", "--", remote, &path_str]).await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(StockpotError::sync(remote, path, stderr.trim()))
        }
    }

    async fn pull(&self, path: &Path) -> StockpotResult<()> {
        let path_str = path.to_string_lossy();
        let output = self.exec(&["-C", &path_str, "pull", "--ff-only"]).await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let remote = self.remote_url(path).await.unwrap_or_else(|| "origin".to_string());
            Err(StockpotError::sync(remote, path, stderr.trim()))
        }
    }

    fn name(&self) -> &'static str {
        "git"
    }
}
