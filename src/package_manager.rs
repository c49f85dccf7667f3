//! Package manager invocation
//!
//! Aggregated dependencies are installed with a single `<program> add ...`
//! call per provisioning run. Arguments are passed as a list, never through
//! a shell, and the project root is set as the child's working directory.

use crate::catalog::DependencyList;
use crate::config::schema::PackageManagerConfig;
use crate::error::{StockpotError, StockpotResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Max number of output lines to include in install error messages.
const INSTALL_ERROR_TAIL_LINES: usize = 50;

/// Captured result of a successful install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutput {
    /// Command line that ran, for display
    pub command: String,
    /// Interleaved stdout and stderr lines
    pub lines: Vec<String>,
}

/// Something that can add dependencies to a project
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Add `deps` to the project at `project`, streaming output lines
    async fn add(
        &self,
        project: &Path,
        deps: &DependencyList,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> StockpotResult<InstallOutput>;

    /// Program name for display
    fn program(&self) -> &str;
}

/// Install `deps` unless the list is empty.
///
/// Returns `None` when nothing was run.
pub async fn install_dependencies(
    manager: &dyn PackageManager,
    project: &Path,
    deps: &DependencyList,
    on_output: &(dyn Fn(String) + Send + Sync),
) -> StockpotResult<Option<InstallOutput>> {
    if deps.is_empty() {
        debug!("No dependencies to install");
        return Ok(None);
    }

    info!("Installing {} dependencies with {}", deps.len(), manager.program());
    manager.add(project, deps, on_output).await.map(Some)
}

/// Package manager driven through its command line (yarn, npm, pnpm)
#[derive(Debug, Clone)]
pub struct CliPackageManager {
    program: String,
    add_args: Vec<String>,
}

impl CliPackageManager {
    pub fn new(program: impl Into<String>, add_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            add_args,
        }
    }

    pub fn from_config(config: &PackageManagerConfig) -> Self {
        Self::new(config.program.clone(), config.add_args.clone())
    }

    /// Full argument list for installing `deps`
    pub fn argv(&self, deps: &DependencyList) -> Vec<String> {
        self.add_args
            .iter()
            .cloned()
            .chain(deps.iter().map(str::to_string))
            .collect()
    }

    /// Check if the program can be run
    pub async fn is_installed(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for CliPackageManager {
    fn default() -> Self {
        Self::from_config(&PackageManagerConfig::default())
    }
}

#[async_trait]
impl PackageManager for CliPackageManager {
    async fn add(
        &self,
        project: &Path,
        deps: &DependencyList,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> StockpotResult<InstallOutput> {
        let args = self.argv(deps);
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Executing in {}: {}", project.display(), command);

        let mut child = Command::new(&self.program)
            .args(&args)
            .current_dir(project)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StockpotError::command_failed(&command, e))?;

        let lines = stream_child_output(&mut child, on_output).await?;

        let status = child
            .wait()
            .await
            .map_err(|e| StockpotError::command_failed(&command, e))?;

        if status.success() {
            Ok(InstallOutput { command, lines })
        } else {
            Err(StockpotError::Install {
                command,
                code: status.code().unwrap_or(-1),
                output: error_tail(&lines),
            })
        }
    }

    fn program(&self) -> &str {
        &self.program
    }
}

/// The last `INSTALL_ERROR_TAIL_LINES` lines of captured output
fn error_tail(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(INSTALL_ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Stream stdout+stderr from a child process, calling `on_output` for each line.
///
/// Lines are decoded lossily: package managers echo file names and
/// registry output that need not be UTF-8, and a pipe that stops being
/// drained blocks the child. Returns all collected output lines for error
/// reporting.
async fn stream_child_output(
    child: &mut tokio::process::Child,
    on_output: &(dyn Fn(String) + Send + Sync),
) -> StockpotResult<Vec<String>> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| StockpotError::Internal("child stderr not piped".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| StockpotError::Internal("child stdout not piped".to_string()))?;

    let mut stderr_reader = BufReader::new(stderr).split(b'\n');
    let mut stdout_reader = BufReader::new(stdout).split(b'\n');

    let mut all_output = Vec::new();
    let mut stderr_done = false;
    let mut stdout_done = false;

    while !stderr_done || !stdout_done {
        let (segment, from_stderr) = tokio::select! {
            segment = stderr_reader.next_segment(), if !stderr_done => (segment, true),
            segment = stdout_reader.next_segment(), if !stdout_done => (segment, false),
        };

        let finished = match segment {
            Ok(Some(raw)) => {
                let line = decode_line(&raw);
                on_output(line.clone());
                all_output.push(line);
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("Stopped reading package manager output: {}", e);
                true
            }
        };
        if finished && from_stderr {
            stderr_done = true;
        } else if finished {
            stdout_done = true;
        }
    }

    Ok(all_output)
}

/// One output line without its `\r`, invalid UTF-8 replaced
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPackageManager;
    use tempfile::TempDir;

    fn deps(items: &[&str]) -> DependencyList {
        items.iter().copied().collect()
    }

    fn quiet(_: String) {}

    #[test]
    fn argv_puts_add_args_first() {
        let manager = CliPackageManager::default();
        assert_eq!(
            manager.argv(&deps(&["moment", "lodash"])),
            vec!["add", "lodash", "moment"]
        );
    }

    #[test]
    fn argv_keeps_specifiers_intact() {
        let manager = CliPackageManager::new("npm", vec!["install".into(), "--save".into()]);
        assert_eq!(
            manager.argv(&deps(&["left pad", "react@^16.4.0"])),
            vec!["install", "--save", "left pad", "react@^16.4.0"]
        );
    }

    #[test]
    fn error_tail_limits_lines() {
        let lines: Vec<String> = (0..80).map(|i| format!("line {}", i)).collect();
        let tail = error_tail(&lines);
        assert_eq!(tail.lines().count(), INSTALL_ERROR_TAIL_LINES);
        assert!(tail.starts_with("line 30"));
        assert!(tail.ends_with("line 79"));
    }

    #[test]
    fn decode_line_replaces_invalid_utf8() {
        assert_eq!(decode_line(b"success Saved lockfile.\r"), "success Saved lockfile.");
        assert_eq!(decode_line(b"\xff caf\xc3\xa9"), "\u{FFFD} caf\u{e9}");
    }

    #[tokio::test]
    async fn empty_list_skips_invocation() {
        let temp = TempDir::new().unwrap();
        let manager = RecordingPackageManager::new();

        let result = install_dependencies(&manager, temp.path(), &DependencyList::default(), &quiet)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(manager.invocations().is_empty());
    }

    #[tokio::test]
    async fn non_empty_list_invokes_once() {
        let temp = TempDir::new().unwrap();
        let manager = RecordingPackageManager::new();

        install_dependencies(&manager, temp.path(), &deps(&["yup", "lodash"]), &quiet)
            .await
            .unwrap();

        assert_eq!(manager.invocations(), vec![vec!["lodash", "yup"]]);
    }

    #[tokio::test]
    async fn missing_program_is_command_failed() {
        let temp = TempDir::new().unwrap();
        let manager = CliPackageManager::new("stockpot-no-such-program", vec!["add".into()]);

        let err = manager
            .add(temp.path(), &deps(&["lodash"]), &quiet)
            .await
            .unwrap_err();

        assert!(matches!(err, StockpotError::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_project_directory_and_captures_output() {
        let temp = TempDir::new().unwrap();
        let manager = CliPackageManager::new("sh", vec!["-c".into(), "pwd; echo \"$@\"".into(), "sh".into()]);
        let seen = std::sync::Mutex::new(Vec::new());
        let record = |line: String| seen.lock().unwrap().push(line);

        let output = manager
            .add(temp.path(), &deps(&["moment", "lodash"]), &record)
            .await
            .unwrap();

        let cwd = std::path::PathBuf::from(&output.lines[0]).canonicalize().unwrap();
        assert_eq!(cwd, temp.path().canonicalize().unwrap());
        assert_eq!(output.lines[1], "lodash moment");
        assert_eq!(seen.into_inner().unwrap().len(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_install_error_with_output() {
        let temp = TempDir::new().unwrap();
        let manager = CliPackageManager::new(
            "sh",
            vec!["-c".into(), "echo \"error Couldn't find package $1\" >&2; exit 1".into(), "sh".into()],
        );

        let err = manager
            .add(temp.path(), &deps(&["no-such-pkg"]), &quiet)
            .await
            .unwrap_err();

        match err {
            StockpotError::Install { code, output, .. } => {
                assert_eq!(code, 1);
                assert!(output.contains("Couldn't find package no-such-pkg"));
            }
            other => panic!("expected Install error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn invalid_utf8_output_keeps_pipe_drained() {
        let temp = TempDir::new().unwrap();
        // More than a pipe buffer after the bad byte, so the child blocks if
        // the reader gives up on the stream
        let script = "printf '\\377\\n'; head -c 300000 /dev/zero | tr '\\0' a; echo; echo done";
        let manager = CliPackageManager::new("sh", vec!["-c".into(), script.into(), "sh".into()]);

        let output = manager
            .add(temp.path(), &deps(&["lodash"]), &quiet)
            .await
            .unwrap();

        assert_eq!(output.lines[0], "\u{FFFD}");
        assert_eq!(output.lines[1].len(), 300_000);
        assert_eq!(output.lines.last().map(String::as_str), Some("done"));
    }
}
