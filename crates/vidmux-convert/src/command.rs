//! Execution of external tool invocations.
//!
//! Every conversion phase is one [`ToolCommand`] run: spawn the process,
//! capture its output, and enforce a hard wall-clock timeout. Expiry kills
//! the child and is reported the same way as a non-zero exit, so a hung
//! ffmpeg costs its caller nothing more than a failed phase.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use vidmux_core::{Error, Result};

/// Default timeout: 1 hour. Re-encodes of large inputs are slow; callers
/// normally override this from configuration.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Output captured from a successful tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8). ffmpeg writes its progress and
    /// diagnostics here even on success.
    pub stderr: String,
}

/// A single external tool invocation.
///
/// # Example
///
/// ```no_run
/// use vidmux_convert::ToolCommand;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// # async fn example() -> vidmux_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffmpeg"))
///     .arg("-i").arg("/media/video.mkv")
///     .args(["-c", "copy", "-y"])
///     .arg("/media/video.mp4")
///     .timeout(Duration::from_secs(600))
///     .execute()
///     .await?;
/// println!("{}", output.stderr);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// Run the command to completion, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Spawn failure, timeout, and non-zero exit all come back as
    /// [`Error::Tool`]; the timeout message names the configured duration,
    /// the exit message carries trimmed stderr.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let tool = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            // ffmpeg reads interactive commands from stdin; keep it closed.
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out invocation must not keep running once we give up
            // on it; dropping the cancelled future kills the child.
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(Error::tool(tool, format!("failed to run: {e}"))),
            Err(_elapsed) => {
                return Err(Error::tool(
                    tool,
                    format!("timed out after {:?}", self.timeout),
                ))
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(Error::tool(
                tool,
                format!("exited with status {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_echo() {
        // `echo` should be universally available.
        let output = ToolCommand::new(PathBuf::from("echo"))
            .arg("hello")
            .execute()
            .await;

        match output {
            Ok(out) => assert!(out.stdout.trim().contains("hello")),
            Err(_) => {
                // On some minimal environments echo may not exist; skip.
            }
        }
    }

    #[tokio::test]
    async fn execute_nonexistent_tool() {
        let result = ToolCommand::new(PathBuf::from("nonexistent_tool_xyz_12345"))
            .execute()
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn nonzero_exit_is_error() {
        let result = ToolCommand::new(PathBuf::from("sh"))
            .args(["-c", "exit 3"])
            .execute()
            .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("exited with status"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn stderr_lands_in_the_error_message() {
        let result = ToolCommand::new(PathBuf::from("sh"))
            .args(["-c", "echo 'no muxer for this container' >&2; exit 1"])
            .execute()
            .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("no muxer"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn timeout_fires() {
        // `sleep 10` should be killed well before 10 seconds.
        let result = ToolCommand::new(PathBuf::from("sleep"))
            .arg("10")
            .timeout(Duration::from_millis(100))
            .execute()
            .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("timed out"), "unexpected error: {err}");
    }
}
