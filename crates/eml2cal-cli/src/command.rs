//! External command execution.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::trace;

use crate::error::{RunError, RunResult};

/// Runs a shell command, feeding `input` on stdin, and returns its stdout.
///
/// The command line is interpreted by `sh -c`, so pipes and quoting work as
/// they would interactively. A non-zero exit status is an error carrying
/// the command's stderr.
pub async fn run_command(cmd: &str, input: &[u8]) -> RunResult<Vec<u8>> {
    trace!(cmd = %cmd, "running command");
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(if input.is_empty() {
            Stdio::null()
        } else {
            Stdio::piped()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RunError::Spawn {
            cmd: cmd.to_string(),
            source,
        })?;

    if !input.is_empty() {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input).await?;
        }
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(RunError::Command {
            cmd: cmd.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let output = run_command("printf hello", b"").await.unwrap();
        assert_eq!(output, b"hello");
    }

    #[tokio::test]
    async fn pipes_stdin() {
        let output = run_command("cat", b"reservation data").await.unwrap();
        assert_eq!(output, b"reservation data");
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let result = run_command("echo oops >&2; exit 3", b"").await;
        match result {
            Err(RunError::Command { code, stderr, .. }) => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_shell_command_fails() {
        let result = run_command("definitely-not-a-real-binary-xyz", b"").await;
        assert!(matches!(result, Err(RunError::Command { .. })));
    }
}
